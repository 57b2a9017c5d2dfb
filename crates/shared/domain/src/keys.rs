//! Environment key names read by the configuration resolver.

pub const APP_NAME: &str = "APP_NAME";
pub const DB_FULL_PATH: &str = "DB_FULL_PATH";

pub const DEBUG: &str = "DEBUG";
pub const TESTING_SITE: &str = "TESTING_SITE";
pub const TEMPLATE_CACHE: &str = "TEMPLATE_CACHE";
pub const DEFAULT_LOCALE: &str = "DEFAULT_LOCALE";
pub const INSECURE_DEV_MODE: &str = "INSECURE_DEV_MODE";

pub const LOGGER_FILENAME: &str = "LOGGER_FILENAME";
pub const LOGGER_LEVEL: &str = "LOGGER_LEVEL";

pub const ADMINER_LOGIN: &str = "ADMINER_LOGIN";
pub const ADMINER_PASSWORD: &str = "ADMINER_PASSWORD";

pub const MAIL_SMTP: &str = "MAIL_SMTP";
pub const MAIL_SMTP_SERVER: &str = "MAIL_SMTP_SERVER";
pub const MAIL_SMTP_AUTH: &str = "MAIL_SMTP_AUTH";
pub const MAIL_SMTP_PORT: &str = "MAIL_SMTP_PORT";
pub const MAIL_SMTP_USERNAME: &str = "MAIL_SMTP_USERNAME";
pub const MAIL_SMTP_PASSWORD: &str = "MAIL_SMTP_PASSWORD";
pub const MAIL_SMTP_SECURE: &str = "MAIL_SMTP_SECURE";
pub const MAIL_FROM_MAIL: &str = "MAIL_FROM_MAIL";
pub const MAIL_FROM_NAME: &str = "MAIL_FROM_NAME";
pub const MAIL_BCC_MAIL: &str = "MAIL_BCC_MAIL";
pub const MAIL_BCC_NAME: &str = "MAIL_BCC_NAME";
pub const MAIL_DISABLE_TLS: &str = "MAIL_DISABLE_TLS";
pub const MAIL_DEBUG_OUTPUT_LEVEL: &str = "MAIL_DEBUG_OUTPUT_LEVEL";
pub const MAIL_SEND_MAIL_TO_MAIN_RECIPIENT: &str = "MAIL_SEND_MAIL_TO_MAIN_RECIPIENT";

pub const PAYMENT_ACCOUNT_NUMBER: &str = "PAYMENT_ACCOUNT_NUMBER";
pub const PAYMENT_FIO_API_TOKEN: &str = "PAYMENT_FIO_API_TOKEN";

pub const FILE_HANDLER_TYPE: &str = "FILE_HANDLER_TYPE";
pub const S3_BUCKET: &str = "S3_BUCKET";
pub const S3_KEY: &str = "S3_KEY";
pub const S3_SECRET: &str = "S3_SECRET";
pub const S3_REGION: &str = "S3_REGION";
pub const S3_ENDPOINT: &str = "S3_ENDPOINT";

pub const DB_TYPE: &str = "DB_TYPE";
pub const DATABASE_HOST: &str = "DATABASE_HOST";
pub const POSTGRES_USER: &str = "POSTGRES_USER";
pub const POSTGRES_PASSWORD: &str = "POSTGRES_PASSWORD";
pub const POSTGRES_DB: &str = "POSTGRES_DB";

/// Application name written into every configuration set.
pub const APP_NAME_VALUE: &str = "KISSJ";

/// Placeholder shipped in the sample `.env`; never accepted as a real password.
pub const ADMINER_PASSWORD_PLACEHOLDER: &str = "changeThisPassword";
