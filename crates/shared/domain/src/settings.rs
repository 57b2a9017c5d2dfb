use crate::kinds::{DbType, FileHandlerType, Locale, LogLevel};
use secrecy::SecretString;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Validated KISSJ configuration. Built once by the resolver, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SettingsInner {
    pub app: AppSettings,
    pub logger: LoggerSettings,
    pub adminer: AdminerSettings,
    pub mail: MailerSettings,
    pub payment: PaymentSettings,
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
}

/// Thin Arc-wrapped settings for inexpensive cloning into services.
#[derive(Debug, Clone)]
pub struct Settings {
    inner: Arc<SettingsInner>,
}

impl Settings {
    pub fn new(inner: SettingsInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for Settings {
    type Target = SettingsInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub debug: bool,
    pub testing_site: bool,
    pub template_cache: bool,
    pub default_locale: Locale,
    pub insecure_dev_mode: bool,
}

#[derive(Debug, Clone)]
pub struct LoggerSettings {
    /// Kept for deployments that still ship it; output always goes to stdout.
    pub filename: String,
    pub level: LogLevel,
}

#[derive(Debug, Clone)]
pub struct AdminerSettings {
    pub login: String,
    pub password: SecretString,
}

/// Everything the mail sender needs, resolved once.
#[derive(Debug, Clone)]
pub struct MailerSettings {
    pub smtp: bool,
    pub server: String,
    pub port: u16,
    pub auth: bool,
    pub username: String,
    pub password: SecretString,
    /// Configured encryption mode. The sender always negotiates STARTTLS regardless.
    pub secure: String,
    pub from_mail: String,
    pub from_name: String,
    /// Despite the name, this identity is added as a CC recipient.
    pub bcc_mail: String,
    pub bcc_name: String,
    pub send_mail_to_main_recipient: bool,
    /// Development escape hatches, present only when `INSECURE_DEV_MODE` allowed them.
    pub insecure: Option<InsecureMailOptions>,
}

impl MailerSettings {
    pub fn disable_tls(&self) -> bool {
        self.insecure.is_some_and(|i| i.disable_tls)
    }

    pub fn debug_output_level(&self) -> u8 {
        self.insecure.map_or(0, |i| i.debug_output_level)
    }
}

/// UNSAFE outside development: lets the mail transport skip certificate checks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InsecureMailOptions {
    pub disable_tls: bool,
    pub debug_output_level: u8,
}

#[derive(Debug, Clone)]
pub struct PaymentSettings {
    pub account_number: String,
    pub fio_api_token: Option<SecretString>,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub file_handler: FileHandlerType,
    pub s3: S3Settings,
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub key: String,
    pub secret: SecretString,
    pub region: String,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub db_type: DbType,
    pub full_path: PathBuf,
    pub host: String,
    pub user: String,
    pub password: SecretString,
    pub name: String,
}
