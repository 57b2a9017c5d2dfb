use super::{ConfigError, ConfigurationSet};
use kissj_domain::keys::*;

const BOOLEAN_VALUES: &[&str] = &["true", "false", "1", "0", "yes", "no", "on", "off"];
const LOCALES: &[&str] = &["en", "cs", "sk"];
const LOG_LEVELS: &[&str] =
    &["DEBUG", "INFO", "NOTICE", "WARNING", "ERROR", "CRITICAL", "ALERT", "EMERGENCY"];
const MAIL_DEBUG_LEVELS: &[&str] = &["0", "1", "2", "3", "4"];
const FILE_HANDLERS: &[&str] = &["local", "s3bucket"];
const DB_TYPES: &[&str] = &["sqlite", "postgresql"];

#[derive(Debug, Clone, Copy)]
enum Allowed {
    Any,
    Boolean,
    OneOf(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Rule {
    pub(super) key: &'static str,
    not_empty: bool,
    allowed: Allowed,
}

const fn required(key: &'static str) -> Rule {
    Rule { key, not_empty: false, allowed: Allowed::Any }
}

const fn filled(key: &'static str) -> Rule {
    Rule { key, not_empty: true, allowed: Allowed::Any }
}

const fn flag(key: &'static str) -> Rule {
    Rule { key, not_empty: true, allowed: Allowed::Boolean }
}

const fn one_of(key: &'static str, values: &'static [&'static str], not_empty: bool) -> Rule {
    Rule { key, not_empty, allowed: Allowed::OneOf(values) }
}

/// Checked in order; the first violation wins.
pub(super) const RULES: &[Rule] = &[
    flag(DEBUG),
    flag(TESTING_SITE),
    flag(TEMPLATE_CACHE),
    one_of(DEFAULT_LOCALE, LOCALES, true),
    filled(LOGGER_FILENAME),
    one_of(LOGGER_LEVEL, LOG_LEVELS, true),
    filled(ADMINER_LOGIN),
    filled(ADMINER_PASSWORD),
    required(MAIL_SMTP),
    required(MAIL_SMTP_SERVER),
    required(MAIL_SMTP_AUTH),
    required(MAIL_SMTP_PORT),
    required(MAIL_SMTP_USERNAME),
    required(MAIL_SMTP_PASSWORD),
    required(MAIL_SMTP_SECURE),
    required(MAIL_FROM_MAIL),
    required(MAIL_FROM_NAME),
    required(MAIL_BCC_MAIL),
    required(MAIL_BCC_NAME),
    required(MAIL_DISABLE_TLS),
    one_of(MAIL_DEBUG_OUTPUT_LEVEL, MAIL_DEBUG_LEVELS, false),
    required(MAIL_SEND_MAIL_TO_MAIN_RECIPIENT),
    required(PAYMENT_ACCOUNT_NUMBER),
    one_of(FILE_HANDLER_TYPE, FILE_HANDLERS, false),
    required(S3_BUCKET),
    required(S3_KEY),
    required(S3_SECRET),
    required(S3_REGION),
    required(S3_ENDPOINT),
    one_of(DB_TYPE, DB_TYPES, false),
    required(DATABASE_HOST),
    required(POSTGRES_USER),
    required(POSTGRES_PASSWORD),
    required(POSTGRES_DB),
];

impl Rule {
    fn check(&self, set: &ConfigurationSet) -> Result<(), ConfigError> {
        let Some(value) = set.get(self.key) else {
            return Err(ConfigError::invalid(self.key, "is missing"));
        };
        if self.not_empty && value.trim().is_empty() {
            return Err(ConfigError::invalid(self.key, "is empty"));
        }

        match self.allowed {
            Allowed::Any => Ok(()),
            Allowed::Boolean if value.is_empty() || is_boolean(value) => Ok(()),
            Allowed::Boolean => Err(ConfigError::invalid(self.key, format!("`{value}` is not a boolean"))),
            Allowed::OneOf(values) if values.contains(&value) => Ok(()),
            Allowed::OneOf(values) => Err(ConfigError::invalid(
                self.key,
                format!("`{value}` is not one of: {}", values.join(", ")),
            )),
        }
    }
}

pub(super) fn is_boolean(value: &str) -> bool {
    BOOLEAN_VALUES.iter().any(|b| b.eq_ignore_ascii_case(value.trim()))
}

pub(super) fn check_all(set: &ConfigurationSet) -> Result<(), ConfigError> {
    RULES.iter().try_for_each(|rule| rule.check(set))
}

pub(super) fn check_adminer_password(set: &ConfigurationSet) -> Result<(), ConfigError> {
    match set.get(ADMINER_PASSWORD) {
        Some(password) if !password.is_empty() && password != ADMINER_PASSWORD_PLACEHOLDER => Ok(()),
        _ => Err(ConfigError::invalid(
            ADMINER_PASSWORD,
            "Adminer password must be changed and cannot be empty",
        )),
    }
}
