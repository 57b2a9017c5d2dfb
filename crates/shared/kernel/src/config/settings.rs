use super::{ConfigError, ConfigurationSet, rules};
use kissj_domain::keys::*;
use kissj_domain::settings::{
    AdminerSettings, AppSettings, DatabaseSettings, InsecureMailOptions, LoggerSettings,
    MailerSettings, PaymentSettings, S3Settings, SettingsInner, StorageSettings,
};
use kissj_domain::{DbType, FileHandlerType, Locale, LogLevel, Settings};
use secrecy::SecretString;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_SMTP_PORT: u16 = 25;

/// Types a validated set. Only values the rule table leaves open can still fail here.
pub(super) fn from_set(set: &ConfigurationSet) -> Result<Settings, ConfigError> {
    let insecure_dev_mode = match set.get(INSECURE_DEV_MODE) {
        Some(raw) => boolean(INSECURE_DEV_MODE, raw)?,
        None => false,
    };

    let app = AppSettings {
        name: text(set, APP_NAME),
        debug: set.get(DEBUG) == Some("true"),
        testing_site: flag(set, TESTING_SITE)?,
        template_cache: set.get(TEMPLATE_CACHE) != Some("false"),
        default_locale: discriminator::<Locale>(set, DEFAULT_LOCALE)?,
        insecure_dev_mode,
    };

    let logger = LoggerSettings {
        filename: text(set, LOGGER_FILENAME),
        level: discriminator::<LogLevel>(set, LOGGER_LEVEL)?,
    };

    let adminer =
        AdminerSettings { login: text(set, ADMINER_LOGIN), password: secret(set, ADMINER_PASSWORD) };

    let payment = PaymentSettings {
        account_number: text(set, PAYMENT_ACCOUNT_NUMBER),
        fio_api_token: set.get(PAYMENT_FIO_API_TOKEN).filter(|t| !t.is_empty()).map(SecretString::from),
    };

    let storage = StorageSettings {
        file_handler: discriminator::<FileHandlerType>(set, FILE_HANDLER_TYPE)?,
        s3: S3Settings {
            bucket: text(set, S3_BUCKET),
            key: text(set, S3_KEY),
            secret: secret(set, S3_SECRET),
            region: text(set, S3_REGION),
            endpoint: text(set, S3_ENDPOINT),
        },
    };

    let database = DatabaseSettings {
        db_type: discriminator::<DbType>(set, DB_TYPE)?,
        full_path: PathBuf::from(text(set, DB_FULL_PATH)),
        host: text(set, DATABASE_HOST),
        user: text(set, POSTGRES_USER),
        password: secret(set, POSTGRES_PASSWORD),
        name: text(set, POSTGRES_DB),
    };

    let mail = mailer(set, insecure_dev_mode)?;

    Ok(Settings::new(SettingsInner { app, logger, adminer, mail, payment, storage, database }))
}

fn mailer(set: &ConfigurationSet, insecure_dev_mode: bool) -> Result<MailerSettings, ConfigError> {
    let port = match set.get(MAIL_SMTP_PORT).unwrap_or_default().trim() {
        "" => DEFAULT_SMTP_PORT,
        raw => raw.parse::<u16>().map_err(|_| {
            ConfigError::invalid(MAIL_SMTP_PORT, format!("`{raw}` is not a valid port"))
        })?,
    };

    let disable_tls = flag(set, MAIL_DISABLE_TLS)?;
    let debug_output_level = set.get(MAIL_DEBUG_OUTPUT_LEVEL).unwrap_or_default().parse::<u8>().map_err(
        |_| ConfigError::invalid(MAIL_DEBUG_OUTPUT_LEVEL, "must be one of: 0, 1, 2, 3, 4"),
    )?;

    let insecure = if insecure_dev_mode {
        warn!(disable_tls, debug_output_level, "Insecure development mode is enabled for mail");
        Some(InsecureMailOptions { disable_tls, debug_output_level })
    } else if disable_tls {
        return Err(ConfigError::invalid(MAIL_DISABLE_TLS, "requires INSECURE_DEV_MODE=true"));
    } else if debug_output_level > 0 {
        return Err(ConfigError::invalid(MAIL_DEBUG_OUTPUT_LEVEL, "requires INSECURE_DEV_MODE=true"));
    } else {
        None
    };

    Ok(MailerSettings {
        smtp: flag(set, MAIL_SMTP)?,
        server: text(set, MAIL_SMTP_SERVER),
        port,
        auth: flag(set, MAIL_SMTP_AUTH)?,
        username: text(set, MAIL_SMTP_USERNAME),
        password: secret(set, MAIL_SMTP_PASSWORD),
        secure: text(set, MAIL_SMTP_SECURE),
        from_mail: text(set, MAIL_FROM_MAIL),
        from_name: text(set, MAIL_FROM_NAME),
        bcc_mail: text(set, MAIL_BCC_MAIL),
        bcc_name: text(set, MAIL_BCC_NAME),
        send_mail_to_main_recipient: flag(set, MAIL_SEND_MAIL_TO_MAIN_RECIPIENT)?,
        insecure,
    })
}

fn text(set: &ConfigurationSet, key: &str) -> String {
    set.get(key).unwrap_or_default().to_owned()
}

fn secret(set: &ConfigurationSet, key: &str) -> SecretString {
    SecretString::from(text(set, key))
}

/// Empty counts as `false`.
fn flag(set: &ConfigurationSet, key: &'static str) -> Result<bool, ConfigError> {
    boolean(key, set.get(key).unwrap_or_default())
}

fn boolean(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(false);
    }
    if !rules::is_boolean(value) {
        return Err(ConfigError::invalid(key, format!("`{value}` is not a boolean")));
    }
    Ok(["true", "1", "yes", "on"].iter().any(|t| t.eq_ignore_ascii_case(value)))
}

fn discriminator<T>(set: &ConfigurationSet, key: &'static str) -> Result<T, ConfigError>
where
    T: FromStr<Err = kissj_domain::SelectionError>,
{
    set.get(key)
        .unwrap_or_default()
        .parse::<T>()
        .map_err(|err| ConfigError::invalid(key, err.to_string()))
}
