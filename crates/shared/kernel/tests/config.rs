use kissj_kernel::config::{ConfigError, EnvSource, required_keys};
use kissj_kernel::domain::{DbType, FileHandlerType, Locale, LogLevel};
use secrecy::ExposeSecret;
use std::fmt::Write as _;
use std::path::Path;
use tempfile::TempDir;

const VALID_ENV: &[(&str, &str)] = &[
    ("DEBUG", "false"),
    ("TESTING_SITE", "false"),
    ("TEMPLATE_CACHE", "true"),
    ("DEFAULT_LOCALE", "cs"),
    ("LOGGER_FILENAME", "kissj.log"),
    ("LOGGER_LEVEL", "NOTICE"),
    ("ADMINER_LOGIN", "admin"),
    ("ADMINER_PASSWORD", "correct-horse"),
    ("MAIL_SMTP", "true"),
    ("MAIL_SMTP_SERVER", "smtp.example.org"),
    ("MAIL_SMTP_AUTH", "true"),
    ("MAIL_SMTP_PORT", "587"),
    ("MAIL_SMTP_USERNAME", "mailer"),
    ("MAIL_SMTP_PASSWORD", "mail-pass"),
    ("MAIL_SMTP_SECURE", "tls"),
    ("MAIL_FROM_MAIL", "registration@example.org"),
    ("MAIL_FROM_NAME", "Registration"),
    ("MAIL_BCC_MAIL", "archive@example.org"),
    ("MAIL_BCC_NAME", "Archive"),
    ("MAIL_DISABLE_TLS", "false"),
    ("MAIL_DEBUG_OUTPUT_LEVEL", "0"),
    ("MAIL_SEND_MAIL_TO_MAIN_RECIPIENT", "true"),
    ("PAYMENT_ACCOUNT_NUMBER", "2801234567/2010"),
    ("FILE_HANDLER_TYPE", "local"),
    ("S3_BUCKET", ""),
    ("S3_KEY", ""),
    ("S3_SECRET", ""),
    ("S3_REGION", ""),
    ("S3_ENDPOINT", ""),
    ("DB_TYPE", "sqlite"),
    ("DATABASE_HOST", ""),
    ("POSTGRES_USER", ""),
    ("POSTGRES_PASSWORD", ""),
    ("POSTGRES_DB", ""),
];

fn write_env(dir: &Path, pairs: &[(&str, &str)]) {
    let mut body = String::new();
    for (key, value) in pairs {
        let _ = writeln!(body, "{key}=\"{value}\"");
    }
    std::fs::write(dir.join(".env"), body).unwrap();
}

fn env_with(replace: &[(&str, &str)]) -> Vec<(&'static str, String)> {
    VALID_ENV
        .iter()
        .map(|(k, v)| {
            let value = replace.iter().find(|(rk, _)| rk == k).map_or(*v, |(_, rv)| *rv);
            (*k, value.to_owned())
        })
        .collect()
}

fn source(dir: &TempDir, pairs: &[(&str, String)]) -> EnvSource {
    let borrowed: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
    write_env(dir.path(), &borrowed);
    EnvSource::new(dir.path(), ".env").ignore_system_env()
}

fn validation_key(result: Result<kissj_kernel::Settings, ConfigError>) -> &'static str {
    match result {
        Err(ConfigError::Validation { key, .. }) => key,
        Err(other) => panic!("expected a validation error, got {other}"),
        Ok(_) => panic!("expected a validation error, got valid settings"),
    }
}

#[test]
fn valid_env_produces_typed_settings() {
    let dir = TempDir::new().unwrap();
    let settings = source(&dir, &env_with(&[]))
        .load_settings(Path::new("/var/kissj/db.sqlite"))
        .expect("valid settings");

    assert_eq!(settings.app.name, "KISSJ");
    assert_eq!(settings.app.default_locale, Locale::Cs);
    assert!(settings.app.template_cache);
    assert_eq!(settings.logger.level, LogLevel::Notice);
    assert_eq!(settings.database.db_type, DbType::Sqlite);
    assert_eq!(settings.database.full_path, Path::new("/var/kissj/db.sqlite"));
    assert_eq!(settings.storage.file_handler, FileHandlerType::Local);
    assert_eq!(settings.mail.port, 587);
    assert_eq!(settings.mail.password.expose_secret(), "mail-pass");
    assert!(settings.mail.insecure.is_none());
    assert!(settings.payment.fio_api_token.is_none());
}

#[test]
fn every_required_key_is_enforced_by_name() {
    for missing in required_keys() {
        let dir = TempDir::new().unwrap();
        let pairs: Vec<_> = env_with(&[]).into_iter().filter(|(k, _)| *k != missing).collect();
        let result = source(&dir, &pairs).load_settings(Path::new("db.sqlite"));
        assert_eq!(validation_key(result), missing, "missing {missing}");
    }
}

#[test]
fn validation_stops_at_the_first_violation() {
    let dir = TempDir::new().unwrap();
    let pairs = env_with(&[("DEBUG", "sometimes"), ("DB_TYPE", "mysql")]);
    assert_eq!(validation_key(source(&dir, &pairs).load_settings(Path::new("db"))), "DEBUG");
}

#[test]
fn allowed_value_sets_are_enforced() {
    for (key, bad) in [
        ("DEFAULT_LOCALE", "de"),
        ("LOGGER_LEVEL", "TRACE"),
        ("MAIL_DEBUG_OUTPUT_LEVEL", "5"),
        ("FILE_HANDLER_TYPE", "ftp"),
        ("DB_TYPE", "mysql"),
    ] {
        let dir = TempDir::new().unwrap();
        let result = source(&dir, &env_with(&[(key, bad)])).load_settings(Path::new("db"));
        assert_eq!(validation_key(result), key);
    }
}

#[test]
fn adminer_password_placeholder_and_empty_are_rejected() {
    for bad in ["", "changeThisPassword"] {
        let dir = TempDir::new().unwrap();
        let result =
            source(&dir, &env_with(&[("ADMINER_PASSWORD", bad)])).load_settings(Path::new("db"));
        assert_eq!(validation_key(result), "ADMINER_PASSWORD");
    }
}

#[test]
fn derived_keys_cannot_be_overridden() {
    let dir = TempDir::new().unwrap();
    let mut pairs = env_with(&[]);
    pairs.push(("APP_NAME", "Impostor".to_owned()));
    pairs.push(("DB_FULL_PATH", "/tmp/elsewhere.sqlite".to_owned()));

    let set = source(&dir, &pairs)
        .with_var("APP_NAME", "StillNot")
        .configuration_set(Path::new("/data/kissj.sqlite"))
        .unwrap();
    assert_eq!(set.get("APP_NAME"), Some("KISSJ"));
    assert_eq!(set.get("DB_FULL_PATH"), Some("/data/kissj.sqlite"));
}

#[test]
fn explicit_variables_win_over_the_env_file() {
    let dir = TempDir::new().unwrap();
    let settings = source(&dir, &env_with(&[]))
        .with_var("DB_TYPE", "postgresql")
        .with_var("DATABASE_HOST", "db.internal")
        .load_settings(Path::new("db"))
        .unwrap();
    assert_eq!(settings.database.db_type, DbType::Postgresql);
    assert_eq!(settings.database.host, "db.internal");
}

#[test]
fn insecure_mail_options_need_insecure_dev_mode() {
    let dir = TempDir::new().unwrap();
    let relaxed = env_with(&[("MAIL_DISABLE_TLS", "true"), ("MAIL_DEBUG_OUTPUT_LEVEL", "2")]);

    let rejected = source(&dir, &relaxed).load_settings(Path::new("db"));
    assert_eq!(validation_key(rejected), "MAIL_DISABLE_TLS");

    let settings = source(&dir, &relaxed)
        .with_var("INSECURE_DEV_MODE", "true")
        .load_settings(Path::new("db"))
        .unwrap();
    assert!(settings.mail.disable_tls());
    assert_eq!(settings.mail.debug_output_level(), 2);
}

#[test]
fn empty_smtp_port_defaults_and_garbage_is_rejected() {
    let dir = TempDir::new().unwrap();
    let settings =
        source(&dir, &env_with(&[("MAIL_SMTP_PORT", "")])).load_settings(Path::new("db")).unwrap();
    assert_eq!(settings.mail.port, 25);

    let result = source(&dir, &env_with(&[("MAIL_SMTP_PORT", "smtp")])).load_settings(Path::new("db"));
    assert_eq!(validation_key(result), "MAIL_SMTP_PORT");
}

#[test]
fn missing_env_file_is_a_dotenv_error() {
    let dir = TempDir::new().unwrap();
    let err = EnvSource::new(dir.path(), "absent.env")
        .ignore_system_env()
        .load_settings(Path::new("db"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Dotenv { .. }));
    assert!(err.key().is_none());
}

#[test]
fn configuration_set_debug_hides_values() {
    let dir = TempDir::new().unwrap();
    let set = source(&dir, &env_with(&[])).configuration_set(Path::new("db")).unwrap();
    let rendered = format!("{set:?}");
    assert!(rendered.contains("ADMINER_PASSWORD"));
    assert!(!rendered.contains("correct-horse"));
}

#[test]
fn view_flags_only_react_to_their_literal_values() {
    let dir = TempDir::new().unwrap();
    let settings = source(&dir, &env_with(&[("DEBUG", "1"), ("TEMPLATE_CACHE", "0")]))
        .load_settings(Path::new("db"))
        .unwrap();
    assert!(!settings.app.debug);
    assert!(settings.app.template_cache);

    let settings = source(&dir, &env_with(&[("DEBUG", "true"), ("TEMPLATE_CACHE", "false")]))
        .load_settings(Path::new("db"))
        .unwrap();
    assert!(settings.app.debug);
    assert!(!settings.app.template_cache);
}
