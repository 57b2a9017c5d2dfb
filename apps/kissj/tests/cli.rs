use assert_cmd::Command;
use predicates::prelude::*;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ENV: &[(&str, &str)] = &[
    ("DEBUG", "false"),
    ("TESTING_SITE", "true"),
    ("TEMPLATE_CACHE", "false"),
    ("DEFAULT_LOCALE", "sk"),
    ("LOGGER_FILENAME", "kissj.log"),
    ("LOGGER_LEVEL", "INFO"),
    ("ADMINER_LOGIN", "admin"),
    ("ADMINER_PASSWORD", "correct-horse"),
    ("MAIL_SMTP", "false"),
    ("MAIL_SMTP_SERVER", ""),
    ("MAIL_SMTP_AUTH", "false"),
    ("MAIL_SMTP_PORT", ""),
    ("MAIL_SMTP_USERNAME", ""),
    ("MAIL_SMTP_PASSWORD", ""),
    ("MAIL_SMTP_SECURE", ""),
    ("MAIL_FROM_MAIL", "registration@example.org"),
    ("MAIL_FROM_NAME", "Registration"),
    ("MAIL_BCC_MAIL", "archive@example.org"),
    ("MAIL_BCC_NAME", "Archive"),
    ("MAIL_DISABLE_TLS", "false"),
    ("MAIL_DEBUG_OUTPUT_LEVEL", "0"),
    ("MAIL_SEND_MAIL_TO_MAIN_RECIPIENT", "false"),
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

fn deployment(replace: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    let mut body = String::new();
    for (key, value) in ENV {
        let value = replace.iter().find(|(k, _)| k == key).map_or(*value, |(_, v)| *v);
        let _ = writeln!(body, "{key}=\"{value}\"");
    }
    fs::write(dir.path().join(".env"), body).unwrap();

    let templates = dir.path().join("templates");
    fs::create_dir_all(templates.join("translatable")).unwrap();
    fs::write(templates.join("sk.yaml"), "hello: Ahoj\n").unwrap();
    dir
}

fn kissj(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("kissj").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--env-dir")
        .arg(root)
        .arg("--db-path")
        .arg(root.join("db.sqlite"))
        .arg("--templates-dir")
        .arg(root.join("templates"))
        .arg("--uploads-dir")
        .arg(root.join("uploads"))
        .arg("--ignore-system-env");
    cmd
}

#[test]
fn no_arguments_prints_help() {
    Command::cargo_bin("kissj").unwrap().assert().failure().stderr(predicate::str::contains("Usage"));
}

#[test]
fn check_reports_every_service() {
    let dir = deployment(&[]);
    kissj(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("KISSJ ["))
        .stdout(predicate::str::contains("configuration OK"))
        .stdout(predicate::str::contains("sqlite3://"))
        .stdout(predicate::str::contains("file handler: local"))
        .stdout(predicate::str::contains("locale:       sk"))
        .stdout(predicate::str::contains("mail:         sendmail"));

    assert!(dir.path().join("uploads").is_dir());
}

#[test]
fn placeholder_adminer_password_is_rejected() {
    let dir = deployment(&[("ADMINER_PASSWORD", "changeThisPassword")]);
    kissj(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"))
        .stderr(predicate::str::contains("ADMINER_PASSWORD"));
}

#[test]
fn insecure_mail_options_need_dev_mode() {
    let dir = deployment(&[("MAIL_DISABLE_TLS", "true")]);
    kissj(dir.path()).arg("check").assert().failure().stderr(predicate::str::contains("MAIL_DISABLE_TLS"));

    let dir = deployment(&[("MAIL_DISABLE_TLS", "true")]);
    fs::write(
        dir.path().join(".env"),
        fs::read_to_string(dir.path().join(".env")).unwrap() + "INSECURE_DEV_MODE=\"true\"\n",
    )
    .unwrap();
    kissj(dir.path()).arg("check").assert().success();
}

#[test]
fn missing_env_file_fails() {
    let dir = TempDir::new().unwrap();
    kissj(dir.path()).arg("check").assert().failure().stderr(predicate::str::contains(".env"));
}

#[test]
fn send_mail_requires_a_body_or_template() {
    let dir = deployment(&[]);
    kissj(dir.path())
        .args(["send-mail", "--to", "scout@example.com", "--subject", "Hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--body"));
}

#[test]
fn send_mail_failure_is_reported_with_the_fixed_message() {
    // nothing listens on port 1: the relay refuses the connection
    let dir = deployment(&[("MAIL_SMTP", "true"), ("MAIL_SMTP_SERVER", "127.0.0.1"), ("MAIL_SMTP_PORT", "1")]);
    kissj(dir.path())
        .args(["send-mail", "--to", "scout@example.com", "--subject", "Hi", "--body", "<p>Hi</p>"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error sending email"));
}

#[cfg(unix)]
mod non_utf8_environment {
    use super::*;
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    fn kissj_with_process_env(root: &Path) -> Command {
        let mut cmd = Command::cargo_bin("kissj").unwrap();
        cmd.env_clear()
            .arg("--env-dir")
            .arg(root)
            .arg("--db-path")
            .arg(root.join("db.sqlite"))
            .arg("--templates-dir")
            .arg(root.join("templates"))
            .arg("--uploads-dir")
            .arg(root.join("uploads"));
        cmd
    }

    #[test]
    fn unrelated_non_utf8_variable_is_ignored() {
        let dir = deployment(&[]);
        kissj_with_process_env(dir.path())
            .env("UNRELATED_VAR", OsStr::from_bytes(b"caf\xe9"))
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("configuration OK"));
    }

    #[test]
    fn non_utf8_configuration_key_is_a_validation_error() {
        let dir = deployment(&[]);
        kissj_with_process_env(dir.path())
            .env("DEBUG", OsStr::from_bytes(b"tru\xe9"))
            .arg("check")
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("DEBUG"))
            .stderr(predicate::str::contains("not valid UTF-8"));
    }
}
