#![allow(dead_code)]

use kissj::AppPaths;
use kissj::kernel::EnvSource;
use kissj::{Registry, Settings};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const ENV: &[(&str, &str)] = &[
    ("DEBUG", "false"),
    ("TESTING_SITE", "false"),
    ("TEMPLATE_CACHE", "false"),
    ("DEFAULT_LOCALE", "cs"),
    ("LOGGER_FILENAME", "kissj.log"),
    ("LOGGER_LEVEL", "WARNING"),
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
    ("MAIL_SEND_MAIL_TO_MAIN_RECIPIENT", "false"),
    ("PAYMENT_ACCOUNT_NUMBER", "2801234567/2010"),
    ("FILE_HANDLER_TYPE", "local"),
    ("S3_BUCKET", "kissj-uploads"),
    ("S3_KEY", "AKIAEXAMPLE"),
    ("S3_SECRET", "s3-secret"),
    ("S3_REGION", "eu-central-1"),
    ("S3_ENDPOINT", "http://127.0.0.1:9000"),
    ("DB_TYPE", "sqlite"),
    ("DATABASE_HOST", "db.internal"),
    ("POSTGRES_USER", "kissj"),
    ("POSTGRES_PASSWORD", "pg-pass"),
    ("POSTGRES_DB", "kissj"),
];

/// A deployment laid out in a temp dir: `.env`, catalogs, one template, upload root.
pub struct Fixture {
    pub dir: TempDir,
    pub paths: AppPaths,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let mut body = String::new();
        for (key, value) in ENV {
            let _ = writeln!(body, "{key}=\"{value}\"");
        }
        fs::write(root.join(".env"), body).unwrap();

        let templates = root.join("templates");
        write(&templates.join("en.yaml"), "mail:\n  greeting: 'Hello %name%'\n");
        write(&templates.join("cs.yaml"), "mail:\n  greeting: 'Ahoj %name%'\n");
        write(&templates.join("sk.yaml"), "mail:\n  greeting: 'Ahoj %name%!'\n");
        write(
            &templates.join("translatable/emails/hello.html.twig"),
            "<p>{{ 'mail.greeting'|trans({'%name%': name}) }}</p>",
        );

        let paths = AppPaths::new(root.join("kissj.sqlite"), templates, root.join("uploads"));
        Self { dir, paths }
    }

    pub fn settings(&self, overrides: &[(&str, &str)]) -> Settings {
        let mut source = EnvSource::new(self.dir.path(), ".env").ignore_system_env();
        for (key, value) in overrides {
            source = source.with_var(*key, *value);
        }
        source.load_settings(self.paths.db_full_path()).unwrap()
    }

    pub async fn registry(&self, overrides: &[(&str, &str)]) -> Registry {
        Registry::builder()
            .settings(self.settings(overrides))
            .paths(self.paths.clone())
            .build()
            .await
            .unwrap()
    }
}

pub fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
