//! Command handlers behind the `kissj` binary.

pub mod args;

pub use args::{Cli, Command, Location, SendMail};

use anyhow::{Context, Result};
use kissj::kernel::EnvSource;
use kissj::{AppPaths, DeliveryMode, Locale, Registry};
use std::fmt;
use tracing::{Instrument, info, warn};

/// What `check` found.
#[derive(Debug)]
pub struct Report {
    pub app: String,
    pub uid: String,
    pub database: String,
    pub file_handler: &'static str,
    pub locale: Locale,
    pub templates: String,
    pub mail_transport: &'static str,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}] configuration OK", self.app, self.uid)?;
        writeln!(f, "  database:     {}", self.database)?;
        writeln!(f, "  file handler: {}", self.file_handler)?;
        writeln!(f, "  locale:       {}", self.locale)?;
        writeln!(f, "  templates:    {}", self.templates)?;
        write!(f, "  mail:         {}", self.mail_transport)
    }
}

#[derive(Debug)]
pub enum Outcome {
    Checked(Report),
    Sent { subject: String },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checked(report) => report.fmt(f),
            Self::Sent { subject } => write!(f, "Mail '{subject}' sent"),
        }
    }
}

/// Loads the settings and builds the registry. Nothing is logged before this succeeds.
///
/// # Errors
/// Fails on invalid configuration or an unusable upload directory.
pub async fn bootstrap(location: &Location) -> Result<Registry> {
    let paths = AppPaths::new(&location.db_path, &location.templates_dir, &location.uploads_dir);

    let mut source = EnvSource::new(&location.env_dir, &location.env_file);
    if location.ignore_system_env {
        source = source.ignore_system_env();
    }
    let settings = source
        .load_settings(paths.db_full_path())
        .with_context(|| format!("Critical: configuration in {} is invalid", source.env_file().display()))?;

    Registry::builder().settings(settings).paths(paths).build().await.context("Failed to build the service registry")
}

/// # Errors
/// Propagates bootstrap, service construction and delivery failures.
pub async fn run(cli: Cli) -> Result<Outcome> {
    let registry = bootstrap(&cli.location).await?;
    let logger = registry.logger().await?;

    async {
        match cli.command {
            Command::Check => check(&registry).await.map(Outcome::Checked),
            Command::SendMail(args) => send_mail(&registry, args).await,
        }
    }
    .instrument(logger.span())
    .await
}

async fn check(registry: &Registry) -> Result<Report> {
    let logger = registry.logger().await?;
    let database = registry.database();
    let handler = registry.file_handler().await?;
    let translator = registry.translator().await?;
    let view = registry.view().await?;
    let mailer = registry.mailer().await?;

    let plan = mailer.sender().plan();
    if !plan.verifies_certificates() {
        warn!("Mail certificates are not verified (MAIL_DISABLE_TLS)");
    }

    info!(driver = database.driver(), handler = handler.kind(), "Services constructed");
    Ok(Report {
        app: logger.name().to_owned(),
        uid: logger.uid().to_owned(),
        database: database.to_string(),
        file_handler: handler.kind(),
        locale: translator.locale(),
        templates: view.template_dir().display().to_string(),
        mail_transport: match plan.mode {
            DeliveryMode::Smtp => "smtp",
            DeliveryMode::LocalSubmission => "sendmail",
        },
    })
}

async fn send_mail(registry: &Registry, args: SendMail) -> Result<Outcome> {
    let mailer = registry.mailer().await?;

    let sent = if let Some(template) = &args.template {
        if let Some(locale) = &args.locale {
            registry.translator().await?.set_locale(locale.parse()?);
        }
        mailer.send_template(&args.to, &args.subject, template, ()).await
    } else {
        mailer.send(&args.to, &args.subject, args.body.as_deref().unwrap_or_default()).await
    };
    sent.context("Failed to send mail")?;

    info!(subject = %args.subject, "Mail sent");
    Ok(Outcome::Sent { subject: args.subject })
}
