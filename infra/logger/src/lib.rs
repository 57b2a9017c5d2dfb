//! # Logger
//!
//! The single named logger every KISSJ process writes through.
//! Output goes to stdout in the compact `tracing-subscriber` format, filtered by a
//! configured threshold (and `RUST_LOG`, when set). Each process gets a short random
//! uid so interleaved output from several workers can be told apart.
//!
//! * Use [`LoggerBuilder::env_filter`] to set module-directed filters
//!   (e.g., `"kissj=debug,lettre=info"`), in addition to `RUST_LOG`.
//! * Enter [`Logger::span`] around the work of the process so every event carries the
//!   application name and uid.
//!
//! ## Example
//!
//! ```rust
//! # use kissj_logger::{Logger, LevelFilter};
//!
//! let logger = Logger::builder()
//!     .name("KISSJ")
//!     .level(LevelFilter::DEBUG)
//!     .init_or_reuse()
//!     .unwrap();
//! let _entered = logger.span().entered();
//! tracing::info!("ready");
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;

use private::Sealed;
use tracing::Span;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Length of the per-process uid, in hex digits.
pub const UID_LENGTH: usize = 7;

const HEX_ALPHABET: [char; 16] =
    ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f'];

#[derive(Debug)]
pub struct LoggerConfig {
    level: LevelFilter,
    env_filter: Option<String>,
    ansi: bool,
    uid: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self { level: LevelFilter::INFO, env_filter: None, ansi: true, uid: None }
    }
}

#[derive(Debug)]
pub struct NoName;
#[derive(Debug)]
pub struct WithName(String);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoName {}
impl Sealed for WithName {}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder<N: Sealed = NoName> {
    config: LoggerConfig,
    name: N,
}

impl LoggerBuilder<NoName> {
    /// Sets the name of the logger. It is attached to every event through [`Logger::span`].
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<WithName> {
        LoggerBuilder { name: WithName(name.into()), config: self.config }
    }
}

impl LoggerBuilder<WithName> {
    /// Configures the minimum log level to be emitted.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.config.level = level;
        self
    }

    /// Adds an explicit env filter (e.g., `kissj=debug,lettre=info`).
    ///
    /// Invalid filters will cause [`LoggerBuilder::init`] to return an error.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.config.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables ANSI colors.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.config.ansi = enabled;
        self
    }

    /// Uses a fixed uid instead of a random one.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn uid(mut self, uid: impl Into<String>) -> Self {
        self.config.uid = Some(uid.into());
        self
    }

    /// Consumes the builder and initializes the global tracing subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber has already been set.
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.install()?;
        Ok(self.into_logger(true))
    }

    /// Like [`LoggerBuilder::init`], but attaches to an already installed subscriber
    /// instead of failing. Events then go wherever that subscriber sends them.
    ///
    /// # Errors
    /// Returns [`LoggerError::InvalidConfiguration`] for invalid builder settings.
    pub fn init_or_reuse(self) -> Result<Logger, LoggerError> {
        match self.install() {
            Ok(()) => Ok(self.into_logger(true)),
            Err(LoggerError::Subscriber { .. }) => {
                let logger = self.into_logger(false);
                tracing::debug!(name = logger.name(), "Global subscriber already set, reusing it");
                Ok(logger)
            },
            Err(err) => Err(err),
        }
    }

    fn install(&self) -> Result<(), LoggerError> {
        validate_config(&self.config, &self.name.0)?;
        let env_filter = build_env_filter(&self.config)?;

        let stdout = layer().compact().with_ansi(self.config.ansi).with_writer(std::io::stdout);
        tracing_subscriber::registry().with(env_filter).with(stdout).try_init()?;
        Ok(())
    }

    fn into_logger(self, owns_subscriber: bool) -> Logger {
        let uid = self.config.uid.unwrap_or_else(generate_uid);
        let name = self.name.0;
        // ERROR level keeps the span enabled under any threshold.
        let span = tracing::error_span!("app", app = %name, uid = %uid);
        Logger { name, uid, owns_subscriber, span }
    }
}

/// A handle to the initialized logging system.
#[derive(Debug, Clone)]
pub struct Logger {
    name: String,
    uid: String,
    owns_subscriber: bool,
    span: Span,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`] to configure the global tracing subscriber.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { config: LoggerConfig::default(), name: NoName }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// `false` when another subscriber was already installed and this logger attached to it.
    pub const fn owns_subscriber(&self) -> bool {
        self.owns_subscriber
    }

    /// Root span tagging events with the logger name and uid.
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

/// Random lowercase hex identifier, [`UID_LENGTH`] digits long.
pub fn generate_uid() -> String {
    nanoid::nanoid!(UID_LENGTH, &HEX_ALPHABET)
}

fn validate_config(config: &LoggerConfig, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger name cannot be empty".into(),
            context: None,
        });
    }

    if config.uid.as_deref().is_some_and(|uid| uid.trim().is_empty()) {
        return Err(LoggerError::InvalidConfiguration {
            message: "Logger uid cannot be empty".into(),
            context: None,
        });
    }

    Ok(())
}

fn build_env_filter(config: &LoggerConfig) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(config.level.into());
    config.env_filter.as_ref().map_or_else(
        || Ok(builder.from_env_lossy()),
        |filter| {
            builder.parse(filter).map_err(|e| LoggerError::InvalidConfiguration {
                message: format!("Invalid env filter '{filter}': {e}").into(),
                context: None,
            })
        },
    )
}
