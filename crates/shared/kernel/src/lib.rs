//! Kernel utilities shared by every KISSJ entry point.
//! Keep this crate lightweight: it turns an environment into validated [`Settings`] and
//! nothing else.
//!
//! ## Loading settings
//! ```rust,no_run
//! use kissj_kernel::config::EnvSource;
//!
//! let settings = EnvSource::new(".", ".env").load_settings("var/db.sqlite".as_ref())?;
//! assert_eq!(settings.app.name, "KISSJ");
//! # Ok::<(), kissj_kernel::config::ConfigError>(())
//! ```
pub mod config;

pub use config::{ConfigError, ConfigurationSet, EnvSource, load, required_keys, validate};
pub use kissj_domain as domain;
pub use kissj_domain::Settings;
