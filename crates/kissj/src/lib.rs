//! Facade crate for the KISSJ bootstrap.
//! Re-exports the domain and kernel crates and composes the infrastructure crates into one
//! [`Registry`]. Keep this crate thin: it wires services together, it does not implement them.
//!
//! ## Usage
//! ```rust,no_run
//! use kissj::{AppPaths, Registry};
//! use kissj::kernel::EnvSource;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = AppPaths::new("var/db.sqlite", "src/Templates", "uploads");
//! let settings = EnvSource::new(".", ".env").load_settings(paths.db_full_path())?;
//!
//! let registry = Registry::builder().settings(settings).paths(paths).build().await?;
//! let _entered = registry.logger().await?.span().entered();
//! registry.mailer().await?.send("scout@example.com", "Hello", "<p>Hi</p>").await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod locale;
mod mailer;
mod registry;
mod session;

pub use error::{RegistryError, RegistryErrorExt};
pub use locale::LocaleResolver;
pub use mailer::Mailer;
pub use registry::{Registry, RegistryBuilder, RegistryInner};
pub use session::{AnonymousUser, InMemoryFlashMessages};

pub use kissj_domain as domain;
pub use kissj_domain::{AppPaths, Locale, Settings};
pub use kissj_kernel as kernel;

pub use kissj_database::ConnectionDescriptor;
pub use kissj_logger::Logger;
pub use kissj_mailer::{DeliveryMode, MailSender, MailerError, TransportPlan};
pub use kissj_storage::FileHandler;
pub use kissj_view::{Translator, ViewRenderer};
