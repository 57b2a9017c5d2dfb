//! # Domain Models
//!
//! Pure KISSJ types with minimal dependencies (`serde`, `secrecy`, `thiserror`).
//! Keep it lean: no I/O, networking, or heavy logic, just data and simple helpers.
//!
//! * [`settings`] - the validated, typed configuration every service is built from.
//! * [`kinds`] - discriminator values (`DB_TYPE`, `FILE_HANDLER_TYPE`, locales, log levels).
//! * [`session`] - contracts for the externally supplied user and flash-message collaborators.
//! * [`keys`] - environment key names.

pub mod error;
pub mod keys;
pub mod kinds;
pub mod paths;
pub mod session;
pub mod settings;

pub use error::SelectionError;
pub use kinds::{DbType, FileHandlerType, Locale, LogLevel};
pub use paths::AppPaths;
pub use settings::Settings;
