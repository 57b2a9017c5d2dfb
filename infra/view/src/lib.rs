//! # View
//!
//! Page and mail-body rendering for KISSJ.
//!
//! * [`Translator`] loads the `cs`/`sk`/`en` YAML catalogs next to the templates and resolves
//!   message ids with a fallback to the default locale.
//! * [`ViewRenderer`] renders `minijinja` templates from `<templates>/translatable`, exposes
//!   the translator as the `trans` filter, and injects the request globals on every render.
//!
//! ```text
//! templates/
//! ├── cs.yaml
//! ├── en.yaml
//! ├── sk.yaml
//! └── translatable/
//!     └── emails/payment-info.html.twig
//! ```

mod error;
mod renderer;
mod translator;

pub use error::{ViewError, ViewErrorExt};
pub use renderer::{EVENT_GLOBAL, FLASH_MESSAGES_GLOBAL, USER_GLOBAL, ViewRenderer};
pub use translator::{Catalog, Translator};
