//! # Mailer
//!
//! A small facade over `lettre` that sends one HTML message at a time using the mailer
//! settings resolved at startup.
//!
//! - SMTP relay when `MAIL_SMTP` is set, otherwise local submission through `sendmail`.
//! - STARTTLS is always required. Certificate checks can only be relaxed through the
//!   insecure development options, and doing so is **unsafe outside development**.
//! - The plain-text alternative is the HTML body with its tags stripped.
//! - Delivery failures collapse into a single [`MailerError::Send`].
//!
//! [`MailTransport`] is the seam tests use to observe what would be delivered.

mod error;
mod markup;
mod plan;
mod sender;
mod transport;

pub use error::{MailerError, MailerErrorExt, SEND_FAILURE_MESSAGE};
pub use markup::strip_tags;
pub use plan::{CHARSET, DeliveryMode, ENCRYPTION, TlsPolicy, TransportPlan};
pub use sender::MailSender;
pub use transport::{LettreTransport, MailTransport, TransportFailure};
