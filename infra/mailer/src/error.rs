use std::borrow::Cow;

/// Fixed text of every delivery failure, whatever the cause.
pub const SEND_FAILURE_MESSAGE: &str = "Error sending email";

#[kissj_derive::kissj_error]
pub enum MailerError {
    /// Delivery failed. The underlying cause is logged, never exposed.
    #[error("Error sending email{}", format_context(.context))]
    Send { context: Option<Cow<'static, str>> },

    #[error("Invalid mail address{}: {source}", format_context(.context))]
    Address { source: lettre::address::AddressError, context: Option<Cow<'static, str>> },

    #[error("Failed to build message{}: {source}", format_context(.context))]
    Build { source: lettre::error::Error, context: Option<Cow<'static, str>> },

    /// The transport could not be configured (TLS parameters, relay host).
    #[error("Mail transport setup failed{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl MailerError {
    pub(crate) const fn send_failure() -> Self {
        Self::Send { context: None }
    }
}
