use kissj_database::DatabaseError;
use kissj_logger::LoggerError;
use kissj_mailer::MailerError;
use kissj_storage::StorageError;
use kissj_view::ViewError;
use std::borrow::Cow;

#[kissj_derive::kissj_error]
pub enum RegistryError {
    /// The builder was not given everything it needs.
    #[error("Registry validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("File handler unavailable{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("View unavailable{}: {source}", format_context(.context))]
    View { source: ViewError, context: Option<Cow<'static, str>> },

    #[error("Logger unavailable{}: {source}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },

    /// Displays exactly as the mailer error, so a failed send still reads `Error sending email`.
    #[error("{source}")]
    Mailer { source: MailerError, context: Option<Cow<'static, str>> },
}
