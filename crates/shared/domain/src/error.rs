use kissj_derive::kissj_error;
use std::borrow::Cow;

/// A discriminator value outside of its fixed set of backends.
#[kissj_error]
pub enum SelectionError {
    #[error("Got unknown {kind} parameter: {value}{}", format_context(.context))]
    UnknownValue { kind: &'static str, value: String, context: Option<Cow<'static, str>> },
}

impl SelectionError {
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue { kind, value: value.to_owned(), context: None }
    }
}
