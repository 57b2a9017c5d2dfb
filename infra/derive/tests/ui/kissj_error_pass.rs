use kissj_derive::kissj_error;
use std::borrow::Cow;

#[kissj_error]
pub enum UploadError {
    #[error("Upload I/O failed{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unknown handler `{name}`{}", format_context(.context))]
    UnknownHandler { name: String, context: Option<Cow<'static, str>> },

    #[error("Internal upload error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {}
