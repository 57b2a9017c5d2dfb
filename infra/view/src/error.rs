use std::borrow::Cow;

#[kissj_derive::kissj_error]
pub enum ViewError {
    #[error("Failed to read translation catalog{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Malformed translation catalog{}: {source}", format_context(.context))]
    Catalog { source: serde_yaml_ng::Error, context: Option<Cow<'static, str>> },

    #[error("Template error{}: {source}", format_context(.context))]
    Template { source: minijinja::Error, context: Option<Cow<'static, str>> },
}
