use kissj_domain::SelectionError;
use std::borrow::Cow;

/// A specialized [`DatabaseError`] enum of this crate.
#[kissj_derive::kissj_error]
pub enum DatabaseError {
    /// `DB_TYPE` names a backend we do not know.
    #[error("{source}{}", format_context(.context))]
    Selection { source: SelectionError, context: Option<Cow<'static, str>> },
}
