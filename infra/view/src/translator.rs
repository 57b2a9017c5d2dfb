use crate::error::{ViewError, ViewErrorExt};
use fxhash::FxHashMap;
use kissj_domain::{AppPaths, Locale};
use parking_lot::RwLock;
use serde_yaml_ng::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Flattened message ids of one locale.
pub type Catalog = FxHashMap<String, String>;

/// Message catalogs for every supported locale plus the locale currently in use.
///
/// Lookup order for an id: current locale, fallback locale, then the id itself.
/// Cheap to clone; clones share the current locale.
#[derive(Clone)]
pub struct Translator {
    inner: Arc<TranslatorInner>,
}

struct TranslatorInner {
    catalogs: FxHashMap<Locale, Catalog>,
    fallback: Locale,
    current: RwLock<Locale>,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut loaded: Vec<(&str, usize)> =
            self.inner.catalogs.iter().map(|(locale, c)| (locale.as_str(), c.len())).collect();
        loaded.sort_unstable();

        f.debug_struct("Translator")
            .field("current", &self.locale())
            .field("fallback", &self.inner.fallback)
            .field("catalogs", &loaded)
            .finish()
    }
}

impl Translator {
    /// Loads `<templates>/<locale>.yaml` for every supported locale.
    ///
    /// A missing catalog only logs a warning; lookups then fall through to the fallback.
    ///
    /// # Errors
    /// Returns [`ViewError::Io`] if a catalog exists but cannot be read, and
    /// [`ViewError::Catalog`] if it is not valid YAML.
    pub fn load(paths: &AppPaths, default_locale: Locale) -> Result<Self, ViewError> {
        let mut catalogs = FxHashMap::default();
        for locale in Locale::ALL {
            let path = paths.catalog(locale);
            let Some(catalog) = read_catalog(&path)? else {
                warn!(%locale, path = %path.display(), "Translation catalog missing");
                continue;
            };
            debug!(%locale, messages = catalog.len(), "Translation catalog loaded");
            catalogs.insert(locale, catalog);
        }

        Ok(Self::from_catalogs(catalogs, default_locale))
    }

    /// Builds a translator from already flattened catalogs. The fallback equals the default.
    pub fn from_catalogs(catalogs: FxHashMap<Locale, Catalog>, default_locale: Locale) -> Self {
        Self {
            inner: Arc::new(TranslatorInner {
                catalogs,
                fallback: default_locale,
                current: RwLock::new(default_locale),
            }),
        }
    }

    pub fn locale(&self) -> Locale {
        *self.inner.current.read()
    }

    pub fn set_locale(&self, locale: Locale) {
        *self.inner.current.write() = locale;
    }

    pub fn fallback_locale(&self) -> Locale {
        self.inner.fallback
    }

    /// True if the id is known in the current or the fallback locale.
    pub fn has(&self, id: &str) -> bool {
        self.lookup(self.locale(), id).is_some()
    }

    /// Translates `id` in the current locale, substituting `%name%` placeholders.
    pub fn trans(&self, id: &str, params: &[(&str, &str)]) -> String {
        self.trans_in(self.locale(), id, params)
    }

    pub fn trans_in(&self, locale: Locale, id: &str, params: &[(&str, &str)]) -> String {
        let message = self.lookup(locale, id).unwrap_or(id);
        substitute(message, params)
    }

    fn lookup(&self, locale: Locale, id: &str) -> Option<&str> {
        let catalogs = &self.inner.catalogs;
        catalogs
            .get(&locale)
            .and_then(|c| c.get(id))
            .or_else(|| catalogs.get(&self.inner.fallback).and_then(|c| c.get(id)))
            .map(String::as_str)
    }
}

fn read_catalog(path: &Path) -> Result<Option<Catalog>, ViewError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err).context(path.display().to_string()),
    };

    let document = serde_yaml_ng::from_str::<Value>(&raw).context(path.display().to_string())?;
    let mut catalog = Catalog::default();
    flatten("", &document, &mut catalog);
    Ok(Some(catalog))
}

/// Nested mappings become dotted ids: `{mail: {subject: x}}` -> `mail.subject`.
fn flatten(prefix: &str, value: &Value, out: &mut Catalog) {
    let join = |key: &str| if prefix.is_empty() { key.to_owned() } else { format!("{prefix}.{key}") };

    match value {
        Value::Mapping(map) => {
            for (key, value) in map {
                if let Some(key) = scalar(key) {
                    flatten(&join(&key), value, out);
                }
            }
        }
        Value::Sequence(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten(&join(&index.to_string()), value, out);
            }
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        other => {
            if let Some(text) = scalar(other)
                && !prefix.is_empty()
            {
                out.insert(prefix.to_owned(), text);
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Single pass over `%name%` placeholders; replacements are never rescanned.
/// Parameter names may be given with or without the surrounding percent signs.
fn substitute(message: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return message.to_owned();
    }

    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let replacement = after.find('%').and_then(|end| {
            let name = &after[..end];
            params
                .iter()
                .find(|(key, _)| key.trim_matches('%') == name)
                .map(|(_, value)| (*value, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
