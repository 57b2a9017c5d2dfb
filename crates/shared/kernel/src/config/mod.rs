mod rules;
mod settings;

use fxhash::FxHashMap;
use kissj_domain::{Settings, keys};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Custom error type for configuration loading.
#[kissj_derive::kissj_error]
pub enum ConfigError {
    #[error("Invalid configuration `{key}`{}: {message}", format_context(.context))]
    Validation { key: &'static str, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Env file error{}: {source}", format_context(.context))]
    Dotenv { source: dotenvy::Error, context: Option<Cow<'static, str>> },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { key, message: message.into(), context: None }
    }

    /// The offending key for validation failures.
    pub const fn key(&self) -> Option<&'static str> {
        match self {
            Self::Validation { key, .. } => Some(*key),
            Self::Dotenv { .. } => None,
        }
    }
}

/// The raw key/value set every setting is read from. Immutable once loaded.
#[derive(Clone, Default)]
pub struct ConfigurationSet {
    values: FxHashMap<String, String>,
}

impl ConfigurationSet {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

// Values may hold credentials, so only the keys are printed.
impl fmt::Debug for ConfigurationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ConfigurationSet").field("keys", &keys).finish()
    }
}

/// A layered environment loader.
///
/// Layers, lowest priority first:
/// 1. **Env file**: `KEY=value` lines from `<env_dir>/<env_file>`.
/// 2. **Process environment**: variables already set win over the file (enabled by default).
/// 3. **Explicit overrides** registered with [`EnvSource::with_var`].
/// 4. **Derived keys**: `APP_NAME` and `DB_FULL_PATH`, which nothing can override.
#[derive(Debug, Clone)]
pub struct EnvSource {
    env_file: PathBuf,
    system_env: bool,
    overrides: Vec<(String, String)>,
}

impl EnvSource {
    pub fn new(env_dir: impl AsRef<Path>, env_file: impl AsRef<Path>) -> Self {
        Self { env_file: env_dir.as_ref().join(env_file), system_env: true, overrides: Vec::new() }
    }

    /// Skips the process environment layer.
    #[must_use]
    pub const fn ignore_system_env(mut self) -> Self {
        self.system_env = false;
        self
    }

    #[must_use]
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    /// Reads every layer into one [`ConfigurationSet`] and writes the derived keys.
    ///
    /// # Errors
    /// Returns [`ConfigError::Dotenv`] if the env file is missing or malformed, and
    /// [`ConfigError::Validation`] if the process sets a configuration key to non UTF-8 bytes.
    pub fn configuration_set(&self, db_full_path: &Path) -> Result<ConfigurationSet, ConfigError> {
        info!(path = %self.env_file.display(), "Loading configuration");

        let mut set = ConfigurationSet::default();
        let entries = dotenvy::from_path_iter(&self.env_file)
            .context(format!("Failed to open {}", self.env_file.display()))?;
        for entry in entries {
            let (key, value) = entry.context("Failed to parse env file")?;
            set.insert(key, value);
        }

        if self.system_env {
            for (key, value) in std::env::vars_os() {
                let Some(key) = key.to_str() else { continue };
                match value.into_string() {
                    Ok(value) => set.insert(key, value),
                    Err(_) => match known_key(key) {
                        Some(known) => return Err(ConfigError::invalid(known, "is not valid UTF-8")),
                        None => debug!(key, "Skipping non UTF-8 environment variable"),
                    },
                }
            }
        }
        for (key, value) in &self.overrides {
            set.insert(key.as_str(), value.as_str());
        }

        set.insert(keys::APP_NAME, keys::APP_NAME_VALUE);
        set.insert(keys::DB_FULL_PATH, db_full_path.to_string_lossy());

        debug!(keys = set.len(), "Configuration set assembled");
        Ok(set)
    }

    /// Loads, validates and types the configuration. Stops at the first violation.
    ///
    /// # Errors
    /// * [`ConfigError::Dotenv`] if the env file cannot be read.
    /// * [`ConfigError::Validation`] naming the first key that breaks a rule.
    pub fn load_settings(&self, db_full_path: &Path) -> Result<Settings, ConfigError> {
        let set = self.configuration_set(db_full_path)?;
        validate(&set)?;
        let settings = settings::from_set(&set)?;

        info!(
            db = settings.database.db_type.as_str(),
            files = settings.storage.file_handler.as_str(),
            locale = %settings.app.default_locale,
            "Configuration validated"
        );
        Ok(settings)
    }
}

/// Checks `set` against the fixed rule table, then the adminer password rule.
///
/// # Errors
/// Returns [`ConfigError::Validation`] for the first violated rule.
pub fn validate(set: &ConfigurationSet) -> Result<(), ConfigError> {
    rules::check_all(set)?;
    rules::check_adminer_password(set)
}

/// Shorthand for `EnvSource::new(env_dir, env_file).load_settings(db_full_path)`.
///
/// # Errors
/// See [`EnvSource::load_settings`].
pub fn load(
    env_dir: impl AsRef<Path>,
    env_file: impl AsRef<Path>,
    db_full_path: impl AsRef<Path>,
) -> Result<Settings, ConfigError> {
    EnvSource::new(env_dir, env_file).load_settings(db_full_path.as_ref())
}

fn known_key(key: &str) -> Option<&'static str> {
    required_keys().chain([keys::INSECURE_DEV_MODE]).find(|known| *known == key)
}

/// Keys the rule table requires, in checking order.
pub fn required_keys() -> impl Iterator<Item = &'static str> {
    rules::RULES.iter().map(|rule| rule.key)
}
