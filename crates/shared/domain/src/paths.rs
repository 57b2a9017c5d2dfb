use std::path::{Path, PathBuf};

/// Filesystem locations the bootstrap needs besides the `.env` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Resolved sqlite database file, exported as `DB_FULL_PATH`.
    pub db_full_path: PathBuf,
    /// Root of the translation catalogs; templates live under `translatable/`.
    pub templates_dir: PathBuf,
    /// Root used by the local file handler.
    pub uploads_dir: PathBuf,
}

impl AppPaths {
    pub fn new(
        db_full_path: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
        uploads_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            db_full_path: db_full_path.into(),
            templates_dir: templates_dir.into(),
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn translatable_dir(&self) -> PathBuf {
        self.templates_dir.join("translatable")
    }

    /// Catalog file for one locale, e.g. `<templates>/cs.yaml`.
    pub fn catalog(&self, locale: crate::Locale) -> PathBuf {
        self.templates_dir.join(format!("{locale}.yaml"))
    }

    pub fn db_full_path(&self) -> &Path {
        &self.db_full_path
    }
}
