use crate::error::StorageError;
use crate::local::LocalFileHandler;
use crate::s3::S3FileHandler;
use std::path::Path;
use tracing::instrument;

/// Longest extension kept from an uploaded file name.
const MAX_EXTENSION_LEN: usize = 10;

/// The upload backend selected by `FILE_HANDLER_TYPE`.
#[derive(Debug, Clone)]
pub enum FileHandler {
    Local(LocalFileHandler),
    S3(S3FileHandler),
}

impl FileHandler {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::S3(_) => "s3bucket",
        }
    }

    /// Stores an upload under a fresh unique name and returns that name.
    ///
    /// The extension of `original_name` survives (lowercased) so downloads keep their type.
    ///
    /// # Errors
    /// Propagates the backend failure.
    #[instrument(skip(self, data), fields(handler = self.kind(), bytes = data.len()))]
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<String, StorageError> {
        let name = stored_name(original_name);
        match self {
            Self::Local(local) => local.write(&name, data).await?,
            Self::S3(s3) => s3.write(&name, data).await?,
        }
        Ok(name)
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if nothing is stored under `name`.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::Local(local) => local.read(name).await,
            Self::S3(s3) => s3.read(name).await,
        }
    }

    /// # Errors
    /// Propagates the backend failure.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        match self {
            Self::Local(local) => local.delete(name).await,
            Self::S3(s3) => s3.delete(name).await,
        }
    }

    /// # Errors
    /// Propagates the backend failure.
    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self {
            Self::Local(local) => local.exists(name).await,
            Self::S3(s3) => s3.exists(name).await,
        }
    }
}

impl From<LocalFileHandler> for FileHandler {
    fn from(handler: LocalFileHandler) -> Self {
        Self::Local(handler)
    }
}

impl From<S3FileHandler> for FileHandler {
    fn from(handler: S3FileHandler) -> Self {
        Self::S3(handler)
    }
}

/// Random name for a new upload, e.g. `V1StGXR8_Z5jdHi6B-myT.pdf`.
pub fn stored_name(original_name: &str) -> String {
    let id = nanoid::nanoid!();
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match extension {
        Some(ext) if !ext.is_empty() => format!("{id}.{}", ext.to_ascii_lowercase()),
        _ => id,
    }
}
