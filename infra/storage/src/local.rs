//! Uploaded files kept on the local disk, below a single sandboxed root.

use crate::error::{StorageError, StorageErrorExt};
use crate::{maintenance, security};
use private::Sealed;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug)]
struct LocalInner {
    /// Canonical physical root every stored name resolves under.
    root: PathBuf,
    tmp_counter: AtomicU64,
}

/// Handle to the local upload directory. Cheap to clone.
///
/// Writes are atomic: data goes to a unique temp file, is synced, then renamed over the
/// target, so a crash never leaves a half-written upload behind under its real name.
#[derive(Debug, Clone)]
pub struct LocalFileHandler {
    inner: Arc<LocalInner>,
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct LocalFileHandlerBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
}

impl LocalFileHandlerBuilder<NoRoot> {
    #[must_use = "Sets the upload root directory"]
    pub fn root(self, path: impl Into<PathBuf>) -> LocalFileHandlerBuilder<WithRoot> {
        LocalFileHandlerBuilder { state: WithRoot(path.into()), create: self.create }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> LocalFileHandlerBuilder<S> {
    #[must_use = "Sets whether the upload root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl LocalFileHandlerBuilder<WithRoot> {
    /// Prepares the upload root and returns the handler.
    ///
    /// The root is created when asked to, canonicalized so symlinks cannot be used to
    /// escape it, and swept for temp files left by interrupted writes.
    ///
    /// # Errors
    /// Returns [`StorageError::DirectoryNotFound`] if the root is missing and `create` is false.
    /// Returns [`StorageError::Io`] if the root cannot be created or resolved.
    pub async fn open(self) -> Result<LocalFileHandler, StorageError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .await
                .context(format!("Failed to bootstrap upload root: {}", root.display()))?;
        } else if !fs::try_exists(root).await.context("Failed to probe upload root")? {
            return Err(StorageError::DirectoryNotFound {
                message: root.display().to_string().into(),
                context: None,
            });
        }

        let canonical = fs::canonicalize(root)
            .await
            .context(format!("Failed to resolve upload root: {}", root.display()))?;
        info!(path = %canonical.display(), "Local file handler ready");

        maintenance::purge_tmp(&canonical).await;

        Ok(LocalFileHandler {
            inner: Arc::new(LocalInner { root: canonical, tmp_counter: AtomicU64::new(1) }),
        })
    }
}

impl LocalFileHandler {
    #[must_use = "The handler is not ready until you call .open()"]
    pub const fn builder() -> LocalFileHandlerBuilder {
        LocalFileHandlerBuilder { state: NoRoot, create: true }
    }

    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Physical location of a stored name, validated against the sandbox.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] for names that escape the root.
    pub fn resolve(&self, name: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        security::resolve_path(&self.inner.root, name)
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if nothing is stored under `name`.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let resolved = self.resolve(name)?;

        match fs::read(&resolved).await {
            Ok(data) => Ok(data),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::FileNotFound { message: name.to_owned().into(), context: None })
            },
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", resolved.display()).into()),
            }),
        }
    }

    /// Stores `data` under `name`, replacing any previous content atomically.
    ///
    /// # Errors
    /// Returns [`StorageError::PathTraversalAttempt`] if the name escapes the sandbox.
    /// Returns [`StorageError::Io`] if the disk is full or the rename fails.
    pub async fn write(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        let resolved = self.resolve(name)?;

        if let Some(parent) = resolved.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directories for {name}"))?;
        }

        let temp = self.tmp_path(&resolved);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, &resolved).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(format!("Atomic swap failed for {}", resolved.display()).into()),
            });
        }

        if let Some(parent) = resolved.parent() {
            sync_dir(parent).await;
        }

        debug!(name, bytes = data.len(), "Upload stored on disk");
        Ok(())
    }

    /// # Errors
    /// Returns [`StorageError::FileNotFound`] if nothing is stored under `name`.
    pub async fn delete(&self, name: &str) -> Result<(), StorageError> {
        let resolved = self.resolve(name)?;
        match fs::remove_file(&resolved).await {
            Ok(()) => {
                debug!(name, "Upload deleted");
                Ok(())
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::FileNotFound { message: name.to_owned().into(), context: None })
            },
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Failed to delete: {}", resolved.display()).into()),
            }),
        }
    }

    /// # Errors
    /// Fails only when the name is rejected by the sandbox or the probe itself errors.
    pub async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let resolved = self.resolve(name)?;
        fs::try_exists(&resolved).await.context(format!("Failed to probe {name}"))
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("upload");
        target.with_file_name(format!("{file_name}{}{counter}", maintenance::TMP_MARKER))
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}
