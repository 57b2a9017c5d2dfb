//! File handlers for documents participants upload (payment receipts, medical forms, photos).
//!
//! Two backends sit behind one [`FileHandler`] enum:
//!
//! - **[`LocalFileHandler`]**: a sandboxed directory on local disk. Names are resolved
//!   against the canonical root so `..` and symlinks cannot escape it, and writes use an
//!   atomic temp-file swap (`write` + `fsync` + `rename`). Stale temp files from crashed
//!   writes are removed when the handler opens.
//! - **[`S3FileHandler`]**: an S3-compatible bucket. The SDK client is constructed on the
//!   first operation, not before.
//!
//! # Examples
//!
//! ```rust
//! use kissj_storage::{FileHandler, LocalFileHandler, StorageError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), StorageError> {
//!     # let tmp = tempfile::tempdir().unwrap();
//!     # let root = tmp.path().join("uploads");
//!     let handler: FileHandler = LocalFileHandler::builder().root(&root).open().await?.into();
//!
//!     let name = handler.save("receipt.pdf", b"%PDF-1.7").await?;
//!     assert!(name.ends_with(".pdf"));
//!     assert_eq!(handler.read(&name).await?, b"%PDF-1.7");
//!
//!     Ok(())
//! }
//! ```

mod error;
mod handler;
mod local;
mod maintenance;
mod s3;
mod security;

pub use error::{StorageError, StorageErrorExt};
pub use handler::{FileHandler, stored_name};
pub use local::{LocalFileHandler, LocalFileHandlerBuilder};
pub use s3::{S3FileHandler, S3Options};
