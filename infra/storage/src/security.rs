use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

fn violation(path: &Path, reason: &'static str) -> StorageError {
    StorageError::PathTraversalAttempt {
        message: path.display().to_string().into(),
        context: Some(reason.into()),
    }
}

/// Collapses `.` and `..` lexically. `..` may never climb above the (empty) relative base.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for c in path.components() {
        match c {
            Component::CurDir => {},
            Component::Normal(seg) => out.push(seg),
            Component::ParentDir if out.pop() => {},
            Component::ParentDir => return Err(violation(path, "Name escapes the upload root via '..'")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(violation(path, "Absolute paths are not allowed"));
            },
        }
    }

    if out.as_os_str().is_empty() {
        return Err(violation(path, "Name does not point at a file"));
    }
    Ok(out)
}

/// Joins a stored file name onto the (canonical) upload root, refusing anything that would
/// land outside of it, including through symlinked directories.
pub(crate) fn resolve_path(root: &Path, name: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
    let joined = root.join(normalize_relative(name.as_ref())?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(violation(&canonical, "Resolved path is outside the upload root")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => check_ancestors(root, joined),
        Err(e) => Err(StorageError::Io { source: e, context: None }),
    }
}

/// For a path that does not exist yet, the nearest existing ancestor decides.
fn check_ancestors(root: &Path, joined: PathBuf) -> Result<PathBuf, StorageError> {
    for ancestor in joined.ancestors().skip(1) {
        if ancestor == root {
            return Ok(joined);
        }
        if !ancestor.exists() {
            continue;
        }
        return match ancestor.canonicalize() {
            Ok(canonical) if canonical.starts_with(root) => Ok(joined),
            Ok(canonical) => Err(violation(&canonical, "Parent directory links outside the upload root")),
            Err(e) => Err(StorageError::Io {
                source: e,
                context: Some("Failed to verify parent directory".into()),
            }),
        };
    }

    Err(violation(&joined, "No parent directory inside the upload root"))
}
