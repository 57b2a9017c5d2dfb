use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Marker inside temporary file names written by the local handler:
/// `<upload name><TMP_MARKER><counter>`.
pub(crate) const TMP_MARKER: &str = ".kissjtmp.";

/// An upload still being written is never older than this.
const STALE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Sweep {
    removed: usize,
    failed: usize,
    pruned: usize,
}

/// Deletes leftovers of uploads that were interrupted before their final rename.
///
/// Directories are only pruned when removing a leftover emptied them. Everything else
/// under the upload root stays as it is.
pub(crate) async fn purge_tmp(root: &Path) {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || sweep(&root, now, STALE_AFTER)).await {
        Ok(Sweep { removed: 0, failed: 0, .. }) => {},
        Ok(Sweep { removed, failed, pruned }) => {
            info!(removed, failed, pruned, "Removed interrupted uploads");
        },
        Err(e) => error!(error = %e, "Upload sweep task panicked"),
    }
}

fn sweep(root: &Path, now: SystemTime, threshold: Duration) -> Sweep {
    let mut report = Sweep::default();
    let mut emptied = BTreeSet::<PathBuf>::new();

    let leftovers = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let upload = interrupted_upload(entry.path())?.to_owned();
            Some((upload, entry))
        });

    for (upload, entry) in leftovers {
        let path = entry.path();
        if !older_than(path, now, threshold) {
            debug!(%upload, "Upload still in progress");
            continue;
        }

        match std::fs::remove_file(path) {
            Ok(()) => {
                report.removed += 1;
                emptied.extend(path.parent().map(Path::to_path_buf));
            },
            Err(e) => {
                warn!(%upload, path = %path.display(), error = %e, "Could not remove interrupted upload");
                report.failed += 1;
            },
        }
    }

    // Deeper directories sort after their parents.
    for dir in emptied.iter().rev() {
        report.pruned += prune_upwards(root, dir);
    }
    report
}

/// The name the upload would have had, if `path` is one of our temp files.
fn interrupted_upload(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let (upload, counter) = name.rsplit_once(TMP_MARKER)?;
    let numbered = !counter.is_empty() && counter.bytes().all(|b| b.is_ascii_digit());
    (numbered && !upload.is_empty()).then_some(upload)
}

fn older_than(path: &Path, now: SystemTime, threshold: Duration) -> bool {
    std::fs::symlink_metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

/// Removes `dir` and its parents below `root` for as long as they are empty.
fn prune_upwards(root: &Path, dir: &Path) -> usize {
    let mut pruned = 0;
    for current in dir.ancestors().take_while(|d| *d != root && d.starts_with(root)) {
        if std::fs::remove_dir(current).is_err() {
            break;
        }
        pruned += 1;
    }
    pruned
}
