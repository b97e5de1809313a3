use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Suffix of in-flight upload files: `.<token>.cdztmp`.
pub(crate) const TMP_SUFFIX: &str = ".cdztmp";

/// Age after which an unfinished upload is considered abandoned.
pub(crate) const ORPHAN_AGE: Duration = Duration::from_secs(300);

/// Outcome of an orphan sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeReport {
    pub removed: usize,
    pub failed: usize,
}

/// Temp name of an in-flight upload. Built from the random token alone, so it stays short
/// whatever the length of the extension.
pub(crate) fn tmp_name(token: &str) -> String {
    format!(".{token}{TMP_SUFFIX}")
}

/// Removes abandoned upload files under `root`. Never fails: problems are logged and counted.
pub(crate) async fn purge_orphans(root: &Path, older_than: Duration) -> PurgeReport {
    let root = root.to_path_buf();
    let now = SystemTime::now();

    match tokio::task::spawn_blocking(move || sweep(&root, now, older_than)).await {
        Ok(report) => {
            if report.removed > 0 || report.failed > 0 {
                info!(removed = report.removed, failed = report.failed, "Purged orphaned uploads");
            }
            report
        },
        Err(e) => {
            error!(error = %e, "Orphan sweep task panicked");
            PurgeReport::default()
        },
    }
}

fn sweep(root: &Path, now: SystemTime, older_than: Duration) -> PurgeReport {
    let mut report = PurgeReport::default();

    for entry in WalkDir::new(root).follow_links(false).into_iter().flatten() {
        if !is_orphan(&entry, now, older_than) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => report.removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Failed to remove orphaned upload");
                report.failed += 1;
            },
        }
    }

    report
}

fn is_orphan(entry: &DirEntry, now: SystemTime, older_than: Duration) -> bool {
    let is_tmp = entry.file_type().is_file()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') && name.ends_with(TMP_SUFFIX));

    if !is_tmp {
        return false;
    }

    match entry.metadata().ok().and_then(|m| m.modified().ok()) {
        Some(modified) => now.duration_since(modified).is_ok_and(|age| age >= older_than),
        None => true,
    }
}
