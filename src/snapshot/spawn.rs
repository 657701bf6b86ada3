//! Lazy snapshot generation at server start.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::SnapshotError;
use crate::config::SnapshotConfig;

/// Spawn the snapshot binary in the background if the PNG is missing.
///
/// Never fails: the outcome is only logged, and the server keeps serving
/// without the image when generation fails.
pub fn ensure_snapshot(config: &SnapshotConfig) -> Option<JoinHandle<()>> {
    if config.out_path.exists() {
        debug!(path = %config.out_path.display(), "fund chart snapshot present");
        return None;
    }
    let bin = config.bin.clone();
    let out = config.out_path.clone();
    let timeout = config.timeout;
    info!(bin = %bin.display(), "fund chart snapshot missing, generating");
    Some(tokio::spawn(async move {
        match run_snapshot_bin(&bin, timeout).await {
            Ok(()) => info!(path = %out.display(), "fund chart snapshot generated"),
            Err(e) => warn!(error = %e, "fund chart snapshot failed; serving without it"),
        }
    }))
}

/// Run `bin` to completion, killing it if it outlives `timeout`.
///
/// # Errors
///
/// Launch failure, non-zero exit, or timeout.
pub async fn run_snapshot_bin(bin: &Path, timeout: Duration) -> Result<(), SnapshotError> {
    let mut child = Command::new(bin).kill_on_drop(true).spawn()?;
    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_) => return Err(SnapshotError::Timeout(timeout)),
    };
    if status.success() {
        Ok(())
    } else {
        Err(SnapshotError::ChildFailed(status))
    }
}
