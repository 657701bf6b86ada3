//! Offline fund NAV chart snapshot.
//!
//! DESIGN
//! ======
//! A synthetic NAV series is drawn as SVG and rasterized with resvg, so the
//! snapshot needs no browser. Data is regenerated on every run. Rendering is
//! CPU-bound and runs on a blocking thread under a timeout; the server only
//! ever launches it as a child process and never waits on it.

pub mod nav;
pub mod raster;
pub mod spawn;
pub mod svg;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::config::SnapshotConfig;

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid date: {0}")]
    Date(#[from] time::error::ComponentRange),
    #[error("SVG parse failed: {0}")]
    Svg(#[from] resvg::usvg::Error),
    #[error("pixmap allocation failed for {width}x{height}")]
    Pixmap { width: u32, height: u32 },
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("rendering did not finish within {0:?}")]
    Timeout(Duration),
    #[error("render task failed: {0}")]
    Join(String),
    #[error("snapshot process exited with {0}")]
    ChildFailed(std::process::ExitStatus),
}

/// Generate a fresh series and return the PNG bytes.
///
/// # Errors
///
/// See [`raster::svg_to_png`].
pub fn render_png<R: Rng + ?Sized>(config: &SnapshotConfig, rng: &mut R) -> Result<Vec<u8>, SnapshotError> {
    let series = nav::NavSeries::generate(rng)?;
    let markup = svg::nav_chart_svg(&series, config.width, config.height);
    raster::svg_to_png(&markup, config.width, config.height, config.scale)
}

/// Render and write the PNG to `config.out_path`, creating parent dirs.
///
/// # Errors
///
/// Rendering or filesystem failures.
pub fn render_to_file<R: Rng + ?Sized>(config: &SnapshotConfig, rng: &mut R) -> Result<PathBuf, SnapshotError> {
    let bytes = render_png(config, rng)?;
    write_png(&config.out_path, &bytes)?;
    Ok(config.out_path.clone())
}

fn write_png(path: &Path, bytes: &[u8]) -> Result<(), SnapshotError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "saved chart");
    Ok(())
}

/// Render on a blocking thread, bounded by `config.timeout`.
///
/// The file is written only when rendering beats the deadline; a render
/// that times out is abandoned and never touches `config.out_path`.
///
/// # Errors
///
/// [`SnapshotError::Timeout`] when the deadline passes, otherwise whatever
/// rendering or writing returns.
pub async fn render_with_timeout(config: SnapshotConfig) -> Result<PathBuf, SnapshotError> {
    let timeout = config.timeout;
    let render_config = config.clone();
    let task = tokio::task::spawn_blocking(move || render_png(&render_config, &mut rand::rng()));
    let bytes = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join)) => return Err(SnapshotError::Join(join.to_string())),
        Err(_) => return Err(SnapshotError::Timeout(timeout)),
    };
    write_png(&config.out_path, &bytes)?;
    Ok(config.out_path)
}
