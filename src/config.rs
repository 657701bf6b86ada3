//! Runtime configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_PUBLIC_DIR: &str = "public";
pub const DEFAULT_CHART_VENDOR_PATH: &str = "node_modules/chart.js/dist/chart.umd.js";
pub const DEFAULT_REPLY_DELAY_MS: u64 = 3000;
pub const DEFAULT_OVERLAY_OPEN_DELAY_MS: u64 = 3000;
pub const DEFAULT_SNAPSHOT_WIDTH: u32 = 1200;
pub const DEFAULT_SNAPSHOT_HEIGHT: u32 = 675;
pub const DEFAULT_SNAPSHOT_SCALE: f32 = 2.0;
pub const DEFAULT_SNAPSHOT_TIMEOUT_SECS: u64 = 30;
pub const SNAPSHOT_BIN_NAME: &str = "render_fund_chart";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid snapshot size {width}x{height}")]
    InvalidSnapshotSize { width: u32, height: u32 },
}

/// Offline NAV chart rendering settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotConfig {
    pub out_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio; the PNG is `width*scale` by `height*scale`.
    pub scale: f32,
    pub timeout: Duration,
    /// Executable spawned by the server when the PNG is missing.
    pub bin: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub public_dir: PathBuf,
    pub chart_vendor_path: PathBuf,
    pub reply_delay: Duration,
    pub overlay_open_delay: Duration,
    pub snapshot: SnapshotConfig,
}

impl Config {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 5173
    /// - `PUBLIC_DIR`: default `public`
    /// - `CHART_VENDOR_PATH`: vendored chart bundle served at `/vendor/chart.umd.js`
    /// - `REPLY_DELAY_MS`, `OVERLAY_OPEN_DELAY_MS`: default 3000
    /// - `SNAPSHOT_WIDTH`, `SNAPSHOT_HEIGHT`, `SNAPSHOT_SCALE`, `SNAPSHOT_TIMEOUT_SECS`
    /// - `SNAPSHOT_BIN`: default is `render_fund_chart` next to the running executable
    ///
    /// # Errors
    ///
    /// Returns an error if `PORT` is not a valid port number or the snapshot
    /// size is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let public_dir = lookup("PUBLIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR), PathBuf::from);
        let chart_vendor_path =
            lookup("CHART_VENDOR_PATH").map_or_else(|| PathBuf::from(DEFAULT_CHART_VENDOR_PATH), PathBuf::from);

        let width = parse_or(&lookup, "SNAPSHOT_WIDTH", DEFAULT_SNAPSHOT_WIDTH);
        let height = parse_or(&lookup, "SNAPSHOT_HEIGHT", DEFAULT_SNAPSHOT_HEIGHT);
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidSnapshotSize { width, height });
        }
        let scale = parse_or(&lookup, "SNAPSHOT_SCALE", DEFAULT_SNAPSHOT_SCALE);
        let scale = if scale.is_finite() && scale > 0.0 { scale } else { DEFAULT_SNAPSHOT_SCALE };

        let snapshot = SnapshotConfig {
            out_path: public_dir.join("images").join("fund_nav.png"),
            width,
            height,
            scale,
            timeout: Duration::from_secs(parse_or(&lookup, "SNAPSHOT_TIMEOUT_SECS", DEFAULT_SNAPSHOT_TIMEOUT_SECS)),
            bin: lookup("SNAPSHOT_BIN").map_or_else(default_snapshot_bin, PathBuf::from),
        };

        Ok(Self {
            port,
            public_dir,
            chart_vendor_path,
            reply_delay: Duration::from_millis(parse_or(&lookup, "REPLY_DELAY_MS", DEFAULT_REPLY_DELAY_MS)),
            overlay_open_delay: Duration::from_millis(parse_or(
                &lookup,
                "OVERLAY_OPEN_DELAY_MS",
                DEFAULT_OVERLAY_OPEN_DELAY_MS,
            )),
            snapshot,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn default_snapshot_bin() -> PathBuf {
    let name = format!("{SNAPSHOT_BIN_NAME}{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .map(|exe| exe.with_file_name(&name))
        .unwrap_or_else(|_| PathBuf::from(name))
}
