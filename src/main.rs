use demo_shell::config::{Config, ConfigError};
use demo_shell::presets::{PresetError, PresetTable};
use demo_shell::snapshot::spawn::ensure_snapshot;
use demo_shell::state::AppState;
use demo_shell::{routes, telemetry};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("preset table invalid: {0}")]
    Presets(#[from] PresetError),
    #[error("server io failed: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let _ = dotenvy::dotenv();
    telemetry::init();

    let config = Config::from_env()?;
    let port = config.port;

    // Fire and forget; the page renders without the PNG until it exists.
    let _snapshot = ensure_snapshot(&config.snapshot);

    let state = AppState::new(config, PresetTable::builtin()?);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "demo-shell listening");
    axum::serve(listener, app).await?;
    Ok(())
}
