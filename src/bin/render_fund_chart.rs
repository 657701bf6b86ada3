//! Render the fund NAV chart PNG and exit.

use std::process::ExitCode;

use demo_shell::config::Config;
use demo_shell::{snapshot, telemetry};

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    telemetry::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!(error = %e, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    let code = match runtime.block_on(snapshot::render_with_timeout(config.snapshot)) {
        Ok(path) => {
            println!("Saved chart to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "chart rendering failed");
            ExitCode::FAILURE
        }
    };
    // A timed-out render may still hold a blocking thread; do not wait for it.
    runtime.shutdown_background();
    code
}
