//! Lantern headless client binary.
//!
//! Reads its configuration from the environment (and `.env`), loads the
//! configured map and replays an input script against a headless scene.
//!
//! ```bash
//! LANTERN_DATA_DIR=data LANTERN_MAP=town LANTERN_SCRIPT=walk.txt \
//!     cargo run -p lantern-client
//! ```

use anyhow::Result;
use lantern_client::ClientConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = setup_logging(&config)?;

    tracing::info!("Starting Lantern client");
    let report = lantern_client::run(&config)?;
    tracing::info!(%report, "Replay finished");
    println!("{report}");
    Ok(())
}

/// Logs to stderr and, when a log directory is configured, to
/// `client.log` inside it. The returned guard flushes the file on drop.
fn setup_logging(config: &ClientConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::never(dir, "client.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/client.log", dir.display());
    }
    Ok(guard)
}
