//! Line-delimited JSON runner (default binary).
//!
//! Reads one message per line on stdin and answers each on stdout. Logs go to
//! stderr and are filtered with `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use arcade_engines::adapter::{self, AdapterConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logging();

    let config = AdapterConfig::from_env();
    tracing::info!(
        seed = config.seed,
        protocol_version = %config.protocol_version,
        "arcade adapter starting"
    );

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    let handled = adapter::run(config, stdin, stdout)
        .await
        .context("adapter session failed")?;

    tracing::info!(handled, "stdin closed, exiting");
    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
