//! Lighthouse search server binary.
//!
//! Usage: `lighthouse [CONFIG]`
//!
//! Loads `CONFIG` if given, otherwise the default config file if it exists,
//! otherwise built-in defaults. Serves until interrupted.
//!
//! All tracing output goes to stderr.

use lighthouse::LighthouseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("lighthouse=info,lighthouse_search=info")
            }),
        )
        .init();

    let config = load_config()?;
    tracing::info!("lighthouse starting");

    let server = lighthouse::start(&config).await.map_err(|e| {
        tracing::error!(error = %e, "lighthouse failed to start");
        anyhow::anyhow!("lighthouse failed to start: {e}")
    })?;

    tokio::signal::ctrl_c().await?;
    server.shutdown();

    tracing::info!("lighthouse shut down cleanly");
    Ok(())
}

fn load_config() -> anyhow::Result<LighthouseConfig> {
    let path = match std::env::args_os().nth(1) {
        Some(arg) => std::path::PathBuf::from(arg),
        None => {
            let default = LighthouseConfig::default_config_path();
            if !default.exists() {
                tracing::info!("no config file found, using defaults");
                return Ok(LighthouseConfig::default());
            }
            default
        }
    };

    tracing::info!(path = %path.display(), "loading config");
    LighthouseConfig::from_file(&path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", path.display()))
}
