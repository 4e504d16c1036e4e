//! kiosk-server binary.
//!
//! Reads configuration from the environment (optionally layered over a TOML
//! file given with `--config`), binds the listener, connects the feedback
//! store in the background, and serves the API.
//!
//! ```
//! OCTACLE_WEBHOOK_URL=https://directory.example.com/webhook/<secret> \
//!   cargo run -p kiosk-server
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use kiosk_server::{ServerConfig, app_state, connect_store_in_background};
use kiosk_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Kiosk feedback API server")]
struct Cli {
  /// Optional TOML configuration file; environment variables take precedence.
  #[arg(short, long)]
  config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(cli.config.as_deref())
    .context("failed to load configuration (is OCTACLE_WEBHOOK_URL set?)")?;

  tracing::info!(
    policy = %server_cfg.missing_ref_policy,
    timeout_ms = server_cfg.timeout_ms,
    cache_ttl_ms = server_cfg.cache_ttl_ms,
    log_validation = server_cfg.log_validation,
    "configuration loaded"
  );

  let state = app_state::<SqliteStore>(&server_cfg);
  let store_path = expand_tilde(&server_cfg.store_path);
  connect_store_in_background(state.store.clone(), store_path);

  let app = kiosk_server::router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
