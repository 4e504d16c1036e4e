//! `kiosk`: terminal feedback kiosk.
//!
//! # Usage
//!
//! ```
//! kiosk --api-url http://localhost:5000 --page-url 'https://kiosk.example/?refId=abc123'
//! kiosk --config ~/.config/kiosk/config.toml --log-file kiosk.log
//! ```

mod app;
mod client;
mod copy;
mod form;
mod gate;
mod ui;

use std::{fs::File, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use form::KioskContext;
use gate::{GatePolicy, ref_id_from_page_url};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "kiosk", about = "Terminal feedback kiosk")]
struct Args {
  /// Path to a TOML config file; flags and env vars take precedence.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the kiosk API (default: http://localhost:5000).
  #[arg(long, env = "KIOSK_API_URL")]
  api_url: Option<String>,

  /// Kiosk page URL; its `refId`, `referenceid` or `ref` parameter is the
  /// location token.
  #[arg(long, env = "KIOSK_PAGE_URL")]
  page_url: Option<String>,

  #[arg(long, env = "KIOSK_DEVICE_ID")]
  device_id: Option<String>,

  #[arg(long, env = "KIOSK_LOCATION")]
  location: Option<String>,

  #[arg(long, env = "KIOSK_WASHROOM_ID")]
  washroom_id: Option<String>,

  /// Feedback module name sent with each submission (default: washroom).
  #[arg(long, env = "KIOSK_SOLUTION")]
  solution: Option<String>,

  /// Block the form until the location token is verified.
  #[arg(long, env = "KIOSK_REQUIRE_REF")]
  require_ref: Option<bool>,

  /// Contact shown on the error card.
  #[arg(long, env = "KIOSK_SUPPORT_CONTACT")]
  support_contact: Option<String>,

  /// Write logs here; the terminal is taken by the UI.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
  api_url:         Option<String>,
  page_url:        Option<String>,
  device_id:       Option<String>,
  location:        Option<String>,
  washroom_id:     Option<String>,
  solution:        Option<String>,
  require_ref:     Option<bool>,
  support_contact: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(path) = &args.log_file {
    let file = File::create(path)
      .with_context(|| format!("opening log file {}", path.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(
        EnvFilter::builder()
          .with_default_directive(LevelFilter::INFO.into())
          .from_env_lossy(),
      )
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  }

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .api_url
      .or(file_cfg.api_url)
      .unwrap_or_else(|| "http://localhost:5000".to_string()),
  };
  let page_url = args.page_url.or(file_cfg.page_url);
  let ref_id = page_url.as_deref().and_then(ref_id_from_page_url);
  let context = KioskContext {
    solution: Some(
      args
        .solution
        .or(file_cfg.solution)
        .unwrap_or_else(|| "washroom".to_string()),
    ),
    device_id: args.device_id.or(file_cfg.device_id),
    location: args.location.or(file_cfg.location),
    washroom_id: args.washroom_id.or(file_cfg.washroom_id),
    browser: Some(format!("kiosk-cli/{}", env!("CARGO_PKG_VERSION"))),
    ref_id,
  };
  let policy = GatePolicy {
    require_ref: args.require_ref.or(file_cfg.require_ref).unwrap_or(true),
  };
  let support = args.support_contact.or(file_cfg.support_contact);

  tracing::info!(
    api = %api_config.base_url,
    ref_id = context.ref_id.as_ref().map(|r| r.masked()).unwrap_or_default(),
    require_ref = policy.require_ref,
    "starting kiosk"
  );

  let client = ApiClient::new(api_config)?;
  let mut app = App::new(client, policy, context, support);
  app.start_gate_check();

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;
  app.cancel_gate_check();

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.tick().await;
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    match maybe_event {
      Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
        if !app.handle_key(key) {
          break;
        }
      }
      // Terminal will redraw on next iteration.
      _ => {}
    }
  }

  Ok(())
}
