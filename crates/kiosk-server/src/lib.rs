//! HTTP server wiring for the kiosk feedback service.
//!
//! Loads [`ServerConfig`], builds the reference validator, and serves the
//! [`kiosk_api`] routes plus a `/health` probe behind CORS and request tracing.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{Router, routing::get};
use config::{ConfigError, Environment};
use kiosk_api::{ApiState, StoreSlot};
use kiosk_core::{
  cache::{OutcomeCache, TtlPolicy},
  policy::MissingRefPolicy,
  store::FeedbackStore,
};
use kiosk_store_sqlite::SqliteStore;
use kiosk_validator::{RefValidator, ValidatorConfig};
use serde::Deserialize;
use tokio::task::JoinHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration: an optional TOML file overlaid by
/// environment variables (`OCTACLE_WEBHOOK_URL`, `PORT`, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Asset directory endpoint. Required; there is no default.
  #[serde(rename = "octacle_webhook_url")]
  pub webhook_url:        String,
  #[serde(rename = "octacle_timeout_ms", default = "default_timeout_ms")]
  pub timeout_ms:         u64,
  /// Success TTL for cached validations; zero or negative disables caching.
  #[serde(rename = "ref_cache_ttl_ms", default = "default_cache_ttl_ms")]
  pub cache_ttl_ms:       i64,
  #[serde(rename = "ref_cache_max", default = "default_cache_max")]
  pub cache_max:          usize,
  #[serde(default)]
  pub missing_ref_policy: MissingRefPolicy,
  #[serde(default)]
  pub log_validation:     bool,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("feedback.db") }
fn default_timeout_ms() -> u64 { 2000 }
fn default_cache_ttl_ms() -> i64 { 600_000 }
fn default_cache_max() -> usize { 1000 }

impl ServerConfig {
  /// Read `file` (if given and present) and the process environment.
  pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
    Self::load_with_env(file, Environment::default().try_parsing(true))
  }

  /// Like [`ServerConfig::load`] but with explicit environment values instead
  /// of the process environment.
  pub fn from_env_map(file: Option<&Path>, env: HashMap<String, String>) -> Result<Self, ConfigError> {
    Self::load_with_env(file, Environment::default().try_parsing(true).source(Some(env)))
  }

  fn load_with_env(file: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = file {
      builder = builder.add_source(config::File::from(path).required(false));
    }
    builder.add_source(env).build()?.try_deserialize()
  }

  pub fn validator_config(&self) -> ValidatorConfig {
    ValidatorConfig {
      webhook_url:    self.webhook_url.clone(),
      timeout:        Duration::from_millis(self.timeout_ms),
      ttl:            TtlPolicy::from_ok_millis(self.cache_ttl_ms),
      cache_capacity: self.cache_max,
      verbose:        self.log_validation,
    }
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Assembly ─────────────────────────────────────────────────────────────────

/// Build the validator, or `None` if it cannot be constructed. The server
/// still starts; the validate route then answers `VALIDATOR_UNAVAILABLE`.
pub fn build_validator(cfg: &ServerConfig) -> Option<Arc<RefValidator>> {
  match RefValidator::new(cfg.validator_config()) {
    Ok(v) => Some(Arc::new(v)),
    Err(e) => {
      tracing::error!(error = %e, "reference validator unavailable");
      None
    }
  }
}

/// API state with an empty store slot, to be filled by
/// [`connect_store_in_background`].
pub fn app_state<S>(cfg: &ServerConfig) -> ApiState<S> {
  ApiState {
    store:     StoreSlot::empty(),
    validator: build_validator(cfg),
    policy:    cfg.missing_ref_policy,
  }
}

/// Open the SQLite store at `path` and install it into `slot`. Until this
/// completes, submissions answer `DB_NOT_READY`; if it fails they keep doing so.
pub fn connect_store_in_background(slot: StoreSlot<SqliteStore>, path: PathBuf) -> JoinHandle<()> {
  tokio::spawn(async move {
    match SqliteStore::open(&path).await {
      Ok(store) => {
        slot.fill(store);
        tracing::info!(path = %path.display(), "feedback store connected");
      }
      Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to open feedback store"),
    }
  })
}

/// Build the full application router.
pub fn router<S, C>(state: ApiState<S, C>) -> Router
where
  S: FeedbackStore + 'static,
  C: OutcomeCache + 'static,
{
  Router::new()
    .route("/health", get(health))
    .merge(kiosk_api::api_router(state))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

/// `GET /health`: liveness only; says nothing about the store or upstream.
async fn health() -> &'static str { "ok" }

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use tower::ServiceExt as _;

  use super::*;

  fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect()
  }

  fn base_env() -> HashMap<String, String> {
    env(&[("OCTACLE_WEBHOOK_URL", "https://hooks.example.com/webhook/abc")])
  }

  async fn body_string(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn defaults_apply_when_only_webhook_is_set() {
    let cfg = ServerConfig::from_env_map(None, base_env()).unwrap();
    assert_eq!(cfg.webhook_url, "https://hooks.example.com/webhook/abc");
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.timeout_ms, 2000);
    assert_eq!(cfg.cache_ttl_ms, 600_000);
    assert_eq!(cfg.cache_max, 1000);
    assert_eq!(cfg.missing_ref_policy, MissingRefPolicy::Ignore);
    assert!(!cfg.log_validation);

    let vc = cfg.validator_config();
    assert_eq!(vc.timeout, Duration::from_millis(2000));
    assert!(vc.ttl.is_enabled());
  }

  #[test]
  fn missing_webhook_url_is_a_startup_error() {
    assert!(ServerConfig::from_env_map(None, env(&[("PORT", "8080")])).is_err());
  }

  #[test]
  fn environment_overrides_are_parsed() {
    let mut vars = base_env();
    vars.extend(env(&[
      ("PORT", "8080"),
      ("OCTACLE_TIMEOUT_MS", "750"),
      ("REF_CACHE_TTL_MS", "0"),
      ("MISSING_REF_POLICY", "error"),
      ("LOG_VALIDATION", "true"),
    ]));
    let cfg = ServerConfig::from_env_map(None, vars).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.timeout_ms, 750);
    assert_eq!(cfg.missing_ref_policy, MissingRefPolicy::Error);
    assert!(cfg.log_validation);
    assert!(!cfg.validator_config().ttl.is_enabled());
  }

  #[test]
  fn unknown_policy_is_rejected() {
    let mut vars = base_env();
    vars.insert("MISSING_REF_POLICY".into(), "sometimes".into());
    assert!(ServerConfig::from_env_map(None, vars).is_err());
  }

  // ── Router ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_is_plain_ok() {
    let cfg = ServerConfig::from_env_map(None, base_env()).unwrap();
    let app = router(app_state::<SqliteStore>(&cfg));
    let resp = app
      .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ct = resp.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap().to_owned();
    assert!(ct.starts_with("text/plain"), "Content-Type: {ct}");
    assert_eq!(body_string(resp).await, "ok");
  }

  #[tokio::test]
  async fn bad_webhook_url_degrades_to_validator_unavailable() {
    let mut vars = base_env();
    vars.insert("OCTACLE_WEBHOOK_URL".into(), "not a url".into());
    let cfg = ServerConfig::from_env_map(None, vars).unwrap();
    let state = app_state::<SqliteStore>(&cfg);
    assert!(state.validator.is_none());

    let resp = router(state)
      .oneshot(
        Request::builder()
          .uri("/api/ref/validate?refId=abc")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["code"], "VALIDATOR_UNAVAILABLE");
  }

  #[tokio::test]
  async fn submissions_wait_for_background_store() {
    let cfg = ServerConfig::from_env_map(None, base_env()).unwrap();
    let state = app_state::<SqliteStore>(&cfg);
    assert!(!state.store.is_ready());

    let path = std::env::temp_dir().join(format!("kiosk-server-{}.db", std::process::id()));
    connect_store_in_background(state.store.clone(), path.clone())
      .await
      .unwrap();
    assert!(state.store.is_ready());

    let resp = router(state)
      .oneshot(
        Request::builder()
          .method("POST")
          .uri("/submitFeedback")
          .header(header::CONTENT_TYPE, "application/json")
          .body(Body::from(r#"{"rating":"Good","reasons":[]}"#))
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let _ = std::fs::remove_file(&path);
  }

  #[tokio::test]
  async fn cors_allows_any_origin() {
    let cfg = ServerConfig::from_env_map(None, base_env()).unwrap();
    let resp = router(app_state::<SqliteStore>(&cfg))
      .oneshot(
        Request::builder()
          .uri("/health")
          .header(header::ORIGIN, "http://kiosk.local")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(
      resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
      "*"
    );
  }
}
