//! [`RefValidator`]: one upstream lookup per cache miss, no retries.

use std::time::{Duration, Instant};

use kiosk_core::{
  cache::{OutcomeCache, TtlPolicy},
  outcome::{ErrorCode, ValidationOutcome},
  refid::RefId,
};
use reqwest::{Client, Url};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::{BuildError, cache::LruOutcomeCache, upstream};

/// Emit a validation step at `debug`, or at `info` when verbose logging is on.
macro_rules! logv {
  ($verbose:expr, $($arg:tt)+) => {
    if $verbose {
      tracing::info!($($arg)+)
    } else {
      tracing::debug!($($arg)+)
    }
  };
}

// ─── Configuration ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
  /// Asset directory endpoint; the token is appended as `?id=<token>`.
  pub webhook_url:    String,
  /// Upper bound on a single upstream call, body included.
  pub timeout:        Duration,
  pub ttl:            TtlPolicy,
  pub cache_capacity: usize,
  /// Promote per-step validation logs from `debug` to `info`.
  pub verbose:        bool,
}

impl ValidatorConfig {
  pub fn new(webhook_url: impl Into<String>) -> Self {
    Self {
      webhook_url:    webhook_url.into(),
      timeout:        Duration::from_millis(2000),
      ttl:            TtlPolicy::default(),
      cache_capacity: crate::cache::DEFAULT_CAPACITY,
      verbose:        false,
    }
  }
}

// ─── Validator ────────────────────────────────────────────────────────────────

pub struct RefValidator<C = LruOutcomeCache> {
  client:   Client,
  endpoint: Url,
  timeout:  Duration,
  ttl:      TtlPolicy,
  verbose:  bool,
  cache:    C,
}

impl RefValidator<LruOutcomeCache> {
  /// Build a validator backed by an in-process LRU of
  /// `config.cache_capacity` entries.
  pub fn new(config: ValidatorConfig) -> Result<Self, BuildError> {
    let cache = LruOutcomeCache::new(config.cache_capacity);
    Self::with_cache(config, cache)
  }
}

impl<C: OutcomeCache> RefValidator<C> {
  pub fn with_cache(config: ValidatorConfig, cache: C) -> Result<Self, BuildError> {
    let endpoint = parse_endpoint(&config.webhook_url)?;
    let client = Client::builder().build()?;
    Ok(Self {
      client,
      endpoint,
      timeout: config.timeout,
      ttl: config.ttl,
      verbose: config.verbose,
      cache,
    })
  }

  pub fn cache(&self) -> &C { &self.cache }

  /// Resolve `raw` to an outcome. Never fails; every problem is an
  /// [`ValidationOutcome::Error`].
  pub async fn validate(&self, raw: &str) -> ValidationOutcome {
    let req = Uuid::new_v4().simple().to_string();
    let span = tracing::info_span!("ref_validate", req = &req[..6]);
    self.validate_inner(raw).instrument(span).await
  }

  async fn validate_inner(&self, raw: &str) -> ValidationOutcome {
    let Some(ref_id) = RefId::parse(raw) else {
      logv!(self.verbose, code = "MISSING_REFID", "no reference id supplied");
      return ValidationOutcome::error(ErrorCode::MissingRefid, "Missing refId");
    };
    logv!(self.verbose, ref_id = %ref_id.masked(), len = ref_id.as_str().len(), "start");

    if self.ttl.is_enabled()
      && let Some(hit) = self.cache.get(&ref_id).await
    {
      logv!(self.verbose, ok = hit.is_ok(), code = ?hit.code(), "cache hit");
      return hit;
    }

    let outcome = self.fetch(&ref_id).await;

    match &outcome {
      ValidationOutcome::Ok(asset) => {
        logv!(self.verbose, label = ?asset.label, status = %asset.status, "normalized")
      }
      ValidationOutcome::Error(r) => {
        logv!(self.verbose, code = %r.code, message = %r.message, "rejected")
      }
    }

    if let Some(ttl) = self.ttl.ttl_for(&outcome) {
      self.cache.set(ref_id, outcome.clone(), ttl).await;
    }
    outcome
  }

  async fn fetch(&self, ref_id: &RefId) -> ValidationOutcome {
    let mut url = self.endpoint.clone();
    url.query_pairs_mut().append_pair("id", ref_id.as_str());
    logv!(self.verbose, url = %redact_url(&url), "fetch");

    let started = Instant::now();
    let response = match self.client.get(url).timeout(self.timeout).send().await {
      Ok(r) => r,
      Err(e) => return transport_failure(&e),
    };
    let status = response.status();
    logv!(
      self.verbose,
      status = status.as_u16(),
      elapsed_ms = started.elapsed().as_millis() as u64,
      "upstream status"
    );

    if !status.is_success() {
      return ValidationOutcome::error(
        ErrorCode::Upstream,
        format!("Upstream HTTP {}", status.as_u16()),
      );
    }

    let body = match response.bytes().await {
      Ok(b) => b,
      Err(e) => return transport_failure(&e),
    };
    let parsed = serde_json::from_slice::<serde_json::Value>(&body).ok();
    upstream::interpret(ref_id, parsed.as_ref())
  }
}

fn transport_failure(e: &reqwest::Error) -> ValidationOutcome {
  let code = if e.is_timeout() {
    ErrorCode::Timeout
  } else {
    ErrorCode::Exception
  };
  tracing::warn!(code = %code, error = %e, "upstream call failed");
  ValidationOutcome::error(code, "Validator could not reach the asset directory")
}

fn parse_endpoint(raw: &str) -> Result<Url, BuildError> {
  let invalid = |reason: String| BuildError::InvalidUrl {
    url: raw.to_owned(),
    reason,
  };
  let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
  match url.scheme() {
    "http" | "https" => Ok(url),
    other => Err(invalid(format!("unsupported scheme {other:?}"))),
  }
}

/// Render `url` for logs: the secret segment after `/webhook/` is replaced and
/// the `id` parameter is masked. Credentials are never included.
pub fn redact_url(url: &Url) -> String {
  let mut out = format!("{}://{}", url.scheme(), url.host_str().unwrap_or_default());
  if let Some(port) = url.port() {
    out.push_str(&format!(":{port}"));
  }

  let mut redact_next = false;
  for segment in url.path_segments().into_iter().flatten() {
    out.push('/');
    out.push_str(if redact_next { "<redacted>" } else { segment });
    redact_next = segment.eq_ignore_ascii_case("webhook");
  }

  let query: Vec<String> = url
    .query_pairs()
    .map(|(k, v)| {
      if k == "id" {
        let masked = RefId::parse(&v).map_or_else(|| "****".to_owned(), |id| id.masked());
        format!("{k}={masked}")
      } else {
        format!("{k}={v}")
      }
    })
    .collect();
  if !query.is_empty() {
    out.push('?');
    out.push_str(&query.join("&"));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn redact_hides_webhook_secret_and_masks_id() {
    let url = Url::parse(
      "https://user:pw@hooks.example.com:8443/webhook/s3cr3t/assets?id=f191ad30-8d33-11f0-a3de-c32ceae4fb5a",
    )
    .unwrap();
    assert_eq!(
      redact_url(&url),
      "https://hooks.example.com:8443/webhook/<redacted>/assets?id=f191…fb5a"
    );
  }

  #[test]
  fn redact_masks_short_ids_completely() {
    let url = Url::parse("http://localhost/lookup?id=abc&x=1").unwrap();
    assert_eq!(redact_url(&url), "http://localhost/lookup?id=****&x=1");
  }

  #[test]
  fn rejects_non_http_endpoints() {
    assert!(matches!(
      RefValidator::new(ValidatorConfig::new("ftp://example.com/hook")),
      Err(BuildError::InvalidUrl { .. })
    ));
    assert!(matches!(
      RefValidator::new(ValidatorConfig::new("not a url")),
      Err(BuildError::InvalidUrl { .. })
    ));
  }
}
