//! Async HTTP client for the kiosk API.

use std::time::Duration;

use anyhow::{Context, Result};
use kiosk_core::{
  feedback::NewFeedback,
  outcome::{Asset, ErrorCode},
  refid::RefId,
  wire::{Envelope, SubmissionReceipt},
};
use reqwest::Client;

/// How long a submission may take before it counts as a network failure.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the kiosk API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// What became of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// Stored; the server returned the record id.
  Accepted { id: String },
  /// The server answered and said no.
  Rejected { code: String, message: Option<String> },
  /// No usable answer: timeout, refused connection, dropped body.
  Network(String),
}

/// Async HTTP client for the kiosk API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /api/ref/validate?refId=<id>`
  ///
  /// Errors only on transport failure. A body that is not a JSON envelope
  /// reads as an empty (not-ok, code-less) envelope.
  pub async fn validate_ref(&self, ref_id: &RefId) -> Result<Envelope<Asset>> {
    let resp = self
      .client
      .get(self.url("/api/ref/validate"))
      .query(&[("refId", ref_id.as_str())])
      .send()
      .await
      .context("GET /api/ref/validate failed")?;

    tracing::debug!(status = resp.status().as_u16(), "validate response");
    let bytes = resp.bytes().await.context("reading validate response")?;
    Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
      tracing::debug!(error = %e, "validate response had no JSON envelope");
      Envelope {
        ok:      false,
        code:    String::new(),
        data:    None,
        message: None,
      }
    }))
  }

  /// `POST /submitFeedback`, bounded by [`SUBMIT_TIMEOUT`].
  pub async fn submit_feedback(&self, feedback: &NewFeedback) -> SubmitOutcome {
    let sent = self
      .client
      .post(self.url("/submitFeedback"))
      .timeout(SUBMIT_TIMEOUT)
      .json(feedback)
      .send()
      .await;

    let resp = match sent {
      Ok(r) => r,
      Err(e) => return SubmitOutcome::Network(e.to_string()),
    };
    let status = resp.status();
    let bytes = match resp.bytes().await {
      Ok(b) => b,
      Err(e) => return SubmitOutcome::Network(e.to_string()),
    };

    match serde_json::from_slice::<Envelope<SubmissionReceipt>>(&bytes) {
      Ok(Envelope {
        ok: true,
        data: Some(receipt),
        ..
      }) => SubmitOutcome::Accepted { id: receipt.id },
      Ok(env) => SubmitOutcome::Rejected {
        code:    if env.code.is_empty() {
          ErrorCode::ServerError.as_str().to_owned()
        } else {
          env.code
        },
        message: env.message,
      },
      Err(_) => SubmitOutcome::Rejected {
        code:    ErrorCode::ServerError.as_str().to_owned(),
        message: Some(format!("unexpected response (HTTP {})", status.as_u16())),
      },
    }
  }
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
  };
  use serde_json::json;
  use tokio::net::TcpListener;

  use super::*;

  async fn serve(app: Router) -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    ApiClient::new(ApiConfig {
      base_url: format!("http://{addr}/"),
    })
    .unwrap()
  }

  fn feedback() -> NewFeedback {
    NewFeedback {
      rating: Some("Good".into()),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn accepted_submission_returns_id() {
    let client = serve(Router::new().route(
      "/submitFeedback",
      post(|| async { Json(json!({ "ok": true, "code": "OK", "data": { "id": "abc-123" } })) }),
    ))
    .await;
    assert_eq!(
      client.submit_feedback(&feedback()).await,
      SubmitOutcome::Accepted { id: "abc-123".into() }
    );
  }

  #[tokio::test]
  async fn server_rejection_keeps_code() {
    let client = serve(Router::new().route(
      "/submitFeedback",
      post(|| async {
        (
          StatusCode::SERVICE_UNAVAILABLE,
          Json(json!({ "ok": false, "code": "DB_NOT_READY", "message": "Database not ready" })),
        )
      }),
    ))
    .await;
    assert_eq!(
      client.submit_feedback(&feedback()).await,
      SubmitOutcome::Rejected {
        code:    "DB_NOT_READY".into(),
        message: Some("Database not ready".into()),
      }
    );
  }

  #[tokio::test]
  async fn slow_server_is_a_network_failure() {
    let client = serve(Router::new().route(
      "/submitFeedback",
      post(|| async {
        tokio::time::sleep(SUBMIT_TIMEOUT + Duration::from_secs(1)).await;
        Json(json!({ "ok": true, "code": "OK", "data": { "id": "late" } }))
      }),
    ))
    .await;
    assert!(matches!(
      client.submit_feedback(&feedback()).await,
      SubmitOutcome::Network(_)
    ));
  }

  #[tokio::test]
  async fn non_json_validate_body_reads_as_empty_envelope() {
    let client = serve(Router::new().route("/api/ref/validate", get(|| async { "oops" }))).await;
    let env = client
      .validate_ref(&RefId::parse("abc").unwrap())
      .await
      .unwrap();
    assert!(!env.ok);
    assert!(env.code.is_empty());
  }
}
