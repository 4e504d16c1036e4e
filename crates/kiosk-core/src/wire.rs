//! The JSON envelope every API answer is wrapped in.
//!
//! ```json
//! { "ok": true,  "code": "OK", "data": { ... } }
//! { "ok": false, "code": "TIMEOUT", "message": "..." }
//! ```

use serde::{Deserialize, Serialize};

use crate::outcome::{Asset, ErrorCode, Rejection, ValidationOutcome};

/// The `code` carried by every successful envelope.
pub const OK_CODE: &str = "OK";

/// `code` is kept as a string so a client can receive codes it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
  #[serde(default)]
  pub ok:      bool,
  #[serde(default)]
  pub code:    String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

impl<T> Envelope<T> {
  pub fn success(data: T) -> Self {
    Self {
      ok:      true,
      code:    OK_CODE.to_owned(),
      data:    Some(data),
      message: None,
    }
  }

  pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
    Self {
      ok:      false,
      code:    code.as_str().to_owned(),
      data:    None,
      message: Some(message.into()),
    }
  }
}

impl<T> From<Rejection> for Envelope<T> {
  fn from(r: Rejection) -> Self { Self::failure(r.code, r.message) }
}

impl From<ValidationOutcome> for Envelope<Asset> {
  fn from(outcome: ValidationOutcome) -> Self {
    match outcome {
      ValidationOutcome::Ok(asset) => Self::success(asset),
      ValidationOutcome::Error(r) => r.into(),
    }
  }
}

/// `data` of a successful `POST /submitFeedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
  pub id: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn ok_outcome_serialises_with_data_and_no_message() {
    let env: Envelope<Asset> = ValidationOutcome::Ok(Asset {
      asset_id: "f191".into(),
      label:    Some("4F Women Washroom".into()),
      status:   "active".into(),
    })
    .into();
    assert_eq!(
      serde_json::to_value(&env).unwrap(),
      json!({
        "ok": true,
        "code": "OK",
        "data": { "assetId": "f191", "label": "4F Women Washroom", "status": "active" }
      })
    );
  }

  #[test]
  fn error_outcome_serialises_with_message_and_no_data() {
    let env: Envelope<Asset> =
      ValidationOutcome::error(ErrorCode::IdMismatch, "Response id mismatch").into();
    assert_eq!(
      serde_json::to_value(&env).unwrap(),
      json!({ "ok": false, "code": "ID_MISMATCH", "message": "Response id mismatch" })
    );
  }

  #[test]
  fn empty_body_deserialises_as_not_ok() {
    let env: Envelope<Asset> = serde_json::from_str("{}").unwrap();
    assert!(!env.ok);
    assert!(env.code.is_empty());
    assert!(env.data.is_none());
  }
}
