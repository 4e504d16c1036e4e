//! Validation outcomes and the error-code taxonomy shared by server and client.
//!
//! A [`ValidationOutcome`] is either a resolved [`Asset`] or a [`Rejection`];
//! there is no state in which both (or neither) are present.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

// ─── Codes ───────────────────────────────────────────────────────────────────

/// Every failure code the validator, submission endpoint or client can
/// produce. Serialised as `SCREAMING_SNAKE_CASE` (e.g. `MISSING_REFID`).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
  /// No token supplied, or only whitespace.
  MissingRefid,
  /// Upstream answered with nothing usable.
  InvalidRefid,
  /// Upstream answered with a record for a different id.
  IdMismatch,
  /// Upstream answered with a non-success HTTP status.
  Upstream,
  /// Upstream did not answer within the configured timeout.
  Timeout,
  /// Any other transport failure while talking to upstream.
  Exception,
  /// Client-side only: the validator itself could not be reached.
  Network,
  /// The validator could not be constructed at startup.
  ValidatorUnavailable,
  /// The feedback store is not connected yet.
  DbNotReady,
  /// The feedback store failed.
  ServerError,
  /// The submission body was not a JSON object of the expected shape.
  BadRequest,
}

impl ErrorCode {
  pub fn as_str(self) -> &'static str { self.into() }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// A location the upstream directory vouched for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  pub asset_id: String,
  /// Human-readable place name, e.g. `"4F Women Washroom"`.
  pub label:    Option<String>,
  /// Lowercased upstream status; `"unknown"` when upstream omits it.
  pub status:   String,
}

impl Asset {
  /// The label if upstream supplied one, otherwise the raw asset id.
  pub fn display_label(&self) -> &str { self.label.as_deref().unwrap_or(&self.asset_id) }
}

/// A tagged failure. `message` is for humans and logs; branch on `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
  pub code:    ErrorCode,
  pub message: String,
}

impl Rejection {
  pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
    Self { code, message: message.into() }
  }
}

/// The normalised answer to "does this token name a known location?".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
  Ok(Asset),
  Error(Rejection),
}

impl ValidationOutcome {
  pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
    Self::Error(Rejection::new(code, message))
  }

  pub fn is_ok(&self) -> bool { matches!(self, Self::Ok(_)) }

  /// The failure code, or `None` for a successful outcome.
  pub fn code(&self) -> Option<ErrorCode> {
    match self {
      Self::Ok(_) => None,
      Self::Error(r) => Some(r.code),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn codes_use_screaming_snake_case() {
    assert_eq!(ErrorCode::MissingRefid.as_str(), "MISSING_REFID");
    assert_eq!(ErrorCode::IdMismatch.to_string(), "ID_MISMATCH");
    assert_eq!(ErrorCode::DbNotReady.as_str(), "DB_NOT_READY");
    assert_eq!(ErrorCode::BadRequest.as_str(), "BAD_REQUEST");
    assert_eq!(
      serde_json::to_string(&ErrorCode::ValidatorUnavailable).unwrap(),
      "\"VALIDATOR_UNAVAILABLE\""
    );
    assert_eq!(ErrorCode::from_str("TIMEOUT").unwrap(), ErrorCode::Timeout);
    assert!(ErrorCode::from_str("SOMETHING_ELSE").is_err());
  }

  #[test]
  fn display_label_falls_back_to_asset_id() {
    let asset = Asset {
      asset_id: "abc".into(),
      label:    None,
      status:   "unknown".into(),
    };
    assert_eq!(asset.display_label(), "abc");
  }
}
