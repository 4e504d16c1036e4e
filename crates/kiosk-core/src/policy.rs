//! What the submission endpoint does when a record arrives without a
//! reference token.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::{
  Error,
  outcome::{ErrorCode, Rejection},
  refid::RefId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRefPolicy {
  /// Store the record with a null token.
  #[default]
  Ignore,
  /// Reject with `MISSING_REFID` before touching storage.
  Error,
}

impl MissingRefPolicy {
  /// Decide whether a submission carrying `ref_id` may be stored.
  pub fn admit(self, ref_id: Option<&RefId>) -> Result<(), Rejection> {
    match (self, ref_id) {
      (Self::Error, None) => Err(Rejection::new(ErrorCode::MissingRefid, "Missing refId")),
      _ => Ok(()),
    }
  }
}

impl FromStr for MissingRefPolicy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "ignore" => Ok(Self::Ignore),
      "error" => Ok(Self::Error),
      _ => Err(Error::UnknownPolicy(s.to_owned())),
    }
  }
}

impl fmt::Display for MissingRefPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Ignore => "ignore",
      Self::Error => "error",
    })
  }
}

// Environment values arrive in whatever case the operator typed.
impl<'de> Deserialize<'de> for MissingRefPolicy {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ignore_admits_missing_token() {
    assert!(MissingRefPolicy::Ignore.admit(None).is_ok());
  }

  #[test]
  fn error_rejects_missing_token() {
    let rejection = MissingRefPolicy::Error.admit(None).unwrap_err();
    assert_eq!(rejection.code, ErrorCode::MissingRefid);

    let id = RefId::parse("abc").unwrap();
    assert!(MissingRefPolicy::Error.admit(Some(&id)).is_ok());
  }

  #[test]
  fn parses_case_insensitively() {
    assert_eq!("ERROR".parse::<MissingRefPolicy>().unwrap(), MissingRefPolicy::Error);
    assert_eq!(" Ignore ".parse::<MissingRefPolicy>().unwrap(), MissingRefPolicy::Ignore);
    assert!(matches!(
      "strict".parse::<MissingRefPolicy>(),
      Err(Error::UnknownPolicy(_))
    ));
  }

  #[test]
  fn deserialises_from_json_string() {
    let p: MissingRefPolicy = serde_json::from_str("\"Error\"").unwrap();
    assert_eq!(p, MissingRefPolicy::Error);
    assert!(serde_json::from_str::<MissingRefPolicy>("\"nope\"").is_err());
  }
}
