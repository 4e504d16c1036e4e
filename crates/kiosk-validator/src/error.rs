//! Errors raised while constructing a validator.
//!
//! Validation itself never errors; see [`RefValidator::validate`](crate::RefValidator::validate).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("invalid webhook url {url:?}: {reason}")]
  InvalidUrl { url: String, reason: String },

  #[error("failed to build http client: {0}")]
  Client(#[from] reqwest::Error),
}
