//! Error types for `kiosk-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown missing-reference policy: {0:?} (expected \"ignore\" or \"error\")")]
  UnknownPolicy(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
