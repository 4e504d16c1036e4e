//! The `OutcomeCache` trait and the TTL policy applied to validation outcomes.
//!
//! The validator depends on this abstraction, not on a concrete cache, so an
//! in-process LRU can be swapped for a shared cache without touching it.

use std::{future::Future, time::Duration};

use crate::{
  outcome::{ErrorCode, ValidationOutcome},
  refid::RefId,
};

/// Memoisation of validation outcomes keyed by token.
///
/// Purely a performance aid: a miss must always be safe.
pub trait OutcomeCache: Send + Sync {
  /// A live (unexpired) entry for `key`, if any.
  fn get<'a>(
    &'a self,
    key: &'a RefId,
  ) -> impl Future<Output = Option<ValidationOutcome>> + Send + 'a;

  /// Store `outcome` for `ttl`, replacing any previous entry.
  fn set(
    &self,
    key: RefId,
    outcome: ValidationOutcome,
    ttl: Duration,
  ) -> impl Future<Output = ()> + Send + '_;

  /// Drop the entry for `key`, if present.
  fn evict<'a>(&'a self, key: &'a RefId) -> impl Future<Output = ()> + Send + 'a;
}

// ─── TTL policy ──────────────────────────────────────────────────────────────

/// How long each kind of outcome stays cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
  /// Successful outcomes. Zero disables caching altogether.
  pub ok:      Duration,
  /// Error outcomes other than timeouts.
  pub error:   Duration,
  /// `TIMEOUT` outcomes.
  pub timeout: Duration,
}

impl Default for TtlPolicy {
  fn default() -> Self {
    Self {
      ok:      Duration::from_secs(600),
      error:   Duration::from_secs(30),
      timeout: Duration::from_secs(5),
    }
  }
}

impl TtlPolicy {
  /// Default policy with the success TTL taken from a millisecond setting.
  /// Zero or negative disables the cache.
  pub fn from_ok_millis(ms: i64) -> Self {
    Self {
      ok: Duration::from_millis(u64::try_from(ms).unwrap_or(0)),
      ..Self::default()
    }
  }

  pub fn is_enabled(&self) -> bool { !self.ok.is_zero() }

  /// TTL for `outcome`, or `None` when caching is disabled.
  pub fn ttl_for(&self, outcome: &ValidationOutcome) -> Option<Duration> {
    if !self.is_enabled() {
      return None;
    }
    Some(match outcome.code() {
      None => self.ok,
      Some(ErrorCode::Timeout) => self.timeout,
      Some(_) => self.error,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::outcome::Asset;

  fn ok_outcome() -> ValidationOutcome {
    ValidationOutcome::Ok(Asset {
      asset_id: "a".into(),
      label:    None,
      status:   "unknown".into(),
    })
  }

  #[test]
  fn ttl_depends_on_outcome_kind() {
    let p = TtlPolicy::default();
    assert_eq!(p.ttl_for(&ok_outcome()), Some(Duration::from_secs(600)));
    assert_eq!(
      p.ttl_for(&ValidationOutcome::error(ErrorCode::Upstream, "x")),
      Some(Duration::from_secs(30))
    );
    assert_eq!(
      p.ttl_for(&ValidationOutcome::error(ErrorCode::Timeout, "x")),
      Some(Duration::from_secs(5))
    );
  }

  #[test]
  fn zero_or_negative_millis_disables() {
    assert!(!TtlPolicy::from_ok_millis(0).is_enabled());
    assert!(!TtlPolicy::from_ok_millis(-1).is_enabled());
    assert_eq!(TtlPolicy::from_ok_millis(0).ttl_for(&ok_outcome()), None);
    assert_eq!(
      TtlPolicy::from_ok_millis(1500).ok,
      Duration::from_millis(1500)
    );
  }
}
