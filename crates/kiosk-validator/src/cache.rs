//! [`LruOutcomeCache`] is an in-process, capacity-bounded [`OutcomeCache`].

use std::{
  num::NonZeroUsize,
  sync::{Mutex, MutexGuard, PoisonError},
  time::Duration,
};

use kiosk_core::{cache::OutcomeCache, outcome::ValidationOutcome, refid::RefId};
use lru::LruCache;
use tokio::time::Instant;

pub const DEFAULT_CAPACITY: usize = 1000;

struct Entry {
  outcome:    ValidationOutcome,
  expires_at: Instant,
}

/// Least-recently-used eviction once `capacity` entries are held; every entry
/// also carries its own expiry, checked on read.
pub struct LruOutcomeCache {
  entries: Mutex<LruCache<RefId, Entry>>,
}

impl LruOutcomeCache {
  /// A capacity of zero is treated as [`DEFAULT_CAPACITY`].
  pub fn new(capacity: usize) -> Self {
    let capacity = NonZeroUsize::new(capacity)
      .or(NonZeroUsize::new(DEFAULT_CAPACITY))
      .unwrap_or(NonZeroUsize::MIN);
    Self {
      entries: Mutex::new(LruCache::new(capacity)),
    }
  }

  /// Number of entries held, expired or not.
  pub fn len(&self) -> usize { self.lock().len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  // A panic while holding the lock cannot leave an entry half-written.
  fn lock(&self) -> MutexGuard<'_, LruCache<RefId, Entry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl Default for LruOutcomeCache {
  fn default() -> Self { Self::new(DEFAULT_CAPACITY) }
}

impl OutcomeCache for LruOutcomeCache {
  async fn get(&self, key: &RefId) -> Option<ValidationOutcome> {
    let mut entries = self.lock();
    match entries.get(key) {
      Some(entry) if entry.expires_at > Instant::now() => return Some(entry.outcome.clone()),
      Some(_) => {}
      None => return None,
    }
    entries.pop(key);
    None
  }

  async fn set(&self, key: RefId, outcome: ValidationOutcome, ttl: Duration) {
    let expires_at = Instant::now() + ttl;
    self.lock().put(key, Entry { outcome, expires_at });
  }

  async fn evict(&self, key: &RefId) { self.lock().pop(key); }
}
