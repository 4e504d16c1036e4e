//! The `FeedbackStore` trait.
//!
//! Implemented by storage backends (e.g. `kiosk-store-sqlite`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::feedback::{FeedbackRecord, NewFeedback};

/// Append-only storage for feedback records.
///
/// Records are never updated or deleted through this trait.
pub trait FeedbackStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `input` and return the stored record. The id and `recorded_at`
  /// are assigned by the store.
  fn insert_feedback(
    &self,
    input: NewFeedback,
  ) -> impl Future<Output = Result<FeedbackRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_feedback(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<FeedbackRecord>, Self::Error>> + Send + '_;
}
