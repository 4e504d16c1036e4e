//! JSON API for the kiosk feedback service.
//!
//! Exposes an axum [`Router`] with the reference validator and the feedback
//! submission endpoint, backed by any [`FeedbackStore`].
//! TLS, CORS and tracing layers are the caller's responsibility.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/ref/validate` | `?refId=<token>`; always 200 with an `ok` flag |
//! | `POST` | `/submitFeedback`   | Body: [`NewFeedback`](kiosk_core::feedback::NewFeedback) |

pub mod error;
pub mod feedback;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use kiosk_core::{cache::OutcomeCache, policy::MissingRefPolicy, store::FeedbackStore};
use kiosk_validator::{LruOutcomeCache, RefValidator};
use tokio::sync::OnceCell;

pub use error::ApiError;

// ─── Store slot ───────────────────────────────────────────────────────────────

/// A store that may not be connected yet.
///
/// The server starts answering before its store is open; submissions arriving
/// in that window get `DB_NOT_READY`. Filled at most once.
pub struct StoreSlot<S>(Arc<OnceCell<Arc<S>>>);

impl<S> StoreSlot<S> {
  pub fn empty() -> Self { Self(Arc::new(OnceCell::new())) }

  pub fn ready(store: S) -> Self { Self(Arc::new(OnceCell::new_with(Some(Arc::new(store))))) }

  /// Install the store. Returns `false` if one was already installed.
  pub fn fill(&self, store: S) -> bool { self.0.set(Arc::new(store)).is_ok() }

  pub fn get(&self) -> Option<Arc<S>> { self.0.get().cloned() }

  pub fn is_ready(&self) -> bool { self.0.initialized() }
}

impl<S> Clone for StoreSlot<S> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through the API handlers.
///
/// `C` is the validator's outcome cache; any [`OutcomeCache`] will do.
pub struct ApiState<S, C = LruOutcomeCache> {
  pub store:     StoreSlot<S>,
  /// `None` when the validator could not be built; the validate route then
  /// answers `VALIDATOR_UNAVAILABLE`.
  pub validator: Option<Arc<RefValidator<C>>>,
  pub policy:    MissingRefPolicy,
}

impl<S, C> Clone for ApiState<S, C> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      validator: self.validator.clone(),
      policy:    self.policy,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S, C>(state: ApiState<S, C>) -> Router<()>
where
  S: FeedbackStore + 'static,
  C: OutcomeCache + 'static,
{
  Router::new()
    .route("/api/ref/validate", get(validate::handler::<S, C>))
    .route("/submitFeedback", post(feedback::submit::<S, C>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
