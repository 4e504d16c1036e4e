//! Handler for `POST /submitFeedback`.
//!
//! A pass-through persist: the only gate is the missing-reference policy.
//! Rating and reason values are stored as sent. A body that cannot be read at
//! all still gets an envelope, with `BAD_REQUEST`.

use axum::{
  Json,
  extract::{State, rejection::JsonRejection},
};
use kiosk_core::{
  cache::OutcomeCache,
  feedback::NewFeedback,
  store::FeedbackStore,
  wire::{Envelope, SubmissionReceipt},
};

use crate::{ApiState, error::ApiError};

/// `POST /submitFeedback`, body: [`NewFeedback`].
pub async fn submit<S, C>(
  State(state): State<ApiState<S, C>>,
  body: Result<Json<NewFeedback>, JsonRejection>,
) -> Result<Json<Envelope<SubmissionReceipt>>, ApiError>
where
  S: FeedbackStore,
  C: OutcomeCache,
{
  let Json(body) = body.inspect_err(|e| tracing::info!(error = %e, "unreadable submission"))?;
  let feedback = body.normalized();
  let ref_id = feedback.ref_id();

  state.policy.admit(ref_id.as_ref()).map_err(|r| {
    tracing::info!(policy = %state.policy, "submission rejected: missing refId");
    ApiError::Rejected(r)
  })?;

  let store = state.store.get().ok_or(ApiError::DbNotReady)?;
  let record = store
    .insert_feedback(feedback)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(
    id = %record.id,
    rating = ?record.feedback.rating,
    reasons = record.feedback.reasons.len(),
    ref_id = ?ref_id.map(|r| r.masked()),
    "feedback stored"
  );
  Ok(Json(Envelope::success(SubmissionReceipt {
    id: record.id.to_string(),
  })))
}
