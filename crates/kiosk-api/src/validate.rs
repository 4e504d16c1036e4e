//! Handler for `GET /api/ref/validate`.
//!
//! Always answers 200; the envelope's `ok` flag carries the verdict. The query
//! is read as raw pairs so a repeated `refId` cannot fail extraction; the first
//! non-blank value wins.

use axum::{
  Json,
  extract::{Query, State},
};
use kiosk_core::{
  cache::OutcomeCache,
  outcome::{Asset, ErrorCode},
  store::FeedbackStore,
  wire::Envelope,
};

use crate::ApiState;

/// The first non-blank `refId` value, or `""` when there is none.
pub fn ref_id_param(pairs: &[(String, String)]) -> &str {
  pairs
    .iter()
    .filter(|(k, _)| k == "refId")
    .map(|(_, v)| v.as_str())
    .find(|v| !v.trim().is_empty())
    .unwrap_or_default()
}

/// `GET /api/ref/validate?refId=<token>`
pub async fn handler<S, C>(
  State(state): State<ApiState<S, C>>,
  Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Envelope<Asset>>
where
  S: FeedbackStore,
  C: OutcomeCache,
{
  let Some(validator) = &state.validator else {
    return Json(Envelope::failure(
      ErrorCode::ValidatorUnavailable,
      "Reference validation is unavailable",
    ));
  };

  let outcome = validator.validate(ref_id_param(&pairs)).await;
  Json(outcome.into())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn first_non_blank_ref_id_wins() {
    assert_eq!(ref_id_param(&pairs(&[("refId", "a"), ("refId", "b")])), "a");
    assert_eq!(ref_id_param(&pairs(&[("refId", " "), ("refId", "b")])), "b");
    assert_eq!(ref_id_param(&pairs(&[("ref", "a")])), "");
    assert_eq!(ref_id_param(&[]), "");
  }
}
