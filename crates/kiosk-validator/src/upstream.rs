//! Normalising the asset directory's answer into a [`ValidationOutcome`].
//!
//! The directory replies with either a single object or an array whose first
//! element is the match. When it does not know the id it may hand back some
//! unrelated default record instead of a "not found", so the item's own id
//! must be checked against the one we asked for.

use kiosk_core::{
  outcome::{Asset, ErrorCode, ValidationOutcome},
  refid::RefId,
};
use serde_json::Value;

/// Fields tried, in order, for the human-readable label.
const LABEL_FIELDS: [&str; 3] = ["name", "label", "title"];

/// Interpret a successfully-fetched upstream body. `body` is `None` when it
/// was not valid JSON.
pub fn interpret(requested: &RefId, body: Option<&Value>) -> ValidationOutcome {
  let item = match body {
    Some(Value::Array(items)) => items.first(),
    other => other,
  };

  let Some(item) = item.filter(|v| v.is_object()) else {
    return ValidationOutcome::error(ErrorCode::InvalidRefid, "Unknown reference id");
  };

  let same_id = item_id(item)
    .is_some_and(|returned| returned.to_lowercase() == requested.as_str().to_lowercase());
  if !same_id {
    tracing::debug!(
      requested = %requested.masked(),
      returned = ?item_id(item),
      "upstream id mismatch"
    );
    return ValidationOutcome::error(ErrorCode::IdMismatch, "Response id mismatch");
  }

  ValidationOutcome::Ok(Asset {
    asset_id: requested.as_str().to_owned(),
    label:    LABEL_FIELDS
      .iter()
      .find_map(|field| item.get(field).and_then(Value::as_str))
      .map(str::to_owned),
    status:   normalise_status(item.get("status")),
  })
}

/// The item's identifier: `{"id": {"id": "..."}}` as the directory nests it, or
/// a bare `{"id": "..."}`.
fn item_id(item: &Value) -> Option<&str> {
  match item.get("id")? {
    Value::String(s) => Some(s),
    Value::Object(inner) => inner.get("id").and_then(Value::as_str),
    _ => None,
  }
}

fn normalise_status(status: Option<&Value>) -> String {
  let raw = match status {
    Some(Value::String(s)) => s.clone(),
    Some(v @ (Value::Number(_) | Value::Bool(true))) => v.to_string(),
    _ => String::new(),
  };
  if raw.is_empty() {
    "unknown".to_owned()
  } else {
    raw.to_lowercase()
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  const ID: &str = "f191ad30-8d33-11f0-a3de-c32ceae4fb5a";

  fn requested() -> RefId { RefId::parse(ID).unwrap() }

  fn asset(outcome: ValidationOutcome) -> Asset {
    match outcome {
      ValidationOutcome::Ok(a) => a,
      ValidationOutcome::Error(r) => panic!("expected Ok, got {r:?}"),
    }
  }

  #[test]
  fn nested_id_matches_case_insensitively() {
    let body = json!({
      "id": { "entityType": "ASSET", "id": ID.to_uppercase() },
      "name": "4F Women Washroom",
      "status": "ACTIVE"
    });
    let a = asset(interpret(&requested(), Some(&body)));
    assert_eq!(a.asset_id, ID);
    assert_eq!(a.label.as_deref(), Some("4F Women Washroom"));
    assert_eq!(a.status, "active");
  }

  #[test]
  fn array_body_uses_first_element() {
    let body = json!([
      { "id": ID, "label": "4th Floor" },
      { "id": "other", "name": "ignored" }
    ]);
    let a = asset(interpret(&requested(), Some(&body)));
    assert_eq!(a.label.as_deref(), Some("4th Floor"));
  }

  #[test]
  fn label_prefers_name_then_label_then_title() {
    let body = json!({ "id": ID, "title": "T", "label": "L" });
    assert_eq!(asset(interpret(&requested(), Some(&body))).label.as_deref(), Some("L"));

    let body = json!({ "id": ID, "title": "T" });
    assert_eq!(asset(interpret(&requested(), Some(&body))).label.as_deref(), Some("T"));

    let body = json!({ "id": ID });
    assert_eq!(asset(interpret(&requested(), Some(&body))).label, None);
  }

  #[test]
  fn missing_or_blank_status_is_unknown() {
    let body = json!({ "id": ID });
    assert_eq!(asset(interpret(&requested(), Some(&body))).status, "unknown");

    let body = json!({ "id": ID, "status": "" });
    assert_eq!(asset(interpret(&requested(), Some(&body))).status, "unknown");

    let body = json!({ "id": ID, "status": null });
    assert_eq!(asset(interpret(&requested(), Some(&body))).status, "unknown");
  }

  #[test]
  fn unusable_bodies_are_invalid() {
    for body in [json!([]), json!(null), json!("text"), json!(42), json!([[]])] {
      assert_eq!(
        interpret(&requested(), Some(&body)).code(),
        Some(ErrorCode::InvalidRefid),
        "body: {body}"
      );
    }
    assert_eq!(interpret(&requested(), None).code(), Some(ErrorCode::InvalidRefid));
  }

  #[test]
  fn foreign_or_missing_id_is_a_mismatch() {
    let body = json!({ "id": { "id": "1b2c3d4e-0000-0000-0000-000000000000" }, "name": "Default" });
    assert_eq!(interpret(&requested(), Some(&body)).code(), Some(ErrorCode::IdMismatch));

    let body = json!({ "name": "No id at all" });
    assert_eq!(interpret(&requested(), Some(&body)).code(), Some(ErrorCode::IdMismatch));
  }
}
