//! Feedback records: one submitted survey response each.
//!
//! The server treats a submission as an opaque pass-through: it does not check
//! the rating or reasons against the vocabulary below. The typed [`Rating`]
//! and reason lists exist for the kiosk form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::refid::RefId;

// ─── Vocabulary ──────────────────────────────────────────────────────────────

/// Overall satisfaction, best first.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Rating {
  Excellent,
  Good,
  Okay,
  Poor,
  #[serde(rename = "Very Poor")]
  #[strum(serialize = "Very Poor")]
  VeryPoor,
}

impl Rating {
  pub const ALL: [Rating; 5] =
    [Self::Excellent, Self::Good, Self::Okay, Self::Poor, Self::VeryPoor];

  pub fn as_str(self) -> &'static str { self.into() }

  /// Caption shown under the smiley.
  pub fn caption(self) -> &'static str {
    match self {
      Self::Excellent => "Super Happy",
      Self::Good => "Happy",
      Self::Okay => "Neutral",
      Self::Poor => "Unhappy",
      Self::VeryPoor => "Most Disappointed",
    }
  }

  pub fn emoji(self) -> &'static str {
    match self {
      Self::Excellent => "😄",
      Self::Good => "🙂",
      Self::Okay => "😐",
      Self::Poor => "🙁",
      Self::VeryPoor => "😠",
    }
  }
}

pub const POSITIVE_REASONS: [&str; 3] = [
  "Overall Experience was Great",
  "Loved the Hands-Free Operation",
  "Super Happy to see My Feedback Implemented",
];

pub const NEGATIVE_REASONS: [&str; 6] = [
  "Paper Towels Unavailable",
  "Liquid Soap Unavailable",
  "Trash Bin not Cleaned",
  "Floor not Clean",
  "Bad Odor",
  "Broken Fixtures",
];

/// The whole reason vocabulary, positive first. Any subset may be chosen for
/// any rating.
pub fn all_reasons() -> impl Iterator<Item = &'static str> {
  POSITIVE_REASONS.into_iter().chain(NEGATIVE_REASONS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonKind {
  Positive,
  Negative,
}

/// Which half of the vocabulary `tag` belongs to, if any.
pub fn reason_kind(tag: &str) -> Option<ReasonKind> {
  if POSITIVE_REASONS.contains(&tag) {
    Some(ReasonKind::Positive)
  } else if NEGATIVE_REASONS.contains(&tag) {
    Some(ReasonKind::Negative)
  } else {
    None
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Body of `POST /submitFeedback`, field names as the kiosk sends them.
///
/// Deserialisation is loose: `null` is accepted anywhere, scalar values are
/// accepted for text fields, and `hourOfDay` may arrive as a number or a
/// numeric string. Only a structurally wrong body (an object where text is
/// expected, a non-object body) is refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
  /// Feedback module, e.g. `"washroom"`.
  #[serde(default, deserialize_with = "loose::text")]
  pub solution:           Option<String>,
  #[serde(default, deserialize_with = "loose::text")]
  pub rating:             Option<String>,
  #[serde(default, deserialize_with = "loose::text_list")]
  pub reasons:            Vec<String>,
  #[serde(default, rename = "additionalComment", deserialize_with = "loose::text")]
  pub additional_comment: Option<String>,
  #[serde(default, deserialize_with = "loose::text")]
  pub device_id:          Option<String>,
  #[serde(default, deserialize_with = "loose::text")]
  pub location:           Option<String>,
  #[serde(default, rename = "washroomId", deserialize_with = "loose::text")]
  pub washroom_id:        Option<String>,
  /// Client user agent.
  #[serde(default, deserialize_with = "loose::text")]
  pub browser:            Option<String>,
  /// Unparseable values are dropped rather than refusing the record.
  #[serde(default, rename = "hourOfDay", deserialize_with = "loose::integer")]
  pub hour_of_day:        Option<i64>,
  #[serde(default, rename = "refId", deserialize_with = "loose::text")]
  pub ref_id:             Option<String>,
  /// Client-side capture time, stored verbatim.
  #[serde(default, deserialize_with = "loose::text")]
  pub timestamp:          Option<String>,
}

impl NewFeedback {
  /// The reference token, if one was supplied and is not blank.
  pub fn ref_id(&self) -> Option<RefId> { self.ref_id.as_deref().and_then(RefId::parse) }

  /// Replace a blank `refId` with `None` and trim a present one.
  pub fn normalized(mut self) -> Self {
    self.ref_id = self.ref_id().map(String::from);
    self
  }
}

/// Field deserialisers for kiosk bodies, which come from browsers and are
/// not always tidy.
mod loose {
  use serde::{Deserialize, Deserializer, de::Error as _};
  use serde_json::Value;

  fn scalar_text(value: Value) -> Result<Option<String>, String> {
    match value {
      Value::Null => Ok(None),
      Value::String(s) => Ok(Some(s)),
      v @ (Value::Number(_) | Value::Bool(_)) => Ok(Some(v.to_string())),
      other => Err(format!("expected text, found {other}")),
    }
  }

  pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    scalar_text(Value::deserialize(de)?).map_err(D::Error::custom)
  }

  /// `null` is an empty list; a lone scalar is a one-element list.
  pub fn text_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let items = match Value::deserialize(de)? {
      Value::Array(items) => items,
      other => vec![other],
    };
    let mut out = Vec::with_capacity(items.len());
    for item in items {
      if let Some(s) = scalar_text(item).map_err(D::Error::custom)? {
        out.push(s);
      }
    }
    Ok(out)
  }

  pub fn integer<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
    Ok(match Value::deserialize(de)? {
      Value::Number(n) => n
        .as_i64()
        .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
      Value::String(s) => {
        let s = s.trim();
        s.parse::<i64>()
          .ok()
          .or_else(|| s.parse::<f64>().ok().filter(|f| f.fract() == 0.0).map(|f| f as i64))
      }
      _ => None,
    })
  }
}

/// A persisted submission: the posted fields plus server-assigned identity and
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
  pub id:          Uuid,
  #[serde(flatten)]
  pub feedback:    NewFeedback,
  #[serde(rename = "recordedAt")]
  pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use serde_json::json;

  use super::*;

  #[test]
  fn very_poor_uses_spaced_name_on_the_wire() {
    assert_eq!(serde_json::to_string(&Rating::VeryPoor).unwrap(), "\"Very Poor\"");
    assert_eq!(Rating::VeryPoor.as_str(), "Very Poor");
    assert_eq!(Rating::from_str("very poor").unwrap(), Rating::VeryPoor);
  }

  #[test]
  fn reason_kind_classifies_vocabulary() {
    assert_eq!(reason_kind("Bad Odor"), Some(ReasonKind::Negative));
    assert_eq!(
      reason_kind("Loved the Hands-Free Operation"),
      Some(ReasonKind::Positive)
    );
    assert_eq!(reason_kind("Free pizza"), None);
    assert!(all_reasons().all(|r| reason_kind(r).is_some()));
    assert_eq!(all_reasons().count(), 9);
  }

  #[test]
  fn new_feedback_reads_kiosk_field_names() {
    let body = json!({
      "solution": "washroom",
      "rating": "Good",
      "reasons": ["Bad Odor"],
      "additionalComment": "mirror is cracked",
      "device_id": "Tablet01",
      "location": "Washroom 2",
      "washroomId": "wr-2",
      "browser": "kiosk/1.0",
      "hourOfDay": 14,
      "refId": "abc",
      "timestamp": "2025-09-10T14:03:00.000Z"
    });
    let fb: NewFeedback = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(fb.additional_comment.as_deref(), Some("mirror is cracked"));
    assert_eq!(fb.hour_of_day, Some(14));
    assert_eq!(serde_json::to_value(&fb).unwrap(), body);
  }

  #[test]
  fn loosely_typed_bodies_are_accepted() {
    let fb: NewFeedback = serde_json::from_value(json!({
      "rating": "Good",
      "reasons": null,
      "hourOfDay": "11",
      "device_id": 42,
      "refId": null
    }))
    .unwrap();
    assert!(fb.reasons.is_empty());
    assert_eq!(fb.hour_of_day, Some(11));
    assert_eq!(fb.device_id.as_deref(), Some("42"));
    assert_eq!(fb.ref_id, None);

    let fb: NewFeedback =
      serde_json::from_value(json!({ "hourOfDay": 11.0, "reasons": "Bad Odor" })).unwrap();
    assert_eq!(fb.hour_of_day, Some(11));
    assert_eq!(fb.reasons, vec!["Bad Odor".to_owned()]);

    let fb: NewFeedback =
      serde_json::from_value(json!({ "hourOfDay": "noon", "reasons": [null, "Bad Odor"] }))
        .unwrap();
    assert_eq!(fb.hour_of_day, None);
    assert_eq!(fb.reasons, vec!["Bad Odor".to_owned()]);
  }

  #[test]
  fn structured_values_in_text_fields_are_refused() {
    assert!(serde_json::from_value::<NewFeedback>(json!({ "rating": { "x": 1 } })).is_err());
    assert!(serde_json::from_value::<NewFeedback>(json!({ "reasons": [[1]] })).is_err());
  }

  #[test]
  fn normalized_drops_blank_ref_id() {
    let fb = NewFeedback {
      ref_id: Some("   ".into()),
      ..Default::default()
    };
    assert_eq!(fb.normalized().ref_id, None);

    let fb = NewFeedback {
      ref_id: Some(" abc ".into()),
      ..Default::default()
    };
    assert_eq!(fb.normalized().ref_id.as_deref(), Some("abc"));
  }
}
