//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, UUIDs as hyphenated lowercase
//! strings, reason lists as compact JSON arrays.

use chrono::{DateTime, Utc};
use kiosk_core::feedback::{FeedbackRecord, NewFeedback};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Reasons ──────────────────────────────────────────────────────────────────

pub fn encode_reasons(reasons: &[String]) -> Result<String> {
  Ok(serde_json::to_string(reasons)?)
}

pub fn decode_reasons(s: &str) -> Result<Vec<String>> { Ok(serde_json::from_str(s)?) }

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// Raw column values read directly from a `feedback` row.
pub struct RawFeedback {
  pub feedback_id:        String,
  pub recorded_at:        String,
  pub solution:           Option<String>,
  pub rating:             Option<String>,
  pub reasons:            String,
  pub additional_comment: Option<String>,
  pub device_id:          Option<String>,
  pub location:           Option<String>,
  pub washroom_id:        Option<String>,
  pub browser:            Option<String>,
  pub hour_of_day:        Option<i64>,
  pub ref_id:             Option<String>,
  pub client_timestamp:   Option<String>,
}

/// Column list matching [`RawFeedback::from_row`]'s indices.
pub const FEEDBACK_COLUMNS: &str = "feedback_id, recorded_at, solution, rating, reasons, \
   additional_comment, device_id, location, washroom_id, browser, hour_of_day, ref_id, \
   client_timestamp";

impl RawFeedback {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      feedback_id:        row.get(0)?,
      recorded_at:        row.get(1)?,
      solution:           row.get(2)?,
      rating:             row.get(3)?,
      reasons:            row.get(4)?,
      additional_comment: row.get(5)?,
      device_id:          row.get(6)?,
      location:           row.get(7)?,
      washroom_id:        row.get(8)?,
      browser:            row.get(9)?,
      hour_of_day:        row.get(10)?,
      ref_id:             row.get(11)?,
      client_timestamp:   row.get(12)?,
    })
  }

  pub fn into_record(self) -> Result<FeedbackRecord> {
    Ok(FeedbackRecord {
      id:          decode_uuid(&self.feedback_id)?,
      recorded_at: decode_dt(&self.recorded_at)?,
      feedback:    NewFeedback {
        solution:           self.solution,
        rating:             self.rating,
        reasons:            decode_reasons(&self.reasons)?,
        additional_comment: self.additional_comment,
        device_id:          self.device_id,
        location:           self.location,
        washroom_id:        self.washroom_id,
        browser:            self.browser,
        hour_of_day:        self.hour_of_day,
        ref_id:             self.ref_id,
        timestamp:          self.client_timestamp,
      },
    })
  }
}
