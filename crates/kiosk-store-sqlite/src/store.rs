//! [`SqliteStore`] is the SQLite implementation of [`FeedbackStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use kiosk_core::{
  feedback::{FeedbackRecord, NewFeedback},
  store::FeedbackStore,
};

use crate::{
  Error, Result,
  encode::{FEEDBACK_COLUMNS, RawFeedback, encode_dt, encode_reasons, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A feedback store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`FeedbackRecord`] into the `feedback` table.
  async fn insert_record(&self, record: &FeedbackRecord) -> Result<()> {
    let fb = &record.feedback;
    let id_str             = encode_uuid(record.id);
    let recorded_at_str    = encode_dt(record.recorded_at);
    let reasons_str        = encode_reasons(&fb.reasons)?;
    let solution           = fb.solution.clone();
    let rating             = fb.rating.clone();
    let additional_comment = fb.additional_comment.clone();
    let device_id          = fb.device_id.clone();
    let location           = fb.location.clone();
    let washroom_id        = fb.washroom_id.clone();
    let browser            = fb.browser.clone();
    let hour_of_day        = fb.hour_of_day;
    let ref_id             = fb.ref_id.clone();
    let client_timestamp   = fb.timestamp.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO feedback (
             feedback_id, recorded_at, solution, rating, reasons,
             additional_comment, device_id, location, washroom_id,
             browser, hour_of_day, ref_id, client_timestamp
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            recorded_at_str,
            solution,
            rating,
            reasons_str,
            additional_comment,
            device_id,
            location,
            washroom_id,
            browser,
            hour_of_day,
            ref_id,
            client_timestamp,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FeedbackStore impl ──────────────────────────────────────────────────────

impl FeedbackStore for SqliteStore {
  type Error = Error;

  async fn insert_feedback(&self, input: NewFeedback) -> Result<FeedbackRecord> {
    let record = FeedbackRecord {
      id:          Uuid::new_v4(),
      feedback:    input,
      recorded_at: Utc::now(),
    };

    self.insert_record(&record).await?;
    tracing::debug!(id = %record.id, "feedback stored");
    Ok(record)
  }

  async fn get_feedback(&self, id: Uuid) -> Result<Option<FeedbackRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawFeedback> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {FEEDBACK_COLUMNS} FROM feedback WHERE feedback_id = ?1"),
              rusqlite::params![id_str],
              RawFeedback::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFeedback::into_record).transpose()
  }
}
