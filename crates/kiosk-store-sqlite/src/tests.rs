//! Integration tests for `SqliteStore` against an in-memory database.

use kiosk_core::{feedback::NewFeedback, store::FeedbackStore};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn sample() -> NewFeedback {
  NewFeedback {
    solution:           Some("washroom".into()),
    rating:             Some("Poor".into()),
    reasons:            vec!["Bad Odor".into(), "Floor not Clean".into()],
    additional_comment: Some("tap leaking".into()),
    device_id:          Some("Tablet01".into()),
    location:           Some("Washroom 2".into()),
    washroom_id:        Some("wr-2".into()),
    browser:            Some("kiosk-cli/0.1.0".into()),
    hour_of_day:        Some(9),
    ref_id:             Some("f191ad30-8d33-11f0-a3de-c32ceae4fb5a".into()),
    timestamp:          Some("2025-09-10T09:12:00.000Z".into()),
  }
}

#[tokio::test]
async fn insert_and_get_round_trips_every_field() {
  let s = store().await;

  let stored = s.insert_feedback(sample()).await.unwrap();
  assert_eq!(stored.feedback, sample());

  let fetched = s.get_feedback(stored.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, stored.id);
  assert_eq!(fetched.feedback, sample());
  // RFC 3339 keeps sub-second precision, so the timestamp survives exactly.
  assert_eq!(fetched.recorded_at, stored.recorded_at);
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get_feedback(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn null_ref_id_and_empty_reasons_are_preserved() {
  let s = store().await;
  let input = NewFeedback {
    rating: Some("Okay".into()),
    ..Default::default()
  };

  let stored = s.insert_feedback(input.clone()).await.unwrap();
  let fetched = s.get_feedback(stored.id).await.unwrap().unwrap();
  assert_eq!(fetched.feedback.ref_id, None);
  assert!(fetched.feedback.reasons.is_empty());
  assert_eq!(fetched.feedback, input);
}

#[tokio::test]
async fn each_insert_gets_a_fresh_id() {
  let s = store().await;
  let a = s.insert_feedback(sample()).await.unwrap();
  let b = s.insert_feedback(sample()).await.unwrap();
  assert_ne!(a.id, b.id);
  assert!(s.get_feedback(a.id).await.unwrap().is_some());
  assert!(s.get_feedback(b.id).await.unwrap().is_some());
}

#[tokio::test]
async fn reopening_a_file_store_keeps_records() {
  let path = std::env::temp_dir().join(format!("kiosk-store-{}.db", Uuid::new_v4()));

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_feedback(sample()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let fetched = s.get_feedback(id).await.unwrap();
  assert!(fetched.is_some());

  drop(s);
  let _ = std::fs::remove_file(&path);
}
