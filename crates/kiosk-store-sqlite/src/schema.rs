//! SQL schema for the feedback store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS feedback (
    feedback_id        TEXT PRIMARY KEY,
    recorded_at        TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    solution           TEXT,
    rating             TEXT,
    reasons            TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    additional_comment TEXT,
    device_id          TEXT,
    location           TEXT,
    washroom_id        TEXT,
    browser            TEXT,
    hour_of_day        INTEGER,
    ref_id             TEXT,
    client_timestamp   TEXT             -- verbatim from the kiosk
);

CREATE INDEX IF NOT EXISTS feedback_recorded_idx ON feedback(recorded_at);
CREATE INDEX IF NOT EXISTS feedback_ref_idx      ON feedback(ref_id);

PRAGMA user_version = 1;
";
