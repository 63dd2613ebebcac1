//! SQL schema for the Sahay SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id TEXT NOT NULL UNIQUE,   -- opaque caller key (phone/email/handle)
    name        TEXT,
    language    TEXT NOT NULL DEFAULT 'en',
    created_at  TEXT NOT NULL           -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS vaccinations (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id           INTEGER NOT NULL REFERENCES users(id),
    vaccine_name      TEXT NOT NULL,
    dose_number       INTEGER,
    date_administered TEXT,             -- ISO date, may be a future due date
    notes             TEXT
);

-- Symptom events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS symptoms (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users(id),  -- NULL for the legacy global log
    symptom    TEXT NOT NULL,
    triage     TEXT NOT NULL,                 -- 'Routine' | 'Urgent' | 'Emergency'
    advice     TEXT NOT NULL,                 -- banner-prefixed advice text
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS chats (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    INTEGER REFERENCES users(id),
    role       TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id        INTEGER NOT NULL REFERENCES users(id),
    filename       TEXT,
    extracted_text TEXT NOT NULL,
    sha256         TEXT NOT NULL,       -- hex digest of extracted_text
    created_at     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS vaccinations_user_idx ON vaccinations(user_id);
CREATE INDEX IF NOT EXISTS symptoms_user_idx     ON symptoms(user_id);
CREATE INDEX IF NOT EXISTS chats_user_idx        ON chats(user_id);
CREATE INDEX IF NOT EXISTS reports_user_idx      ON reports(user_id);

PRAGMA user_version = 1;
";
