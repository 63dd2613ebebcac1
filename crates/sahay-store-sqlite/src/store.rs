//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use sahay_core::{
  record::{
    ChatMessage, MedicalReport, NewChatMessage, NewMedicalReport, NewSymptomEvent,
    NewVaccination, SymptomEvent, UserProfile, VaccinationRecord,
  },
  store::{HistoryScope, RecordStore},
};

use crate::{
  encode::{
    RawChatMessage, RawReport, RawSymptomEvent, RawUser, RawVaccination, encode_date,
    encode_dt, encode_role, encode_triage,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sahay record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
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

  /// Open an in-memory store — useful for testing.
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
}

/// Resolve an external user id to its row id, creating the user row on first
/// reference. Runs inside the connection thread.
fn ensure_user(
  conn: &rusqlite::Connection,
  external_id: &str,
  now: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO users (external_id, created_at) VALUES (?1, ?2)
     ON CONFLICT(external_id) DO NOTHING",
    rusqlite::params![external_id, now],
  )?;
  conn.query_row(
    "SELECT id FROM users WHERE external_id = ?1",
    rusqlite::params![external_id],
    |r| r.get(0),
  )
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── Symptom log — append-only ─────────────────────────────────────────────

  async fn append_symptom_event(&self, input: NewSymptomEvent) -> Result<SymptomEvent> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let user_id    = input.user_id.clone();
    let symptom    = input.symptom.clone();
    let triage     = encode_triage(input.triage).to_owned();
    let advice     = input.advice.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let user_row = user_id
          .as_deref()
          .map(|u| ensure_user(conn, u, &at_str))
          .transpose()?;
        conn.execute(
          "INSERT INTO symptoms (user_id, symptom, triage, advice, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_row, symptom, triage, advice, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(SymptomEvent {
      id,
      user_id: input.user_id,
      symptom: input.symptom,
      triage: input.triage,
      advice: input.advice,
      created_at,
    })
  }

  async fn symptom_history(&self, scope: HistoryScope) -> Result<Vec<SymptomEvent>> {
    let raws: Vec<RawSymptomEvent> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawSymptomEvent {
            id:         row.get(0)?,
            user_id:    row.get(1)?,
            symptom:    row.get(2)?,
            triage:     row.get(3)?,
            advice:     row.get(4)?,
            created_at: row.get(5)?,
          })
        };

        let rows = match scope {
          HistoryScope::Global => {
            let mut stmt = conn.prepare(
              "SELECT s.id, u.external_id, s.symptom, s.triage, s.advice, s.created_at
               FROM symptoms s
               LEFT JOIN users u ON u.id = s.user_id
               ORDER BY s.id DESC",
            )?;
            let rows = stmt
              .query_map([], map_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
          HistoryScope::User(user) => {
            let mut stmt = conn.prepare(
              "SELECT s.id, u.external_id, s.symptom, s.triage, s.advice, s.created_at
               FROM symptoms s
               JOIN users u ON u.id = s.user_id
               WHERE u.external_id = ?1
               ORDER BY s.id DESC",
            )?;
            let rows = stmt
              .query_map(rusqlite::params![user], map_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSymptomEvent::into_event).collect()
  }

  // ── Vaccinations ──────────────────────────────────────────────────────────

  async fn due_vaccinations<'a>(&'a self, user: &'a str) -> Result<Vec<VaccinationRecord>> {
    let user = user.to_owned();

    let raws: Vec<RawVaccination> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT v.id, u.external_id, v.vaccine_name, v.dose_number,
                  v.date_administered, v.notes
           FROM vaccinations v
           JOIN users u ON u.id = v.user_id
           WHERE u.external_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawVaccination {
              id:                row.get(0)?,
              user_id:           row.get(1)?,
              vaccine_name:      row.get(2)?,
              dose_number:       row.get(3)?,
              date_administered: row.get(4)?,
              notes:             row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawVaccination::into_record).collect()
  }

  async fn add_vaccination(&self, input: NewVaccination) -> Result<VaccinationRecord> {
    let now_str  = encode_dt(Utc::now());
    let user     = input.user_id.clone();
    let vaccine  = input.vaccine_name.clone();
    let dose     = input.dose_number.map(|n| n as i64);
    let date_str = input.date_administered.map(encode_date);
    let notes    = input.notes.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let user_row = ensure_user(conn, &user, &now_str)?;
        conn.execute(
          "INSERT INTO vaccinations (user_id, vaccine_name, dose_number, date_administered, notes)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_row, vaccine, dose, date_str, notes],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(VaccinationRecord {
      id,
      user_id: input.user_id,
      vaccine_name: input.vaccine_name,
      dose_number: input.dose_number,
      date_administered: input.date_administered,
      notes: input.notes,
    })
  }

  // ── Chat transcript ───────────────────────────────────────────────────────

  async fn append_chat(&self, input: NewChatMessage) -> Result<ChatMessage> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let user_id    = input.user_id.clone();
    let role       = encode_role(input.role).to_owned();
    let message    = input.message.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let user_row = user_id
          .as_deref()
          .map(|u| ensure_user(conn, u, &at_str))
          .transpose()?;
        conn.execute(
          "INSERT INTO chats (user_id, role, message, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![user_row, role, message, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(ChatMessage {
      id,
      user_id: input.user_id,
      role: input.role,
      message: input.message,
      created_at,
    })
  }

  async fn chat_transcript(&self, scope: HistoryScope) -> Result<Vec<ChatMessage>> {
    let raws: Vec<RawChatMessage> = self
      .conn
      .call(move |conn| {
        let map_row = |row: &rusqlite::Row<'_>| {
          Ok(RawChatMessage {
            id:         row.get(0)?,
            user_id:    row.get(1)?,
            role:       row.get(2)?,
            message:    row.get(3)?,
            created_at: row.get(4)?,
          })
        };

        let rows = match scope {
          HistoryScope::Global => {
            let mut stmt = conn.prepare(
              "SELECT c.id, u.external_id, c.role, c.message, c.created_at
               FROM chats c
               LEFT JOIN users u ON u.id = c.user_id
               ORDER BY c.id ASC",
            )?;
            let rows = stmt
              .query_map([], map_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
          HistoryScope::User(user) => {
            let mut stmt = conn.prepare(
              "SELECT c.id, u.external_id, c.role, c.message, c.created_at
               FROM chats c
               JOIN users u ON u.id = c.user_id
               WHERE u.external_id = ?1
               ORDER BY c.id ASC",
            )?;
            let rows = stmt
              .query_map(rusqlite::params![user], map_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
          }
        };
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawChatMessage::into_message).collect()
  }

  // ── Medical reports ───────────────────────────────────────────────────────

  async fn store_report(&self, input: NewMedicalReport) -> Result<MedicalReport> {
    let created_at = Utc::now();
    let at_str     = encode_dt(created_at);
    let user       = input.user_id.clone();
    let filename   = input.filename.clone();
    let text       = input.extracted_text.clone();
    let sha256     = input.sha256.clone();

    let id: i64 = self
      .conn
      .call(move |conn| {
        let user_row = ensure_user(conn, &user, &at_str)?;
        conn.execute(
          "INSERT INTO reports (user_id, filename, extracted_text, sha256, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![user_row, filename, text, sha256, at_str],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(MedicalReport {
      id,
      user_id: input.user_id,
      filename: input.filename,
      extracted_text: input.extracted_text,
      sha256: input.sha256,
      created_at,
    })
  }

  async fn reports_for<'a>(&'a self, user: &'a str) -> Result<Vec<MedicalReport>> {
    let user = user.to_owned();

    let raws: Vec<RawReport> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT r.id, u.external_id, r.filename, r.extracted_text, r.sha256, r.created_at
           FROM reports r
           JOIN users u ON u.id = r.user_id
           WHERE u.external_id = ?1
           ORDER BY r.id ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user], |row| {
            Ok(RawReport {
              id:             row.get(0)?,
              user_id:        row.get(1)?,
              filename:       row.get(2)?,
              extracted_text: row.get(3)?,
              sha256:         row.get(4)?,
              created_at:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawReport::into_report).collect()
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn upsert_user<'a>(
    &'a self,
    external_id: &'a str,
    name: Option<&'a str>,
    language: Option<&'a str>,
  ) -> Result<UserProfile> {
    let external_id = external_id.to_owned();
    let name        = name.map(str::to_owned);
    let language    = language.map(str::to_owned);
    let now_str     = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        let user_row = ensure_user(conn, &external_id, &now_str)?;
        if let Some(name) = &name {
          conn.execute(
            "UPDATE users SET name = ?1 WHERE id = ?2",
            rusqlite::params![name, user_row],
          )?;
        }
        if let Some(language) = &language {
          conn.execute(
            "UPDATE users SET language = ?1 WHERE id = ?2",
            rusqlite::params![language, user_row],
          )?;
        }
        let raw = conn.query_row(
          "SELECT id, external_id, name, language, created_at FROM users WHERE id = ?1",
          rusqlite::params![user_row],
          |row| {
            Ok(RawUser {
              id:          row.get(0)?,
              external_id: row.get(1)?,
              name:        row.get(2)?,
              language:    row.get(3)?,
              created_at:  row.get(4)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_profile()
  }

  async fn get_user<'a>(&'a self, external_id: &'a str) -> Result<Option<UserProfile>> {
    let external_id = external_id.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, external_id, name, language, created_at
               FROM users WHERE external_id = ?1",
              rusqlite::params![external_id],
              |row| {
                Ok(RawUser {
                  id:          row.get(0)?,
                  external_id: row.get(1)?,
                  name:        row.get(2)?,
                  language:    row.get(3)?,
                  created_at:  row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_profile).transpose()
  }
}
