//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! triage levels and chat roles as their canonical string forms.

use chrono::{DateTime, NaiveDate, Utc};
use sahay_core::{
  record::{ChatMessage, ChatRole, MedicalReport, SymptomEvent, UserProfile, VaccinationRecord},
  triage::TriageLevel,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String {
  d.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

// ─── TriageLevel ─────────────────────────────────────────────────────────────

pub fn encode_triage(level: TriageLevel) -> &'static str {
  level.as_str()
}

pub fn decode_triage(s: &str) -> Result<TriageLevel> {
  Ok(TriageLevel::parse(s)?)
}

// ─── ChatRole ────────────────────────────────────────────────────────────────

pub fn encode_role(role: ChatRole) -> &'static str {
  match role {
    ChatRole::User => "user",
    ChatRole::Assistant => "assistant",
  }
}

pub fn decode_role(s: &str) -> Result<ChatRole> {
  match s {
    "user" => Ok(ChatRole::User),
    "assistant" => Ok(ChatRole::Assistant),
    other => Err(Error::Core(sahay_core::Error::UnknownChatRole(
      other.to_string(),
    ))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read from a `symptoms` row joined with `users`.
pub struct RawSymptomEvent {
  pub id:         i64,
  pub user_id:    Option<String>,
  pub symptom:    String,
  pub triage:     String,
  pub advice:     String,
  pub created_at: String,
}

impl RawSymptomEvent {
  pub fn into_event(self) -> Result<SymptomEvent> {
    Ok(SymptomEvent {
      id:         self.id,
      user_id:    self.user_id,
      symptom:    self.symptom,
      triage:     decode_triage(&self.triage)?,
      advice:     self.advice,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `vaccinations` row joined with `users`.
pub struct RawVaccination {
  pub id:                i64,
  pub user_id:           String,
  pub vaccine_name:      String,
  pub dose_number:       Option<i64>,
  pub date_administered: Option<String>,
  pub notes:             Option<String>,
}

impl RawVaccination {
  pub fn into_record(self) -> Result<VaccinationRecord> {
    Ok(VaccinationRecord {
      id:                self.id,
      user_id:           self.user_id,
      vaccine_name:      self.vaccine_name,
      dose_number:       self.dose_number.map(|n| n as u32),
      date_administered: self
        .date_administered
        .as_deref()
        .map(decode_date)
        .transpose()?,
      notes:             self.notes,
    })
  }
}

/// Raw strings read from a `chats` row joined with `users`.
pub struct RawChatMessage {
  pub id:         i64,
  pub user_id:    Option<String>,
  pub role:       String,
  pub message:    String,
  pub created_at: String,
}

impl RawChatMessage {
  pub fn into_message(self) -> Result<ChatMessage> {
    Ok(ChatMessage {
      id:         self.id,
      user_id:    self.user_id,
      role:       decode_role(&self.role)?,
      message:    self.message,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `reports` row joined with `users`.
pub struct RawReport {
  pub id:             i64,
  pub user_id:        String,
  pub filename:       Option<String>,
  pub extracted_text: String,
  pub sha256:         String,
  pub created_at:     String,
}

impl RawReport {
  pub fn into_report(self) -> Result<MedicalReport> {
    Ok(MedicalReport {
      id:             self.id,
      user_id:        self.user_id,
      filename:       self.filename,
      extracted_text: self.extracted_text,
      sha256:         self.sha256,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `users` row.
pub struct RawUser {
  pub id:          i64,
  pub external_id: String,
  pub name:        Option<String>,
  pub language:    String,
  pub created_at:  String,
}

impl RawUser {
  pub fn into_profile(self) -> Result<UserProfile> {
    Ok(UserProfile {
      id:          self.id,
      external_id: self.external_id,
      name:        self.name,
      language:    self.language,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
