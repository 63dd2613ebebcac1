//! Persisted record types — the fundamental units of the Sahay store.
//!
//! Symptom events are immutable once written: the log is append-only and no
//! update or delete is ever issued against it. Event ids are assigned by the
//! store and are strictly increasing in insertion order.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::triage::TriageLevel;

// ─── Users ───────────────────────────────────────────────────────────────────

/// A registered user. Created implicitly the first time any write names an
/// external id — there is no explicit enrollment step for users themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  /// Store-assigned row id.
  pub id:          i64,
  /// Opaque caller-supplied identity (phone, email, handle). Never parsed.
  pub external_id: String,
  pub name:        Option<String>,
  pub language:    String,
  pub created_at:  DateTime<Utc>,
}

// ─── Symptom events ──────────────────────────────────────────────────────────

/// One immutable logged record of a triage request and its outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomEvent {
  /// Strictly increasing; assigned by the store.
  pub id:         i64,
  /// Absent for legacy ungrouped entries in the global log.
  pub user_id:    Option<String>,
  /// The original symptom text exactly as submitted.
  pub symptom:    String,
  pub triage:     TriageLevel,
  /// Banner-prefixed advice text as shown to the user.
  pub advice:     String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::append_symptom_event`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewSymptomEvent {
  pub user_id: Option<String>,
  pub symptom: String,
  pub triage:  TriageLevel,
  pub advice:  String,
}

// ─── Vaccinations ────────────────────────────────────────────────────────────

/// A vaccination entry. Duplicates of (user, vaccine, dose) are tolerated;
/// the due-list is a plain filtered read, not a deduplicated view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaccinationRecord {
  pub id:                i64,
  pub user_id:           String,
  pub vaccine_name:      String,
  pub dose_number:       Option<u32>,
  pub date_administered: Option<NaiveDate>,
  pub notes:             Option<String>,
}

/// Input to [`crate::store::RecordStore::add_vaccination`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewVaccination {
  pub user_id:           String,
  pub vaccine_name:      String,
  pub dose_number:       Option<u32>,
  pub date_administered: Option<NaiveDate>,
  pub notes:             Option<String>,
}

impl NewVaccination {
  /// Convenience constructor with all optional fields unset.
  pub fn new(user_id: impl Into<String>, vaccine_name: impl Into<String>) -> Self {
    Self {
      user_id:           user_id.into(),
      vaccine_name:      vaccine_name.into(),
      dose_number:       None,
      date_administered: None,
      notes:             None,
    }
  }
}

// ─── Chat transcript ─────────────────────────────────────────────────────────

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  User,
  Assistant,
}

/// One durable transcript row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
  pub id:         i64,
  pub user_id:    Option<String>,
  pub role:       ChatRole,
  pub message:    String,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::append_chat`].
#[derive(Debug, Clone)]
pub struct NewChatMessage {
  pub user_id: Option<String>,
  pub role:    ChatRole,
  pub message: String,
}

// ─── Medical reports ─────────────────────────────────────────────────────────

/// Plain text extracted from an uploaded document by an external collaborator.
/// The core never parses the text; it only stores it together with a SHA-256
/// digest computed at ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalReport {
  pub id:             i64,
  pub user_id:        String,
  pub filename:       Option<String>,
  pub extracted_text: String,
  /// Lowercase hex SHA-256 of `extracted_text`.
  pub sha256:         String,
  pub created_at:     DateTime<Utc>,
}

/// Input to [`crate::store::RecordStore::store_report`].
#[derive(Debug, Clone)]
pub struct NewMedicalReport {
  pub user_id:        String,
  pub filename:       Option<String>,
  pub extracted_text: String,
  pub sha256:         String,
}

// ─── Health record export ────────────────────────────────────────────────────

/// Everything known about one user, gathered for export. A data-only bundle;
/// rendering lives in [`crate::present`].
#[derive(Debug, Clone, Serialize)]
pub struct HealthRecordExport {
  pub user:       UserProfile,
  pub transcript: Vec<ChatMessage>,
  pub events:     Vec<SymptomEvent>,
  pub reports:    Vec<MedicalReport>,
}
