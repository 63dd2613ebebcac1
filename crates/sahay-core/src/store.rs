//! The `RecordStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `sahay-store-sqlite`).
//! Higher layers (`sahay-engine`, `sahay-api`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::record::{
  ChatMessage, MedicalReport, NewChatMessage, NewMedicalReport, NewSymptomEvent,
  NewVaccination, SymptomEvent, UserProfile, VaccinationRecord,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Which slice of the log a history read covers.
///
/// `Global` is the whole ungrouped log; `User` restricts the read to rows
/// attributed to one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryScope {
  Global,
  User(String),
}

impl HistoryScope {
  pub fn user(id: impl Into<String>) -> Self {
    Self::User(id.into())
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the Sahay record store backend.
///
/// The symptom log is append-only: no update or delete operation exists on
/// it. Every write is immediately durable — one statement batch per call,
/// no cross-call transactions — so concurrent sessions cannot interleave
/// partial rows.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Symptom log — append-only ─────────────────────────────────────────

  /// Append one symptom event and return the stored row.
  /// `id` and `created_at` are set by the store. Never silently drops data:
  /// either the row is durable or an error is returned.
  fn append_symptom_event(
    &self,
    input: NewSymptomEvent,
  ) -> impl Future<Output = Result<SymptomEvent, Self::Error>> + Send + '_;

  /// Events most-recent-first, globally or scoped to one user.
  fn symptom_history(
    &self,
    scope: HistoryScope,
  ) -> impl Future<Output = Result<Vec<SymptomEvent>, Self::Error>> + Send + '_;

  // ── Vaccinations ──────────────────────────────────────────────────────

  /// All vaccination rows for `user`, order unspecified.
  fn due_vaccinations<'a>(
    &'a self,
    user: &'a str,
  ) -> impl Future<Output = Result<Vec<VaccinationRecord>, Self::Error>> + Send + 'a;

  /// Enrollment write-through. The referenced user is created implicitly.
  fn add_vaccination(
    &self,
    input: NewVaccination,
  ) -> impl Future<Output = Result<VaccinationRecord, Self::Error>> + Send + '_;

  // ── Chat transcript ───────────────────────────────────────────────────

  /// Append one transcript row.
  fn append_chat(
    &self,
    input: NewChatMessage,
  ) -> impl Future<Output = Result<ChatMessage, Self::Error>> + Send + '_;

  /// Transcript rows oldest-first.
  fn chat_transcript(
    &self,
    scope: HistoryScope,
  ) -> impl Future<Output = Result<Vec<ChatMessage>, Self::Error>> + Send + '_;

  // ── Medical reports ───────────────────────────────────────────────────

  /// Store one extracted report together with its content digest.
  fn store_report(
    &self,
    input: NewMedicalReport,
  ) -> impl Future<Output = Result<MedicalReport, Self::Error>> + Send + '_;

  /// All reports for `user`, oldest-first.
  fn reports_for<'a>(
    &'a self,
    user: &'a str,
  ) -> impl Future<Output = Result<Vec<MedicalReport>, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create or update a user profile. `None` fields leave existing values
  /// untouched.
  fn upsert_user<'a>(
    &'a self,
    external_id: &'a str,
    name: Option<&'a str>,
    language: Option<&'a str>,
  ) -> impl Future<Output = Result<UserProfile, Self::Error>> + Send + 'a;

  /// Fetch a user by external id. `None` if never referenced.
  fn get_user<'a>(
    &'a self,
    external_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + 'a;
}
