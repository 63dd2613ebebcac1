//! Handlers for the record query and enrollment endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/history` | optional `?user_id=`; global log when omitted |
//! | `GET`  | `/chats` | optional `?user_id=`; oldest-first transcript |
//! | `GET`  | `/vaccinations/{user}` | due-list, order unspecified |
//! | `POST` | `/vaccinations` | enrollment write-through; returns 201 |
//! | `POST` | `/reports` | store an extracted report; returns 201 |
//! | `GET`  | `/export/{user}` | plain-text health record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use sahay_core::{
  oracle::AdviceOracle,
  present,
  record::{ChatMessage, NewVaccination, SymptomEvent, VaccinationRecord},
  store::{HistoryScope, RecordStore},
};
use sahay_engine::TriageService;

use crate::error::ApiError;

// ─── Scope params ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScopeParams {
  /// When absent, the legacy global view is returned.
  pub user_id: Option<String>,
}

impl ScopeParams {
  fn into_scope(self) -> HistoryScope {
    match self.user_id {
      Some(user) => HistoryScope::User(user),
      None => HistoryScope::Global,
    }
  }
}

// ─── Symptom history ──────────────────────────────────────────────────────────

/// `GET /history[?user_id=<id>]` — most-recent-first.
pub async fn history<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Query(params): Query<ScopeParams>,
) -> Result<Json<Vec<SymptomEvent>>, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  Ok(Json(service.symptom_history(params.into_scope()).await?))
}

// ─── Chat transcript ──────────────────────────────────────────────────────────

/// `GET /chats[?user_id=<id>]` — oldest-first.
pub async fn chats<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Query(params): Query<ScopeParams>,
) -> Result<Json<Vec<ChatMessage>>, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  Ok(Json(service.chat_transcript(params.into_scope()).await?))
}

// ─── Vaccinations ─────────────────────────────────────────────────────────────

/// `GET /vaccinations/{user}`
pub async fn due_vaccinations<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Path(user): Path<String>,
) -> Result<Json<Vec<VaccinationRecord>>, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  Ok(Json(service.due_vaccinations(&user).await?))
}

/// `POST /vaccinations` — body: [`NewVaccination`]; returns 201 + stored row.
pub async fn enroll<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Json(body): Json<NewVaccination>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  let record = service.enroll_vaccination(body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Medical reports ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /reports`. `extracted_text` comes from the
/// external PDF extractor; the core only stores and hashes it.
#[derive(Debug, Deserialize)]
pub struct ReportBody {
  pub user_id:        String,
  pub filename:       Option<String>,
  pub extracted_text: String,
}

/// `POST /reports` — returns 201 + the stored [`MedicalReport`].
pub async fn attach_report<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Json(body): Json<ReportBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  let report = service
    .attach_report(&body.user_id, body.filename, body.extracted_text)
    .await?;
  Ok((StatusCode::CREATED, Json(report)))
}

// ─── Health record export ─────────────────────────────────────────────────────

/// `GET /export/{user}` — the rendered plain-text health record.
pub async fn export<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Path(user): Path<String>,
) -> Result<String, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  let export = service
    .export_health_record(&user)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {user} not found")))?;
  Ok(present::render_health_record(&export))
}
