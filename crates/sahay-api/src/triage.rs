//! Handler for the `/triage` endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Deserialize;

use sahay_core::{oracle::AdviceOracle, session::SessionContext, store::RecordStore};
use sahay_engine::TriageService;

use crate::error::ApiError;

/// JSON body accepted by `POST /triage`.
#[derive(Debug, Deserialize)]
pub struct TriageBody {
  /// Opaque user key; omit for an anonymous (ungrouped) submission.
  pub user_id: Option<String>,
  pub symptom: String,
}

/// `POST /triage` — run the full pipeline for one symptom submission.
///
/// Returns 200 with the [`sahay_engine::TriageReport`], or 204 when the
/// symptom text is empty or whitespace-only (a no-op, not an error).
pub async fn submit<S, O>(
  State(service): State<Arc<TriageService<S, O>>>,
  Json(body): Json<TriageBody>,
) -> Result<Response, ApiError>
where
  S: RecordStore,
  O: AdviceOracle,
{
  let mut session = SessionContext::new(body.user_id);
  match service.handle_symptom(&mut session, &body.symptom).await? {
    Some(report) => Ok((StatusCode::OK, Json(report)).into_response()),
    None => Ok(StatusCode::NO_CONTENT.into_response()),
  }
}
