//! JSON REST API for Sahay.
//!
//! Exposes an axum [`Router`] backed by any [`TriageService`]. The engine is
//! equally callable in-process; this layer only maps HTTP to service calls.
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sahay_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod records;
pub mod triage;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use serde::Deserialize;

use sahay_core::{oracle::AdviceOracle, store::RecordStore};
use sahay_engine::{TriageService, oracle::OracleConfig};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub db_path:         PathBuf,
  #[serde(default = "default_guidelines_path")]
  pub guidelines_path: PathBuf,
  pub oracle:          OracleConfig,
}

fn default_guidelines_path() -> PathBuf {
  PathBuf::from("guidelines.json")
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, O>(service: Arc<TriageService<S, O>>) -> Router<()>
where
  S: RecordStore + 'static,
  O: AdviceOracle + 'static,
{
  Router::new()
    // Triage
    .route("/triage", post(triage::submit::<S, O>))
    // Records
    .route("/history", get(records::history::<S, O>))
    .route("/chats", get(records::chats::<S, O>))
    .route("/vaccinations", post(records::enroll::<S, O>))
    .route("/vaccinations/{user}", get(records::due_vaccinations::<S, O>))
    .route("/reports", post(records::attach_report::<S, O>))
    .route("/export/{user}", get(records::export::<S, O>))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use sahay_core::{guideline::GuidelineStore, knowledge::KnowledgeGraph};
  use sahay_store_sqlite::SqliteStore;
  use thiserror::Error;
  use tower::ServiceExt as _;

  #[derive(Debug, Error)]
  #[error("oracle down")]
  struct Fault;

  /// Fixed-reply oracle for router tests.
  struct FixedOracle(&'static str);

  impl AdviceOracle for FixedOracle {
    type Error = Fault;

    async fn generate(&self, _prompt: &str) -> Result<String, Fault> {
      Ok(self.0.to_string())
    }
  }

  async fn router_with(reply: &'static str) -> Router<()> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let service = TriageService::new(
      store,
      FixedOracle(reply),
      Arc::new(GuidelineStore::empty()),
      Arc::new(KnowledgeGraph::builtin()),
    );
    api_router(Arc::new(service))
  }

  async fn post_json(router: Router<()>, uri: &str, body: serde_json::Value) -> axum::response::Response {
    let req = Request::builder()
      .method("POST")
      .uri(uri)
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap();
    router.oneshot(req).await.unwrap()
  }

  async fn get_uri(router: Router<()>, uri: &str) -> axum::response::Response {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn triage_roundtrip_returns_report() {
    let router = router_with("Visit a doctor soon for evaluation").await;

    let resp = post_json(
      router,
      "/triage",
      serde_json::json!({ "user_id": "u1", "symptom": "fever and cough" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["level"], "Urgent");
    assert!(body["advice"].as_str().unwrap().starts_with("🟡 Moderate:"));
    assert!(body["event_id"].as_i64().unwrap() > 0);
  }

  #[tokio::test]
  async fn empty_symptom_is_204() {
    let router = router_with("anything").await;

    let resp = post_json(
      router,
      "/triage",
      serde_json::json!({ "symptom": "   " }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
  }

  #[tokio::test]
  async fn history_reflects_submissions() {
    let router = router_with("Rest at home.").await;

    let resp = post_json(
      router.clone(),
      "/triage",
      serde_json::json!({ "user_id": "u1", "symptom": "cough" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = get_uri(router, "/history?user_id=u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["symptom"], "cough");
    assert_eq!(body[0]["triage"], "Routine");
  }

  #[tokio::test]
  async fn vaccination_enroll_and_due_list() {
    let router = router_with("x").await;

    let resp = post_json(
      router.clone(),
      "/vaccinations",
      serde_json::json!({ "user_id": "u1", "vaccine_name": "MMR" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = get_uri(router, "/vaccinations/u1").await;
    let body = json_body(resp).await;
    assert_eq!(body[0]["vaccine_name"], "MMR");
  }

  #[tokio::test]
  async fn export_for_unknown_user_is_404() {
    let router = router_with("x").await;
    let resp = get_uri(router, "/export/nobody").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn report_upload_returns_digest() {
    let router = router_with("x").await;

    let resp = post_json(
      router,
      "/reports",
      serde_json::json!({ "user_id": "u1", "extracted_text": "Hemoglobin 11.2" }),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["sha256"].as_str().unwrap().len(), 64);
  }
}
