//! Pipeline tests for `TriageService` with an in-memory store and fake
//! oracles.

use std::{
  collections::HashSet,
  sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use sha2::{Digest, Sha256};
use thiserror::Error;

use sahay_core::{
  guideline::GuidelineStore,
  knowledge::KnowledgeGraph,
  oracle::{ADVICE_UNAVAILABLE, AdviceOracle},
  record::{ChatRole, NewVaccination},
  session::SessionContext,
  store::{HistoryScope, RecordStore},
  triage::TriageLevel,
};
use sahay_store_sqlite::SqliteStore;

use crate::TriageService;

// ─── Fake oracles ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
#[error("oracle down")]
struct Fault;

/// Replies with a fixed string; records call count and the last prompt.
#[derive(Clone)]
struct ScriptedOracle {
  reply:       String,
  calls:       Arc<AtomicUsize>,
  last_prompt: Arc<Mutex<Option<String>>>,
}

impl ScriptedOracle {
  fn new(reply: &str) -> Self {
    Self {
      reply:       reply.to_string(),
      calls:       Arc::new(AtomicUsize::new(0)),
      last_prompt: Arc::new(Mutex::new(None)),
    }
  }
}

impl AdviceOracle for ScriptedOracle {
  type Error = Fault;

  async fn generate(&self, prompt: &str) -> Result<String, Fault> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
    Ok(self.reply.clone())
  }
}

/// Always fails.
struct FailingOracle;

impl AdviceOracle for FailingOracle {
  type Error = Fault;

  async fn generate(&self, _prompt: &str) -> Result<String, Fault> {
    Err(Fault)
  }
}

/// Never answers within any reasonable test timeout.
struct StalledOracle;

impl AdviceOracle for StalledOracle {
  type Error = Fault;

  async fn generate(&self, _prompt: &str) -> Result<String, Fault> {
    tokio::time::sleep(Duration::from_secs(3600)).await;
    Ok("too late".to_string())
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn service<O: AdviceOracle>(oracle: O) -> TriageService<SqliteStore, O> {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let guidelines = GuidelineStore::from_entries([
    ("fever", "Check temperature and keep the patient hydrated."),
    ("cough", "Warm fluids; watch for breathing difficulty."),
  ]);
  TriageService::new(
    store,
    oracle,
    Arc::new(guidelines),
    Arc::new(KnowledgeGraph::builtin()),
  )
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn urgent_advice_gets_banner_and_is_logged() {
  let oracle = ScriptedOracle::new("Visit a doctor soon for evaluation");
  let svc = service(oracle.clone()).await;
  let mut session = SessionContext::new(Some("u1".into()));

  let report = svc
    .handle_symptom(&mut session, "I have a fever and cough")
    .await
    .unwrap()
    .expect("non-empty symptom produces a report");

  assert_eq!(report.level, TriageLevel::Urgent);
  assert_eq!(
    report.advice,
    "🟡 Moderate: Visit a doctor soon.\n\nVisit a doctor soon for evaluation"
  );
  assert!(report.oracle_error.is_none());
  // Not an exact canonical term, so no insight is attached.
  assert!(report.insight.is_none());

  let history = svc.symptom_history(HistoryScope::user("u1")).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].id, report.event_id);
  assert_eq!(history[0].symptom, "I have a fever and cough");
  assert_eq!(history[0].triage, TriageLevel::Urgent);
  assert_eq!(history[0].advice, report.advice);
}

#[tokio::test]
async fn prompt_carries_the_matched_guideline() {
  let oracle = ScriptedOracle::new("Rest at home.");
  let svc = service(oracle.clone()).await;
  let mut session = SessionContext::anonymous();

  svc.handle_symptom(&mut session, "burning fever").await.unwrap();

  let prompt = oracle.last_prompt.lock().unwrap().clone().unwrap();
  assert!(prompt.contains("Patient symptom: burning fever"));
  assert!(prompt.contains("Check temperature and keep the patient hydrated."));
}

#[tokio::test]
async fn empty_input_is_a_noop() {
  let oracle = ScriptedOracle::new("anything");
  let svc = service(oracle.clone()).await;
  let mut session = SessionContext::new(Some("u1".into()));

  assert!(svc.handle_symptom(&mut session, "").await.unwrap().is_none());
  assert!(svc.handle_symptom(&mut session, "   \n\t").await.unwrap().is_none());

  assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
  assert!(svc.symptom_history(HistoryScope::Global).await.unwrap().is_empty());
  assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn oracle_failure_degrades_to_placeholder_and_still_logs() {
  let svc = service(FailingOracle).await;
  let mut session = SessionContext::new(Some("u1".into()));

  let report = svc
    .handle_symptom(&mut session, "stomach pain")
    .await
    .unwrap()
    .unwrap();

  // The placeholder contains neither "emergency" nor "soon", so it
  // classifies to Routine.
  assert_eq!(report.level, TriageLevel::Routine);
  assert!(report.advice.ends_with(ADVICE_UNAVAILABLE));
  assert!(report.advice.starts_with("🟢 Mild: Can be managed with self-care."));
  assert_eq!(report.oracle_error.as_deref(), Some("oracle down"));

  let history = svc.symptom_history(HistoryScope::user("u1")).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].triage, TriageLevel::Routine);
}

#[tokio::test]
async fn oracle_timeout_degrades_the_same_way() {
  let svc = service(StalledOracle)
    .await
    .with_oracle_timeout(Duration::from_millis(20));
  let mut session = SessionContext::anonymous();

  let report = svc
    .handle_symptom(&mut session, "headache")
    .await
    .unwrap()
    .unwrap();

  assert_eq!(report.level, TriageLevel::Routine);
  assert!(report.oracle_error.unwrap().contains("timed out"));
  assert_eq!(
    svc.symptom_history(HistoryScope::Global).await.unwrap().len(),
    1
  );
}

#[tokio::test]
async fn exact_canonical_term_attaches_insight() {
  let oracle = ScriptedOracle::new("This is an emergency, go now.");
  let svc = service(oracle).await;
  let mut session = SessionContext::new(Some("u1".into()));

  let report = svc.handle_symptom(&mut session, "fever").await.unwrap().unwrap();

  assert_eq!(report.level, TriageLevel::Emergency);
  assert!(report.advice.starts_with("🔴 Emergency: Seek help immediately!"));
  let insight = report.insight.expect("fever is a canonical term");
  assert!(!insight.causes.is_empty());
  assert!(!insight.emergency_signs.is_empty());
}

#[tokio::test]
async fn transcript_is_written_through_and_mirrored() {
  let oracle = ScriptedOracle::new("Rest and drink fluids.");
  let svc = service(oracle).await;
  let mut session = SessionContext::new(Some("u1".into()));

  svc.handle_symptom(&mut session, "mild cough").await.unwrap();

  let durable = svc.chat_transcript(HistoryScope::user("u1")).await.unwrap();
  assert_eq!(durable.len(), 2);
  assert_eq!(durable[0].role, ChatRole::User);
  assert_eq!(durable[0].message, "mild cough");
  assert_eq!(durable[1].role, ChatRole::Assistant);

  let local = session.transcript();
  assert_eq!(local.len(), 2);
  assert_eq!(local[1].message, durable[1].message);
}

// ─── Vaccinations ────────────────────────────────────────────────────────────

#[tokio::test]
async fn due_vaccinations_roundtrip() {
  let svc = service(ScriptedOracle::new("x")).await;

  svc.enroll_vaccination(NewVaccination::new("u1", "MMR")).await.unwrap();
  svc.enroll_vaccination(NewVaccination::new("u1", "Polio")).await.unwrap();

  let due = svc.due_vaccinations("u1").await.unwrap();
  let names: HashSet<&str> = due.iter().map(|v| v.vaccine_name.as_str()).collect();
  assert_eq!(names, HashSet::from(["MMR", "Polio"]));
}

// ─── Reports and export ──────────────────────────────────────────────────────

#[tokio::test]
async fn attach_report_hashes_the_text() {
  let svc = service(ScriptedOracle::new("x")).await;

  let text = "Hemoglobin 11.2 g/dL";
  let report = svc
    .attach_report("u1", Some("lab.pdf".into()), text.to_string())
    .await
    .unwrap();

  let expected = hex::encode(Sha256::digest(text.as_bytes()));
  assert_eq!(report.sha256, expected);
  assert_eq!(report.sha256.len(), 64);
}

#[tokio::test]
async fn export_gathers_all_user_data() {
  let oracle = ScriptedOracle::new("Visit a doctor soon.");
  let svc = service(oracle).await;
  let mut session = SessionContext::new(Some("u1".into()));

  assert!(svc.export_health_record("u1").await.unwrap().is_none());

  svc.handle_symptom(&mut session, "fever").await.unwrap();
  svc.attach_report("u1", None, "extract".into()).await.unwrap();

  let export = svc.export_health_record("u1").await.unwrap().expect("user exists now");
  assert_eq!(export.user.external_id, "u1");
  assert_eq!(export.events.len(), 1);
  assert_eq!(export.transcript.len(), 2);
  assert_eq!(export.reports.len(), 1);

  let rendered = sahay_core::present::render_health_record(&export);
  assert!(rendered.contains("My Health Record — u1"));
  assert!(rendered.contains("fever"));
  assert!(rendered.contains(&export.reports[0].sha256));
}
