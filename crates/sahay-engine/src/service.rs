//! [`TriageService`] — the symptom-handling pipeline.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time;
use tracing::{info, warn};

use sahay_core::{
  guideline::GuidelineStore,
  knowledge::{KnowledgeGraph, SymptomInsight},
  oracle::{ADVICE_UNAVAILABLE, AdviceOracle, build_prompt},
  present,
  record::{
    ChatMessage, ChatRole, HealthRecordExport, MedicalReport, NewChatMessage,
    NewMedicalReport, NewSymptomEvent, NewVaccination, SymptomEvent, VaccinationRecord,
  },
  session::SessionContext,
  store::{HistoryScope, RecordStore},
  triage::{TriageLevel, classify},
};

use crate::{Error, Result};

/// Default bound on one oracle call. The oracle is the only operation with
/// non-trivial latency; everything else in the pipeline is local.
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Result type ─────────────────────────────────────────────────────────────

/// The structured outcome of one triage request.
#[derive(Debug, Clone, Serialize)]
pub struct TriageReport {
  /// Id of the durably logged symptom event.
  pub event_id:     i64,
  pub level:        TriageLevel,
  /// Banner-prefixed advice text, exactly as logged.
  pub advice:       String,
  /// Present only when the raw symptom text matches a canonical term.
  pub insight:      Option<SymptomInsight>,
  /// Set when the oracle failed or timed out and the placeholder was
  /// substituted; lets callers log a degraded reply distinctly from a
  /// successful-but-discouraging one.
  pub oracle_error: Option<String>,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Orchestrates guideline lookup, the oracle call, classification, knowledge
/// augmentation, and write-through to the record store.
///
/// Guideline and knowledge tables are loaded once and shared immutably;
/// concurrent requests read them without locking.
pub struct TriageService<S, O> {
  store:          S,
  oracle:         O,
  guidelines:     Arc<GuidelineStore>,
  knowledge:      Arc<KnowledgeGraph>,
  oracle_timeout: Duration,
}

impl<S, O> TriageService<S, O>
where
  S: RecordStore,
  O: AdviceOracle,
{
  pub fn new(
    store: S,
    oracle: O,
    guidelines: Arc<GuidelineStore>,
    knowledge: Arc<KnowledgeGraph>,
  ) -> Self {
    Self {
      store,
      oracle,
      guidelines,
      knowledge,
      oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
    }
  }

  /// Override the per-request oracle timeout.
  pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
    self.oracle_timeout = timeout;
    self
  }

  // ── Triage pipeline ───────────────────────────────────────────────────────

  /// Handle one symptom submission.
  ///
  /// Empty or whitespace-only input is a no-op: `Ok(None)`, nothing written,
  /// no oracle call. Otherwise the pipeline runs guideline lookup → oracle
  /// (timeout-bounded, failure substitutes the placeholder) → classification
  /// → banner → knowledge augmentation → durable logging. A storage fault is
  /// the only hard error.
  pub async fn handle_symptom(
    &self,
    session: &mut SessionContext,
    symptom: &str,
  ) -> Result<Option<TriageReport>> {
    let symptom = symptom.trim();
    if symptom.is_empty() {
      return Ok(None);
    }

    let guideline = self.guidelines.lookup(symptom);
    let prompt = build_prompt(symptom, guideline);

    let (advice, oracle_error) =
      match time::timeout(self.oracle_timeout, self.oracle.generate(&prompt)).await {
        Ok(Ok(text)) => (text, None),
        Ok(Err(e)) => {
          warn!(error = %e, "advice oracle failed; substituting placeholder");
          (ADVICE_UNAVAILABLE.to_string(), Some(e.to_string()))
        }
        Err(_) => {
          warn!(timeout = ?self.oracle_timeout, "advice oracle timed out");
          (
            ADVICE_UNAVAILABLE.to_string(),
            Some(format!("timed out after {:?}", self.oracle_timeout)),
          )
        }
      };

    let level = classify(&advice);
    let advice = present::render_advice(level, &advice);
    let insight = self.knowledge.lookup(symptom).cloned();

    let event = self
      .store
      .append_symptom_event(NewSymptomEvent {
        user_id: session.user_id.clone(),
        symptom: symptom.to_string(),
        triage:  level,
        advice:  advice.clone(),
      })
      .await
      .map_err(Error::storage)?;

    self
      .store
      .append_chat(NewChatMessage {
        user_id: session.user_id.clone(),
        role:    ChatRole::User,
        message: symptom.to_string(),
      })
      .await
      .map_err(Error::storage)?;
    self
      .store
      .append_chat(NewChatMessage {
        user_id: session.user_id.clone(),
        role:    ChatRole::Assistant,
        message: advice.clone(),
      })
      .await
      .map_err(Error::storage)?;

    session.push(ChatRole::User, symptom);
    session.push(ChatRole::Assistant, advice.clone());

    info!(event_id = event.id, level = %level, "triage request logged");

    Ok(Some(TriageReport {
      event_id: event.id,
      level,
      advice,
      insight,
      oracle_error,
    }))
  }

  // ── Query surface ─────────────────────────────────────────────────────────

  pub async fn symptom_history(&self, scope: HistoryScope) -> Result<Vec<SymptomEvent>> {
    self.store.symptom_history(scope).await.map_err(Error::storage)
  }

  pub async fn chat_transcript(&self, scope: HistoryScope) -> Result<Vec<ChatMessage>> {
    self.store.chat_transcript(scope).await.map_err(Error::storage)
  }

  pub async fn due_vaccinations(&self, user: &str) -> Result<Vec<VaccinationRecord>> {
    self.store.due_vaccinations(user).await.map_err(Error::storage)
  }

  pub async fn enroll_vaccination(&self, input: NewVaccination) -> Result<VaccinationRecord> {
    self.store.add_vaccination(input).await.map_err(Error::storage)
  }

  // ── Reports and export ────────────────────────────────────────────────────

  /// Store an externally extracted report, hashing its text for integrity.
  pub async fn attach_report(
    &self,
    user: &str,
    filename: Option<String>,
    extracted_text: String,
  ) -> Result<MedicalReport> {
    let sha256 = hex::encode(Sha256::digest(extracted_text.as_bytes()));
    self
      .store
      .store_report(NewMedicalReport {
        user_id: user.to_string(),
        filename,
        extracted_text,
        sha256,
      })
      .await
      .map_err(Error::storage)
  }

  /// Gather everything known about `user` for export. `None` if the user has
  /// never been referenced.
  pub async fn export_health_record(&self, user: &str) -> Result<Option<HealthRecordExport>> {
    let profile = match self.store.get_user(user).await.map_err(Error::storage)? {
      Some(p) => p,
      None => return Ok(None),
    };

    let transcript = self
      .store
      .chat_transcript(HistoryScope::user(user))
      .await
      .map_err(Error::storage)?;
    let events = self
      .store
      .symptom_history(HistoryScope::user(user))
      .await
      .map_err(Error::storage)?;
    let reports = self.store.reports_for(user).await.map_err(Error::storage)?;

    Ok(Some(HealthRecordExport {
      user: profile,
      transcript,
      events,
      reports,
    }))
  }
}
