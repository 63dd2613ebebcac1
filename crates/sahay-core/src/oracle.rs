//! The advice oracle trait — the external text-generation collaborator.
//!
//! The oracle is consumed as an opaque text-in/text-out service. It is
//! network-bound and fallible with no latency guarantee; the engine bounds
//! every call with a timeout and recovers from failures locally by
//! substituting [`ADVICE_UNAVAILABLE`].

use std::future::Future;

/// Substituted for the advice text when the oracle fails or times out.
///
/// The request still completes and is still logged. Classifying this string
/// yields `Routine` since it contains neither "emergency" nor "soon".
pub const ADVICE_UNAVAILABLE: &str =
  "⚠️ Advice service unavailable. Please consult a health worker.";

/// Abstraction over the free-form advice generator.
///
/// Tests inject scripted or failing fakes; production uses the HTTP-backed
/// implementation in `sahay-engine`.
pub trait AdviceOracle: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Produce advice text for `prompt`. One round-trip, no retries.
  fn generate<'a>(
    &'a self,
    prompt: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

/// Build the oracle prompt from the symptom text and its matched guideline.
pub fn build_prompt(symptom: &str, guideline: &str) -> String {
  format!(
    "Patient symptom: {symptom}. Provide concise triage advice based on this guideline: {guideline}"
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::triage::{TriageLevel, classify};

  #[test]
  fn placeholder_classifies_to_routine() {
    assert_eq!(classify(ADVICE_UNAVAILABLE), TriageLevel::Routine);
  }

  #[test]
  fn prompt_carries_both_inputs() {
    let p = build_prompt("fever", "check temperature");
    assert!(p.contains("Patient symptom: fever"));
    assert!(p.contains("check temperature"));
  }
}
