//! Pure presentation helpers.
//!
//! Formatting is a layer over data-only results; it is never interleaved with
//! classification or persistence. The three severity banners are fixed
//! strings — one per triage level — and tests pin their exact content.

use std::fmt::Write as _;

use crate::{
  record::{ChatRole, HealthRecordExport},
  triage::TriageLevel,
};

/// The fixed severity banner for a triage level.
pub fn banner(level: TriageLevel) -> &'static str {
  match level {
    TriageLevel::Emergency => "🔴 Emergency: Seek help immediately!",
    TriageLevel::Urgent => "🟡 Moderate: Visit a doctor soon.",
    TriageLevel::Routine => "🟢 Mild: Can be managed with self-care.",
  }
}

/// Banner-prefixed advice, as logged and as shown to the user.
pub fn render_advice(level: TriageLevel, advice: &str) -> String {
  format!("{}\n\n{advice}", banner(level))
}

/// Render a health-record export as plain text: transcript, then symptom
/// log, then report extracts.
pub fn render_health_record(export: &HealthRecordExport) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "My Health Record — {}", export.user.external_id);
  if let Some(name) = &export.user.name {
    let _ = writeln!(out, "Name: {name}");
  }
  let _ = writeln!(out, "Language: {}", export.user.language);

  let _ = writeln!(out, "\nChat History:");
  for msg in &export.transcript {
    let who = match msg.role {
      ChatRole::User => "You",
      ChatRole::Assistant => "Assistant",
    };
    let _ = writeln!(out, "{who}: {}", msg.message);
  }

  let _ = writeln!(out, "\nSymptom Log:");
  for event in &export.events {
    let _ = writeln!(
      out,
      "[{}] {} — {}",
      event.created_at.format("%Y-%m-%d %H:%M"),
      event.triage,
      event.symptom
    );
  }

  for report in &export.reports {
    let _ = writeln!(out, "\nUploaded Report Extract:");
    if let Some(name) = &report.filename {
      let _ = writeln!(out, "File: {name}");
    }
    let _ = writeln!(out, "{}", report.extracted_text);
    let _ = writeln!(out, "Report Hash: {}", report.sha256);
  }

  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn banners_are_pinned() {
    assert_eq!(
      banner(TriageLevel::Emergency),
      "🔴 Emergency: Seek help immediately!"
    );
    assert_eq!(banner(TriageLevel::Urgent), "🟡 Moderate: Visit a doctor soon.");
    assert_eq!(
      banner(TriageLevel::Routine),
      "🟢 Mild: Can be managed with self-care."
    );
  }

  #[test]
  fn advice_is_prefixed_with_a_blank_line() {
    let rendered = render_advice(TriageLevel::Urgent, "Visit a doctor soon.");
    assert_eq!(
      rendered,
      "🟡 Moderate: Visit a doctor soon.\n\nVisit a doctor soon."
    );
  }
}
