//! Triage level and the keyword classifier.
//!
//! Severity is decided from the *advice* text returned by the oracle, never
//! from the symptom text itself. The scan is a fixed-priority keyword match:
//! "emergency" beats "soon" beats everything else. The classifier is the
//! single source of truth for severity in the whole system.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── TriageLevel ─────────────────────────────────────────────────────────────

/// Discrete urgency classification for one symptom event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriageLevel {
  Routine,
  Urgent,
  Emergency,
}

impl TriageLevel {
  /// The string stored in the `triage` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Routine => "Routine",
      Self::Urgent => "Urgent",
      Self::Emergency => "Emergency",
    }
  }

  /// Inverse of [`TriageLevel::as_str`].
  pub fn parse(s: &str) -> Result<Self> {
    match s {
      "Routine" => Ok(Self::Routine),
      "Urgent" => Ok(Self::Urgent),
      "Emergency" => Ok(Self::Emergency),
      other => Err(Error::UnknownTriageLevel(other.to_string())),
    }
  }
}

impl fmt::Display for TriageLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Classifier ──────────────────────────────────────────────────────────────

/// Classify advice text into a [`TriageLevel`].
///
/// Case-insensitive. "emergency" is checked before "soon"; anything else,
/// including the empty string, falls through to [`TriageLevel::Routine`].
/// Never fails.
pub fn classify(advice: &str) -> TriageLevel {
  let lowered = advice.to_lowercase();
  if lowered.contains("emergency") {
    TriageLevel::Emergency
  } else if lowered.contains("soon") {
    TriageLevel::Urgent
  } else {
    TriageLevel::Routine
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn emergency_keyword_wins() {
    assert_eq!(
      classify("This is an EMERGENCY, go to hospital"),
      TriageLevel::Emergency
    );
    assert_eq!(
      classify("emergency care needed soon"),
      TriageLevel::Emergency
    );
  }

  #[test]
  fn soon_without_emergency_is_urgent() {
    assert_eq!(
      classify("Visit a doctor soon for evaluation"),
      TriageLevel::Urgent
    );
    assert_eq!(classify("SOON"), TriageLevel::Urgent);
  }

  #[test]
  fn everything_else_is_routine() {
    assert_eq!(classify("Rest and drink fluids."), TriageLevel::Routine);
    assert_eq!(classify(""), TriageLevel::Routine);
    // "sooner" contains "soon" as a substring, so it still matches.
    assert_eq!(classify("see someone sooner"), TriageLevel::Urgent);
  }

  #[test]
  fn level_string_roundtrip() {
    for level in [
      TriageLevel::Routine,
      TriageLevel::Urgent,
      TriageLevel::Emergency,
    ] {
      assert_eq!(TriageLevel::parse(level.as_str()).unwrap(), level);
    }
    assert!(TriageLevel::parse("urgent").is_err());
  }
}
