//! Knowledge graph — structured insights for canonical symptom terms.
//!
//! Matching is an exact case-insensitive comparison of the *entire* trimmed
//! input against a canonical term. This is deliberately stricter than the
//! substring policy of [`crate::guideline::GuidelineStore`]; callers must not
//! conflate the two. "high fever" does not match the "fever" entry here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Structured causes/treatments/emergency-signs for one canonical term.
/// Field order within each list is insertion order and is preserved for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomInsight {
  pub causes:          Vec<String>,
  pub treatments:      Vec<String>,
  pub emergency_signs: Vec<String>,
}

/// Immutable term → insight table, built once at startup.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
  /// Keyed by lowercased canonical term.
  entries: HashMap<String, SymptomInsight>,
}

impl KnowledgeGraph {
  /// Build a graph from (term, insight) pairs.
  pub fn from_entries<I, K>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, SymptomInsight)>,
    K: Into<String>,
  {
    Self {
      entries: entries
        .into_iter()
        .map(|(k, v)| (k.into().to_lowercase(), v))
        .collect(),
    }
  }

  /// The built-in table shipped with the engine.
  pub fn builtin() -> Self {
    fn strings(items: &[&str]) -> Vec<String> {
      items.iter().map(|s| s.to_string()).collect()
    }

    Self::from_entries([
      (
        "diarrhea",
        SymptomInsight {
          causes:          strings(&[
            "Contaminated water or food",
            "Viral or bacterial infection",
            "Food intolerance",
          ]),
          treatments:      strings(&[
            "Oral rehydration solution",
            "Zinc supplementation",
            "Continue light meals",
          ]),
          emergency_signs: strings(&[
            "Blood in stool",
            "Signs of severe dehydration",
          ]),
        },
      ),
      (
        "fever",
        SymptomInsight {
          causes:          strings(&[
            "Viral infection",
            "Bacterial infection",
            "Heat exposure",
          ]),
          treatments:      strings(&[
            "Paracetamol for temperature control",
            "Rest and plenty of fluids",
          ]),
          emergency_signs: strings(&[
            "Temperature above 40C",
            "Stiff neck or confusion",
          ]),
        },
      ),
      (
        "cough",
        SymptomInsight {
          causes:          strings(&[
            "Common cold",
            "Respiratory infection",
            "Dust or allergen exposure",
          ]),
          treatments:      strings(&[
            "Warm fluids with honey",
            "Steam inhalation",
          ]),
          emergency_signs: strings(&["Difficulty breathing"]),
        },
      ),
    ])
  }

  /// Exact case-insensitive lookup of the whole trimmed input.
  /// Returns `None` when no canonical term matches — never a fallback.
  pub fn lookup(&self, symptom: &str) -> Option<&SymptomInsight> {
    self.entries.get(&symptom.trim().to_lowercase())
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
