//! Guideline store — keyword-to-guidance lookup used to ground oracle calls.
//!
//! Matching is a case-insensitive substring search: a stored key matches when
//! it occurs anywhere inside the incoming symptom text. Match order is
//! deterministic: keys are tried longest-first (ties lexicographic), so the
//! most specific key wins.

use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::Result;

/// Returned when no key matches, or when the backing file was absent at load.
pub const FALLBACK_GUIDANCE: &str =
  "No specific guideline found, but stay hydrated and consult a doctor if it worsens.";

/// Immutable keyword → guidance table, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct GuidelineStore {
  /// (lowercased key, guidance), sorted by descending key length then key.
  entries: Vec<(String, String)>,
}

impl GuidelineStore {
  /// A store with no entries; every lookup returns [`FALLBACK_GUIDANCE`].
  pub fn empty() -> Self {
    Self::default()
  }

  /// Build a store from (keyword, guidance) pairs.
  pub fn from_entries<I, K, V>(entries: I) -> Self
  where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
  {
    let mut entries: Vec<(String, String)> = entries
      .into_iter()
      .map(|(k, v)| (k.into().to_lowercase(), v.into()))
      .collect();
    // Longest key first so "high fever" is tried before "fever".
    entries.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    Self { entries }
  }

  /// Load from a JSON file containing a flat string-to-string object.
  ///
  /// Errors here are recoverable: callers fall back to [`Self::empty`] with a
  /// logged warning rather than failing startup.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let file = File::open(path)?;
    let table: HashMap<String, String> = serde_json::from_reader(BufReader::new(file))?;
    Ok(Self::from_entries(table))
  }

  /// Return the guidance for the first (longest) key occurring in `symptom`,
  /// or [`FALLBACK_GUIDANCE`] if nothing matches. Read-only; never fails.
  pub fn lookup(&self, symptom: &str) -> &str {
    let lowered = symptom.to_lowercase();
    self
      .entries
      .iter()
      .find(|(key, _)| lowered.contains(key.as_str()))
      .map(|(_, guidance)| guidance.as_str())
      .unwrap_or(FALLBACK_GUIDANCE)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> GuidelineStore {
    GuidelineStore::from_entries([
      ("fever", "Check temperature twice daily."),
      ("high fever", "Seek care if above 40C."),
      ("cough", "Warm fluids; avoid cold air."),
    ])
  }

  #[test]
  fn key_must_occur_inside_the_input() {
    let s = store();
    assert_eq!(s.lookup("I have a cough at night"), "Warm fluids; avoid cold air.");
    // The reverse direction never matches: input inside key is not enough.
    assert_eq!(s.lookup("cou"), FALLBACK_GUIDANCE);
  }

  #[test]
  fn longest_key_wins() {
    let s = store();
    assert_eq!(s.lookup("a very high fever today"), "Seek care if above 40C.");
    assert_eq!(s.lookup("mild fever"), "Check temperature twice daily.");
  }

  #[test]
  fn matching_is_case_insensitive() {
    let s = store();
    assert_eq!(s.lookup("FEVER and chills"), "Check temperature twice daily.");
  }

  #[test]
  fn no_match_yields_fallback() {
    let s = store();
    assert_eq!(s.lookup("sprained ankle"), FALLBACK_GUIDANCE);
    assert_eq!(GuidelineStore::empty().lookup("fever"), FALLBACK_GUIDANCE);
  }

  #[test]
  fn lookup_is_idempotent() {
    let s = store();
    let first = s.lookup("fever").to_string();
    for _ in 0..10 {
      assert_eq!(s.lookup("fever"), first);
    }
    assert_eq!(s.len(), 3);
  }
}
