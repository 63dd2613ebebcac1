//! Triage orchestration for Sahay.
//!
//! [`TriageService`] wires the guideline store, knowledge graph, classifier,
//! advice oracle, and record store into the single symptom-handling pipeline.
//! It is generic over the store and oracle so tests can inject fakes.

pub mod error;
pub mod oracle;
pub mod service;

pub use error::{Error, Result};
pub use service::{TriageReport, TriageService};

#[cfg(test)]
mod tests;
