//! Error type for `sahay-engine`.
//!
//! Oracle failures are deliberately absent here: they are recovered inside
//! the pipeline (placeholder advice, request still logged) and surfaced as
//! data on the report. Only a storage fault aborts a request — a triage
//! result must never be reported as successful if it was not durably logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
