//! Error types for `sahay-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown triage level: {0:?}")]
  UnknownTriageLevel(String),

  #[error("unknown chat role: {0:?}")]
  UnknownChatRole(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
