//! Per-session conversation context.
//!
//! An explicit object owned by the caller and passed into each service call.
//! There is no process-wide mutable transcript; the durable copy lives in the
//! store's `chats` table, this is the in-memory view for one session.

use uuid::Uuid;

use crate::record::ChatRole;

/// One in-memory transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
  pub role:    ChatRole,
  pub message: String,
}

/// Caller-owned conversation state for one user interaction session.
#[derive(Debug, Clone)]
pub struct SessionContext {
  pub session_id: Uuid,
  /// Opaque user key; `None` for anonymous sessions (legacy global log).
  pub user_id:    Option<String>,
  transcript:     Vec<TranscriptEntry>,
}

impl SessionContext {
  pub fn new(user_id: Option<String>) -> Self {
    Self {
      session_id: Uuid::new_v4(),
      user_id,
      transcript: Vec::new(),
    }
  }

  /// Anonymous session with no user key.
  pub fn anonymous() -> Self {
    Self::new(None)
  }

  pub fn push(&mut self, role: ChatRole, message: impl Into<String>) {
    self.transcript.push(TranscriptEntry {
      role,
      message: message.into(),
    });
  }

  /// Entries in the order they were appended.
  pub fn transcript(&self) -> &[TranscriptEntry] {
    &self.transcript
  }
}
