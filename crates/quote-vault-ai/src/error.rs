//! Error type for `quote-vault-ai`.

use thiserror::Error;

use crate::{discovery::Phase, service::ServiceError};

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  /// A discovery search is already running on this workflow.
  #[error("a search is already in progress")]
  Busy,

  #[error("select at least one quote before adding")]
  NoSelection,

  #[error("cannot {operation} while {phase}")]
  InvalidState {
    operation: &'static str,
    phase:     Phase,
  },

  #[error("candidate {index} does not exist (have {len})")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("could not find any new quotes for {topic:?}")]
  NothingFound { topic: String },

  /// The request was cancelled before its response arrived; the response
  /// was discarded.
  #[error("request was cancelled")]
  Cancelled,

  #[error("quote service error: {0}")]
  Remote(#[from] ServiceError),

  #[error(transparent)]
  Core(#[from] quote_vault_core::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
