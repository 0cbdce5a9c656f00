//! Error types for `quote-vault-core`.

use thiserror::Error;

use crate::quote::QuoteId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("validation failed: {0}")]
  Validation(String),

  #[error("tag must not be empty")]
  EmptyTag,

  #[error("quote {id} already has tag {tag:?}")]
  DuplicateTag { id: QuoteId, tag: String },

  #[error("quote id {0} appears more than once")]
  DuplicateId(QuoteId),

  #[error("quote not found: {0}")]
  QuoteNotFound(QuoteId),

  #[error("cannot start a quiz without any quotes")]
  EmptyQuiz,

  #[error("question {0} has already been answered")]
  AlreadyAnswered(usize),

  #[error("question {0} has not been answered yet")]
  NotAnswered(usize),

  #[error("the quiz is already finished")]
  QuizFinished,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
