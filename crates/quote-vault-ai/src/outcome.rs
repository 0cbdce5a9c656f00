//! [`Outcome`]: the non-throwing result shape handed to front ends.

use std::fmt::Display;

use serde::Serialize;

/// `{ "success": bool, "error"?: string, "payload"?: T }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
  pub success: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error:   Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub payload: Option<T>,
}

impl<T> Outcome<T> {
  pub fn ok(payload: T) -> Self {
    Self { success: true, error: None, payload: Some(payload) }
  }

  pub fn failure(error: impl Display) -> Self {
    Self { success: false, error: Some(error.to_string()), payload: None }
  }
}

impl<T, E: Display> From<Result<T, E>> for Outcome<T> {
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(payload) => Self::ok(payload),
      Err(e) => Self::failure(e),
    }
  }
}
