//! The remote quote service: wire types and the [`QuoteService`] trait.
//!
//! The service is usually an LLM-backed endpoint. Callers only rely on the
//! request/response shapes here; [`crate::http::HttpQuoteService`] is the
//! production transport and tests substitute in-process fakes.

use std::future::Future;

use quote_vault_core::{Exploration, NewQuote};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Discover ────────────────────────────────────────────────────────────────

/// Body of a discover call: find up to `count` quotes about a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverRequest {
  pub topic_gist: String,
  pub count:      usize,
}

/// A quote proposed by the service, not yet in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuote {
  pub text:   String,
  pub author: String,
  /// One to three short topic tags.
  #[serde(default)]
  pub tags:   Vec<String>,
}

impl From<CandidateQuote> for NewQuote {
  fn from(c: CandidateQuote) -> Self {
    NewQuote { text: c.text, author: c.author, tags: c.tags }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverResponse {
  #[serde(default)]
  pub quotes: Vec<CandidateQuote>,
}

// ─── Explore ─────────────────────────────────────────────────────────────────

/// Body of an explore call: annotate one quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploreRequest {
  pub text:   String,
  pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
  pub meaning:      String,
  pub origin:       String,
  pub trivia:       String,
  /// Whether the attribution to the author is well documented.
  pub is_confirmed: bool,
}

impl ExploreResponse {
  /// Split into the cacheable annotation and the attribution flag.
  pub fn into_parts(self) -> (Exploration, bool) {
    let exploration = Exploration {
      meaning: self.meaning,
      origin:  self.origin,
      trivia:  self.trivia,
    };
    (exploration, self.is_confirmed)
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failed call to the remote service.
#[derive(Debug, Error)]
pub enum ServiceError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("service returned {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed service response: {0}")]
  Decode(#[from] serde_json::Error),

  /// The service answered with 2xx but an `{"error": ...}` body.
  #[error("{0}")]
  Rejected(String),
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the AI quote service.
///
/// Both calls are fallible and may take seconds. Implementations must not
/// retry on their own; the workflows decide when a call is made.
pub trait QuoteService: Send + Sync {
  /// Find quotes about `request.topic_gist`.
  fn discover(
    &self,
    request: DiscoverRequest,
  ) -> impl Future<Output = Result<DiscoverResponse, ServiceError>> + Send + '_;

  /// Explain the meaning, origin, and trivia of a quote.
  fn explore(
    &self,
    request: ExploreRequest,
  ) -> impl Future<Output = Result<ExploreResponse, ServiceError>> + Send + '_;
}
