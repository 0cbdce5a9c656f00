//! AI-assisted features of the quote vault.
//!
//! - [`service`]: the remote quote service contract, with an HTTP client in
//!   [`http`].
//! - [`discovery`]: find quotes on a topic and add a selection of them.
//! - [`exploration`]: cached meaning/origin/trivia annotations.
//!
//! The service client is always passed in at construction; nothing here keeps
//! global state.

// Service trait methods return `impl Future + Send`; implementations use
// plain `async fn`.
#![allow(async_fn_in_trait)]

pub mod discovery;
pub mod error;
pub mod exploration;
pub mod http;
pub mod outcome;
pub mod service;

pub use discovery::{DEFAULT_DISCOVER_COUNT, DiscoveryWorkflow, Phase};
pub use error::{Error, Result};
pub use exploration::{ExplorationCache, Explored};
pub use http::{HttpQuoteService, ServiceConfig};
pub use outcome::Outcome;
pub use service::{CandidateQuote, QuoteService, ServiceError};
