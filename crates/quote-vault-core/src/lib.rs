//! Core types for the quote vault: records, the in-memory collection, the
//! filter engine, catalog indexes, and the quiz.
//!
//! This crate knows nothing about the AI service or any front end. Every other
//! crate in the workspace depends on it.

pub mod catalog;
pub mod collection;
pub mod error;
pub mod filter;
pub mod quiz;
pub mod quote;

pub use collection::QuoteCollection;
pub use error::{Error, Result};
pub use filter::{QuoteFilter, filter};
pub use quote::{Exploration, ExplorationState, NewQuote, QuoteId, QuoteRecord};

#[cfg(test)]
mod tests;
