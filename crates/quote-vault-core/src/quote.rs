//! Quote types: the records held by the vault.
//!
//! A [`QuoteRecord`] is owned by the collection, which is the only place ids
//! are handed out. A [`NewQuote`] is everything a caller may supply when
//! adding one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Collection-assigned quote identifier. Ids increase monotonically and are
/// never reused after a removal.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuoteId(pub u64);

impl fmt::Display for QuoteId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Exploration ─────────────────────────────────────────────────────────────

/// AI-generated annotation for a quote. The three fields always travel
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exploration {
  /// What the quote means.
  pub meaning: String,
  /// When and where the quote was first used.
  pub origin:  String,
  /// Facts about the quote or its author.
  pub trivia:  String,
}

/// Whether a record carries an exploration yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExplorationState {
  #[default]
  Unexplored,
  Explored(Exploration),
}

impl ExplorationState {
  pub fn as_explored(&self) -> Option<&Exploration> {
    match self {
      Self::Explored(e) => Some(e),
      Self::Unexplored => None,
    }
  }

  pub fn is_explored(&self) -> bool { matches!(self, Self::Explored(_)) }
}

// ─── QuoteRecord ─────────────────────────────────────────────────────────────

/// A quotation stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
  pub id:          QuoteId,
  pub text:        String,
  /// Display form, case-sensitive as entered.
  pub author:      String,
  /// Unique ignoring case; kept in the casing first seen.
  pub tags:        Vec<String>,
  #[serde(default)]
  pub exploration: ExplorationState,
}

impl QuoteRecord {
  /// Case-insensitive tag membership.
  pub fn has_tag(&self, tag: &str) -> bool { contains_tag(&self.tags, tag) }
}

// ─── NewQuote ────────────────────────────────────────────────────────────────

/// Input to [`crate::collection::QuoteCollection::add`]. The id is always
/// assigned by the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuote {
  pub text:   String,
  pub author: String,
  #[serde(default)]
  pub tags:   Vec<String>,
}

impl NewQuote {
  pub fn new(
    text: impl Into<String>,
    author: impl Into<String>,
    tags: impl IntoIterator<Item = impl Into<String>>,
  ) -> Self {
    Self {
      text:   text.into(),
      author: author.into(),
      tags:   tags.into_iter().map(Into::into).collect(),
    }
  }

  /// Reject blank text or author.
  pub fn validate(&self) -> Result<()> {
    if self.text.trim().is_empty() {
      return Err(Error::Validation("quote text must not be empty".into()));
    }
    if self.author.trim().is_empty() {
      return Err(Error::Validation("quote author must not be empty".into()));
    }
    Ok(())
  }
}

// ─── Tag helpers ─────────────────────────────────────────────────────────────

pub(crate) fn contains_tag(tags: &[String], tag: &str) -> bool {
  let needle = tag.to_lowercase();
  tags.iter().any(|t| t.to_lowercase() == needle)
}

/// Trim every tag, drop empty ones, and drop later duplicates (ignoring
/// case). First-seen order and casing survive.
pub fn normalize_tags<I, T>(tags: I) -> Vec<String>
where
  I: IntoIterator<Item = T>,
  T: AsRef<str>,
{
  let mut out: Vec<String> = Vec::new();
  for tag in tags {
    let trimmed = tag.as_ref().trim();
    if trimmed.is_empty() || contains_tag(&out, trimmed) {
      continue;
    }
    out.push(trimmed.to_owned());
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_tags_trims_and_dedupes_ignoring_case() {
    let tags = normalize_tags(["  Work ", "life", "work", "", "   ", "LIFE", "Art"]);
    assert_eq!(tags, vec!["Work", "life", "Art"]);
  }

  #[test]
  fn new_quote_rejects_blank_fields() {
    assert!(NewQuote::new("  ", "Seneca", ["stoicism"]).validate().is_err());
    assert!(NewQuote::new("Luck is...", "\t", ["stoicism"]).validate().is_err());
    assert!(NewQuote::new("Luck is...", "Seneca", Vec::<String>::new())
      .validate()
      .is_ok());
  }

  #[test]
  fn exploration_state_serialises_with_tag() {
    let state = ExplorationState::Explored(Exploration {
      meaning: "m".into(),
      origin:  "o".into(),
      trivia:  "t".into(),
    });
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["state"], "explored");
    assert_eq!(json["meaning"], "m");

    let back: ExplorationState = serde_json::from_value(json).unwrap();
    assert_eq!(back, state);
  }
}
