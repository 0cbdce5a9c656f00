//! Catalog indexes (the author and tag lists a browser shows next to the
//! quotes) and the built-in seed catalog.

use std::collections::BTreeSet;

use crate::quote::{ExplorationState, QuoteId, QuoteRecord, normalize_tags};

/// Distinct authors in ascending order. Authors are compared exactly.
pub fn authors<'a, I>(records: I) -> Vec<String>
where
  I: IntoIterator<Item = &'a QuoteRecord>,
{
  records
    .into_iter()
    .map(|r| r.author.clone())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Distinct tags, lowercased, in ascending order.
pub fn tags<'a, I>(records: I) -> Vec<String>
where
  I: IntoIterator<Item = &'a QuoteRecord>,
{
  records
    .into_iter()
    .flat_map(|r| r.tags.iter().map(|t| t.to_lowercase()))
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

/// Split a comma-separated tag string as typed by a user.
///
/// `"wisdom, life,,  Stoicism "` becomes `["wisdom", "life", "Stoicism"]`.
pub fn parse_tag_list(input: &str) -> Vec<String> { normalize_tags(input.split(',')) }

// ─── Seed catalog ────────────────────────────────────────────────────────────

const SEED: &[(&str, &str, &[&str])] = &[
  (
    "The only way to do great work is to love what you do.",
    "Steve Jobs",
    &["inspiration", "work", "passion"],
  ),
  (
    "Innovation distinguishes between a leader and a follower.",
    "Steve Jobs",
    &["innovation", "leadership"],
  ),
  (
    "Strive not to be a success, but rather to be of value.",
    "Albert Einstein",
    &["success", "value", "inspiration"],
  ),
  (
    "The mind is everything. What you think you become.",
    "Buddha",
    &["mindfulness", "philosophy"],
  ),
  (
    "An unexamined life is not worth living.",
    "Socrates",
    &["philosophy", "life"],
  ),
  (
    "I have not failed. I've just found 10,000 ways that won't work.",
    "Thomas A. Edison",
    &["perseverance", "failure", "inspiration"],
  ),
  (
    "The only source of knowledge is experience.",
    "Albert Einstein",
    &["knowledge", "experience"],
  ),
  (
    "That which does not kill us makes us stronger.",
    "Friedrich Nietzsche",
    &["strength", "philosophy"],
  ),
  (
    "To be yourself in a world that is constantly trying to make you something else is the greatest accomplishment.",
    "Ralph Waldo Emerson",
    &["individuality", "life"],
  ),
];

/// The quotes a fresh vault starts with, ids 1 through 9 in display order.
pub fn seed_quotes() -> Vec<QuoteRecord> {
  SEED
    .iter()
    .zip(1..)
    .map(|(&(text, author, tags), id)| QuoteRecord {
      id:          QuoteId(id),
      text:        text.to_owned(),
      author:      author.to_owned(),
      tags:        tags.iter().map(|t| (*t).to_owned()).collect(),
      exploration: ExplorationState::Unexplored,
    })
    .collect()
}
