//! The filter engine: a pure projection of records through author, tag, and
//! free-text predicates.

use serde::{Deserialize, Serialize};

use crate::quote::QuoteRecord;

/// Parameters for [`filter`] and
/// [`QuoteCollection::query`](crate::collection::QuoteCollection::query).
/// Every predicate that is set must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteFilter {
  /// Exact, case-sensitive author match.
  pub author: Option<String>,
  /// Tag membership, ignoring case.
  pub tag:    Option<String>,
  /// Case-insensitive substring over text, author, and tags.
  pub search: Option<String>,
}

impl QuoteFilter {
  pub fn by_author(author: impl Into<String>) -> Self {
    Self { author: Some(author.into()), ..Self::default() }
  }

  pub fn by_tag(tag: impl Into<String>) -> Self {
    Self { tag: Some(tag.into()), ..Self::default() }
  }

  pub fn by_search(search: impl Into<String>) -> Self {
    Self { search: Some(search.into()), ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.author.is_none() && self.tag.is_none() && self.search_term().is_none()
  }

  fn search_term(&self) -> Option<String> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_lowercase)
  }

  /// Whether a single record passes every predicate.
  pub fn matches(&self, record: &QuoteRecord) -> bool {
    if let Some(author) = &self.author
      && record.author != *author
    {
      return false;
    }

    if let Some(tag) = &self.tag
      && !record.has_tag(tag)
    {
      return false;
    }

    match self.search_term() {
      None => true,
      Some(needle) => {
        record.text.to_lowercase().contains(&needle)
          || record.author.to_lowercase().contains(&needle)
          || record.tags.iter().any(|t| t.to_lowercase().contains(&needle))
      }
    }
  }
}

/// Return the records that pass `query`, in their input order.
pub fn filter<'a, I>(records: I, query: &QuoteFilter) -> Vec<QuoteRecord>
where
  I: IntoIterator<Item = &'a QuoteRecord>,
{
  records
    .into_iter()
    .filter(|r| query.matches(r))
    .cloned()
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::quote::{ExplorationState, QuoteId};

  fn record(id: u64, author: &str, tags: &[&str], text: &str) -> QuoteRecord {
    QuoteRecord {
      id:          QuoteId(id),
      text:        text.into(),
      author:      author.into(),
      tags:        tags.iter().map(|t| t.to_string()).collect(),
      exploration: ExplorationState::Unexplored,
    }
  }

  fn sample() -> Vec<QuoteRecord> {
    vec![
      record(1, "A", &["x"], "hello world"),
      record(2, "B", &["y"], "goodbye"),
    ]
  }

  fn ids(records: &[QuoteRecord]) -> Vec<u64> {
    records.iter().map(|r| r.id.0).collect()
  }

  #[test]
  fn author_filter_is_exact() {
    let records = sample();
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_author("A"))), vec![1]);
    assert!(filter(&records, &QuoteFilter::by_author("a")).is_empty());
  }

  #[test]
  fn search_matches_text() {
    let records = sample();
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_search("good"))), vec![2]);
  }

  #[test]
  fn predicates_are_conjunctive() {
    let records = sample();
    let query = QuoteFilter {
      author: Some("A".into()),
      tag:    Some("y".into()),
      search: None,
    };
    assert!(filter(&records, &query).is_empty());
  }

  #[test]
  fn tag_filter_ignores_case() {
    let records = vec![record(1, "A", &["Work"], "t")];
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_tag("work"))), vec![1]);
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_tag("WORK"))), vec![1]);
  }

  #[test]
  fn search_covers_author_and_tags_ignoring_case() {
    let records = vec![
      record(1, "Seneca", &["stoicism"], "We suffer more in imagination."),
      record(2, "Rumi", &["Love"], "What you seek is seeking you."),
      record(3, "Jobs", &["work"], "Stay hungry."),
    ];
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_search("SENECA"))), vec![1]);
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_search("lov"))), vec![2]);
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_search("seek"))), vec![2]);
  }

  #[test]
  fn blank_search_passes_everything() {
    let records = sample();
    assert_eq!(ids(&filter(&records, &QuoteFilter::by_search("   "))), vec![1, 2]);
    assert!(QuoteFilter::by_search("  ").is_empty());
  }

  #[test]
  fn filtering_preserves_input_order() {
    let records = vec![
      record(9, "A", &["x"], "one"),
      record(3, "B", &["x"], "two"),
      record(7, "A", &["x"], "three"),
      record(1, "A", &["z"], "four"),
    ];
    let out = filter(&records, &QuoteFilter::by_tag("x"));
    assert_eq!(ids(&out), vec![9, 3, 7]);

    let out = filter(&records, &QuoteFilter::by_author("A"));
    assert_eq!(ids(&out), vec![9, 7, 1]);
  }
}
