//! [`QuoteCollection`], the in-memory collection store.
//!
//! The collection owns every [`QuoteRecord`] and is the only writer of ids.
//! Records are kept most-recently-added first. All reads and writes go through
//! a single mutex, so id assignment and insertion are one step and mutations
//! take effect in call order.

use std::{
  collections::{HashSet, VecDeque},
  sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
  Error, Result,
  catalog,
  filter::{QuoteFilter, filter},
  quote::{
    Exploration, ExplorationState, NewQuote, QuoteId, QuoteRecord, contains_tag,
    normalize_tags,
  },
};

#[derive(Debug, Default)]
struct Inner {
  /// Head is the most recently added record.
  records: VecDeque<QuoteRecord>,
  /// Highest id ever assigned. Survives removals so ids are never reused.
  high_water: u64,
}

impl Inner {
  fn position(&self, id: QuoteId) -> Option<usize> {
    self.records.iter().position(|r| r.id == id)
  }

  fn find_mut(&mut self, id: QuoteId) -> Option<&mut QuoteRecord> {
    self.records.iter_mut().find(|r| r.id == id)
  }

  fn build(&mut self, quote: NewQuote) -> QuoteRecord {
    self.high_water += 1;
    QuoteRecord {
      id:          QuoteId(self.high_water),
      text:        quote.text.trim().to_owned(),
      author:      quote.author.trim().to_owned(),
      tags:        normalize_tags(&quote.tags),
      exploration: ExplorationState::Unexplored,
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An in-memory, session-scoped quote collection.
///
/// Share it between workflows with an `Arc`; every method takes `&self`.
#[derive(Debug, Default)]
pub struct QuoteCollection {
  inner: Mutex<Inner>,
}

impl QuoteCollection {
  /// An empty collection.
  pub fn new() -> Self { Self::default() }

  /// A collection pre-populated with records that already carry ids, in
  /// display order (head first). Later ids continue after the largest one.
  ///
  /// Fails with [`Error::DuplicateId`] if two records share an id.
  pub fn with_records(records: impl IntoIterator<Item = QuoteRecord>) -> Result<Self> {
    let records: VecDeque<QuoteRecord> = records.into_iter().collect();
    let mut seen = HashSet::with_capacity(records.len());
    if let Some(dup) = records.iter().find(|r| !seen.insert(r.id)) {
      return Err(Error::DuplicateId(dup.id));
    }
    Ok(Self::from_unique(records))
  }

  /// A collection holding the built-in seed catalog.
  pub fn seeded() -> Self { Self::from_unique(catalog::seed_quotes().into()) }

  /// `records` must not repeat an id.
  fn from_unique(records: VecDeque<QuoteRecord>) -> Self {
    let high_water = records.iter().map(|r| r.id.0).max().unwrap_or(0);
    Self { inner: Mutex::new(Inner { records, high_water }) }
  }

  /// Every mutation leaves the collection consistent before it can panic, so
  /// a poisoned lock still guards valid data.
  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Add one quote at the head of the collection and return the stored
  /// record.
  pub fn add(&self, quote: NewQuote) -> Result<QuoteRecord> {
    quote.validate()?;
    let mut inner = self.lock();
    let record = inner.build(quote);
    inner.records.push_front(record.clone());
    tracing::debug!(id = %record.id, author = %record.author, "added quote");
    Ok(record)
  }

  /// Add several quotes at once. Either all are added or, if any fails
  /// validation, none are.
  ///
  /// The new records sit before every existing record and keep their input
  /// order among themselves; ids ascend in input order.
  pub fn add_batch(&self, quotes: Vec<NewQuote>) -> Result<Vec<QuoteRecord>> {
    for quote in &quotes {
      quote.validate()?;
    }

    let mut inner = self.lock();
    let added: Vec<QuoteRecord> =
      quotes.into_iter().map(|q| inner.build(q)).collect();
    for record in added.iter().rev() {
      inner.records.push_front(record.clone());
    }
    tracing::debug!(count = added.len(), "added quote batch");
    Ok(added)
  }

  /// Remove the record with `id`. Returns `false` if there was none.
  pub fn remove(&self, id: QuoteId) -> bool {
    let mut inner = self.lock();
    match inner.position(id) {
      Some(idx) => {
        inner.records.remove(idx);
        tracing::debug!(%id, "removed quote");
        true
      }
      None => false,
    }
  }

  /// Append `tag` (trimmed) to the record's tags.
  pub fn add_tag(&self, id: QuoteId, tag: &str) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
      return Err(Error::EmptyTag);
    }

    let mut inner = self.lock();
    let record = inner.find_mut(id).ok_or(Error::QuoteNotFound(id))?;
    if contains_tag(&record.tags, tag) {
      return Err(Error::DuplicateTag { id, tag: tag.to_owned() });
    }
    record.tags.push(tag.to_owned());
    tracing::debug!(%id, tag, "tagged quote");
    Ok(())
  }

  /// Store an exploration on the record. Does nothing if the record is gone.
  pub fn update_exploration(&self, id: QuoteId, exploration: Exploration) {
    let mut inner = self.lock();
    if let Some(record) = inner.find_mut(id) {
      record.exploration = ExplorationState::Explored(exploration);
      tracing::debug!(%id, "stored exploration");
    }
  }

  /// Drop a cached exploration so the next lookup fetches a fresh one.
  pub fn clear_exploration(&self, id: QuoteId) {
    let mut inner = self.lock();
    if let Some(record) = inner.find_mut(id) {
      record.exploration = ExplorationState::Unexplored;
      tracing::debug!(%id, "cleared exploration");
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub fn get(&self, id: QuoteId) -> Option<QuoteRecord> {
    self.lock().records.iter().find(|r| r.id == id).cloned()
  }

  /// Snapshot of every record, most recently added first.
  pub fn list(&self) -> Vec<QuoteRecord> {
    self.lock().records.iter().cloned().collect()
  }

  /// Snapshot of the records matching `query`, most recently added first.
  pub fn query(&self, query: &QuoteFilter) -> Vec<QuoteRecord> {
    filter(&self.lock().records, query)
  }

  /// Distinct authors, sorted.
  pub fn authors(&self) -> Vec<String> { catalog::authors(&self.lock().records) }

  /// Distinct tags, lowercased and sorted.
  pub fn tags(&self) -> Vec<String> { catalog::tags(&self.lock().records) }

  pub fn len(&self) -> usize { self.lock().records.len() }

  pub fn is_empty(&self) -> bool { self.lock().records.is_empty() }
}
