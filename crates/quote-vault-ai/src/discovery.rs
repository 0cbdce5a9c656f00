//! The discovery workflow: ask the service for quotes on a topic, let the
//! user pick some, and add the picks to the collection.
//!
//! ```text
//! Idle ──submit──▶ Searching ──response──▶ Reviewing ──commit──▶ Committing ──▶ Idle
//!                      │                      │
//!                      └──failure/empty──▶ Idle ◀──restart/cancel──┘
//! ```
//!
//! One workflow serves one dialog. The session lock is never held across the
//! service call; a generation counter bumped by [`DiscoveryWorkflow::cancel`]
//! tells a late response that nobody is waiting for it anymore.

use std::{
  collections::BTreeSet,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use quote_vault_core::{
  NewQuote, QuoteCollection, QuoteRecord, quote::normalize_tags,
};

use crate::{
  Error, Result,
  service::{CandidateQuote, DiscoverRequest, QuoteService},
};

/// Quotes requested per search when the caller has no preference.
pub const DEFAULT_DISCOVER_COUNT: usize = 5;

/// Candidates keep at most this many tags.
pub const MAX_CANDIDATE_TAGS: usize = 3;

// ─── Phase ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
  #[default]
  Idle,
  Searching,
  Reviewing,
  Committing,
}

// ─── Session ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Session {
  phase:      Phase,
  topic:      Option<String>,
  candidates: Vec<CandidateQuote>,
  /// Indices into `candidates`.
  selection:  BTreeSet<usize>,
  generation: u64,
}

impl Session {
  fn clear(&mut self) {
    self.phase = Phase::Idle;
    self.topic = None;
    self.candidates.clear();
    self.selection.clear();
  }

  fn require(&self, phase: Phase, operation: &'static str) -> Result<()> {
    if self.phase == phase {
      Ok(())
    } else {
      Err(Error::InvalidState { operation, phase: self.phase })
    }
  }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
  session.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resets a search that never got its answer, e.g. because the caller dropped
/// the `submit` future.
struct PendingSearch<'a> {
  session:    &'a Mutex<Session>,
  generation: u64,
  settled:    bool,
}

impl Drop for PendingSearch<'_> {
  fn drop(&mut self) {
    if self.settled {
      return;
    }
    let mut s = lock(self.session);
    if s.generation == self.generation && s.phase == Phase::Searching {
      tracing::debug!("abandoned search, returning to idle");
      s.clear();
    }
  }
}

// ─── Workflow ────────────────────────────────────────────────────────────────

/// Discovery state machine for one dialog.
pub struct DiscoveryWorkflow<S> {
  service:    Arc<S>,
  collection: Arc<QuoteCollection>,
  session:    Mutex<Session>,
}

impl<S: QuoteService> DiscoveryWorkflow<S> {
  pub fn new(service: Arc<S>, collection: Arc<QuoteCollection>) -> Self {
    Self { service, collection, session: Mutex::new(Session::default()) }
  }

  fn session(&self) -> MutexGuard<'_, Session> { lock(&self.session) }

  // ── Inspection ────────────────────────────────────────────────────────────

  pub fn phase(&self) -> Phase { self.session().phase }

  /// The topic of the current search or review.
  pub fn topic(&self) -> Option<String> { self.session().topic.clone() }

  pub fn candidates(&self) -> Vec<CandidateQuote> { self.session().candidates.clone() }

  /// Selected candidate indices, ascending.
  pub fn selection(&self) -> Vec<usize> {
    self.session().selection.iter().copied().collect()
  }

  // ── Transitions ───────────────────────────────────────────────────────────

  /// Search for up to `count` quotes about `topic`.
  ///
  /// On success the workflow is `Reviewing` with every candidate selected.
  /// On failure it is back to `Idle` and nothing else has changed.
  pub async fn submit(&self, topic: &str, count: usize) -> Result<Vec<CandidateQuote>> {
    let topic = topic.trim();
    if topic.is_empty() {
      return Err(Error::Validation("topic must not be empty".into()));
    }
    if count == 0 {
      return Err(Error::Validation("count must be at least 1".into()));
    }

    let generation = {
      let mut s = self.session();
      match s.phase {
        Phase::Idle => {}
        Phase::Searching => return Err(Error::Busy),
        phase => return Err(Error::InvalidState { operation: "search", phase }),
      }
      s.phase = Phase::Searching;
      s.topic = Some(topic.to_owned());
      s.generation
    };
    let mut pending = PendingSearch { session: &self.session, generation, settled: false };

    tracing::info!(topic, count, "searching for quotes");
    let response = self
      .service
      .discover(DiscoverRequest { topic_gist: topic.to_owned(), count })
      .await;
    pending.settled = true;

    let mut s = self.session();
    if s.generation != generation {
      tracing::debug!(topic, "discarding discovery response after cancel");
      return Err(Error::Cancelled);
    }

    let quotes = match response {
      Ok(r) => r.quotes,
      Err(e) => {
        s.clear();
        tracing::warn!(topic, error = %e, "discovery failed");
        return Err(e.into());
      }
    };

    let candidates = sanitize(quotes, count, &self.collection.list());
    if candidates.is_empty() {
      s.clear();
      tracing::warn!(topic, "discovery returned no usable quotes");
      return Err(Error::NothingFound { topic: topic.to_owned() });
    }

    tracing::info!(topic, found = candidates.len(), "reviewing discovered quotes");
    s.phase = Phase::Reviewing;
    s.selection = (0..candidates.len()).collect();
    s.candidates = candidates.clone();
    Ok(candidates)
  }

  /// Flip whether candidate `index` is selected. Returns the new state.
  pub fn toggle_selection(&self, index: usize) -> Result<bool> {
    let mut s = self.session();
    s.require(Phase::Reviewing, "change the selection")?;
    let len = s.candidates.len();
    if index >= len {
      return Err(Error::IndexOutOfRange { index, len });
    }
    if s.selection.remove(&index) {
      Ok(false)
    } else {
      s.selection.insert(index);
      Ok(true)
    }
  }

  /// Add the selected candidates to the collection, in candidate order.
  pub fn commit(&self) -> Result<Vec<QuoteRecord>> {
    let mut s = self.session();
    s.require(Phase::Reviewing, "add quotes")?;
    if s.selection.is_empty() {
      return Err(Error::NoSelection);
    }

    s.phase = Phase::Committing;
    let chosen: Vec<NewQuote> = s
      .selection
      .iter()
      .map(|&i| s.candidates[i].clone().into())
      .collect();

    match self.collection.add_batch(chosen) {
      Ok(records) => {
        tracing::info!(added = records.len(), "committed discovered quotes");
        s.clear();
        Ok(records)
      }
      Err(e) => {
        s.phase = Phase::Reviewing;
        Err(e.into())
      }
    }
  }

  /// Throw away the current candidates so a new search can start.
  pub fn restart(&self) -> Result<()> {
    let mut s = self.session();
    s.require(Phase::Reviewing, "start over")?;
    s.clear();
    Ok(())
  }

  /// Abandon whatever is in progress. A search still waiting on the service
  /// will discard its response.
  pub fn cancel(&self) {
    let mut s = self.session();
    if s.phase == Phase::Searching {
      tracing::info!("cancelling discovery search");
    }
    s.generation += 1;
    s.clear();
  }
}

// ─── Candidate cleanup ───────────────────────────────────────────────────────

fn fingerprint(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Trim fields, drop candidates with a blank text or author, drop quotes
/// already in `existing` or repeated in the response, cap tags, and keep at
/// most `count`.
fn sanitize(
  quotes: Vec<CandidateQuote>,
  count: usize,
  existing: &[QuoteRecord],
) -> Vec<CandidateQuote> {
  let mut seen: BTreeSet<String> =
    existing.iter().map(|r| fingerprint(&r.text)).collect();

  quotes
    .into_iter()
    .filter_map(|q| {
      let text = q.text.trim();
      let author = q.author.trim();
      if text.is_empty() || author.is_empty() || !seen.insert(fingerprint(text)) {
        return None;
      }
      let mut tags = normalize_tags(&q.tags);
      tags.truncate(MAX_CANDIDATE_TAGS);
      Some(CandidateQuote { text: text.to_owned(), author: author.to_owned(), tags })
    })
    .take(count)
    .collect()
}
