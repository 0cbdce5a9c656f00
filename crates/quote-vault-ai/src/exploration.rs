//! The exploration cache: fetch a quote's meaning, origin, and trivia once,
//! then serve it from the record.
//!
//! The annotation lives on the [`QuoteRecord`](quote_vault_core::QuoteRecord)
//! itself, so the cache has no storage of its own. Lookups for the same quote
//! are serialised so that concurrent views still cause one service call.

use std::{
  collections::HashMap,
  sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
  },
};

use quote_vault_core::{Exploration, ExplorationState, QuoteCollection, QuoteId};
use serde::Serialize;

use crate::{
  Error, Result,
  service::{ExploreRequest, QuoteService},
};

/// An exploration handed back to a viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explored {
  pub id:           QuoteId,
  pub exploration:  Exploration,
  /// Attribution confidence from the service. `None` when served from the
  /// cache; the flag is not stored on the record.
  pub is_confirmed: Option<bool>,
}

impl Explored {
  pub fn from_cache(&self) -> bool { self.is_confirmed.is_none() }
}

type Gate = Arc<tokio::sync::Mutex<()>>;

type Gates = Mutex<HashMap<QuoteId, Gate>>;

fn lock_gates(gates: &Gates) -> MutexGuard<'_, HashMap<QuoteId, Gate>> {
  gates.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A caller's claim on one record's gate. Dropping it, whether the lookup
/// finished or its future was dropped, removes the map entry once no other
/// caller holds a claim.
struct GateClaim<'a> {
  gates: &'a Gates,
  id:    QuoteId,
  gate:  Option<Gate>,
}

impl<'a> GateClaim<'a> {
  fn new(gates: &'a Gates, id: QuoteId) -> Self {
    let gate = lock_gates(gates).entry(id).or_default().clone();
    Self { gates, id, gate: Some(gate) }
  }

  fn gate(&self) -> Option<&Gate> { self.gate.as_ref() }
}

impl Drop for GateClaim<'_> {
  fn drop(&mut self) {
    let mut gates = lock_gates(self.gates);
    // Claims are only cloned under the map lock, so once ours is gone the
    // count is exact.
    drop(self.gate.take());
    if gates.get(&self.id).is_some_and(|g| Arc::strong_count(g) == 1) {
      gates.remove(&self.id);
    }
  }
}

/// Lazily populated exploration annotations for one collection.
pub struct ExplorationCache<S> {
  service:    Arc<S>,
  collection: Arc<QuoteCollection>,
  /// Bumped by [`ExplorationCache::close`]; responses from an older
  /// generation are discarded.
  generation: AtomicU64,
  gates:      Gates,
}

impl<S: QuoteService> ExplorationCache<S> {
  pub fn new(service: Arc<S>, collection: Arc<QuoteCollection>) -> Self {
    Self {
      service,
      collection,
      generation: AtomicU64::new(0),
      gates: Mutex::new(HashMap::new()),
    }
  }

  /// Records with a lookup in progress or waiting.
  #[cfg(test)]
  pub(crate) fn pending_lookups(&self) -> usize { lock_gates(&self.gates).len() }

  /// The exploration for quote `id`, calling the service only if the record
  /// has none yet.
  pub async fn get(&self, id: QuoteId) -> Result<Explored> {
    let generation = self.generation.load(Ordering::SeqCst);
    let claim = GateClaim::new(&self.gates, id);
    let _turn = match claim.gate() {
      Some(gate) => gate.lock().await,
      None => return Err(Error::Cancelled),
    };
    self.fetch(id, generation).await
  }

  async fn fetch(&self, id: QuoteId, generation: u64) -> Result<Explored> {
    let record = self
      .collection
      .get(id)
      .ok_or(quote_vault_core::Error::QuoteNotFound(id))?;

    if let ExplorationState::Explored(exploration) = record.exploration {
      tracing::debug!(%id, "exploration served from cache");
      return Ok(Explored { id, exploration, is_confirmed: None });
    }
    if self.is_stale(generation) {
      return Err(Error::Cancelled);
    }

    tracing::info!(%id, author = %record.author, "exploring quote");
    let response = self
      .service
      .explore(ExploreRequest { text: record.text, author: record.author })
      .await;

    if self.is_stale(generation) {
      tracing::debug!(%id, "discarding exploration after close");
      return Err(Error::Cancelled);
    }

    let (exploration, is_confirmed) = match response {
      Ok(r) => r.into_parts(),
      Err(e) => {
        tracing::warn!(%id, error = %e, "exploration failed");
        return Err(e.into());
      }
    };

    self.collection.update_exploration(id, exploration.clone());
    Ok(Explored { id, exploration, is_confirmed: Some(is_confirmed) })
  }

  fn is_stale(&self, generation: u64) -> bool {
    self.generation.load(Ordering::SeqCst) != generation
  }

  /// The viewer went away: responses still in flight are dropped instead of
  /// being stored.
  pub fn close(&self) { self.generation.fetch_add(1, Ordering::SeqCst); }

  /// Forget the cached exploration for `id`; the next [`get`](Self::get)
  /// asks the service again.
  pub fn invalidate(&self, id: QuoteId) { self.collection.clear_exploration(id); }
}
