//! Tests for `QuoteCollection`.

use crate::{
  Error, Exploration, NewQuote, QuoteCollection, QuoteFilter, QuoteId,
  catalog::seed_quotes,
};

fn quote(text: &str, author: &str, tags: &[&str]) -> NewQuote {
  NewQuote::new(text, author, tags.iter().copied())
}

fn ids(collection: &QuoteCollection) -> Vec<u64> {
  collection.list().iter().map(|r| r.id.0).collect()
}

fn exploration() -> Exploration {
  Exploration {
    meaning: "Endurance builds character.".into(),
    origin:  "Twilight of the Idols, 1888.".into(),
    trivia:  "Often quoted without the original context.".into(),
  }
}

// ─── Ids ─────────────────────────────────────────────────────────────────────

#[test]
fn first_id_is_one() {
  let c = QuoteCollection::new();
  let r = c.add(quote("Know thyself.", "Socrates", &[])).unwrap();
  assert_eq!(r.id, QuoteId(1));
}

#[test]
fn add_inserts_at_head() {
  let c = QuoteCollection::new();
  c.add(quote("one", "A", &[])).unwrap();
  c.add(quote("two", "B", &[])).unwrap();
  c.add(quote("three", "C", &[])).unwrap();
  assert_eq!(ids(&c), vec![3, 2, 1]);
}

#[test]
fn seeded_collection_continues_after_seed_ids() {
  let c = QuoteCollection::seeded();
  assert_eq!(c.len(), seed_quotes().len());
  let r = c.add(quote("new", "Someone", &[])).unwrap();
  assert_eq!(r.id, QuoteId(10));
  assert_eq!(c.list()[0].id, QuoteId(10));
}

#[test]
fn prepopulated_records_must_have_distinct_ids() {
  let mut records = seed_quotes();
  records[4].id = records[1].id;
  let err = QuoteCollection::with_records(records).unwrap_err();
  assert!(matches!(err, Error::DuplicateId(QuoteId(2))));

  let c = QuoteCollection::with_records(seed_quotes().into_iter().rev()).unwrap();
  assert_eq!(ids(&c), vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
  assert_eq!(c.add(quote("next", "N", &[])).unwrap().id, QuoteId(10));
}

#[test]
fn ids_are_never_reused_after_removal() {
  let c = QuoteCollection::new();
  let mut seen = Vec::new();

  for round in 0..5 {
    let a = c.add(quote("a", "A", &[])).unwrap();
    let batch = c
      .add_batch(vec![quote("b", "B", &[]), quote("c", "C", &[])])
      .unwrap();
    let newest = batch.last().unwrap().id;

    // Removing the newest record must not free its id.
    assert!(c.remove(newest));
    if round % 2 == 0 {
      c.remove(a.id);
    }

    for id in std::iter::once(a.id).chain(batch.iter().map(|r| r.id)) {
      assert!(seen.iter().all(|s| *s < id), "id {id} not above {seen:?}");
      seen.push(id);
    }
  }

  let mut live = ids(&c);
  live.sort();
  live.dedup();
  assert_eq!(live.len(), c.len());
}

#[test]
fn remove_missing_is_a_noop() {
  let c = QuoteCollection::seeded();
  let before = c.list();
  assert!(!c.remove(QuoteId(404)));
  assert_eq!(c.list(), before);
}

// ─── Batches ─────────────────────────────────────────────────────────────────

#[test]
fn batch_keeps_input_order_ahead_of_existing() {
  let c = QuoteCollection::seeded();
  let added = c
    .add_batch(vec![
      quote("first", "A", &["x"]),
      quote("second", "B", &["y"]),
      quote("third", "C", &["z"]),
    ])
    .unwrap();

  let added_ids: Vec<u64> = added.iter().map(|r| r.id.0).collect();
  assert_eq!(added_ids, vec![10, 11, 12]);

  let list = c.list();
  let texts: Vec<&str> = list.iter().take(4).map(|r| r.text.as_str()).collect();
  assert_eq!(texts, vec![
    "first",
    "second",
    "third",
    "The only way to do great work is to love what you do."
  ]);
}

#[test]
fn batch_with_an_invalid_quote_adds_nothing() {
  let c = QuoteCollection::seeded();
  let before = c.list();
  let err = c
    .add_batch(vec![quote("fine", "A", &[]), quote("no author", "  ", &[])])
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert_eq!(c.list(), before);

  // The failed batch must not have consumed ids.
  assert_eq!(c.add(quote("next", "B", &[])).unwrap().id, QuoteId(10));
}

#[test]
fn add_normalises_tags_and_trims_fields() {
  let c = QuoteCollection::new();
  let r = c
    .add(quote("  Carpe diem. ", " Horace ", &["Life", " life ", "", "Time"]))
    .unwrap();
  assert_eq!(r.text, "Carpe diem.");
  assert_eq!(r.author, "Horace");
  assert_eq!(r.tags, vec!["Life", "Time"]);
}

// ─── Tags ────────────────────────────────────────────────────────────────────

#[test]
fn duplicate_tag_ignoring_case_is_rejected() {
  let c = QuoteCollection::new();
  let r = c.add(quote("t", "A", &[])).unwrap();

  c.add_tag(r.id, "Work").unwrap();
  let err = c.add_tag(r.id, "work").unwrap_err();
  assert!(matches!(err, Error::DuplicateTag { .. }));

  let tags = c.get(r.id).unwrap().tags;
  assert_eq!(tags, vec!["Work"]);
}

#[test]
fn add_tag_trims_and_rejects_blank() {
  let c = QuoteCollection::new();
  let r = c.add(quote("t", "A", &["x"])).unwrap();

  assert!(matches!(c.add_tag(r.id, "   "), Err(Error::EmptyTag)));
  c.add_tag(r.id, "  Courage ").unwrap();
  assert_eq!(c.get(r.id).unwrap().tags, vec!["x", "Courage"]);
}

#[test]
fn add_tag_on_missing_quote_fails() {
  let c = QuoteCollection::new();
  assert!(matches!(
    c.add_tag(QuoteId(3), "x"),
    Err(Error::QuoteNotFound(QuoteId(3)))
  ));
}

// ─── Exploration ─────────────────────────────────────────────────────────────

#[test]
fn update_exploration_sets_all_fields() {
  let c = QuoteCollection::seeded();
  c.update_exploration(QuoteId(8), exploration());
  let r = c.get(QuoteId(8)).unwrap();
  assert_eq!(r.exploration.as_explored(), Some(&exploration()));

  c.clear_exploration(QuoteId(8));
  assert!(!c.get(QuoteId(8)).unwrap().exploration.is_explored());
}

#[test]
fn update_exploration_on_missing_quote_is_a_noop() {
  let c = QuoteCollection::seeded();
  let before = c.list();
  c.update_exploration(QuoteId(99), exploration());
  assert_eq!(c.list(), before);
}

// ─── Queries ─────────────────────────────────────────────────────────────────

#[test]
fn query_runs_the_filter_over_current_contents() {
  let c = QuoteCollection::seeded();
  let einstein = c.query(&QuoteFilter::by_author("Albert Einstein"));
  let found: Vec<u64> = einstein.iter().map(|r| r.id.0).collect();
  assert_eq!(found, vec![3, 7]);

  let added = c
    .add(quote(
      "Imagination is more important than knowledge.",
      "Albert Einstein",
      &["knowledge"],
    ))
    .unwrap();
  let knowledge = c.query(&QuoteFilter {
    author: Some("Albert Einstein".into()),
    tag:    Some("Knowledge".into()),
    search: None,
  });
  let found: Vec<QuoteId> = knowledge.iter().map(|r| r.id).collect();
  assert_eq!(found, vec![added.id, QuoteId(7)]);
}

#[test]
fn indexes_track_mutations() {
  let c = QuoteCollection::new();
  c.add(quote("a", "Zeno", &["Logic"])).unwrap();
  c.add(quote("b", "Aristotle", &["logic", "Ethics"])).unwrap();
  assert_eq!(c.authors(), vec!["Aristotle", "Zeno"]);
  assert_eq!(c.tags(), vec!["ethics", "logic"]);
}
