//! "Who said it?" quiz over a set of quotes.
//!
//! Each question shows a quote and up to four authors to pick from: the real
//! one plus up to three others drawn from the same set of quotes. Randomness
//! is injected so callers (and tests) control it.

use chrono::{DateTime, Utc};
use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, catalog, quote::QuoteRecord};

/// How many wrong authors are offered alongside the right one.
pub const DISTRACTORS: usize = 3;

/// One quiz question.
#[derive(Debug, Clone)]
pub struct Question {
  pub quote:   QuoteRecord,
  /// Shuffled author choices; exactly one equals `quote.author`.
  pub options: Vec<String>,
  answer:      Option<String>,
}

impl Question {
  fn new<R: Rng + ?Sized>(quote: QuoteRecord, authors: &[String], rng: &mut R) -> Self {
    let others: Vec<&String> = authors.iter().filter(|a| **a != quote.author).collect();
    let mut options: Vec<String> = others
      .choose_multiple(rng, DISTRACTORS)
      .map(|a| (*a).clone())
      .collect();
    options.push(quote.author.clone());
    options.shuffle(rng);
    Self { quote, options, answer: None }
  }

  pub fn answer(&self) -> Option<&str> { self.answer.as_deref() }

  pub fn is_correct(&self) -> Option<bool> {
    self.answer.as_ref().map(|a| *a == self.quote.author)
  }
}

/// Final tally of a finished quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
  pub score:            usize,
  pub total_questions:  usize,
  pub percentage:       f64,
  pub started_at:       DateTime<Utc>,
  pub duration_seconds: i64,
}

/// Quiz state: the shuffled questions, a cursor, and the running score.
#[derive(Debug, Clone)]
pub struct Quiz {
  questions:   Vec<Question>,
  cursor:      usize,
  score:       usize,
  started_at:  DateTime<Utc>,
  finished_at: Option<DateTime<Utc>>,
}

impl Quiz {
  /// Shuffle `records` into a quiz. Authors for the choices come from the
  /// same records.
  pub fn new<R: Rng + ?Sized>(records: &[QuoteRecord], rng: &mut R) -> Result<Self> {
    if records.is_empty() {
      return Err(Error::EmptyQuiz);
    }

    let authors = catalog::authors(records);
    let mut shuffled = records.to_vec();
    shuffled.shuffle(rng);

    let questions = shuffled
      .into_iter()
      .map(|quote| Question::new(quote, &authors, rng))
      .collect();

    Ok(Self {
      questions,
      cursor: 0,
      score: 0,
      started_at: Utc::now(),
      finished_at: None,
    })
  }

  pub fn questions(&self) -> &[Question] { &self.questions }

  pub fn total(&self) -> usize { self.questions.len() }

  pub fn score(&self) -> usize { self.score }

  /// Zero-based index of the current question.
  pub fn position(&self) -> usize { self.cursor }

  pub fn is_finished(&self) -> bool { self.finished_at.is_some() }

  /// The question being asked, or `None` once the quiz is over.
  pub fn current(&self) -> Option<&Question> {
    if self.is_finished() {
      return None;
    }
    self.questions.get(self.cursor)
  }

  /// Answer the current question. Returns whether the answer was right.
  pub fn answer(&mut self, author: &str) -> Result<bool> {
    if self.is_finished() {
      return Err(Error::QuizFinished);
    }
    let index = self.cursor;
    let question = &mut self.questions[index];
    if question.answer.is_some() {
      return Err(Error::AlreadyAnswered(index));
    }

    let correct = author == question.quote.author;
    question.answer = Some(author.to_owned());
    if correct {
      self.score += 1;
    }
    Ok(correct)
  }

  /// Move past an answered question. Finishes the quiz after the last one.
  pub fn next(&mut self) -> Result<()> {
    if self.is_finished() {
      return Err(Error::QuizFinished);
    }
    if self.questions[self.cursor].answer.is_none() {
      return Err(Error::NotAnswered(self.cursor));
    }

    if self.cursor + 1 < self.questions.len() {
      self.cursor += 1;
    } else {
      self.finished_at = Some(Utc::now());
    }
    Ok(())
  }

  /// The tally, available once the quiz is finished.
  pub fn result(&self) -> Option<QuizResult> {
    let finished_at = self.finished_at?;
    let total = self.questions.len();
    Some(QuizResult {
      score:            self.score,
      total_questions:  total,
      percentage:       self.score as f64 / total as f64 * 100.0,
      started_at:       self.started_at,
      duration_seconds: (finished_at - self.started_at).num_seconds(),
    })
  }
}
