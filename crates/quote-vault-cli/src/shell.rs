//! The interactive session: one collection, one discovery dialog, one
//! exploration view, and an optional quiz.
//!
//! Every command is reported through [`Outcome`], printed either as text or
//! (with `--json`) as one JSON object per line.

use std::sync::Arc;

use anyhow::{Context as _, anyhow, bail};
use clap::error::ErrorKind;
use quote_vault_ai::{
  CandidateQuote, DiscoveryWorkflow, ExplorationCache, Explored, Outcome, Phase,
  QuoteService,
};
use quote_vault_core::{
  NewQuote, QuoteCollection, QuoteFilter, QuoteId, QuoteRecord, catalog::parse_tag_list,
  quiz::Quiz,
};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt as _, AsyncWriteExt as _, BufReader};

use crate::command::{Command, Line, split_add_fields};

/// What a successful command produced.
#[derive(Debug, Clone)]
pub struct Reply {
  /// Human-readable rendering.
  pub text: String,
  /// Structured rendering for `--json`.
  pub data: Value,
}

impl Reply {
  fn new(text: impl Into<String>, data: Value) -> Self {
    Self { text: text.into(), data }
  }

  fn text(text: impl Into<String>) -> Self {
    let text = text.into();
    let data = json!({ "message": text });
    Self { text, data }
  }
}

pub struct Shell<S> {
  collection:     Arc<QuoteCollection>,
  discovery:      DiscoveryWorkflow<S>,
  explorer:       ExplorationCache<S>,
  filter:         QuoteFilter,
  quiz:           Option<Quiz>,
  discover_count: usize,
  json:           bool,
}

impl<S: QuoteService> Shell<S> {
  pub fn new(
    service: Arc<S>,
    collection: Arc<QuoteCollection>,
    discover_count: usize,
    json: bool,
  ) -> Self {
    Self {
      discovery: DiscoveryWorkflow::new(service.clone(), collection.clone()),
      explorer: ExplorationCache::new(service, collection.clone()),
      collection,
      filter: QuoteFilter::default(),
      quiz: None,
      discover_count,
      json,
    }
  }

  // ── Event loop ────────────────────────────────────────────────────────────

  /// Read commands from stdin until `quit`, end of input, or Ctrl-C at the
  /// prompt.
  pub async fn run(&mut self) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    if !self.json {
      stdout
        .write_all(b"Quote Vault. Type `help` for commands.\n")
        .await?;
    }

    loop {
      if !self.json {
        stdout.write_all(b"vault> ").await?;
        stdout.flush().await?;
      }

      let line = tokio::select! {
        line = lines.next_line() => line.context("reading input")?,
        _ = tokio::signal::ctrl_c() => None,
      };
      let Some(line) = line else { break };

      match self.handle(&line).await {
        Some(output) => {
          stdout.write_all(output.as_bytes()).await?;
          stdout.write_all(b"\n").await?;
        }
        None if line.trim().is_empty() => {}
        None => break,
      }
    }

    self.discovery.cancel();
    self.explorer.close();
    Ok(())
  }

  /// Handle one input line and return what to print. `None` means the user
  /// asked to leave (or typed nothing).
  pub async fn handle(&mut self, line: &str) -> Option<String> {
    if line.trim().is_empty() {
      return None;
    }

    let command = match Line::parse_line(line) {
      Ok(Command::Quit) => return None,
      Ok(command) => command,
      Err(e) => return Some(self.parse_failure(&e)),
    };

    let outcome: Outcome<Reply> = self.execute(command).await.into();
    Some(self.render(outcome))
  }

  /// Help requests count as successes; every other clap error is a failed
  /// command.
  fn parse_failure(&self, e: &clap::Error) -> String {
    let rendered = e.render().to_string().trim_end().to_owned();
    if !self.json {
      return rendered;
    }
    let outcome = match e.kind() {
      ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Outcome::ok(Reply::text(rendered)),
      _ => Outcome::failure(rendered),
    };
    self.render(outcome)
  }

  fn render(&self, outcome: Outcome<Reply>) -> String {
    if self.json {
      let outcome = Outcome {
        success: outcome.success,
        error:   outcome.error,
        payload: outcome.payload.map(|reply| reply.data),
      };
      return serde_json::to_string(&outcome)
        .unwrap_or_else(|e| format!(r#"{{"success":false,"error":"{e}"}}"#));
    }
    match (outcome.payload, outcome.error) {
      (Some(reply), _) => reply.text,
      (None, Some(error)) => format!("error: {error}"),
      (None, None) => String::new(),
    }
  }

  // ── Commands ──────────────────────────────────────────────────────────────

  async fn execute(&mut self, command: Command) -> anyhow::Result<Reply> {
    match command {
      Command::List => Ok(self.list()),
      Command::ByAuthor { name } => {
        self.filter.author = Some(name.join(" "));
        Ok(self.list())
      }
      Command::ByTag { tag } => {
        self.filter.tag = Some(tag);
        Ok(self.list())
      }
      Command::Search { words } => {
        self.filter.search = Some(words.join(" "));
        Ok(self.list())
      }
      Command::Clear => {
        self.filter = QuoteFilter::default();
        Ok(self.list())
      }
      Command::Authors => Ok(index_reply("authors", self.collection.authors())),
      Command::Tags => Ok(index_reply("tags", self.collection.tags())),

      Command::Add { fields } => {
        let (author, text, tags) = split_add_fields(&fields)
          .ok_or_else(|| anyhow!("usage: add <author> | <text> | <tag, tag, ...>"))?;
        let record = self
          .collection
          .add(NewQuote { text, author, tags: parse_tag_list(&tags) })?;
        Ok(Reply::new(
          format!("Added quote #{}.\n{}", record.id, render_record(&record)),
          serde_json::to_value(&record)?,
        ))
      }
      Command::Remove { id } => {
        let id = QuoteId(id);
        if !self.collection.remove(id) {
          bail!("no quote #{id}");
        }
        Ok(Reply::text(format!("Removed quote #{id}.")))
      }
      Command::Tag { id, tag } => {
        let id = QuoteId(id);
        self.collection.add_tag(id, &tag.join(" "))?;
        let record = self
          .collection
          .get(id)
          .ok_or_else(|| anyhow!("no quote #{id}"))?;
        Ok(Reply::new(render_record(&record), serde_json::to_value(&record)?))
      }

      Command::Discover { count, topic } => {
        let topic = topic.join(" ");
        let count = count.unwrap_or(self.discover_count);
        let found = tokio::select! {
          found = self.discovery.submit(&topic, count) => found?,
          _ = tokio::signal::ctrl_c() => {
            self.discovery.cancel();
            bail!("search cancelled");
          }
        };
        Ok(self.candidates_reply(&found))
      }
      Command::Candidates => {
        if self.discovery.phase() != Phase::Reviewing {
          bail!("nothing to review; run `discover <topic>` first");
        }
        Ok(self.candidates_reply(&self.discovery.candidates()))
      }
      Command::Toggle { index } => {
        let index = index
          .checked_sub(1)
          .ok_or_else(|| anyhow!("candidates are numbered from 1"))?;
        self.discovery.toggle_selection(index)?;
        Ok(self.candidates_reply(&self.discovery.candidates()))
      }
      Command::Commit => {
        let added = self.discovery.commit()?;
        let text = std::iter::once(format!("Added {} quote(s).", added.len()))
          .chain(added.iter().map(render_record))
          .collect::<Vec<_>>()
          .join("\n");
        Ok(Reply::new(text, serde_json::to_value(&added)?))
      }
      Command::Restart => {
        self.discovery.restart()?;
        Ok(Reply::text("Cleared. Run `discover <topic>` to search again."))
      }
      Command::Cancel => {
        self.discovery.cancel();
        Ok(Reply::text("Discovery cancelled."))
      }

      Command::Explore { id } => {
        let id = QuoteId(id);
        let explored = tokio::select! {
          explored = self.explorer.get(id) => explored?,
          _ = tokio::signal::ctrl_c() => {
            self.explorer.close();
            bail!("exploration cancelled");
          }
        };
        Ok(Reply::new(render_exploration(&explored), serde_json::to_value(&explored)?))
      }
      Command::Forget { id } => {
        self.explorer.invalidate(QuoteId(id));
        Ok(Reply::text(format!("Forgot the explanation for quote #{id}.")))
      }

      Command::Quiz => {
        let quiz = Quiz::new(&self.collection.list(), &mut rand::thread_rng())?;
        tracing::info!(questions = quiz.total(), "started quiz");
        self.quiz = Some(quiz);
        self.question_reply()
      }
      Command::Answer { choice } => self.answer(choice),
      Command::Next => {
        let quiz = self.quiz.as_mut().ok_or_else(no_quiz)?;
        quiz.next()?;
        match quiz.result() {
          Some(result) => {
            tracing::info!(score = result.score, total = result.total_questions, "finished quiz");
            Ok(Reply::new(
              format!(
                "Quiz complete! Final score: {} / {} ({:.0}%) in {}s.",
                result.score, result.total_questions, result.percentage, result.duration_seconds
              ),
              serde_json::to_value(&result)?,
            ))
          }
          None => self.question_reply(),
        }
      }

      Command::Quit => Ok(Reply::text("Bye.")),
    }
  }

  fn list(&self) -> Reply {
    let records = self.collection.query(&self.filter);
    let heading = match (&self.filter.author, &self.filter.tag) {
      (Some(author), _) => format!("Quotes by {author}"),
      (None, Some(tag)) => format!("Quotes tagged {tag:?}"),
      (None, None) => "All quotes".to_string(),
    };
    let heading = match self.filter.search.as_deref().map(str::trim) {
      Some(search) if !search.is_empty() => format!("{heading} matching {search:?}"),
      _ => heading,
    };

    let mut text = format!("{heading} ({})", records.len());
    for record in &records {
      text.push('\n');
      text.push_str(&render_record(record));
    }
    Reply::new(text, json!({ "filter": self.filter, "quotes": records }))
  }

  fn candidates_reply(&self, candidates: &[CandidateQuote]) -> Reply {
    let selection = self.discovery.selection();
    let mut text = format!(
      "Found {} quote(s) for {:?}. `toggle <n>` to change the selection, `commit` to add.",
      candidates.len(),
      self.discovery.topic().unwrap_or_default()
    );
    for (i, c) in candidates.iter().enumerate() {
      let mark = if selection.contains(&i) { "x" } else { " " };
      text.push_str(&format!(
        "\n[{mark}] {}. \"{}\"\n       - {}  [{}]",
        i + 1,
        c.text,
        c.author,
        c.tags.join(", ")
      ));
    }
    Reply::new(text, json!({ "candidates": candidates, "selected": selection }))
  }

  fn question_reply(&self) -> anyhow::Result<Reply> {
    let quiz = self.quiz.as_ref().ok_or_else(no_quiz)?;
    let question = quiz.current().ok_or_else(|| anyhow!("the quiz is over"))?;

    let mut text = format!(
      "Question {} of {} (score {})\n\"{}\"\nWho said it?",
      quiz.position() + 1,
      quiz.total(),
      quiz.score(),
      question.quote.text
    );
    for (i, option) in question.options.iter().enumerate() {
      text.push_str(&format!("\n  {}. {option}", i + 1));
    }
    Ok(Reply::new(
      text,
      json!({
        "question": quiz.position() + 1,
        "total": quiz.total(),
        "score": quiz.score(),
        "text": question.quote.text,
        "options": question.options,
      }),
    ))
  }

  fn answer(&mut self, choice: usize) -> anyhow::Result<Reply> {
    let quiz = self.quiz.as_mut().ok_or_else(no_quiz)?;
    let question = quiz.current().ok_or_else(|| anyhow!("the quiz is over"))?;
    let author = choice
      .checked_sub(1)
      .and_then(|i| question.options.get(i))
      .cloned()
      .ok_or_else(|| anyhow!("pick an option between 1 and {}", question.options.len()))?;
    let expected = question.quote.author.clone();

    let correct = quiz.answer(&author)?;
    let text = if correct {
      "Correct!".to_string()
    } else {
      format!("Not quite. It was {expected}.")
    };
    Ok(Reply::new(
      format!("{text} Type `next` to continue."),
      json!({ "correct": correct, "author": expected, "score": quiz.score() }),
    ))
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn no_quiz() -> anyhow::Error { anyhow!("no quiz running; type `quiz` to start one") }

fn index_reply(name: &str, entries: Vec<String>) -> Reply {
  Reply::new(entries.join("\n"), json!({ name: entries }))
}

fn render_record(record: &QuoteRecord) -> String {
  let explored = if record.exploration.is_explored() { " *" } else { "" };
  format!(
    "#{:<4}\"{}\"\n      - {}  [{}]{explored}",
    record.id.0,
    record.text,
    record.author,
    record.tags.join(", ")
  )
}

fn render_exploration(explored: &Explored) -> String {
  let attribution = match explored.is_confirmed {
    Some(true) => "\nAttribution: confirmed",
    Some(false) => "\nAttribution: unconfirmed or disputed",
    None => "",
  };
  let e = &explored.exploration;
  format!(
    "Meaning: {}\nOrigin: {}\nTrivia: {}{attribution}",
    e.meaning, e.origin, e.trivia
  )
}
