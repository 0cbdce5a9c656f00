//! Shell command grammar, parsed with clap from one input line.

use clap::{Parser, Subcommand};

/// One line typed at the `vault>` prompt.
#[derive(Parser, Debug)]
#[command(
  no_binary_name = true,
  disable_version_flag = true,
  help_template = "{subcommands}"
)]
pub struct Line {
  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
  // ── Browsing ──────────────────────────────────────────────────────────────
  /// Show the quotes that pass the current filters.
  #[command(alias = "ls")]
  List,
  /// Only show quotes by this exact author.
  ByAuthor {
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    name: Vec<String>,
  },
  /// Only show quotes carrying this tag.
  ByTag { tag: String },
  /// Only show quotes whose text, author, or tags contain these words.
  Search {
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    words: Vec<String>,
  },
  /// Drop every filter.
  Clear,
  /// List all authors.
  Authors,
  /// List all tags.
  Tags,

  // ── Editing ───────────────────────────────────────────────────────────────
  /// Add a quote: `add <author> | <text> | <tag, tag, ...>`.
  Add {
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    fields: Vec<String>,
  },
  /// Remove a quote.
  #[command(alias = "rm")]
  Remove { id: u64 },
  /// Add a tag to a quote.
  Tag {
    id:  u64,
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    tag: Vec<String>,
  },

  // ── Discovery ─────────────────────────────────────────────────────────────
  /// Ask the quote service for quotes about a topic.
  Discover {
    /// How many quotes to ask for.
    #[arg(short = 'n', long)]
    count: Option<usize>,
    #[arg(required = true, num_args = 1.., trailing_var_arg = true)]
    topic: Vec<String>,
  },
  /// Show the discovered quotes and which are selected.
  Candidates,
  /// Select or deselect a discovered quote by its number.
  Toggle { index: usize },
  /// Add the selected discovered quotes to the vault.
  Commit,
  /// Discard the discovered quotes to search again.
  Restart,
  /// Abandon the current discovery.
  Cancel,

  // ── Exploration ───────────────────────────────────────────────────────────
  /// Explain a quote's meaning, origin, and trivia.
  Explore { id: u64 },
  /// Forget a cached explanation.
  Forget { id: u64 },

  // ── Quiz ──────────────────────────────────────────────────────────────────
  /// Start a "who said it?" quiz over the whole vault.
  Quiz,
  /// Answer the current quiz question by option number.
  Answer { choice: usize },
  /// Go to the next quiz question.
  Next,

  /// Leave the shell.
  #[command(alias = "exit")]
  Quit,
}

impl Line {
  /// Parse one input line. Help requests and mistakes come back as clap
  /// errors ready to print.
  pub fn parse_line(input: &str) -> Result<Command, clap::Error> {
    Self::try_parse_from(input.split_whitespace()).map(|line| line.command)
  }
}

/// Split the `add` arguments on `|` into author, text, and raw tags.
pub fn split_add_fields(fields: &[String]) -> Option<(String, String, String)> {
  let joined = fields.join(" ");
  let mut parts = joined.splitn(3, '|').map(str::trim);
  let author = parts.next()?.to_owned();
  let text = parts.next()?.to_owned();
  let tags = parts.next().unwrap_or_default().to_owned();
  Some((author, text, tags))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn multi_word_arguments_are_collected() {
    assert_eq!(
      Line::parse_line("by-author Ralph Waldo Emerson").unwrap(),
      Command::ByAuthor { name: vec!["Ralph".into(), "Waldo".into(), "Emerson".into()] }
    );
  }

  #[test]
  fn discover_takes_an_optional_count() {
    assert_eq!(
      Line::parse_line("discover -n 2 stoic calm").unwrap(),
      Command::Discover { count: Some(2), topic: vec!["stoic".into(), "calm".into()] }
    );
    assert_eq!(
      Line::parse_line("discover courage").unwrap(),
      Command::Discover { count: None, topic: vec!["courage".into()] }
    );
  }

  #[test]
  fn aliases_work() {
    assert_eq!(Line::parse_line("ls").unwrap(), Command::List);
    assert_eq!(Line::parse_line("rm 4").unwrap(), Command::Remove { id: 4 });
    assert_eq!(Line::parse_line("exit").unwrap(), Command::Quit);
  }

  #[test]
  fn bad_input_is_an_error() {
    assert!(Line::parse_line("remove four").is_err());
    assert!(Line::parse_line("frobnicate").is_err());
    assert!(Line::parse_line("toggle").is_err());
  }

  #[test]
  fn add_fields_split_on_pipes() {
    let fields: Vec<String> = "Seneca | Luck is what happens - when preparation meets opportunity. | luck, work"
      .split_whitespace()
      .map(String::from)
      .collect();
    let (author, text, tags) = split_add_fields(&fields).unwrap();
    assert_eq!(author, "Seneca");
    assert_eq!(text, "Luck is what happens - when preparation meets opportunity.");
    assert_eq!(tags, "luck, work");

    let fields = vec!["Seneca".to_string()];
    assert!(split_add_fields(&fields).is_none());
  }
}
