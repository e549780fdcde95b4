//! Domain models used by the backend: the two consumer-facing question shapes
//! and the round kinds/sources the host hands out.

use serde::{Deserialize, Serialize};

/// A question graded by comparing free text against one correct answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeformQuestion {
  /// Question text, with the true/false prefix already applied when relevant.
  pub question: String,
  pub answer: String,
}

/// A question presented with lettered options ("A. …", "B. …").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
  pub question: String,
  /// Options in presentation order, each already carrying its letter label.
  pub options: Vec<String>,
  /// Label of the correct option, e.g. "C".
  pub correct_label: String,
}

/// What kind of round is presented to the player?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundKind {
  Freeform,
  MultipleChoice,
}

/// Where did the round's question come from?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionSource {
  OpenTrivia, // prefetched from the remote trivia API
  LocalBank,  // from the TOML question bank
  Seed,       // built-in seeds (last resort)
}

/// A question handed out to a player and kept until answered.
#[derive(Clone, Debug)]
pub enum Round {
  Freeform(FreeformQuestion),
  MultipleChoice(MultipleChoiceQuestion),
}

impl Round {
  pub fn kind(&self) -> RoundKind {
    match self {
      Round::Freeform(_) => RoundKind::Freeform,
      Round::MultipleChoice(_) => RoundKind::MultipleChoice,
    }
  }

  /// The answer a player is expected to give (text or option label).
  pub fn expected(&self) -> &str {
    match self {
      Round::Freeform(q) => &q.answer,
      Round::MultipleChoice(q) => &q.correct_label,
    }
  }
}
