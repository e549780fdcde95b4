//! Core behaviors behind the HTTP handlers: handing out rounds and grading
//! answers.

use tracing::{debug, info, instrument};

use crate::domain::{QuestionSource, Round};
use crate::matching::check_freeform_answer;
use crate::protocol::{to_out, RoundOut};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn new_freeform_round(state: &AppState) -> RoundOut {
  let (q, source) = state.choose_freeform();
  issue(state, Round::Freeform(q), source).await
}

#[instrument(level = "info", skip(state))]
pub async fn new_multiple_choice_round(state: &AppState) -> RoundOut {
  let (q, source) = state.choose_multiple_choice();
  issue(state, Round::MultipleChoice(q), source).await
}

async fn issue(state: &AppState, round: Round, source: QuestionSource) -> RoundOut {
  let kind = round.kind();
  let placeholder = to_out("", &round, source);
  let id = state.insert_round(round).await;
  info!(target: "trivia_backend", %id, ?kind, ?source, "Round issued");
  RoundOut { id, ..placeholder }
}

/// Grades `answer` against a stored round, consuming it. Returns
/// `(correct, expected)`; an unknown id grades as wrong with no expectation.
#[instrument(level = "info", skip(state, answer), fields(%round_id, answer_len = answer.len()))]
pub async fn evaluate_answer(state: &AppState, round_id: &str, answer: &str) -> (bool, String) {
  let Some(round) = state.take_round(round_id).await else {
    debug!(target: "trivia_backend", %round_id, "Answer for unknown round");
    return (false, String::new());
  };

  let correct = match &round {
    Round::Freeform(q) => check_freeform_answer(answer, &q.answer, &state.config.fuzzy_matching),
    Round::MultipleChoice(q) => label_matches(answer, &q.correct_label),
  };
  (correct, round.expected().to_string())
}

/// Accepts "b", "B.", or "B. Mars" for label "B".
fn label_matches(answer: &str, label: &str) -> bool {
  let answer = answer.trim();
  let given = answer.split('.').next().unwrap_or(answer).trim();
  !given.is_empty() && given.eq_ignore_ascii_case(label.trim())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn label_compare_is_trimmed_and_case_insensitive() {
    assert!(label_matches(" b ", "B"));
    assert!(label_matches("B.", "B"));
    assert!(label_matches("b. Mars", "B"));
    assert!(!label_matches("C", "B"));
    assert!(!label_matches("", "B"));
    assert!(!label_matches("Bee", "B"));
  }
}
