//! Questions as delivered by the trivia API, and their conversion into the
//! two shapes the games consume.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{FreeformQuestion, MultipleChoiceQuestion};
use crate::util::count_words;

/// Phrasings that expect a listed option or admit several answers; free text
/// cannot be graded fairly against them.
const UNSUITABLE_PHRASES: [&str; 3] = ["which", "what are", "is not"];

/// Decoded question record. Also what the caches hold until consumed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawQuestion {
  pub category: String,
  pub difficulty: String,
  pub question: String,
  pub correct_answer: String,
  pub incorrect_answers: Vec<String>,
}

impl RawQuestion {
  /// True if the answer is "True" or "False" in any case.
  pub fn is_true_false(&self) -> bool {
    self.correct_answer.eq_ignore_ascii_case("true") || self.correct_answer.eq_ignore_ascii_case("false")
  }

  pub fn is_suitable_for_freeform(&self, max_answer_words: usize) -> bool {
    let lower = self.question.to_lowercase();
    if UNSUITABLE_PHRASES.iter().any(|p| lower.contains(p)) {
      return false;
    }
    count_words(&self.correct_answer) <= max_answer_words
  }

  /// Free-form rendering. True/false questions get `prefix` prepended when non-empty.
  pub fn to_freeform(&self, true_false_prefix: Option<&str>) -> FreeformQuestion {
    let question = match true_false_prefix {
      Some(prefix) if !prefix.is_empty() && self.is_true_false() => format!("{} {}", prefix, self.question),
      _ => self.question.clone(),
    };
    FreeformQuestion { question, answer: self.correct_answer.clone() }
  }

  pub fn to_multiple_choice(&self) -> MultipleChoiceQuestion {
    self.to_multiple_choice_with(&mut rand::thread_rng())
  }

  /// Shuffles `[correct, ..incorrect]` uniformly and labels them A, B, C, …
  /// If the correct text also appears among the incorrect answers, the first
  /// occurrence after shuffling is reported as correct. Incorrect answers
  /// beyond `MAX_OPTIONS - 1` are dropped.
  pub fn to_multiple_choice_with<R: Rng + ?Sized>(&self, rng: &mut R) -> MultipleChoiceQuestion {
    let incorrect = self.incorrect_answers.iter().take(MAX_OPTIONS - 1);
    let mut answers = Vec::with_capacity(incorrect.len() + 1);
    answers.push(self.correct_answer.as_str());
    answers.extend(incorrect.map(String::as_str));
    answers.shuffle(rng);

    let correct_index = answers.iter().position(|a| *a == self.correct_answer).unwrap_or(0);

    let options = answers
      .iter()
      .enumerate()
      .map(|(i, a)| format!("{}. {}", option_label(i), a))
      .collect();

    MultipleChoiceQuestion {
      question: self.question.clone(),
      options,
      correct_label: option_label(correct_index).to_string(),
    }
  }
}

/// One option per letter, 'A' through 'Z'.
pub const MAX_OPTIONS: usize = 26;

/// 'A' for 0, 'B' for 1, and so on. `index` must be below `MAX_OPTIONS`.
pub fn option_label(index: usize) -> char {
  debug_assert!(index < MAX_OPTIONS, "option index {index} has no letter");
  char::from(b'A' + index as u8)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;
  use std::collections::HashSet;

  fn record(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
    RawQuestion {
      category: "General Knowledge".into(),
      difficulty: "easy".into(),
      question: question.into(),
      correct_answer: correct.into(),
      incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
    }
  }

  #[test]
  fn true_false_classification() {
    assert!(record("Water is wet.", "True", &["False"]).is_true_false());
    assert!(record("Fire is cold.", "FALSE", &["True"]).is_true_false());
    assert!(!record("Capital of France?", "Paris", &[]).is_true_false());
  }

  #[test]
  fn freeform_prefix_only_for_true_false() {
    let tf = record("The sun is a star.", "True", &["False"]);
    assert_eq!(tf.to_freeform(Some("True or false?")).question, "True or false? The sun is a star.");
    assert_eq!(tf.to_freeform(Some("")).question, "The sun is a star.");
    assert_eq!(tf.to_freeform(None).question, "The sun is a star.");

    let open = record("Capital of France?", "Paris", &[]);
    let q = open.to_freeform(Some("True or false?"));
    assert_eq!(q.question, "Capital of France?");
    assert_eq!(q.answer, "Paris");
  }

  #[test]
  fn suitability_filters_phrases_and_long_answers() {
    assert!(!record("Which planet is largest?", "Jupiter", &[]).is_suitable_for_freeform(3));
    assert!(!record("WHAT ARE the primary colours?", "Red", &[]).is_suitable_for_freeform(3));
    assert!(!record("Pluto is not a planet.", "True", &[]).is_suitable_for_freeform(3));
    assert!(!record("Full title?", "The Lord Of Rings", &[]).is_suitable_for_freeform(3));
    assert!(record("Capital of the USA?", "Washington D.C.", &[]).is_suitable_for_freeform(3));
    assert!(record("Empty answer?", "", &[]).is_suitable_for_freeform(0));
  }

  #[test]
  fn multiple_choice_labels_and_correct_option() {
    let q = record("2 + 2?", "4", &["3", "5", "22"]);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
      let mc = q.to_multiple_choice_with(&mut rng);
      assert_eq!(mc.options.len(), 4);
      for (i, opt) in mc.options.iter().enumerate() {
        assert!(opt.starts_with(&format!("{}. ", option_label(i))), "{opt}");
      }
      let idx = (mc.correct_label.as_bytes()[0] - b'A') as usize;
      assert_eq!(mc.options[idx], format!("{}. 4", mc.correct_label));
      assert_eq!(mc.question, "2 + 2?");
    }
  }

  #[test]
  fn multiple_choice_shuffle_reaches_every_position() {
    let q = record("Pick", "right", &["w1", "w2", "w3"]);
    let mut rng = StdRng::seed_from_u64(42);
    let labels: HashSet<String> = (0..200).map(|_| q.to_multiple_choice_with(&mut rng).correct_label).collect();
    assert_eq!(labels.len(), 4);
  }

  #[test]
  fn multiple_choice_with_no_incorrect_answers() {
    let mc = record("Only one", "yes", &[]).to_multiple_choice();
    assert_eq!(mc.options, vec!["A. yes".to_string()]);
    assert_eq!(mc.correct_label, "A");
  }

  #[test]
  fn duplicate_correct_text_reports_first_occurrence() {
    let mc = record("Dup", "same", &["same", "other"]).to_multiple_choice();
    let first = mc.options.iter().position(|o| o.ends_with(". same")).unwrap();
    assert_eq!(mc.correct_label, option_label(first).to_string());
  }

  #[test]
  fn option_count_is_capped_at_one_letter_each() {
    let incorrect: Vec<String> = (0..40).map(|i| format!("wrong {i}")).collect();
    let incorrect: Vec<&str> = incorrect.iter().map(String::as_str).collect();
    let q = record("Many", "right", &incorrect);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
      let mc = q.to_multiple_choice_with(&mut rng);
      assert_eq!(mc.options.len(), MAX_OPTIONS);
      let labels: HashSet<char> = mc.options.iter().filter_map(|o| o.chars().next()).collect();
      assert_eq!(labels.len(), MAX_OPTIONS);
      let idx = (mc.correct_label.as_bytes()[0] - b'A') as usize;
      assert_eq!(mc.options[idx], format!("{}. right", mc.correct_label));
    }
    assert_eq!(option_label(MAX_OPTIONS - 1), 'Z');
  }
}
