//! Seed data: built-in questions that keep the games playable with no config
//! and no network.

use crate::domain::{FreeformQuestion, MultipleChoiceQuestion};

pub fn seed_freeform_questions() -> Vec<FreeformQuestion> {
  vec![
    FreeformQuestion { question: "What is the capital of France?".into(), answer: "Paris".into() },
    FreeformQuestion { question: "How many legs does a spider have?".into(), answer: "8".into() },
    FreeformQuestion { question: "What gas do plants absorb from the air?".into(), answer: "Carbon dioxide".into() },
  ]
}

pub fn seed_multiple_choice_questions() -> Vec<MultipleChoiceQuestion> {
  vec![
    MultipleChoiceQuestion {
      question: "Which planet is known as the Red Planet?".into(),
      options: vec!["A. Venus".into(), "B. Mars".into(), "C. Jupiter".into(), "D. Mercury".into()],
      correct_label: "B".into(),
    },
    MultipleChoiceQuestion {
      question: "What is the largest ocean on Earth?".into(),
      options: vec!["A. Atlantic".into(), "B. Indian".into(), "C. Arctic".into(), "D. Pacific".into()],
      correct_label: "D".into(),
    },
  ]
}
