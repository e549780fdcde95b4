//! Fuzzy text matching used to grade free-form answers.
//!
//! Everything here is a pure function over borrowed strings; safe to call from
//! any thread without synchronization.

use crate::config::{FuzzyMatchSettings, FuzzyMode};
use crate::util::{count_words, is_numeric};

/// Levenshtein distance (unit-cost insert/delete/substitute) over chars.
/// Case-sensitive. Uses two rolling rows sized by the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  // Distance is symmetric, so keep the row as short as possible.
  let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

  let mut prev: Vec<usize> = (0..=short.len()).collect();
  let mut curr = vec![0usize; short.len() + 1];

  for (i, lc) in long.iter().enumerate() {
    curr[0] = i + 1;
    for (j, sc) in short.iter().enumerate() {
      let cost = usize::from(lc != sc);
      curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[short.len()]
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
  a == b || a.to_lowercase() == b.to_lowercase()
}

fn within_distance(input: &str, target: &str, max_distance: usize) -> bool {
  if max_distance == 0 {
    return false;
  }
  edit_distance(&input.to_lowercase(), &target.to_lowercase()) <= max_distance
}

/// Case-insensitive equality, or lowercase edit distance within `max_distance`.
pub fn fuzzy_equal(input: &str, target: &str, max_distance: usize) -> bool {
  eq_ignore_case(input, target) || within_distance(input, target, max_distance)
}

/// Like [`fuzzy_equal`], with tolerance `base + words(target) * per_word`.
pub fn fuzzy_equal_by_words(input: &str, target: &str, base_distance: usize, per_word_distance: usize) -> bool {
  if eq_ignore_case(input, target) {
    return true;
  }
  let max_distance = base_distance + count_words(target) * per_word_distance;
  within_distance(input, target, max_distance)
}

/// Grades a free-form answer.
///
/// Exact case-insensitive match always wins. Fuzzy tolerance only applies when
/// enabled, the correct answer is at least `min_length` chars long, and the
/// correct answer is not numeric (a near-miss year is still wrong).
pub fn check_freeform_answer(candidate: &str, correct_answer: &str, fuzzy: &FuzzyMatchSettings) -> bool {
  if eq_ignore_case(candidate, correct_answer) {
    return true;
  }
  if !fuzzy.enabled
    || correct_answer.chars().count() < fuzzy.min_length
    || is_numeric(correct_answer, &['-', '.'])
  {
    return false;
  }
  match fuzzy.mode {
    FuzzyMode::PerWord => {
      fuzzy_equal_by_words(candidate, correct_answer, fuzzy.base_distance, fuzzy.per_word_distance)
    }
    FuzzyMode::Fixed => fuzzy_equal(candidate, correct_answer, fuzzy.base_distance),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fuzzy(mode: FuzzyMode) -> FuzzyMatchSettings {
    FuzzyMatchSettings { enabled: true, min_length: 4, mode, base_distance: 1, per_word_distance: 1 }
  }

  #[test]
  fn distance_basics() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("kitten", "sitting"), 3);
    assert_eq!(edit_distance("flaw", "lawn"), 2);
    assert_eq!(edit_distance("Paris", "paris"), 1);
  }

  #[test]
  fn distance_is_a_metric_on_samples() {
    let words = ["", "a", "paris", "pari", "Paris", "london", "lond0n", "ünïcode", "unicode"];
    for s in words {
      assert_eq!(edit_distance(s, s), 0);
      for t in words {
        assert_eq!(edit_distance(s, t), edit_distance(t, s), "{s} / {t}");
        for u in words {
          assert!(edit_distance(s, u) <= edit_distance(s, t) + edit_distance(t, u), "{s} {t} {u}");
        }
      }
    }
  }

  #[test]
  fn distance_counts_chars_not_bytes() {
    assert_eq!(edit_distance("ünïcode", "unicode"), 2);
  }

  #[test]
  fn fuzzy_equal_cases() {
    assert!(fuzzy_equal("Paris", "paris", 0));
    assert!(fuzzy_equal("Pari", "Paris", 1));
    assert!(!fuzzy_equal("Par", "Paris", 1));
    assert!(!fuzzy_equal("Pari", "Paris", 0));
  }

  #[test]
  fn fuzzy_by_words_scales_with_answer_length() {
    assert!(fuzzy_equal_by_words("Unite States", "United States", 1, 1));
    // 1 + 2 words * 1 = 3 edits allowed
    assert!(fuzzy_equal_by_words("Unitd Stat", "United States", 1, 1));
    assert!(!fuzzy_equal_by_words("Uni Sta", "United States", 1, 1));
    assert!(!fuzzy_equal_by_words("x", "", 0, 5));
  }

  #[test]
  fn freeform_exact_match_ignores_settings() {
    let off = FuzzyMatchSettings::default();
    assert!(check_freeform_answer("PARIS", "Paris", &off));
    assert!(!check_freeform_answer("Pari", "Paris", &off));
  }

  #[test]
  fn freeform_fuzzy_respects_min_length_and_numbers() {
    let s = fuzzy(FuzzyMode::PerWord);
    assert!(check_freeform_answer("Pariss", "Paris", &s));
    // "Rome" is 4 chars so still eligible; "Ur" is not.
    assert!(check_freeform_answer("Rom", "Rome", &s));
    assert!(!check_freeform_answer("U", "Ur", &s));
    assert!(!check_freeform_answer("1968", "1969", &s));
    assert!(!check_freeform_answer("-3.4", "-3.5", &s));
  }

  #[test]
  fn freeform_fixed_mode_uses_base_distance_only() {
    let s = fuzzy(FuzzyMode::Fixed);
    assert!(check_freeform_answer("Unite States", "United States", &s));
    assert!(!check_freeform_answer("Unitd Stats", "United States", &s));
    assert!(check_freeform_answer("Unitd Stats", "United States", &fuzzy(FuzzyMode::PerWord)));
  }
}
