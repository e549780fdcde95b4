//! Small utility helpers used across modules.

/// Number of whitespace-delimited words. Blank input has zero words.
pub fn count_words(s: &str) -> usize {
  s.split_whitespace().count()
}

/// True if `s` is non-empty and made only of ASCII digits and `allowed` characters.
/// Used to keep numeric answers (years, quantities) out of fuzzy matching.
pub fn is_numeric(s: &str, allowed: &[char]) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || allowed.contains(&c))
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge response payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    s.to_string()
  } else {
    let head: String = s.chars().take(max).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_words_on_any_whitespace() {
    assert_eq!(count_words(""), 0);
    assert_eq!(count_words("   \t "), 0);
    assert_eq!(count_words("Paris"), 1);
    assert_eq!(count_words("  United   States\tof America "), 4);
  }

  #[test]
  fn numeric_check_honours_allowed_chars() {
    assert!(is_numeric("1969", &[]));
    assert!(is_numeric("-3.5", &['-', '.']));
    assert!(!is_numeric("-3.5", &[]));
    assert!(!is_numeric("", &['-']));
    assert!(!is_numeric("12a", &['-', '.']));
  }

  #[test]
  fn truncation_keeps_short_strings() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let long = trunc_for_log("abcdefghij", 3);
    assert!(long.starts_with("abc…"));
    assert!(long.contains("10 bytes total"));
  }
}
