//! Decoder for the trivia API's response shape.
//!
//! The API only ever returns
//! `{"response_code": int, "results": [{"category", "difficulty", "question",
//! "correct_answer", "incorrect_answers": [..]}, ..]}`, so instead of a general
//! JSON parser this module scans for the handful of keys it needs.
//!
//! Lookups never fail loudly: a missing key or an unbalanced bracket turns into
//! an absent field or an empty list. The worst case for garbage input is an
//! empty `ParseResult`.
//!
//! All scanning works on byte offsets. Every delimiter we look for is ASCII, so
//! the offsets always land on char boundaries even with UTF-8 payloads.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;

use super::question::RawQuestion;

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
  &alphabet::STANDARD,
  GeneralPurposeConfig::new()
    .with_decode_allow_trailing_bits(true)
    .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Status codes defined by the API.
pub mod response_code {
  pub const SUCCESS: i32 = 0;
  pub const NO_RESULTS: i32 = 1;
  pub const INVALID_PARAMETER: i32 = 2;
  pub const TOKEN_NOT_FOUND: i32 = 3;
  pub const TOKEN_EMPTY: i32 = 4;
  pub const RATE_LIMITED: i32 = 5;
  /// Not an API code: the response carried no readable status.
  pub const MALFORMED: i32 = -1;
}

/// One decoded HTTP round-trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseResult {
  pub response_code: i32,
  /// Empty unless `response_code` is `SUCCESS`.
  pub questions: Vec<RawQuestion>,
}

impl ParseResult {
  fn empty(response_code: i32) -> Self {
    Self { response_code, questions: Vec::new() }
  }
}

/// Reads the first `"response_code"` value. Returns −1 when absent or not a number.
pub fn parse_status(text: &str) -> i32 {
  let Some(key) = text.find("\"response_code\"") else {
    return response_code::MALFORMED;
  };
  let Some(colon) = find_from(text, key, b':') else {
    return response_code::MALFORMED;
  };

  // Collect the first run of digits after the colon.
  let digits: String = text[colon + 1..]
    .chars()
    .skip_while(|c| !c.is_ascii_digit())
    .take_while(|c| c.is_ascii_digit())
    .collect();

  digits.parse::<i32>().unwrap_or(response_code::MALFORMED)
}

/// Decodes a full question response.
pub fn parse(text: &str) -> ParseResult {
  let code = parse_status(text);
  if code != response_code::SUCCESS {
    return ParseResult::empty(code);
  }

  let Some(results) = text.find("\"results\"") else {
    return ParseResult::empty(code);
  };
  let Some(open) = find_from(text, results, b'[') else {
    return ParseResult::empty(code);
  };
  let Some(close) = find_matching(text, open, b'[', b']') else {
    return ParseResult::empty(code);
  };

  let array = &text[open + 1..close];
  let mut questions = Vec::new();
  let mut pos = 0;
  while let Some(start) = find_from(array, pos, b'{') {
    let Some(end) = find_matching(array, start, b'{', b'}') else {
      break;
    };
    if let Some(q) = parse_question(&array[start..=end]) {
      questions.push(q);
    }
    pos = end + 1;
  }

  ParseResult { response_code: code, questions }
}

/// Base64-decodes `encoded` to UTF-8; anything that does not decode cleanly is
/// returned unchanged so plain-text responses pass through.
pub fn decode_transport(encoded: &str) -> String {
  if encoded.is_empty() {
    return String::new();
  }
  TRANSPORT
    .decode(encoded)
    .ok()
    .and_then(|bytes| String::from_utf8(bytes).ok())
    .unwrap_or_else(|| encoded.to_string())
}

fn parse_question(object: &str) -> Option<RawQuestion> {
  let field = |key: &str| extract_string(object, key).map(|s| decode_transport(&s));

  let question = field("question")?;
  let correct_answer = field("correct_answer")?;

  Some(RawQuestion {
    category: field("category").unwrap_or_default(),
    difficulty: field("difficulty").unwrap_or_default(),
    question,
    correct_answer,
    incorrect_answers: extract_string_array(object, "incorrect_answers"),
  })
}

/// Finds `"key": "value"` and returns the unescaped value.
/// A non-string value (number, null, array) counts as absent.
pub(crate) fn extract_string(json: &str, key: &str) -> Option<String> {
  let key_at = json.find(&format!("\"{key}\""))?;
  let colon = find_from(json, key_at, b':')?;

  let bytes = json.as_bytes();
  let mut i = colon + 1;
  while i < bytes.len() && bytes[i].is_ascii_whitespace() {
    i += 1;
  }
  if bytes.get(i) != Some(&b'"') {
    return None;
  }

  let start = i + 1;
  let end = find_closing_quote(json, start)?;
  Some(unescape(&json[start..end]))
}

/// Every quoted element of the array under `key`, unescaped and transport-decoded.
fn extract_string_array(json: &str, key: &str) -> Vec<String> {
  let Some(key_at) = json.find(&format!("\"{key}\"")) else {
    return Vec::new();
  };
  let Some(open) = find_from(json, key_at, b'[') else {
    return Vec::new();
  };
  let Some(close) = find_matching(json, open, b'[', b']') else {
    return Vec::new();
  };

  let content = &json[open + 1..close];
  let mut values = Vec::new();
  let mut pos = 0;
  while let Some(quote) = find_from(content, pos, b'"') {
    let Some(end) = find_closing_quote(content, quote + 1) else {
      break;
    };
    values.push(decode_transport(&unescape(&content[quote + 1..end])));
    pos = end + 1;
  }
  values
}

/// Resolves the standard JSON escapes. Unknown escapes (including `\u`) stay as written.
fn unescape(raw: &str) -> String {
  if !raw.contains('\\') {
    return raw.to_string();
  }

  let mut out = String::with_capacity(raw.len());
  let mut chars = raw.chars().peekable();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    let replacement = match chars.peek() {
      Some('"') => Some('"'),
      Some('\\') => Some('\\'),
      Some('/') => Some('/'),
      Some('n') => Some('\n'),
      Some('r') => Some('\r'),
      Some('t') => Some('\t'),
      Some('b') => Some('\u{0008}'),
      Some('f') => Some('\u{000C}'),
      _ => None,
    };
    match replacement {
      Some(r) => {
        out.push(r);
        chars.next();
      }
      None => out.push('\\'),
    }
  }
  out
}

fn find_from(s: &str, from: usize, needle: u8) -> Option<usize> {
  s.as_bytes().get(from..)?.iter().position(|&b| b == needle).map(|p| from + p)
}

/// Index of the unescaped `"` that closes a string whose content starts at `start`.
fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
  let bytes = s.as_bytes();
  let mut i = start;
  while i < bytes.len() {
    match bytes[i] {
      b'\\' if i + 1 < bytes.len() => i += 2,
      b'"' => return Some(i),
      _ => i += 1,
    }
  }
  None
}

/// Index of the `close` byte balancing the `open` byte at `start`, ignoring
/// anything inside string literals.
fn find_matching(s: &str, start: usize, open: u8, close: u8) -> Option<usize> {
  let bytes = s.as_bytes();
  if bytes.get(start) != Some(&open) {
    return None;
  }

  let mut depth = 1usize;
  let mut in_string = false;
  let mut i = start + 1;
  while i < bytes.len() {
    let b = bytes[i];
    if in_string {
      if b == b'\\' && i + 1 < bytes.len() {
        i += 1;
      } else if b == b'"' {
        in_string = false;
      }
    } else if b == b'"' {
      in_string = true;
    } else if b == open {
      depth += 1;
    } else if b == close {
      depth -= 1;
      if depth == 0 {
        return Some(i);
      }
    }
    i += 1;
  }
  None
}
