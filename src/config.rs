//! Loading backend configuration (trivia API settings, fuzzy matching, message
//! catalog, and optional local question banks) from TOML.
//!
//! See `AppConfig` for the expected schema. Every key is optional.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

use crate::error::ConfigError;

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct AppConfig {
  /// Enables verbose diagnostic logging in the trivia service.
  pub debug: bool,
  pub open_trivia: OpenTriviaSettings,
  pub fuzzy_matching: FuzzyMatchSettings,
  pub api: ApiSettings,
  pub messages: Messages,
  /// Static free-form bank: `[question, answer]` pairs.
  pub questions: Vec<(String, String)>,
  /// Static multiple-choice bank.
  pub multiple_choice: Vec<MultipleChoiceCfg>,
}

/// Per-game settings for pulling questions from the trivia API.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OpenTriviaSettings {
  pub enabled: bool,
  /// Soft cap: no refill is scheduled once a cache holds this many questions.
  pub cache_size: usize,
  /// A refill is requested when a cache drops below this size.
  pub refill_threshold: usize,
  /// API category ids; one is picked at random per fetch.
  pub categories: Vec<u32>,
  /// "easy" | "medium" | "hard"; absent means any.
  pub difficulty: Option<String>,
}

impl Default for OpenTriviaSettings {
  fn default() -> Self {
    Self {
      enabled: false,
      cache_size: 20,
      refill_threshold: 5,
      categories: Vec::new(),
      difficulty: None,
    }
  }
}

/// Parsed leniently: `per-word` in any case selects `PerWord`, any other
/// string selects `Fixed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum FuzzyMode {
  /// Tolerance grows with the number of words in the answer.
  PerWord,
  /// Tolerance is `base-distance` regardless of answer length.
  Fixed,
}

impl From<String> for FuzzyMode {
  fn from(s: String) -> Self {
    if s.trim().eq_ignore_ascii_case("per-word") {
      FuzzyMode::PerWord
    } else {
      FuzzyMode::Fixed
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FuzzyMatchSettings {
  pub enabled: bool,
  /// Answers shorter than this (in chars) are only accepted on exact match.
  pub min_length: usize,
  pub mode: FuzzyMode,
  pub base_distance: usize,
  pub per_word_distance: usize,
}

impl Default for FuzzyMatchSettings {
  fn default() -> Self {
    Self {
      enabled: false,
      min_length: 4,
      mode: FuzzyMode::PerWord,
      base_distance: 1,
      per_word_distance: 1,
    }
  }
}

/// Remote endpoint and transport tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ApiSettings {
  pub base_url: String,
  pub token_url: String,
  pub rate_limit_ms: u64,
  pub batch_size: u32,
  pub timeout_secs: u64,
  pub user_agent: String,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      base_url: "https://opentdb.com/api.php".into(),
      token_url: "https://opentdb.com/api_token.php".into(),
      rate_limit_ms: 5000,
      batch_size: 10,
      timeout_secs: 10,
      user_agent: concat!("trivia-backend/", env!("CARGO_PKG_VERSION")).into(),
    }
  }
}

impl ApiSettings {
  pub fn rate_limit(&self) -> Duration {
    Duration::from_millis(self.rate_limit_ms)
  }

  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Message catalog: arbitrary keys mapped to display strings.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Messages(HashMap<String, String>);

impl Messages {
  pub const TRUE_OR_FALSE_PREFIX: &'static str = "true-or-false-prefix";

  /// Typed lookup with a default value.
  pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
    self.0.get(key).map(String::as_str).unwrap_or(default)
  }

  pub fn true_or_false_prefix(&self) -> &str {
    self.get_or(Self::TRUE_OR_FALSE_PREFIX, "True or false?")
  }
}

/// Multiple-choice entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MultipleChoiceCfg {
  pub question: String,
  /// Options already carrying their labels, e.g. "A. Paris".
  pub answers: Vec<String>,
  pub correct_answer: String,
}

impl AppConfig {
  pub fn from_toml_str(s: &str, path: &str) -> Result<Self, ConfigError> {
    toml::from_str::<AppConfig>(s).map_err(|source| ConfigError::Parse { path: path.to_string(), source })
  }

  pub fn load(path: &str) -> Result<Self, ConfigError> {
    let s = std::fs::read_to_string(path)
      .map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
    Self::from_toml_str(&s, path)
  }
}

/// Attempt to load `AppConfig` from TRIVIA_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("TRIVIA_CONFIG_PATH").ok()?;
  match AppConfig::load(&path) {
    Ok(cfg) => {
      info!(target: "trivia_backend", %path, "Loaded config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "trivia_backend", %path, error = %e, "Failed to load TOML config");
      None
    }
  }
}
