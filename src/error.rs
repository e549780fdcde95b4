//! Error types for the fallible edges of the backend: outbound HTTP and config loading.
//!
//! The trivia decoder has no error type: malformed responses degrade to empty
//! results.

use thiserror::Error;

/// Failure of a single outbound GET.
#[derive(Debug, Error)]
pub enum TransportError {
  /// Connect, timeout, or other request-level failure.
  #[error("request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// Server answered with something other than 200.
  #[error("request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// Response arrived but the body could not be read as text.
  #[error("reading body from {url} failed: {source}")]
  Body {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// Failure reported by a non-reqwest transport (mocks, adapters).
  #[error("transport failure for {url}: {message}")]
  Other { url: String, message: String },
}

/// Failure to load the TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}
