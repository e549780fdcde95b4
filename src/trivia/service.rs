//! Prefetching cache in front of the Open Trivia DB API.
//!
//! Two independent queues (free-form and multiple-choice) are refilled in the
//! background through the injected `Scheduler`. Callers only ever dequeue; an
//! empty cache yields `None` and the caller falls back to its own questions.
//!
//! Invariants:
//!   - at most one refill per cache is scheduled or running at a time
//!     (`RefillGuard` holds the in-flight flag until the task ends or is dropped);
//!   - question fetches are spaced by at least the rate-limit window, measured
//!     from the last completed round trip. A fetch that fires early re-schedules
//!     itself for the remainder;
//!   - once obtained, the session token rides along on every question request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use rand::seq::SliceRandom;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::decoder::{self, response_code};
use super::question::RawQuestion;
use super::scheduler::{duration_to_ticks, Scheduler, MIN_DELAY_TICKS};
use super::transport::HttpTransport;
use crate::config::{ApiSettings, AppConfig, Messages, OpenTriviaSettings};
use crate::domain::{FreeformQuestion, MultipleChoiceQuestion};
use crate::error::TransportError;
use crate::util::trunc_for_log;

/// Longest correct answer (in words) accepted into the free-form cache.
const FREEFORM_MAX_ANSWER_WORDS: usize = 3;

/// Delay before the first token request (~1s).
const TOKEN_BOOTSTRAP_DELAY_TICKS: u64 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheKind {
  Freeform,
  MultipleChoice,
}

impl CacheKind {
  /// Value of the API's `type` filter for this cache.
  fn type_filter(self) -> Option<&'static str> {
    match self {
      CacheKind::Freeform => None,
      CacheKind::MultipleChoice => Some("multiple"),
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      CacheKind::Freeform => "freeform",
      CacheKind::MultipleChoice => "multiple_choice",
    }
  }
}

struct QuestionCache {
  tx: Sender<RawQuestion>,
  rx: Receiver<RawQuestion>,
  fetching: AtomicBool,
}

impl QuestionCache {
  fn new() -> Self {
    let (tx, rx) = unbounded();
    Self { tx, rx, fetching: AtomicBool::new(false) }
  }

  fn len(&self) -> usize {
    self.rx.len()
  }

  fn pop(&self) -> Option<RawQuestion> {
    self.rx.try_recv().ok()
  }

  fn push(&self, q: RawQuestion) {
    // Both ends live in `self`, so the channel cannot be disconnected.
    let _ = self.tx.send(q);
  }
}

/// Owns a cache's in-flight flag from the moment a refill is scheduled until
/// the refill task finishes, fails, or is dropped unrun.
struct RefillGuard {
  service: Arc<TriviaService>,
  kind: CacheKind,
}

impl RefillGuard {
  fn acquire(service: &Arc<TriviaService>, kind: CacheKind) -> Option<Self> {
    service
      .cache(kind)
      .fetching
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| Self { service: Arc::clone(service), kind })
  }
}

impl Drop for RefillGuard {
  fn drop(&mut self) {
    self.service.cache(self.kind).fetching.store(false, Ordering::Release);
  }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
  m.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct TriviaService {
  api: ApiSettings,
  messages: Messages,
  debug: bool,
  transport: Arc<dyn HttpTransport>,
  scheduler: Arc<dyn Scheduler>,

  freeform: QuestionCache,
  multiple_choice: QuestionCache,

  token: Mutex<Option<String>>,
  /// Tokio clock, so the window follows the same time the scheduler sleeps on.
  last_request: Mutex<Option<Instant>>,
  /// Serializes question fetches so the window check and the request are atomic.
  request_gate: tokio::sync::Mutex<()>,
  initialized: AtomicBool,
}

impl TriviaService {
  pub fn new(config: &AppConfig, transport: Arc<dyn HttpTransport>, scheduler: Arc<dyn Scheduler>) -> Arc<Self> {
    Arc::new(Self {
      api: config.api.clone(),
      messages: config.messages.clone(),
      debug: config.debug,
      transport,
      scheduler,
      freeform: QuestionCache::new(),
      multiple_choice: QuestionCache::new(),
      token: Mutex::new(None),
      last_request: Mutex::new(None),
      request_gate: tokio::sync::Mutex::new(()),
      initialized: AtomicBool::new(false),
    })
  }

  fn cache(&self, kind: CacheKind) -> &QuestionCache {
    match kind {
      CacheKind::Freeform => &self.freeform,
      CacheKind::MultipleChoice => &self.multiple_choice,
    }
  }

  /// Number of questions currently waiting in a cache.
  pub fn cached(&self, kind: CacheKind) -> usize {
    self.cache(kind).len()
  }

  /// True while a refill for `kind` is scheduled or running.
  pub fn is_refilling(&self, kind: CacheKind) -> bool {
    self.cache(kind).fetching.load(Ordering::Acquire)
  }

  pub fn session_token(&self) -> Option<String> {
    lock(&self.token).clone()
  }

  /// Schedules the one-time session token bootstrap. Later calls are no-ops.
  pub fn initialize(self: &Arc<Self>) {
    if self.initialized.swap(true, Ordering::AcqRel) {
      return;
    }
    info!(target: "trivia", "Initializing Open Trivia DB service...");
    let this = Arc::clone(self);
    self.scheduler.run_delayed(
      Box::pin(async move { this.fetch_session_token().await }),
      TOKEN_BOOTSTRAP_DELAY_TICKS,
    );
  }

  /// Next free-form question, or `None` if disabled or the cache is empty.
  /// Never blocks: a refill is only scheduled.
  pub fn get_freeform_question(self: &Arc<Self>, settings: &OpenTriviaSettings) -> Option<FreeformQuestion> {
    let q = self.take(CacheKind::Freeform, settings)?;
    Some(q.to_freeform(Some(self.messages.true_or_false_prefix())))
  }

  /// Next multiple-choice question, or `None` if disabled or the cache is empty.
  pub fn get_multiple_choice_question(
    self: &Arc<Self>,
    settings: &OpenTriviaSettings,
  ) -> Option<MultipleChoiceQuestion> {
    let q = self.take(CacheKind::MultipleChoice, settings)?;
    Some(q.to_multiple_choice())
  }

  fn take(self: &Arc<Self>, kind: CacheKind, settings: &OpenTriviaSettings) -> Option<RawQuestion> {
    if !settings.enabled {
      return None;
    }
    self.initialize();

    let q = self.cache(kind).pop();
    if self.cache(kind).len() < settings.refill_threshold {
      self.request_refill(kind, settings);
    }
    q
  }

  /// Schedules a refill of `kind` unless one is already in flight or the cache
  /// is full. Returns whether a refill was scheduled.
  pub fn request_refill(self: &Arc<Self>, kind: CacheKind, settings: &OpenTriviaSettings) -> bool {
    if self.cache(kind).len() >= settings.cache_size {
      return false;
    }
    let Some(guard) = RefillGuard::acquire(self, kind) else {
      return false;
    };

    let delay = self.refill_delay_ticks();
    debug!(target: "trivia", cache = kind.label(), delay_ticks = delay, "Refill scheduled");
    self.schedule_refill(guard, settings.clone(), delay);
    true
  }

  /// Ticks to wait so the next request lands outside the rate-limit window.
  pub fn refill_delay_ticks(&self) -> u64 {
    let remaining = self.rate_limit_remaining();
    if remaining.is_zero() {
      MIN_DELAY_TICKS
    } else {
      duration_to_ticks(remaining)
    }
  }

  fn rate_limit_remaining(&self) -> Duration {
    match *lock(&self.last_request) {
      Some(at) => self.api.rate_limit().saturating_sub(at.elapsed()),
      None => Duration::ZERO,
    }
  }

  fn mark_request(&self) {
    *lock(&self.last_request) = Some(Instant::now());
  }

  fn schedule_refill(self: &Arc<Self>, guard: RefillGuard, settings: OpenTriviaSettings, delay_ticks: u64) {
    let this = Arc::clone(self);
    self.scheduler.run_delayed(
      Box::pin(async move { this.run_refill(guard, settings).await }),
      delay_ticks,
    );
  }

  async fn run_refill(self: Arc<Self>, guard: RefillGuard, settings: OpenTriviaSettings) {
    let gate = self.request_gate.lock().await;

    let remaining = self.rate_limit_remaining();
    if !remaining.is_zero() {
      drop(gate);
      debug!(target: "trivia", cache = guard.kind.label(), wait_ms = remaining.as_millis() as u64, "Refill fired inside rate-limit window; deferring");
      self.schedule_refill(guard, settings, duration_to_ticks(remaining));
      return;
    }

    self.fetch_questions(guard.kind, &settings).await;
    drop(gate);
    drop(guard);
  }

  /// Request URL for one batch of questions for `kind`.
  pub fn question_url(&self, kind: CacheKind, settings: &OpenTriviaSettings) -> String {
    let mut url = format!("{}?amount={}", self.api.base_url, self.api.batch_size);
    if let Some(t) = kind.type_filter() {
      url.push_str(&format!("&type={t}"));
    }
    url.push_str("&encode=base64");

    if let Some(category) = settings.categories.choose(&mut rand::thread_rng()) {
      url.push_str(&format!("&category={category}"));
    }
    if let Some(difficulty) = settings.difficulty.as_deref().filter(|d| !d.is_empty()) {
      url.push_str(&format!("&difficulty={}", urlencoding::encode(difficulty)));
    }
    if let Some(token) = self.session_token().filter(|t| !t.is_empty()) {
      url.push_str(&format!("&token={}", urlencoding::encode(&token)));
    }
    url
  }

  async fn fetch_questions(&self, kind: CacheKind, settings: &OpenTriviaSettings) {
    let url = self.question_url(kind, settings);
    let body = match self.get_ok(&url).await {
      Ok(body) => body,
      Err(e) => {
        warn!(target: "trivia", cache = kind.label(), error = %e, "Failed to fetch questions from Open Trivia DB");
        return;
      }
    };

    let result = decoder::parse(&body);
    match result.response_code {
      response_code::SUCCESS => {
        let total = result.questions.len();
        let cache = self.cache(kind);
        let mut added = 0usize;
        for q in result.questions {
          if kind == CacheKind::MultipleChoice || q.is_suitable_for_freeform(FREEFORM_MAX_ANSWER_WORDS) {
            cache.push(q);
            added += 1;
          }
        }
        if self.debug {
          info!(target: "trivia", cache = kind.label(), added, total, cached = cache.len(), "Fetched questions from Open Trivia DB");
        }
      }
      response_code::TOKEN_NOT_FOUND => {
        warn!(target: "trivia", "Open Trivia DB token not found, requesting new token");
        self.fetch_session_token().await;
      }
      response_code::TOKEN_EMPTY => {
        info!(target: "trivia", "Open Trivia DB token exhausted, resetting token");
        self.reset_session_token().await;
      }
      code => {
        warn!(target: "trivia", code, body = %trunc_for_log(&body, 200), "Open Trivia DB API returned unexpected code");
      }
    }

    self.mark_request();
  }

  /// Requests a fresh session token. On failure the token is left as it was.
  pub async fn fetch_session_token(&self) {
    let url = format!("{}?command=request", self.api.token_url);
    let body = match self.get_ok(&url).await {
      Ok(body) => body,
      Err(e) => {
        error!(target: "trivia", error = %e, "Error fetching Open Trivia DB session token");
        return;
      }
    };

    match extract_token(&body) {
      Some(token) => {
        *lock(&self.token) = Some(token);
        if self.debug {
          info!(target: "trivia", "Obtained Open Trivia DB session token");
        }
      }
      None => warn!(target: "trivia", body = %trunc_for_log(&body, 200), "Token response carried no token"),
    }
  }

  /// Asks the API to forget which questions the current token has seen.
  /// Without a token, or if the reset request fails, a new token is requested.
  pub async fn reset_session_token(&self) {
    let Some(token) = self.session_token().filter(|t| !t.is_empty()) else {
      self.fetch_session_token().await;
      return;
    };

    let url = format!("{}?command=reset&token={}", self.api.token_url, urlencoding::encode(&token));
    match self.get_ok(&url).await {
      Ok(body) => {
        let code = decoder::parse_status(&body);
        if code == response_code::SUCCESS {
          if self.debug {
            info!(target: "trivia", "Reset Open Trivia DB session token");
          }
        } else {
          warn!(target: "trivia", code, "Open Trivia DB token reset returned unexpected code");
        }
      }
      Err(e) => {
        error!(target: "trivia", error = %e, "Error resetting Open Trivia DB session token; requesting a new one");
        self.fetch_session_token().await;
      }
    }
  }

  /// GET that treats anything but HTTP 200 as a failure.
  async fn get_ok(&self, url: &str) -> Result<String, TransportError> {
    let res = self.transport.get(url).await?;
    if res.status != 200 {
      return Err(TransportError::Status { url: url.to_string(), status: res.status });
    }
    Ok(res.body)
  }
}

/// Pulls the value of `"token"` out of a token response with a plain scan.
/// Token responses are `{"response_code":0,"response_message":"..","token":".."}`.
fn extract_token(body: &str) -> Option<String> {
  let key = body.find("\"token\"")?;
  let colon = key + body[key..].find(':')?;
  let open = colon + body[colon..].find('"')?;
  let close = open + 1 + body[open + 1..].find('"')?;
  Some(body[open + 1..close].to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extracts_token_value() {
    let body = r#"{"response_code":0,"response_message":"Token Generated Successfully!","token":"f00dcafe"}"#;
    assert_eq!(extract_token(body).as_deref(), Some("f00dcafe"));
    assert_eq!(extract_token(r#"{ "token" : "abc" }"#).as_deref(), Some("abc"));
  }

  #[test]
  fn missing_token_is_none() {
    assert_eq!(extract_token(r#"{"response_code":0}"#), None);
    assert_eq!(extract_token(r#"{"token": "unterminated"#), None);
    assert_eq!(extract_token(r#"{"token"}"#), None);
  }

  #[test]
  fn type_filter_only_for_multiple_choice() {
    assert_eq!(CacheKind::Freeform.type_filter(), None);
    assert_eq!(CacheKind::MultipleChoice.type_filter(), Some("multiple"));
  }
}
