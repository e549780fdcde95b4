//! Mock transport for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::trivia::transport::{HttpResponse, HttpTransport};

#[derive(Clone, Debug)]
enum Reply {
  Response(HttpResponse),
  Fail(String),
}

#[derive(Debug)]
struct Rule {
  pattern: String,
  replies: VecDeque<Reply>,
}

/// Scripted implementation of `HttpTransport`.
///
/// Replies are registered against a URL substring. Each rule answers with its
/// queued replies in order and keeps repeating the last one. The first rule whose
/// pattern occurs in the URL wins; unmatched URLs fail. Every URL is recorded.
#[derive(Debug, Default)]
pub struct MockTransport {
  rules: Mutex<Vec<Rule>>,
  requests: Mutex<Vec<String>>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  /// Queues `response` for URLs containing `pattern`.
  pub fn respond(&self, pattern: &str, response: HttpResponse) {
    self.push(pattern, Reply::Response(response));
  }

  /// Queues a transport failure for URLs containing `pattern`.
  pub fn fail(&self, pattern: &str, message: &str) {
    self.push(pattern, Reply::Fail(message.to_string()));
  }

  fn push(&self, pattern: &str, reply: Reply) {
    let mut rules = self.rules.lock().unwrap();
    match rules.iter_mut().find(|r| r.pattern == pattern) {
      Some(rule) => rule.replies.push_back(reply),
      None => rules.push(Rule { pattern: pattern.to_string(), replies: VecDeque::from([reply]) }),
    }
  }

  /// All requested URLs, oldest first.
  pub fn requests(&self) -> Vec<String> {
    self.requests.lock().unwrap().clone()
  }

  pub fn requests_matching(&self, pattern: &str) -> Vec<String> {
    self.requests().into_iter().filter(|u| u.contains(pattern)).collect()
  }
}

#[async_trait]
impl HttpTransport for MockTransport {
  async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
    self.requests.lock().unwrap().push(url.to_string());

    let reply = {
      let mut rules = self.rules.lock().unwrap();
      rules.iter_mut().find(|r| url.contains(&r.pattern)).and_then(|rule| {
        if rule.replies.len() > 1 {
          rule.replies.pop_front()
        } else {
          rule.replies.front().cloned()
        }
      })
    };

    match reply {
      Some(Reply::Response(res)) => Ok(res),
      Some(Reply::Fail(message)) => Err(TransportError::Other { url: url.to_string(), message }),
      None => Err(TransportError::Other { url: url.to_string(), message: "no mock reply registered".into() }),
    }
  }
}
