//! Testing utilities: a scripted HTTP transport, a hand-cranked scheduler, and
//! fixtures for building API responses.
//!
//! # Example
//!
//! ```rust,ignore
//! use trivia_backend::testing::{fixtures, ManualScheduler, MockTransport};
//!
//! let transport = Arc::new(MockTransport::new());
//! transport.respond("api.php", fixtures::questions_response(&[fixtures::raw("Q?", "A", &["B"])]));
//! let scheduler = Arc::new(ManualScheduler::new());
//! let service = TriviaService::new(&config, transport.clone(), scheduler.clone());
//!
//! service.request_refill(CacheKind::MultipleChoice, &settings);
//! scheduler.run_next().await;
//! assert_eq!(transport.requests().len(), 1);
//! ```

mod manual_scheduler;
mod mock_transport;

pub use manual_scheduler::ManualScheduler;
pub use mock_transport::MockTransport;

/// Builders for API payloads in the wire format the service expects.
pub mod fixtures {
  use base64::engine::general_purpose::STANDARD;
  use base64::Engine;
  use serde_json::json;

  use crate::trivia::transport::HttpResponse;
  use crate::trivia::RawQuestion;

  /// An easy General Knowledge record.
  pub fn raw(question: &str, correct: &str, incorrect: &[&str]) -> RawQuestion {
    RawQuestion {
      category: "General Knowledge".to_string(),
      difficulty: "easy".to_string(),
      question: question.to_string(),
      correct_answer: correct.to_string(),
      incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
    }
  }

  /// Successful question response with every string base64-encoded.
  pub fn questions_response(questions: &[RawQuestion]) -> HttpResponse {
    let enc = |s: &str| STANDARD.encode(s);
    let results: Vec<_> = questions
      .iter()
      .map(|q| {
        json!({
          "type": enc(if q.incorrect_answers.len() == 1 { "boolean" } else { "multiple" }),
          "difficulty": enc(&q.difficulty),
          "category": enc(&q.category),
          "question": enc(&q.question),
          "correct_answer": enc(&q.correct_answer),
          "incorrect_answers": q.incorrect_answers.iter().map(|a| enc(a)).collect::<Vec<_>>(),
        })
      })
      .collect();
    HttpResponse::ok(json!({ "response_code": 0, "results": results }).to_string())
  }

  /// Response carrying only a status code.
  pub fn status_response(code: i32) -> HttpResponse {
    HttpResponse::ok(json!({ "response_code": code, "results": [] }).to_string())
  }

  pub fn token_response(token: &str) -> HttpResponse {
    HttpResponse::ok(
      json!({ "response_code": 0, "response_message": "Token Generated Successfully!", "token": token }).to_string(),
    )
  }

  pub fn reset_response(code: i32, token: &str) -> HttpResponse {
    HttpResponse::ok(json!({ "response_code": code, "token": token }).to_string())
  }
}
