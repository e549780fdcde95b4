//! HTTP contract tests for the reqwest transport and the service's request
//! shapes, against a local wiremock server.

use std::sync::Arc;
use std::time::Duration;

use trivia_backend::config::AppConfig;
use trivia_backend::testing::{fixtures, ManualScheduler};
use trivia_backend::trivia::{CacheKind, HttpTransport, ReqwestTransport, TriviaService};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport() -> ReqwestTransport {
  ReqwestTransport::new(Duration::from_secs(5), "trivia-backend-tests/1.0").expect("client builds")
}

fn config_for(server: &MockServer) -> AppConfig {
  let toml = format!(
    r#"
[open-trivia]
enabled = true
categories = [9]
difficulty = "easy"

[api]
base-url = "{uri}/api.php"
token-url = "{uri}/api_token.php"
batch-size = 5
"#,
    uri = server.uri()
  );
  AppConfig::from_toml_str(&toml, "inline").expect("test config parses")
}

#[tokio::test]
async fn get_sends_user_agent_and_returns_body() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/ping"))
    .and(header("user-agent", "trivia-backend-tests/1.0"))
    .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
    .expect(1)
    .mount(&server)
    .await;

  let res = transport().get(&format!("{}/ping", server.uri())).await.expect("request succeeds");
  assert_eq!(res.status, 200);
  assert_eq!(res.body, "pong");
}

#[tokio::test]
async fn non_200_status_is_passed_through() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
    .mount(&server)
    .await;

  let res = transport().get(&format!("{}/api.php", server.uri())).await.expect("request completes");
  assert_eq!(res.status, 429);
  assert_eq!(res.body, "slow down");
}

#[tokio::test]
async fn unreachable_host_is_a_request_error() {
  // Port 9 (discard) on localhost is expected to refuse connections.
  let err = transport().get("http://127.0.0.1:9/api.php").await.expect_err("connection fails");
  assert!(err.to_string().contains("127.0.0.1:9"), "{err}");
}

#[tokio::test]
async fn refill_requests_expected_query_and_fills_cache() {
  let server = MockServer::start().await;
  let batch: Vec<_> = (0..5)
    .map(|i| fixtures::raw(&format!("Q{i}?"), "Yes", &["No", "Maybe", "Never"]))
    .collect();
  let body = fixtures::questions_response(&batch).body;

  Mock::given(method("GET"))
    .and(path("/api.php"))
    .and(query_param("amount", "5"))
    .and(query_param("type", "multiple"))
    .and(query_param("encode", "base64"))
    .and(query_param("category", "9"))
    .and(query_param("difficulty", "easy"))
    .respond_with(ResponseTemplate::new(200).set_body_string(body))
    .expect(1)
    .mount(&server)
    .await;

  let config = config_for(&server);
  let scheduler = Arc::new(ManualScheduler::new());
  let service = TriviaService::new(&config, Arc::new(transport()), scheduler.clone());

  assert!(service.request_refill(CacheKind::MultipleChoice, &config.open_trivia));
  assert!(scheduler.run_next().await);
  assert_eq!(service.cached(CacheKind::MultipleChoice), 5);
}

#[tokio::test]
async fn token_request_and_reset_hit_the_token_endpoint() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/api_token.php"))
    .and(query_param("command", "request"))
    .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::token_response("T0K3N").body))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/api_token.php"))
    .and(query_param("command", "reset"))
    .and(query_param("token", "T0K3N"))
    .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::reset_response(0, "T0K3N").body))
    .expect(1)
    .mount(&server)
    .await;

  let config = config_for(&server);
  let service = TriviaService::new(&config, Arc::new(transport()), Arc::new(ManualScheduler::new()));

  service.fetch_session_token().await;
  assert_eq!(service.session_token().as_deref(), Some("T0K3N"));
  service.reset_session_token().await;
  assert_eq!(service.session_token().as_deref(), Some("T0K3N"));
}
