//! GET-only HTTP transport used to reach the trivia API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::{debug, instrument};

use crate::error::TransportError;

/// Status and body of a completed request, whatever the status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
  pub status: u16,
  pub body: String,
}

impl HttpResponse {
  pub fn ok(body: impl Into<String>) -> Self {
    Self { status: 200, body: body.into() }
  }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
  async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with bounded connect/read timeouts and an
/// identifying User-Agent.
#[derive(Clone)]
pub struct ReqwestTransport {
  client: reqwest::Client,
  user_agent: String,
}

impl ReqwestTransport {
  pub fn new(timeout: Duration, user_agent: impl Into<String>) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder()
      .connect_timeout(timeout)
      .timeout(timeout)
      .build()?;
    Ok(Self { client, user_agent: user_agent.into() })
  }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
  #[instrument(level = "debug", skip(self))]
  async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
    let res = self
      .client
      .get(url)
      .header(USER_AGENT, &self.user_agent)
      .send()
      .await
      .map_err(|source| TransportError::Request { url: url.to_string(), source })?;

    let status = res.status().as_u16();
    let body = res
      .text()
      .await
      .map_err(|source| TransportError::Body { url: url.to_string(), source })?;
    debug!(target: "trivia", status, body_len = body.len(), "HTTP GET completed");

    Ok(HttpResponse { status, body })
  }
}
