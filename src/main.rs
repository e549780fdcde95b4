//! Trivia Backend
//!
//! - Axum HTTP API serving free-form and multiple-choice rounds
//! - Questions prefetched from Open Trivia DB when enabled, else local bank/seeds
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   TRIVIA_CONFIG_PATH : path to TOML config (API settings, fuzzy matching, banks)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use trivia_backend::config::load_app_config_from_env;
use trivia_backend::routes::build_router;
use trivia_backend::state::AppState;
use trivia_backend::telemetry;
use trivia_backend::trivia::{CacheKind, ReqwestTransport, TokioScheduler, TriviaService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = load_app_config_from_env().unwrap_or_default();

  let transport = ReqwestTransport::new(config.api.timeout(), config.api.user_agent.clone())?;
  let trivia = TriviaService::new(&config, Arc::new(transport), Arc::new(TokioScheduler::current()));

  // Warm both caches so the first rounds can already come from the API.
  if config.open_trivia.enabled {
    trivia.initialize();
    trivia.request_refill(CacheKind::Freeform, &config.open_trivia);
    trivia.request_refill(CacheKind::MultipleChoice, &config.open_trivia);
  }

  let state = Arc::new(AppState::new(config, trivia));
  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "trivia_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = tokio::signal::ctrl_c().await;
      info!(target: "trivia_backend", "Shutdown signal received");
    })
    .await?;
  Ok(())
}
