//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::State, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::logic::{evaluate_answer, new_freeform_round, new_multiple_choice_round};
use crate::protocol::{AnswerIn, AnswerOut, HealthOut};
use crate::state::AppState;
use crate::trivia::CacheKind;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    ok: true,
    cached_freeform: state.trivia.cached(CacheKind::Freeform),
    cached_multiple_choice: state.trivia.cached(CacheKind::MultipleChoice),
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_freeform_round(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(new_freeform_round(&state).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_multiple_choice_round(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(new_multiple_choice_round(&state).await)
}

#[instrument(level = "info", skip(state, body), fields(%body.round_id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> impl IntoResponse {
  let (correct, expected) = evaluate_answer(&state, &body.round_id, &body.answer).await;
  info!(target: "trivia_backend", id = %body.round_id, %correct, "HTTP answer evaluated");
  Json(AnswerOut { correct, expected })
}
