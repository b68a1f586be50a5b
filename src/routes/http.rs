//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, State, Query}, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{info, instrument};

use crate::protocol::*;
use crate::state::AppState;
use crate::logic::*;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state), fields(difficulty = ?q.difficulty, mode = ?q.mode))]
pub async fn http_get_level(
  State(state): State<Arc<AppState>>,
  Query(q): Query<LevelQuery>,
) -> Response {
  match new_level(&state, q.difficulty, q.mode).await {
    Ok(level) => {
      info!(target: "level", id = %level.id, difficulty = level.difficulty, mode = ?level.mode, "HTTP level served");
      Json(level).into_response()
    }
    Err(message) => (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorOut { message })).into_response(),
  }
}

#[instrument(level = "info", skip(state), fields(%id))]
pub async fn http_get_level_by_id(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Response {
  match fetch_level(&state, &id).await {
    Some(level) => Json(level).into_response(),
    None => (StatusCode::NOT_FOUND, Json(ErrorOut { message: format!("Unknown levelId: {}", id) })).into_response(),
  }
}

#[instrument(level = "info", skip(state, body), fields(%body.level_id, text_len = body.text.len()))]
pub async fn http_post_check(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CheckIn>,
) -> impl IntoResponse {
  let (known, is_match) = check_candidate(&state, &body.level_id, &body.text).await;
  info!(target: "level", id = %body.level_id, %known, %is_match, "HTTP candidate checked");
  Json(CheckOut { known, is_match })
}
