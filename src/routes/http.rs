//! HTTP endpoint handlers. These are thin wrappers that forward to the form
//! controller; each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::{Query, State}, http::StatusCode, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::logic::do_submit;
use crate::protocol::*;
use crate::state::{AppState, SharedController};

type ApiError = (StatusCode, Json<ErrorOut>);

fn not_found(message: impl Into<String>) -> ApiError {
  (StatusCode::NOT_FOUND, Json(ErrorOut { message: message.into() }))
}

fn conflict(message: String) -> ApiError {
  (StatusCode::CONFLICT, Json(ErrorOut { message }))
}

async fn session_or_404(state: &AppState, id: &str) -> Result<SharedController, ApiError> {
  state
    .session(id)
    .await
    .ok_or_else(|| not_found(format!("Unknown sessionId: {}", id)))
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_event(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(EventOut { event: state.config.event.clone() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_create_session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let (session_id, controller) = state.create_session().await;
  let form = to_out(&*controller.lock().await);
  info!(target: "registration", session = %session_id, "HTTP session created");
  Json(SessionOut { session_id, form })
}

#[instrument(level = "info", skip(state), fields(%q.session_id))]
pub async fn http_get_session(
  State(state): State<Arc<AppState>>,
  Query(q): Query<SessionQuery>,
) -> Result<Json<SessionOut>, ApiError> {
  let controller = session_or_404(&state, &q.session_id).await?;
  let form = to_out(&*controller.lock().await);
  Ok(Json(SessionOut { session_id: q.session_id, form }))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id, field = body.field.as_str(), value_len = body.value.len()))]
pub async fn http_update_field(
  State(state): State<Arc<AppState>>,
  Json(body): Json<FieldIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let controller = session_or_404(&state, &body.session_id).await?;
  let mut ctl = controller.lock().await;
  ctl.update_field(body.field, &body.value).map_err(conflict)?;
  Ok(Json(SessionOut { session_id: body.session_id, form: to_out(&ctl) }))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_refresh_challenge(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let controller = session_or_404(&state, &body.session_id).await?;
  let mut ctl = controller.lock().await;
  ctl.regenerate_challenge().map_err(conflict)?;
  info!(target: "registration", session = %body.session_id, "Challenge refreshed");
  Ok(Json(SessionOut { session_id: body.session_id, form: to_out(&ctl) }))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_submit(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let controller = session_or_404(&state, &body.session_id).await?;
  let mut ctl = controller.lock().await;
  do_submit(&state, &mut ctl).await.map_err(conflict)?;
  info!(target: "registration", session = %body.session_id, phase = ?ctl.phase(), "HTTP submit handled");
  Ok(Json(SessionOut { session_id: body.session_id, form: to_out(&ctl) }))
}

#[instrument(level = "info", skip(state, body), fields(%body.session_id))]
pub async fn http_reset(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionIn>,
) -> Result<Json<SessionOut>, ApiError> {
  let controller = session_or_404(&state, &body.session_id).await?;
  let mut ctl = controller.lock().await;
  ctl.reset().map_err(conflict)?;
  info!(target: "registration", session = %body.session_id, "Session reset for another registration");
  Ok(Json(SessionOut { session_id: body.session_id, form: to_out(&ctl) }))
}
