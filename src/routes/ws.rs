//! WebSocket upgrade + message loop. Each connection owns one form session,
//! mirroring the lifetime of the mounted form in the original UI. Client
//! messages are parsed as JSON and we reply with a single JSON message per
//! request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{error, info, instrument};

use crate::controller::FormController;
use crate::logic::do_submit;
use crate::protocol::{to_out, ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "c2c_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "c2c_backend", "WebSocket connected; form session opened");
  let mut controller = FormController::new(&state.config);

  // Push the initial snapshot so the client has its challenge question
  // without a round trip (the original generates the captcha on mount).
  if send_ws(&mut socket, &ServerWsMessage::State { form: to_out(&controller) })
    .await
    .is_err()
  {
    return;
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        // Parse, dispatch, serialize response.
        let reply_msg = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => handle_client_ws(incoming, &state, &mut controller).await,
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        };

        if send_ws(&mut socket, &reply_msg).await.is_err() {
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "c2c_backend", "WebSocket disconnected; form session dropped");
}

async fn send_ws(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), ()> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  if let Err(e) = socket.send(Message::Text(out)).await {
    error!(target: "c2c_backend", error = %e, "WS send error");
    return Err(());
  }
  Ok(())
}

#[instrument(level = "info", skip(state, controller))]
async fn handle_client_ws(
  msg: ClientWsMessage,
  state: &AppState,
  controller: &mut FormController,
) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::GetState => ServerWsMessage::State { form: to_out(controller) },

    ClientWsMessage::UpdateField { field, value } => {
      match controller.update_field(field, &value) {
        Ok(()) => ServerWsMessage::State { form: to_out(controller) },
        Err(message) => ServerWsMessage::Error { message },
      }
    }

    ClientWsMessage::RefreshChallenge => match controller.regenerate_challenge() {
      Ok(()) => {
        tracing::info!(target: "registration", "WS challenge refreshed");
        ServerWsMessage::State { form: to_out(controller) }
      }
      Err(message) => ServerWsMessage::Error { message },
    },

    ClientWsMessage::Submit => match do_submit(state, controller).await {
      Ok(()) => {
        tracing::info!(target: "registration", phase = ?controller.phase(), "WS submit handled");
        ServerWsMessage::State { form: to_out(controller) }
      }
      Err(message) => ServerWsMessage::Error { message },
    },

    ClientWsMessage::Reset => match controller.reset() {
      Ok(()) => {
        tracing::info!(target: "registration", "WS session reset for another registration");
        ServerWsMessage::State { form: to_out(controller) }
      }
      Err(message) => ServerWsMessage::Error { message },
    },
  }
}
