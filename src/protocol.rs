//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::EventInfo;
use crate::controller::{FormController, Phase};
use crate::domain::{FieldId, RegistrationDraft};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    GetState,
    UpdateField {
        field: FieldId,
        value: String,
    },
    RefreshChallenge,
    Submit,
    Reset,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    State {
        form: FormOut,
    },
    Error {
        message: String,
    },
}

/// The arithmetic question as shown to the user. The expected sum never
/// leaves the server.
#[derive(Debug, Serialize)]
pub struct ChallengeOut {
    pub num1: i64,
    pub num2: i64,
}

/// Full form snapshot used by both WS and HTTP.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOut {
    pub phase: String,
    pub draft: RegistrationDraft,
    pub challenge: ChallengeOut,
    pub errors: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_code: Option<String>,
}

/// Convert the controller's internal state to the public snapshot.
pub fn to_out(ctl: &FormController) -> FormOut {
    let phase = match ctl.phase() {
        Phase::Collecting => "collecting",
        Phase::Submitting { .. } => "submitting",
        Phase::Submitted { .. } => "submitted",
    };
    FormOut {
        phase: phase.to_string(),
        draft: ctl.draft().clone(),
        challenge: ChallengeOut {
            num1: ctl.challenge().num1,
            num2: ctl.challenge().num2,
        },
        errors: ctl
            .errors()
            .iter()
            .map(|(field, msg)| (field.as_str().to_string(), msg.clone()))
            .collect(),
        error: ctl.top_error().map(String::from),
        certificate_code: ctl.certificate_code().map(String::from),
    }
}

//
// HTTP request/response DTOs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct EventOut {
    pub event: EventInfo,
}

#[derive(Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub form: FormOut,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SessionIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct FieldIn {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub field: FieldId,
    pub value: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}
