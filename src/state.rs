//! Application state: form sessions, the optional store client, and config.
//!
//! This module owns:
//!   - the session map (session id -> form controller behind an async mutex)
//!   - the event configuration (from TOML or defaults)
//!   - the optional Supabase store client
//!
//! Each session's controller is locked independently, so a store call in
//! flight for one attendee never blocks another session. Within one session
//! the mutex serializes operations; the controller's phase guard is what
//! rejects edits while a submission is in flight.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_event_config_from_env, EventConfig};
use crate::controller::FormController;
use crate::store::SupabaseStore;

pub type SharedController = Arc<Mutex<FormController>>;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<HashMap<String, SharedController>>>,
    pub store: Option<SupabaseStore>,
    pub config: EventConfig,
}

impl AppState {
    /// Build state from env: load config and init the store client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_event_config_from_env().unwrap_or_default();
        info!(
            target: "c2c_backend",
            event = %config.event.title,
            date = %config.event.date,
            capacity = config.event.capacity,
            "Event configured"
        );

        let store = SupabaseStore::from_env();
        if let Some(s) = &store {
            info!(target: "c2c_backend", base_url = %s.base_url, table = %s.table, "Registration store enabled.");
        } else {
            info!(target: "c2c_backend", "Registration store disabled (no SUPABASE_URL / key). Submissions will fail.");
        }

        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
            config,
        }
    }

    /// Open a fresh form session with its own challenge and RNG.
    #[instrument(level = "debug", skip(self))]
    pub async fn create_session(&self) -> (String, SharedController) {
        let id = Uuid::new_v4().to_string();
        let controller = Arc::new(Mutex::new(FormController::new(&self.config)));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id.clone(), controller.clone());
        info!(target: "registration", session = %id, open = sessions.len(), "Form session opened");
        (id, controller)
    }

    /// Look up a session by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn session(&self, id: &str) -> Option<SharedController> {
        let sessions = self.sessions.read().await;
        sessions.get(id).cloned()
    }
}
