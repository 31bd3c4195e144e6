//! Minimal Supabase REST client for the registration store.
//!
//! One operation only: insert a completed registration into a table via
//! `POST {base}/rest/v1/{table}`. The call is an opaque fallible remote
//! write; every failure collapses to a message string for the form's
//! top-level error, preferring the store's own error message.
//!
//! NOTE: We never log the API key and we mask attendee contact details in
//! logs to avoid PII leaks.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::domain::RegistrationRecord;
use crate::util::mask_contact;

#[derive(Clone)]
pub struct SupabaseStore {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub table: String,
}

impl SupabaseStore {
  /// Construct the client if SUPABASE_URL and an API key are present;
  /// otherwise return None and submissions fail with a configuration error.
  pub fn from_env() -> Option<Self> {
    let base_url = std::env::var("SUPABASE_URL").ok()?;
    let api_key = std::env::var("SUPABASE_SERVICE_KEY")
      .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
      .ok()?;
    let table =
      std::env::var("REGISTRATION_TABLE").unwrap_or_else(|_| "event_registrations".into());

    // The store call is the only suspension point in the form lifecycle;
    // a hung request must come back as a retryable top-level error.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(15))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, table })
  }

  /// Insert one registration record. Success carries no payload; we ask
  /// PostgREST for a minimal response.
  #[instrument(
    level = "info",
    skip(self, record),
    fields(table = %self.table, certificate = %record.certificate_code, contact = %mask_contact(&record.contact_number))
  )]
  pub async fn create_registration(&self, record: &RegistrationRecord) -> Result<(), String> {
    let url = format!("{}/rest/v1/{}", self.base_url, self.table);

    let res = self.client.post(&url)
      .header(USER_AGENT, "c2c-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .header("apikey", self.api_key.clone())
      .header("Prefer", "return=minimal")
      .json(record).send().await.map_err(|e| e.to_string())?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let msg = extract_store_error(&body).unwrap_or(body);
      return Err(format!("Registration store HTTP {}: {}", status, msg));
    }

    info!(target: "registration", certificate = %record.certificate_code, "Registration stored");
    Ok(())
  }
}

/// Try to extract a clean error message from a PostgREST error body.
fn extract_store_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EObj {
    message: String,
  }
  match serde_json::from_str::<EObj>(body) {
    Ok(e) if !e.message.trim().is_empty() => Some(e.message),
    _ => None,
  }
}
