//! Loading event configuration (event details + user-facing messages) from TOML.
//!
//! See `EventConfig`, `EventInfo` and `Messages` for the expected schema.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct EventConfig {
  #[serde(default)]
  pub event: EventInfo,
  #[serde(default)]
  pub messages: Messages,
  #[serde(default)]
  pub registration: RegistrationCfg,
}

/// Event details shown on the registration page. Overridable in TOML so the
/// same binary can serve a different edition of the event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventInfo {
  pub title: String,
  pub date: String,
  pub time: String,
  pub location: String,
  pub capacity: u32,
}

impl Default for EventInfo {
  fn default() -> Self {
    Self {
      title: "Campus to Cloud Event Registration".into(),
      date: "March 15, 2025".into(),
      time: "2:00 PM - 6:00 PM".into(),
      location: "Tech Innovation Center".into(),
      capacity: 100,
    }
  }
}

/// Knobs for the registration flow itself.
#[derive(Clone, Debug, Deserialize)]
pub struct RegistrationCfg {
  /// Certificate codes are `<prefix>-XXXX` with a 4-digit suffix.
  pub certificate_prefix: String,
}

impl Default for RegistrationCfg {
  fn default() -> Self {
    Self { certificate_prefix: "C2C-2025".into() }
  }
}

/// Every user-facing message the form can show. Defaults match the original
/// form copy; override them in TOML if you need to tune wording.
#[derive(Clone, Debug, Deserialize)]
pub struct Messages {
  // Required-field errors
  pub name_required: String,
  pub degree_required: String,
  pub year_required: String,
  pub college_required: String,
  pub university_required: String,
  pub contact_required: String,
  pub email_required: String,
  // Pattern errors
  pub contact_invalid: String,
  pub alternate_invalid: String,
  pub email_invalid: String,
  // Challenge errors
  pub challenge_required: String,
  pub challenge_wrong: String,
  // Submission lifecycle
  pub submit_fallback: String,
  pub submit_in_flight: String,
  pub already_submitted: String,
  pub store_disabled: String,
}

impl Default for Messages {
  fn default() -> Self {
    Self {
      name_required: "Name is required".into(),
      degree_required: "Please select your degree".into(),
      year_required: "Please select your year".into(),
      college_required: "College name is required".into(),
      university_required: "University name is required".into(),
      contact_required: "Contact number is required".into(),
      email_required: "Email ID is required".into(),
      contact_invalid: "Please enter a valid contact number".into(),
      alternate_invalid: "Please enter a valid alternate number".into(),
      email_invalid: "Please enter a valid email address".into(),
      challenge_required: "Please solve the captcha".into(),
      challenge_wrong: "Incorrect answer. Please try again.".into(),
      submit_fallback: "An error occurred while submitting your registration".into(),
      submit_in_flight: "Submission already in progress".into(),
      already_submitted: "Registration already submitted".into(),
      store_disabled: "Registration store is not configured".into(),
    }
  }
}

/// Attempt to load `EventConfig` from EVENT_CONFIG_PATH. On any parsing/IO
/// error, returns None and the built-in defaults are used.
pub fn load_event_config_from_env() -> Option<EventConfig> {
  let path = std::env::var("EVENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<EventConfig>(&s) {
      Ok(cfg) => {
        info!(target: "c2c_backend", %path, "Loaded event config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "c2c_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "c2c_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
