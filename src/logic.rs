//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! Field updates, challenge refreshes and resets are single controller
//! calls; the one orchestrated behavior is the full submit: guard, store
//! call, resolution.

use tracing::{error, info, instrument};

use crate::controller::{FormController, SubmitError};
use crate::state::AppState;
use crate::util::mask_email;

/// Run the whole submit lifecycle for one controller.
///
/// `Ok(())` means the lifecycle advanced and the snapshot reflects the
/// outcome — including a validation failure, whose errors are now recorded
/// on the controller. `Err` means the submit was rejected outright
/// (already in flight, or already submitted).
#[instrument(level = "info", skip(state, ctl))]
pub async fn do_submit(state: &AppState, ctl: &mut FormController) -> Result<(), String> {
  let record = match ctl.begin_submit() {
    Ok(record) => record,
    Err(SubmitError::Invalid) => {
      info!(target: "registration", errors = ctl.errors().len(), "Submit rejected by validation");
      return Ok(());
    }
    Err(SubmitError::InFlight) => return Err(state.config.messages.submit_in_flight.clone()),
    Err(SubmitError::AlreadySubmitted) => {
      return Err(state.config.messages.already_submitted.clone())
    }
  };

  let outcome = match &state.store {
    Some(store) => store.create_registration(&record).await,
    None => {
      error!(target: "registration", "Submit attempted with no store configured");
      Err(state.config.messages.store_disabled.clone())
    }
  };

  match &outcome {
    Ok(()) => info!(
      target: "registration",
      certificate = %record.certificate_code,
      email = %mask_email(&record.email_id),
      "Registration accepted"
    ),
    Err(e) => error!(target: "registration", error = %e, "Registration store write failed"),
  }

  ctl.complete_submit(outcome);
  Ok(())
}
