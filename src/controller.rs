//! The registration form controller: all mutable session state and the
//! submission lifecycle.
//!
//! Phases:
//!   Collecting  -> draft editable, field errors may be shown
//!   Submitting  -> draft frozen, store call in flight
//!   Submitted   -> draft discarded, certificate code retained
//!
//! The store call itself happens *between* `begin_submit` and
//! `complete_submit`, outside this module. That split keeps the controller
//! free of IO and makes the in-flight guard a phase check rather than a UI
//! affordance: while `Submitting`, edits and further submits are rejected.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::{EventConfig, Messages};
use crate::domain::{
  generate_certificate_code, Challenge, Degree, FieldId, RegistrationDraft, RegistrationRecord,
  Year,
};
use crate::validation::validate_draft;

/// Submission lifecycle state. The certificate code is drawn when the
/// submission starts and only retained if the store accepts the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
  Collecting,
  Submitting { certificate_code: String },
  Submitted { certificate_code: String },
}

/// Why `begin_submit` refused to produce a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
  /// Validation failed; the errors are recorded on the controller and no
  /// store call must be made.
  Invalid,
  /// A store call is already in flight for this session.
  InFlight,
  /// The session already completed; reset first.
  AlreadySubmitted,
}

pub struct FormController {
  draft: RegistrationDraft,
  challenge: Challenge,
  errors: HashMap<FieldId, String>,
  top_error: Option<String>,
  phase: Phase,
  messages: Messages,
  certificate_prefix: String,
  rng: StdRng,
}

impl FormController {
  pub fn new(cfg: &EventConfig) -> Self {
    Self::with_rng(cfg, StdRng::from_entropy())
  }

  /// Build with an explicit RNG so challenges and certificate codes are
  /// deterministic in tests.
  pub fn with_rng(cfg: &EventConfig, mut rng: StdRng) -> Self {
    let challenge = Challenge::generate(&mut rng);
    Self {
      draft: RegistrationDraft::default(),
      challenge,
      errors: HashMap::new(),
      top_error: None,
      phase: Phase::Collecting,
      messages: cfg.messages.clone(),
      certificate_prefix: cfg.registration.certificate_prefix.clone(),
      rng,
    }
  }

  pub fn phase(&self) -> &Phase {
    &self.phase
  }

  pub fn draft(&self) -> &RegistrationDraft {
    &self.draft
  }

  pub fn challenge(&self) -> &Challenge {
    &self.challenge
  }

  pub fn errors(&self) -> &HashMap<FieldId, String> {
    &self.errors
  }

  pub fn top_error(&self) -> Option<&str> {
    self.top_error.as_deref()
  }

  /// The retained code, present once the submission succeeded.
  pub fn certificate_code(&self) -> Option<&str> {
    match &self.phase {
      Phase::Submitted { certificate_code } => Some(certificate_code),
      _ => None,
    }
  }

  /// Set one field and optimistically clear its error. The field is not
  /// re-validated until the next submit attempt.
  pub fn update_field(&mut self, field: FieldId, value: &str) -> Result<(), String> {
    match self.phase {
      Phase::Submitting { .. } => return Err(self.messages.submit_in_flight.clone()),
      Phase::Submitted { .. } => return Err(self.messages.already_submitted.clone()),
      Phase::Collecting => {}
    }
    self.draft.set(field, value);
    self.errors.remove(&field);
    Ok(())
  }

  /// Draw a fresh challenge. Clears the challenge-answer error but leaves a
  /// stale answer value in place; the user must re-enter or re-check it.
  pub fn regenerate_challenge(&mut self) -> Result<(), String> {
    match self.phase {
      Phase::Submitting { .. } => return Err(self.messages.submit_in_flight.clone()),
      Phase::Submitted { .. } => return Err(self.messages.already_submitted.clone()),
      Phase::Collecting => {}
    }
    self.challenge = Challenge::generate(&mut self.rng);
    self.errors.remove(&FieldId::ChallengeAnswer);
    Ok(())
  }

  /// Pure validation of the current draft against the current challenge.
  pub fn validate(&self) -> HashMap<FieldId, String> {
    validate_draft(&self.draft, &self.challenge, &self.messages)
  }

  /// Guard half of submit. On a valid draft this freezes the session into
  /// `Submitting`, draws a certificate code and returns the store record;
  /// the caller performs the store call and reports back through
  /// `complete_submit`. On an invalid draft the full error map is recorded
  /// and no record is produced, so no partial submission can happen.
  pub fn begin_submit(&mut self) -> Result<RegistrationRecord, SubmitError> {
    match self.phase {
      Phase::Submitting { .. } => return Err(SubmitError::InFlight),
      Phase::Submitted { .. } => return Err(SubmitError::AlreadySubmitted),
      Phase::Collecting => {}
    }

    let errors = self.validate();
    if !errors.is_empty() {
      self.errors = errors;
      return Err(SubmitError::Invalid);
    }
    self.errors.clear();
    self.top_error = None;

    // validate() just guaranteed both parse; anything else is invalid.
    let (degree, year) = match (Degree::parse(&self.draft.degree), Year::parse(&self.draft.year)) {
      (Some(d), Some(y)) => (d, y),
      _ => return Err(SubmitError::Invalid),
    };

    let certificate_code = generate_certificate_code(&self.certificate_prefix, &mut self.rng);

    let record = RegistrationRecord {
      name: self.draft.name.clone(),
      degree,
      year,
      college_name: self.draft.college_name.clone(),
      university_name: self.draft.university_name.clone(),
      contact_number: self.draft.contact_number.clone(),
      alternate_number: if self.draft.alternate_number.is_empty() {
        None
      } else {
        Some(self.draft.alternate_number.clone())
      },
      email_id: self.draft.email_id.clone(),
      certificate_code: certificate_code.clone(),
    };

    self.phase = Phase::Submitting { certificate_code };
    Ok(record)
  }

  /// Resolution half of submit. Success keeps the certificate code and
  /// discards the draft; failure returns to `Collecting` with the store's
  /// message (or the configured fallback) and the draft untouched so the
  /// user can retry without retyping.
  pub fn complete_submit(&mut self, outcome: Result<(), String>) {
    let certificate_code = match &self.phase {
      Phase::Submitting { certificate_code } => certificate_code.clone(),
      _ => {
        debug!(target: "registration", "complete_submit outside Submitting; ignored");
        return;
      }
    };

    match outcome {
      Ok(()) => {
        self.draft = RegistrationDraft::default();
        self.errors.clear();
        self.top_error = None;
        self.phase = Phase::Submitted { certificate_code };
      }
      Err(msg) => {
        let msg = msg.trim().to_string();
        self.top_error = Some(if msg.is_empty() {
          self.messages.submit_fallback.clone()
        } else {
          msg
        });
        self.phase = Phase::Collecting;
      }
    }
  }

  /// "Register another person": only valid once submitted. Clears the
  /// draft and all errors, draws a fresh challenge and starts collecting
  /// again.
  pub fn reset(&mut self) -> Result<(), String> {
    match self.phase {
      Phase::Submitted { .. } => {}
      _ => return Err("Nothing to reset: no completed registration".into()),
    }
    self.draft = RegistrationDraft::default();
    self.errors.clear();
    self.top_error = None;
    self.challenge = Challenge::generate(&mut self.rng);
    self.phase = Phase::Collecting;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn controller() -> FormController {
    FormController::with_rng(&EventConfig::default(), StdRng::seed_from_u64(42))
  }

  fn fill_valid(ctl: &mut FormController) {
    ctl.update_field(FieldId::Name, "Alice").unwrap();
    ctl.update_field(FieldId::Degree, "UG").unwrap();
    ctl.update_field(FieldId::Year, "3").unwrap();
    ctl.update_field(FieldId::CollegeName, "St. Joseph's College").unwrap();
    ctl.update_field(FieldId::UniversityName, "Anna University").unwrap();
    ctl.update_field(FieldId::ContactNumber, "+91 9876543210").unwrap();
    ctl.update_field(FieldId::EmailId, "a@b.com").unwrap();
    let answer = ctl.challenge().answer.to_string();
    ctl.update_field(FieldId::ChallengeAnswer, &answer).unwrap();
  }

  fn assert_certificate_format(code: &str) {
    let suffix = code.strip_prefix("C2C-2025-").expect("prefix");
    assert_eq!(suffix.len(), 4);
    let n: u32 = suffix.parse().expect("numeric suffix");
    assert!((1000..=9999).contains(&n), "suffix out of range: {n}");
  }

  #[test]
  fn empty_submit_records_eight_errors_and_no_record() {
    let mut ctl = controller();
    assert_eq!(ctl.begin_submit(), Err(SubmitError::Invalid));
    assert_eq!(ctl.errors().len(), 8);
    assert_eq!(*ctl.phase(), Phase::Collecting);
  }

  #[test]
  fn valid_submit_reaches_submitted_with_certificate() {
    let mut ctl = controller();
    fill_valid(&mut ctl);

    let record = ctl.begin_submit().expect("record");
    assert!(matches!(ctl.phase(), Phase::Submitting { .. }));
    assert_eq!(record.name, "Alice");
    assert_eq!(record.degree, Degree::Ug);
    assert_eq!(record.year, Year::Third);
    assert_eq!(record.contact_number, "+91 9876543210");
    assert_eq!(record.alternate_number, None);
    assert_certificate_format(&record.certificate_code);

    ctl.complete_submit(Ok(()));
    assert!(matches!(ctl.phase(), Phase::Submitted { .. }));
    assert_eq!(ctl.certificate_code(), Some(record.certificate_code.as_str()));
    assert!(ctl.draft().name.is_empty(), "draft must be discarded");
    assert!(ctl.errors().is_empty());
  }

  #[test]
  fn store_failure_preserves_draft_and_surfaces_message() {
    let mut ctl = controller();
    fill_valid(&mut ctl);

    ctl.begin_submit().expect("record");
    ctl.complete_submit(Err("network down".into()));

    assert_eq!(*ctl.phase(), Phase::Collecting);
    assert_eq!(ctl.top_error(), Some("network down"));
    assert_eq!(ctl.draft().name, "Alice");
    assert_eq!(ctl.draft().contact_number, "+91 9876543210");
    assert_eq!(ctl.certificate_code(), None);
  }

  #[test]
  fn empty_store_message_falls_back_to_generic_text() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    ctl.begin_submit().expect("record");
    ctl.complete_submit(Err("  ".into()));
    assert_eq!(
      ctl.top_error(),
      Some("An error occurred while submitting your registration")
    );
  }

  #[test]
  fn retry_after_failure_succeeds_with_fresh_code() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    let first = ctl.begin_submit().expect("record");
    ctl.complete_submit(Err("network down".into()));

    let second = ctl.begin_submit().expect("record");
    assert_certificate_format(&second.certificate_code);
    // Codes are drawn fresh per attempt; equality is allowed but the draft
    // carried over unchanged.
    assert_eq!(first.name, second.name);
    ctl.complete_submit(Ok(()));
    assert!(matches!(ctl.phase(), Phase::Submitted { .. }));
  }

  #[test]
  fn in_flight_guard_rejects_edits_and_submits() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    ctl.begin_submit().expect("record");

    assert!(ctl.update_field(FieldId::Name, "Mallory").is_err());
    assert!(ctl.regenerate_challenge().is_err());
    assert_eq!(ctl.begin_submit(), Err(SubmitError::InFlight));
    // The frozen draft is untouched by the rejected edit.
    assert_eq!(ctl.draft().name, "Alice");
  }

  #[test]
  fn submitted_session_rejects_everything_but_reset() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    ctl.begin_submit().expect("record");
    ctl.complete_submit(Ok(()));

    assert!(ctl.update_field(FieldId::Name, "Bob").is_err());
    assert_eq!(ctl.begin_submit(), Err(SubmitError::AlreadySubmitted));

    ctl.reset().expect("reset from submitted");
    assert_eq!(*ctl.phase(), Phase::Collecting);
    assert!(ctl.draft().name.is_empty());
    assert_eq!(ctl.certificate_code(), None);
    assert!(ctl.update_field(FieldId::Name, "Bob").is_ok());
  }

  #[test]
  fn reset_is_rejected_while_collecting() {
    let mut ctl = controller();
    assert!(ctl.reset().is_err());
  }

  #[test]
  fn update_clears_only_that_fields_error() {
    let mut ctl = controller();
    assert_eq!(ctl.begin_submit(), Err(SubmitError::Invalid));
    assert!(ctl.errors().contains_key(&FieldId::Name));
    assert!(ctl.errors().contains_key(&FieldId::EmailId));

    ctl.update_field(FieldId::Name, "Alice").unwrap();
    assert!(!ctl.errors().contains_key(&FieldId::Name));
    // Other errors stay until the next full validation pass.
    assert!(ctl.errors().contains_key(&FieldId::EmailId));

    // The optimistic clear does not mean the field is valid: an empty
    // re-edit still fails the next submit.
    ctl.update_field(FieldId::Name, "").unwrap();
    assert_eq!(ctl.begin_submit(), Err(SubmitError::Invalid));
    assert!(ctl.errors().contains_key(&FieldId::Name));
  }

  #[test]
  fn regenerate_keeps_stale_answer_but_clears_its_error() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    // 999 can never equal a sum in [2,20], so the answer error is stable.
    ctl.update_field(FieldId::ChallengeAnswer, "999").unwrap();
    assert_eq!(ctl.begin_submit(), Err(SubmitError::Invalid));
    assert!(ctl.errors().contains_key(&FieldId::ChallengeAnswer));

    ctl.regenerate_challenge().unwrap();
    assert!(!ctl.errors().contains_key(&FieldId::ChallengeAnswer));
    // The stale value survives the regeneration and fails the next pass.
    assert_eq!(ctl.draft().challenge_answer, "999");
    assert_eq!(ctl.begin_submit(), Err(SubmitError::Invalid));
    assert!(ctl.errors().contains_key(&FieldId::ChallengeAnswer));
  }

  #[test]
  fn alternate_number_maps_to_absent_when_empty() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    let record = ctl.begin_submit().expect("record");
    assert_eq!(record.alternate_number, None);

    ctl.complete_submit(Err("retry".into()));
    ctl.update_field(FieldId::AlternateNumber, "044 2257 5000").unwrap();
    let record = ctl.begin_submit().expect("record");
    assert_eq!(record.alternate_number.as_deref(), Some("044 2257 5000"));
  }

  #[test]
  fn seeded_controllers_are_deterministic() {
    let a = FormController::with_rng(&EventConfig::default(), StdRng::seed_from_u64(7));
    let b = FormController::with_rng(&EventConfig::default(), StdRng::seed_from_u64(7));
    assert_eq!(a.challenge(), b.challenge());

    let mut a = a;
    let mut b = b;
    fill_valid(&mut a);
    fill_valid(&mut b);
    let ra = a.begin_submit().expect("record");
    let rb = b.begin_submit().expect("record");
    assert_eq!(ra.certificate_code, rb.certificate_code);
  }

  #[test]
  fn record_serializes_with_store_field_names() {
    let mut ctl = controller();
    fill_valid(&mut ctl);
    let record = ctl.begin_submit().expect("record");
    let json = serde_json::to_value(&record).expect("json");
    assert_eq!(json["degree"], "UG");
    assert_eq!(json["year"], "3");
    assert!(json.get("college_name").is_some());
    assert!(json.get("alternate_number").is_none(), "absent when empty");
    assert!(json.get("certificate_code").is_some());
  }
}
