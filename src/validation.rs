//! Field validation for the registration draft.
//!
//! `validate_draft` is a pure function of the draft, the current challenge
//! and the message catalog. All rules run in one pass and every applicable
//! error is collected; nothing short-circuits across fields, so calling it
//! twice without mutation yields identical results.

use std::collections::HashMap;

use crate::config::Messages;
use crate::domain::{Challenge, Degree, FieldId, RegistrationDraft, Year};

/// Run every field rule and return the full field -> message map.
/// An empty map means the draft is valid.
pub fn validate_draft(
  draft: &RegistrationDraft,
  challenge: &Challenge,
  messages: &Messages,
) -> HashMap<FieldId, String> {
  let mut errors = HashMap::new();

  if draft.name.trim().is_empty() {
    errors.insert(FieldId::Name, messages.name_required.clone());
  }

  if Degree::parse(&draft.degree).is_none() {
    errors.insert(FieldId::Degree, messages.degree_required.clone());
  }

  if Year::parse(&draft.year).is_none() {
    errors.insert(FieldId::Year, messages.year_required.clone());
  }

  if draft.college_name.trim().is_empty() {
    errors.insert(FieldId::CollegeName, messages.college_required.clone());
  }

  if draft.university_name.trim().is_empty() {
    errors.insert(FieldId::UniversityName, messages.university_required.clone());
  }

  if draft.contact_number.trim().is_empty() {
    errors.insert(FieldId::ContactNumber, messages.contact_required.clone());
  } else if !is_valid_phone(&draft.contact_number) {
    errors.insert(FieldId::ContactNumber, messages.contact_invalid.clone());
  }

  // Alternate number is optional; pattern-checked only when present.
  if !draft.alternate_number.is_empty() && !is_valid_phone(&draft.alternate_number) {
    errors.insert(FieldId::AlternateNumber, messages.alternate_invalid.clone());
  }

  if draft.email_id.trim().is_empty() {
    errors.insert(FieldId::EmailId, messages.email_required.clone());
  } else if !is_valid_email(&draft.email_id) {
    errors.insert(FieldId::EmailId, messages.email_invalid.clone());
  }

  let answer = draft.challenge_answer.trim();
  if answer.is_empty() {
    errors.insert(FieldId::ChallengeAnswer, messages.challenge_required.clone());
  } else if answer.parse::<i64>().ok() != Some(challenge.answer) {
    // A non-numeric value is simply not equal; it never errors out.
    errors.insert(FieldId::ChallengeAnswer, messages.challenge_wrong.clone());
  }

  errors
}

/// Phone pattern: optional leading '+', then only digits, spaces, hyphens
/// and parentheses, with at least 10 such characters.
pub fn is_valid_phone(s: &str) -> bool {
  let rest = s.strip_prefix('+').unwrap_or(s);
  let mut count = 0usize;
  for ch in rest.chars() {
    match ch {
      '0'..='9' | ' ' | '-' | '(' | ')' => count += 1,
      _ => return false,
    }
  }
  count >= 10
}

/// Basic `local@domain.tld` shape: no whitespace, exactly one '@' with a
/// non-empty local part, and a '.' inside the domain with non-empty text on
/// both sides.
pub fn is_valid_email(s: &str) -> bool {
  if s.chars().any(|c| c.is_whitespace()) {
    return false;
  }
  let mut parts = s.splitn(2, '@');
  let local = parts.next().unwrap_or("");
  let domain = match parts.next() {
    Some(d) => d,
    None => return false,
  };
  if local.is_empty() || domain.contains('@') {
    return false;
  }
  // Some '.' strictly inside the domain.
  domain
    .char_indices()
    .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  fn challenge() -> Challenge {
    Challenge { num1: 3, num2: 4, answer: 7 }
  }

  fn valid_draft() -> RegistrationDraft {
    RegistrationDraft {
      name: "Alice".into(),
      degree: "UG".into(),
      year: "2".into(),
      college_name: "St. Mary's College".into(),
      university_name: "Anna University".into(),
      contact_number: "+91 9876543210".into(),
      alternate_number: String::new(),
      email_id: "a@b.com".into(),
      challenge_answer: "7".into(),
    }
  }

  #[test]
  fn fully_valid_draft_yields_no_errors() {
    let errors = validate_draft(&valid_draft(), &challenge(), &Messages::default());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
  }

  #[test]
  fn empty_draft_reports_all_eight_required_fields() {
    let errors =
      validate_draft(&RegistrationDraft::default(), &challenge(), &Messages::default());
    assert_eq!(errors.len(), 8);
    for field in [
      FieldId::Name,
      FieldId::Degree,
      FieldId::Year,
      FieldId::CollegeName,
      FieldId::UniversityName,
      FieldId::ContactNumber,
      FieldId::EmailId,
      FieldId::ChallengeAnswer,
    ] {
      assert!(errors.contains_key(&field), "missing error for {field:?}");
    }
    assert!(!errors.contains_key(&FieldId::AlternateNumber));
  }

  #[test]
  fn single_missing_field_is_reported_alone() {
    let mut draft = valid_draft();
    draft.university_name = "   ".into();
    let errors = validate_draft(&draft, &challenge(), &Messages::default());
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key(&FieldId::UniversityName));
  }

  #[test]
  fn whitespace_only_name_is_rejected() {
    let mut draft = valid_draft();
    draft.name = "  \t ".into();
    let errors = validate_draft(&draft, &challenge(), &Messages::default());
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec![&FieldId::Name]);
  }

  #[test]
  fn degree_and_year_must_be_enumerated_values() {
    let mut draft = valid_draft();
    draft.degree = "PhD".into();
    draft.year = "5".into();
    let errors = validate_draft(&draft, &challenge(), &Messages::default());
    assert!(errors.contains_key(&FieldId::Degree));
    assert!(errors.contains_key(&FieldId::Year));
  }

  #[test]
  fn phone_pattern_accepts_common_shapes() {
    assert!(is_valid_phone("+91 9876543210"));
    assert!(is_valid_phone("9876543210"));
    assert!(is_valid_phone("(044) 2257-5000"));
  }

  #[test]
  fn phone_pattern_rejects_short_or_lettered_input() {
    assert!(!is_valid_phone("123"));
    assert!(!is_valid_phone("98765abcde"));
    assert!(!is_valid_phone("+"));
    assert!(!is_valid_phone(""));
  }

  #[test]
  fn alternate_number_optional_but_pattern_checked() {
    let mut draft = valid_draft();
    draft.alternate_number = String::new();
    let errors = validate_draft(&draft, &challenge(), &Messages::default());
    assert!(!errors.contains_key(&FieldId::AlternateNumber));

    draft.alternate_number = "123".into();
    let errors = validate_draft(&draft, &challenge(), &Messages::default());
    assert!(errors.contains_key(&FieldId::AlternateNumber));
  }

  #[test]
  fn email_pattern_basics() {
    assert!(is_valid_email("a@b.com"));
    assert!(is_valid_email("first.last@sub.example.org"));
    assert!(!is_valid_email("missing-at.com"));
    assert!(!is_valid_email("a@b"));
    assert!(!is_valid_email("a@b."));
    assert!(!is_valid_email("a@.com"));
    assert!(!is_valid_email("a b@c.com"));
    assert!(!is_valid_email("a@b@c.com"));
  }

  #[test]
  fn challenge_answer_numeric_equality() {
    let mut draft = valid_draft();
    let msgs = Messages::default();

    draft.challenge_answer = " 7 ".into();
    assert!(validate_draft(&draft, &challenge(), &msgs).is_empty());

    draft.challenge_answer = "8".into();
    let errors = validate_draft(&draft, &challenge(), &msgs);
    assert_eq!(errors.get(&FieldId::ChallengeAnswer), Some(&msgs.challenge_wrong));

    draft.challenge_answer = "seven".into();
    let errors = validate_draft(&draft, &challenge(), &msgs);
    assert_eq!(errors.get(&FieldId::ChallengeAnswer), Some(&msgs.challenge_wrong));
  }

  #[test]
  fn validation_is_idempotent() {
    let mut draft = valid_draft();
    draft.email_id = "nope".into();
    let ch = challenge();
    let msgs = Messages::default();
    let first = validate_draft(&draft, &ch, &msgs);
    let second = validate_draft(&draft, &ch, &msgs);
    assert_eq!(first, second);
  }

  #[test]
  fn generated_challenges_stay_in_range() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
      let ch = Challenge::generate(&mut rng);
      assert!((1..=10).contains(&ch.num1));
      assert!((1..=10).contains(&ch.num2));
      assert_eq!(ch.answer, ch.num1 + ch.num2);
    }
  }
}
