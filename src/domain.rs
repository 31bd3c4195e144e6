//! Domain models for the registration form: field set, draft, arithmetic
//! challenge, certificate codes, and the store record shape.

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Degree the attendee is enrolled in. The form submits the short codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
  #[serde(rename = "UG")]
  Ug,
  #[serde(rename = "PG")]
  Pg,
}

impl Degree {
  /// Parse the select-box value. Empty or unknown input means no selection.
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim() {
      "UG" => Some(Degree::Ug),
      "PG" => Some(Degree::Pg),
      _ => None,
    }
  }
}

/// Year of study, 1 through 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Year {
  #[serde(rename = "1")]
  First,
  #[serde(rename = "2")]
  Second,
  #[serde(rename = "3")]
  Third,
  #[serde(rename = "4")]
  Fourth,
}

impl Year {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim() {
      "1" => Some(Year::First),
      "2" => Some(Year::Second),
      "3" => Some(Year::Third),
      "4" => Some(Year::Fourth),
      _ => None,
    }
  }
}

/// The closed set of draft fields. `update_field` is typed over this enum,
/// so an unknown field name is rejected at the protocol boundary instead of
/// being dispatched at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
  Name,
  Degree,
  Year,
  CollegeName,
  UniversityName,
  ContactNumber,
  AlternateNumber,
  EmailId,
  ChallengeAnswer,
}

impl FieldId {
  /// The wire name, matching the original form's input names.
  pub fn as_str(&self) -> &'static str {
    match self {
      FieldId::Name => "name",
      FieldId::Degree => "degree",
      FieldId::Year => "year",
      FieldId::CollegeName => "collegeName",
      FieldId::UniversityName => "universityName",
      FieldId::ContactNumber => "contactNumber",
      FieldId::AlternateNumber => "alternateNumber",
      FieldId::EmailId => "emailId",
      FieldId::ChallengeAnswer => "challengeAnswer",
    }
  }
}

/// Everything the attendee has typed so far. All fields are kept raw as
/// entered; trimming and parsing happen in validation only.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
  pub name: String,
  pub degree: String,
  pub year: String,
  pub college_name: String,
  pub university_name: String,
  pub contact_number: String,
  pub alternate_number: String,
  pub email_id: String,
  pub challenge_answer: String,
}

impl RegistrationDraft {
  pub fn set(&mut self, field: FieldId, value: &str) {
    let slot = match field {
      FieldId::Name => &mut self.name,
      FieldId::Degree => &mut self.degree,
      FieldId::Year => &mut self.year,
      FieldId::CollegeName => &mut self.college_name,
      FieldId::UniversityName => &mut self.university_name,
      FieldId::ContactNumber => &mut self.contact_number,
      FieldId::AlternateNumber => &mut self.alternate_number,
      FieldId::EmailId => &mut self.email_id,
      FieldId::ChallengeAnswer => &mut self.challenge_answer,
    };
    *slot = value.to_string();
  }
}

/// The arithmetic bot-check. The expected answer lives server-side only;
/// the client sees num1 and num2. Any regeneration invalidates the previous
/// answer because the question and the accepted sum change together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Challenge {
  pub num1: i64,
  pub num2: i64,
  pub answer: i64,
}

impl Challenge {
  /// Two independent draws, uniform in [1,10].
  pub fn generate(rng: &mut StdRng) -> Self {
    let num1 = rng.gen_range(1..=10);
    let num2 = rng.gen_range(1..=10);
    Challenge { num1, num2, answer: num1 + num2 }
  }
}

/// Draw a certificate code: `<prefix>-XXXX` with a 4-digit suffix in
/// [1000,9999]. Fresh per submission attempt, never collision-checked.
pub fn generate_certificate_code(prefix: &str, rng: &mut StdRng) -> String {
  let suffix: u32 = rng.gen_range(1000..=9999);
  format!("{}-{}", prefix, suffix)
}

/// The record shape the registration store accepts (snake_case JSON).
/// `alternate_number` is omitted entirely when the field was left empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationRecord {
  pub name: String,
  pub degree: Degree,
  pub year: Year,
  pub college_name: String,
  pub university_name: String,
  pub contact_number: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub alternate_number: Option<String>,
  pub email_id: String,
  pub certificate_code: String,
}
