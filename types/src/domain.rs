use std::borrow::Cow;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{SignupError, PHONE_MESSAGE, TERMS_MESSAGE};

/// Signup form buffer. Field names match the wire format of the
/// `POST /signup` endpoint verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Validate, Serialize, Deserialize)]
pub struct SignupRequest {
    pub firstname: String,
    pub lastname: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub email: String,
    pub password: String,
    pub country_code: String,
    #[validate(custom(function = "ten_digit_phone"))]
    pub phone: String,
    pub current_location: String,
    pub home_town: String,
    pub country: String,
    pub career_preference_internships: bool,
    pub career_preference_jobs: bool,
    pub preferred_work_location: String,
    // Only present in the standard form variant; absent fields stay off
    // the wire entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms_agreement: Option<bool>,
}

fn ten_digit_phone(phone: &str) -> Result<(), ValidationError> {
    if phone.len() == 10 && phone.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message(Cow::Borrowed(PHONE_MESSAGE)))
    }
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| PHONE_MESSAGE.to_string())
}

impl SignupRequest {
    /// Local checks run before any network traffic. Phone first, then
    /// consent; the first failure wins and no request is sent.
    pub fn validate_for_submit(&self) -> Result<(), SignupError> {
        self.validate()
            .map_err(|errors| SignupError::Validation(first_message(&errors)))?;
        if self.terms_agreement == Some(false) {
            return Err(SignupError::Validation(TERMS_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Replaces exactly the field named by the patch, leaving every
    /// other field untouched.
    pub fn apply(&mut self, patch: FieldPatch) {
        match patch {
            FieldPatch::Firstname(value) => self.firstname = value,
            FieldPatch::Lastname(value) => self.lastname = value,
            FieldPatch::Gender(value) => self.gender = value,
            FieldPatch::DateOfBirth(value) => self.date_of_birth = value,
            FieldPatch::Email(value) => self.email = value,
            FieldPatch::Password(value) => self.password = value,
            FieldPatch::CountryCode(value) => self.country_code = value,
            FieldPatch::Phone(value) => self.phone = value,
            FieldPatch::CurrentLocation(value) => self.current_location = value,
            FieldPatch::HomeTown(value) => self.home_town = value,
            FieldPatch::Country(value) => self.country = value,
            FieldPatch::Internships(value) => self.career_preference_internships = value,
            FieldPatch::Jobs(value) => self.career_preference_jobs = value,
            FieldPatch::PreferredWorkLocation(value) => self.preferred_work_location = value,
            FieldPatch::ZipPostalCode(value) => self.zip_postal_code = Some(value),
            FieldPatch::StreetAddress(value) => self.street_address = Some(value),
            FieldPatch::TermsAgreement(value) => self.terms_agreement = Some(value),
        }
    }
}

/// Single-field update to the signup buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch {
    Firstname(String),
    Lastname(String),
    Gender(Gender),
    DateOfBirth(String),
    Email(String),
    Password(String),
    CountryCode(String),
    Phone(String),
    CurrentLocation(String),
    HomeTown(String),
    Country(String),
    Internships(bool),
    Jobs(bool),
    PreferredWorkLocation(String),
    ZipPostalCode(String),
    StreetAddress(String),
    TermsAgreement(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Gender {
    /// The form starts with no gender selected, which goes over the
    /// wire as an empty string.
    #[default]
    #[serde(rename = "")]
    Unspecified,
    #[serde(rename = "MALE")]
    Male,
    #[serde(rename = "FEMALE")]
    Female,
    #[serde(rename = "TRANSGENDER")]
    Transgender,
    #[serde(rename = "OTHER")]
    Other,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Unspecified => "Select gender",
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Transgender => "Transgender",
            Gender::Other => "Other",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Gender::Unspecified => Gender::Male,
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Transgender,
            Gender::Transgender => Gender::Other,
            Gender::Other => Gender::Unspecified,
        }
    }
}

/// The two shapes the signup form ships in. `Standard` carries the
/// address extras and requires consent; `Minimal` omits
/// `zip_postal_code`, `street_address` and `terms_agreement` from both
/// the buffer and the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormVariant {
    #[default]
    Standard,
    Minimal,
}

impl FormVariant {
    /// A fresh buffer with the form's initial values.
    pub fn blank(self) -> SignupRequest {
        SignupRequest {
            firstname: String::new(),
            lastname: String::new(),
            gender: Gender::Unspecified,
            date_of_birth: String::new(),
            email: String::new(),
            password: String::new(),
            country_code: "+91".to_string(),
            phone: String::new(),
            current_location: String::new(),
            home_town: String::new(),
            country: "India".to_string(),
            career_preference_internships: false,
            career_preference_jobs: false,
            preferred_work_location: String::new(),
            zip_postal_code: (self == FormVariant::Standard).then(String::new),
            street_address: (self == FormVariant::Standard).then(String::new),
            terms_agreement: (self == FormVariant::Standard).then_some(false),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown form variant: {0}")]
pub struct ParseVariantError(String);

impl FromStr for FormVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "full" => Ok(FormVariant::Standard),
            "minimal" | "compact" => Ok(FormVariant::Minimal),
            other => Err(ParseVariantError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn submittable() -> SignupRequest {
        let mut request = FormVariant::Standard.blank();
        request.apply(FieldPatch::Phone("9876543210".to_string()));
        request.apply(FieldPatch::TermsAgreement(true));
        request
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("0000000000", true)]
    #[case("987654321", false)]
    #[case("98765432101", false)]
    #[case("98765abcde", false)]
    #[case("987654321 ", false)]
    #[case("", false)]
    fn phone_must_be_exactly_ten_digits(#[case] phone: &str, #[case] accepted: bool) {
        let mut request = submittable();
        request.apply(FieldPatch::Phone(phone.to_string()));
        assert_eq!(request.validate_for_submit().is_ok(), accepted);
    }

    #[test]
    fn phone_failure_carries_user_message() {
        let mut request = submittable();
        request.apply(FieldPatch::Phone("123".to_string()));
        let error = request.validate_for_submit().unwrap_err();
        assert_eq!(error.to_string(), PHONE_MESSAGE);
    }

    #[test]
    fn standard_variant_requires_consent() {
        let mut request = FormVariant::Standard.blank();
        request.apply(FieldPatch::Phone("9876543210".to_string()));
        let error = request.validate_for_submit().unwrap_err();
        assert_eq!(error.to_string(), TERMS_MESSAGE);

        request.apply(FieldPatch::TermsAgreement(true));
        assert!(request.validate_for_submit().is_ok());
    }

    #[test]
    fn minimal_variant_skips_consent() {
        let mut request = FormVariant::Minimal.blank();
        request.apply(FieldPatch::Phone("9876543210".to_string()));
        assert!(request.validate_for_submit().is_ok());
    }

    #[test]
    fn phone_is_checked_before_consent() {
        let request = FormVariant::Standard.blank();
        let error = request.validate_for_submit().unwrap_err();
        assert_eq!(error.to_string(), PHONE_MESSAGE);
    }

    #[test]
    fn patch_replaces_only_the_named_field() {
        let mut request = FormVariant::Standard.blank();
        request.apply(FieldPatch::Email("a@b.com".to_string()));
        request.apply(FieldPatch::Phone("9876543210".to_string()));

        let mut expected = FormVariant::Standard.blank();
        expected.email = "a@b.com".to_string();
        expected.phone = "9876543210".to_string();
        assert_eq!(request, expected);
    }

    #[test]
    fn blank_buffer_has_form_defaults() {
        let request = FormVariant::Standard.blank();
        assert_eq!(request.country_code, "+91");
        assert_eq!(request.country, "India");
        assert_eq!(request.gender, Gender::Unspecified);
        assert_eq!(request.terms_agreement, Some(false));
        assert_eq!(request.zip_postal_code.as_deref(), Some(""));
        assert!(!request.career_preference_internships);
        assert!(!request.career_preference_jobs);
    }

    #[test]
    fn minimal_body_omits_optional_keys() {
        let body = serde_json::to_value(FormVariant::Minimal.blank()).unwrap();
        let object = body.as_object().unwrap();
        assert!(!object.contains_key("zip_postal_code"));
        assert!(!object.contains_key("street_address"));
        assert!(!object.contains_key("terms_agreement"));
        assert_eq!(object.len(), 14);
    }

    #[test]
    fn standard_body_carries_all_keys() {
        let body = serde_json::to_value(FormVariant::Standard.blank()).unwrap();
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 17);
        assert_eq!(object["terms_agreement"], json!(false));
    }

    #[test]
    fn gender_uses_api_codes_on_the_wire() {
        assert_eq!(serde_json::to_value(Gender::Unspecified).unwrap(), json!(""));
        assert_eq!(
            serde_json::to_value(Gender::Transgender).unwrap(),
            json!("TRANSGENDER")
        );
    }

    #[test]
    fn gender_cycles_through_every_option() {
        let mut gender = Gender::Unspecified;
        for _ in 0..5 {
            gender = gender.next();
        }
        assert_eq!(gender, Gender::Unspecified);
    }

    #[rstest]
    #[case("standard", FormVariant::Standard)]
    #[case("Minimal", FormVariant::Minimal)]
    #[case("FULL", FormVariant::Standard)]
    fn variant_parses_from_config_value(#[case] raw: &str, #[case] expected: FormVariant) {
        assert_eq!(raw.parse::<FormVariant>().unwrap(), expected);
    }

    #[test]
    fn unknown_variant_is_rejected() {
        assert!("extended".parse::<FormVariant>().is_err());
    }
}
