use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::draft::{BookingDraft, DraftField};
use crate::domain::step::CheckoutStep;

/// Error key used for a failed submission.
pub const PAYMENT_ERROR_KEY: &str = "payment";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Inline error messages keyed by form field name.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field.as_str().to_string(), message.into());
    }

    pub fn insert_key(&mut self, key: &str, message: impl Into<String>) {
        self.0.insert(key.to_string(), message.into());
    }

    pub fn clear_field(&mut self, field: DraftField) {
        self.0.remove(field.as_str());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(field.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Check the fields owned by `step`. Returns every failure, not just the first.
#[must_use]
pub fn validate_step(step: CheckoutStep, draft: &BookingDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    match step {
        CheckoutStep::PersonalInfo => validate_personal_info(draft, &mut errors),
        CheckoutStep::TravelDetails => validate_travel_details(draft, &mut errors),
        CheckoutStep::Payment => validate_payment(draft, &mut errors),
        CheckoutStep::InsuranceAddOns | CheckoutStep::Confirmation => {}
    }
    errors
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn require(draft: &BookingDraft, field: DraftField, message: &str, errors: &mut ValidationErrors) {
    if draft.text(field).is_none_or(blank) {
        errors.insert(field, message);
    }
}

fn validate_personal_info(draft: &BookingDraft, errors: &mut ValidationErrors) {
    require(draft, DraftField::FirstName, "First name is required", errors);
    require(draft, DraftField::LastName, "Last name is required", errors);
    if blank(&draft.email) {
        errors.insert(DraftField::Email, "Email is required");
    } else if !is_valid_email(&draft.email) {
        errors.insert(DraftField::Email, "Invalid email format");
    }
    require(draft, DraftField::Phone, "Phone number is required", errors);
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn validate_travel_details(draft: &BookingDraft, errors: &mut ValidationErrors) {
    let departure = check_date(
        draft,
        DraftField::DepartureDate,
        "Departure date is required",
        errors,
    );
    let return_date = check_date(draft, DraftField::ReturnDate, "Return date is required", errors);

    if let (Some(departure), Some(return_date)) = (departure, return_date)
        && return_date <= departure
    {
        errors.insert(
            DraftField::ReturnDate,
            "Return date must be after departure date",
        );
    }
}

fn check_date(
    draft: &BookingDraft,
    field: DraftField,
    required_message: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let value = draft.text(field).unwrap_or_default();
    if blank(value) {
        errors.insert(field, required_message);
        return None;
    }
    let parsed = parse_date(value);
    if parsed.is_none() {
        errors.insert(field, "Enter a valid date (YYYY-MM-DD)");
    }
    parsed
}

fn validate_payment(draft: &BookingDraft, errors: &mut ValidationErrors) {
    if draft.card_number.split_whitespace().collect::<String>().is_empty() {
        errors.insert(DraftField::CardNumber, "Card number is required");
    }
    require(draft, DraftField::ExpiryDate, "Expiry date is required", errors);
    require(draft, DraftField::Cvv, "CVV is required", errors);
    require(
        draft,
        DraftField::CardholderName,
        "Cardholder name is required",
        errors,
    );
    require(draft, DraftField::Address, "Address is required", errors);
    require(draft, DraftField::City, "City is required", errors);
    require(draft, DraftField::ZipCode, "ZIP code is required", errors);
    if !draft.terms_accepted {
        errors.insert(
            DraftField::TermsAccepted,
            "You must accept the terms and conditions",
        );
    }
}
