use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::InsurancePlan;

/// The in-progress booking form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,

    pub departure_date: String,
    pub return_date: String,
    pub adults: u32,
    pub children: u32,
    pub special_requests: String,

    pub card_number: String,
    pub expiry_date: String,
    pub cvv: String,
    pub cardholder_name: String,

    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,

    pub selected_insurance: Option<InsurancePlan>,
    pub loyalty_number: String,
    pub use_points: bool,
    pub points_to_redeem: u32,

    pub newsletter_subscription: bool,
    pub terms_accepted: bool,
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            departure_date: String::new(),
            return_date: String::new(),
            adults: 1,
            children: 0,
            special_requests: String::new(),
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
            cardholder_name: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "United States".to_string(),
            selected_insurance: None,
            loyalty_number: String::new(),
            use_points: false,
            points_to_redeem: 0,
            newsletter_subscription: true,
            terms_accepted: false,
        }
    }
}

/// Every draft field a user can edit directly. Also the key for field errors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
    DepartureDate,
    ReturnDate,
    Adults,
    Children,
    SpecialRequests,
    CardNumber,
    ExpiryDate,
    Cvv,
    CardholderName,
    Address,
    City,
    State,
    ZipCode,
    Country,
    LoyaltyNumber,
    UsePoints,
    PointsToRedeem,
    NewsletterSubscription,
    TermsAccepted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Count,
    Flag,
}

/// A raw value entered into one field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Count(u32),
    Text(String),
}

impl FieldValue {
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Flag(_) => FieldKind::Flag,
            FieldValue::Count(_) => FieldKind::Count,
            FieldValue::Text(_) => FieldKind::Text,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Count(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl DraftField {
    /// The form name of the field, used as the error key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DraftField::FirstName => "firstName",
            DraftField::LastName => "lastName",
            DraftField::Email => "email",
            DraftField::Phone => "phone",
            DraftField::DateOfBirth => "dateOfBirth",
            DraftField::DepartureDate => "departureDate",
            DraftField::ReturnDate => "returnDate",
            DraftField::Adults => "adults",
            DraftField::Children => "children",
            DraftField::SpecialRequests => "specialRequests",
            DraftField::CardNumber => "cardNumber",
            DraftField::ExpiryDate => "expiryDate",
            DraftField::Cvv => "cvv",
            DraftField::CardholderName => "cardholderName",
            DraftField::Address => "address",
            DraftField::City => "city",
            DraftField::State => "state",
            DraftField::ZipCode => "zipCode",
            DraftField::Country => "country",
            DraftField::LoyaltyNumber => "loyaltyNumber",
            DraftField::UsePoints => "usePoints",
            DraftField::PointsToRedeem => "pointsToRedeem",
            DraftField::NewsletterSubscription => "newsletterSubscription",
            DraftField::TermsAccepted => "termsAccepted",
        }
    }

    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            DraftField::Adults | DraftField::Children | DraftField::PointsToRedeem => {
                FieldKind::Count
            }
            DraftField::UsePoints
            | DraftField::NewsletterSubscription
            | DraftField::TermsAccepted => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BookingDraft {
    /// Store a value that already matches the field's kind. Mismatched kinds are ignored.
    pub fn set(&mut self, field: DraftField, value: FieldValue) {
        match value {
            FieldValue::Text(text) => {
                if let Some(slot) = self.text_mut(field) {
                    *slot = text;
                }
            }
            FieldValue::Count(count) => match field {
                DraftField::Adults => self.adults = count,
                DraftField::Children => self.children = count,
                DraftField::PointsToRedeem => self.points_to_redeem = count,
                _ => {}
            },
            FieldValue::Flag(flag) => match field {
                DraftField::UsePoints => self.use_points = flag,
                DraftField::NewsletterSubscription => self.newsletter_subscription = flag,
                DraftField::TermsAccepted => self.terms_accepted = flag,
                _ => {}
            },
        }
    }

    #[must_use]
    pub fn text(&self, field: DraftField) -> Option<&str> {
        let text = match field {
            DraftField::FirstName => &self.first_name,
            DraftField::LastName => &self.last_name,
            DraftField::Email => &self.email,
            DraftField::Phone => &self.phone,
            DraftField::DateOfBirth => &self.date_of_birth,
            DraftField::DepartureDate => &self.departure_date,
            DraftField::ReturnDate => &self.return_date,
            DraftField::SpecialRequests => &self.special_requests,
            DraftField::CardNumber => &self.card_number,
            DraftField::ExpiryDate => &self.expiry_date,
            DraftField::Cvv => &self.cvv,
            DraftField::CardholderName => &self.cardholder_name,
            DraftField::Address => &self.address,
            DraftField::City => &self.city,
            DraftField::State => &self.state,
            DraftField::ZipCode => &self.zip_code,
            DraftField::Country => &self.country,
            DraftField::LoyaltyNumber => &self.loyalty_number,
            _ => return None,
        };
        Some(text.as_str())
    }

    fn text_mut(&mut self, field: DraftField) -> Option<&mut String> {
        let slot = match field {
            DraftField::FirstName => &mut self.first_name,
            DraftField::LastName => &mut self.last_name,
            DraftField::Email => &mut self.email,
            DraftField::Phone => &mut self.phone,
            DraftField::DateOfBirth => &mut self.date_of_birth,
            DraftField::DepartureDate => &mut self.departure_date,
            DraftField::ReturnDate => &mut self.return_date,
            DraftField::SpecialRequests => &mut self.special_requests,
            DraftField::CardNumber => &mut self.card_number,
            DraftField::ExpiryDate => &mut self.expiry_date,
            DraftField::Cvv => &mut self.cvv,
            DraftField::CardholderName => &mut self.cardholder_name,
            DraftField::Address => &mut self.address,
            DraftField::City => &mut self.city,
            DraftField::State => &mut self.state,
            DraftField::ZipCode => &mut self.zip_code,
            DraftField::Country => &mut self.country,
            DraftField::LoyaltyNumber => &mut self.loyalty_number,
            _ => return None,
        };
        Some(slot)
    }
}
