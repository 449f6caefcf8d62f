use cqrs_es::DomainEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{AddOn, InsurancePlan, Product};
use crate::domain::draft::{BookingDraft, DraftField, FieldValue};
use crate::domain::membership::{LoyaltyMembership, MembershipSource};
use crate::domain::step::CheckoutStep;
use crate::domain::validation::ValidationErrors;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CheckoutEvent {
    Started {
        id: Uuid,
        product: Product,
    },
    FieldUpdated {
        field: DraftField,
        value: FieldValue,
    },
    InsuranceSelected {
        plan: Option<InsurancePlan>,
    },
    AddOnToggled {
        add_on: AddOn,
        selected: bool,
    },
    MembershipAttached {
        membership: LoyaltyMembership,
        source: MembershipSource,
    },
    LoyaltyLookupFailed {
        loyalty_number: String,
    },
    ValidationFailed {
        step: CheckoutStep,
        errors: ValidationErrors,
    },
    StepProgressed {
        from_step: CheckoutStep,
        to_step: CheckoutStep,
    },
    SubmissionStarted {
        booking_id: String,
    },
    BookingConfirmed {
        summary: BookingSummary,
    },
    PaymentFailed {
        message: String,
    },
    Closed,
}

/// Handed to the completion callback once payment succeeds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub booking_id: String,
    pub product: Product,
    pub traveler: BookingDraft,
    pub total_amount: f64,
    pub insurance: Option<InsurancePlan>,
    pub add_ons: Vec<AddOn>,
    pub points_earned: u32,
    pub membership: Option<LoyaltyMembership>,
}

impl DomainEvent for CheckoutEvent {
    fn event_type(&self) -> String {
        let event_type: &str = match self {
            CheckoutEvent::Started { .. } => "CheckoutOpened",
            CheckoutEvent::FieldUpdated { .. } => "FieldUpdated",
            CheckoutEvent::InsuranceSelected { .. } => "InsuranceSelected",
            CheckoutEvent::AddOnToggled { .. } => "AddOnToggled",
            CheckoutEvent::MembershipAttached { .. } => "MembershipAttached",
            CheckoutEvent::LoyaltyLookupFailed { .. } => "LoyaltyLookupFailed",
            CheckoutEvent::ValidationFailed { .. } => "ValidationFailed",
            CheckoutEvent::StepProgressed { .. } => "StepProgressed",
            CheckoutEvent::SubmissionStarted { .. } => "SubmissionStarted",
            CheckoutEvent::BookingConfirmed { .. } => "BookingConfirmed",
            CheckoutEvent::PaymentFailed { .. } => "PaymentFailed",
            CheckoutEvent::Closed => "CheckoutClosed",
        };
        event_type.to_string()
    }

    fn event_version(&self) -> String {
        "1.0".to_string()
    }
}
