use std::sync::Arc;

use crate::domain::catalog::{self, AddOn, InsurancePlan, InsuranceTier, Product};
use crate::domain::commands::CheckoutCommand;
use crate::domain::draft::{BookingDraft, DraftField, FieldValue};
use crate::domain::events::{BookingSummary, CheckoutEvent};
use crate::domain::membership::{LoyaltyMembership, MembershipSource};
use crate::domain::pricing::{self, PriceBreakdown, PricingInput};
use crate::domain::step::CheckoutStep;
use crate::domain::validation::{self, PAYMENT_ERROR_KEY, ValidationErrors};
use crate::services::membership_provider::MembershipProvider;
use crate::services::payment_gateway::{PaymentGateway, PaymentRequest};
use crate::utils::card_format::{card_last_four, format_card_number};
use async_trait::async_trait;
use chrono::Utc;
use cqrs_es::Aggregate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const PAYMENT_FAILED_MESSAGE: &str = "Payment processing failed. Please try again.";
pub const LOYALTY_NOT_FOUND_MESSAGE: &str = "Loyalty number not found";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Checkout {
    id: Uuid,
    state: CheckoutState,
    product: Product,
    step: CheckoutStep,
    draft: BookingDraft,
    add_ons: Vec<AddOn>,
    membership: Option<LoyaltyMembership>,
    errors: ValidationErrors,
    pending_booking_id: Option<String>,
    summary: Option<BookingSummary>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum CheckoutState {
    #[default]
    Open,
    Confirmed,
    Closed,
}

#[async_trait]
impl Aggregate for Checkout {
    type Command = CheckoutCommand;
    type Event = CheckoutEvent;
    type Error = CheckoutError;
    type Services = CheckoutServices;

    fn aggregate_type() -> String {
        "Checkout".to_string()
    }

    async fn handle(
        &self,
        command: Self::Command,
        services: &Self::Services,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CheckoutCommand::Start { id, product } => {
                if self.is_started() {
                    return Err(CheckoutError::AlreadyStarted);
                }
                let stored = services
                    .membership_provider()
                    .current_member()
                    .await
                    .map_err(|e| CheckoutError::MembershipProviderError(e.to_string()))?;

                let mut events = vec![CheckoutEvent::Started { id, product }];
                if let Some(membership) = stored {
                    events.push(CheckoutEvent::MembershipAttached {
                        membership,
                        source: MembershipSource::Stored,
                    });
                }
                Ok(events)
            }
            CheckoutCommand::Close => {
                self.ensure_open()?;
                Ok(vec![CheckoutEvent::Closed])
            }
            CheckoutCommand::ProcessPayment => {
                self.ensure_open()?;
                self.process_payment(services).await
            }
            CheckoutCommand::UpdateField { field, value } => {
                self.ensure_editable()?;
                self.ensure_unconfirmed()?;
                let value = self.normalize(field, value)?;
                Ok(vec![CheckoutEvent::FieldUpdated { field, value }])
            }
            CheckoutCommand::SelectInsurance { tier } => {
                self.ensure_editable()?;
                self.ensure_unconfirmed()?;
                Ok(vec![CheckoutEvent::InsuranceSelected {
                    plan: self.toggle_insurance(tier),
                }])
            }
            CheckoutCommand::ToggleAddOn { add_on_id } => {
                self.ensure_editable()?;
                self.ensure_unconfirmed()?;
                let add_on = catalog::find_add_on(&add_on_id)
                    .ok_or(CheckoutError::UnknownAddOn(add_on_id))?;
                let selected = !self.has_add_on(&add_on.id);
                Ok(vec![CheckoutEvent::AddOnToggled { add_on, selected }])
            }
            CheckoutCommand::LookupLoyalty { loyalty_number } => {
                self.ensure_editable()?;
                self.ensure_unconfirmed()?;
                self.lookup_loyalty(loyalty_number, services).await
            }
            CheckoutCommand::Advance => {
                self.ensure_editable()?;
                self.advance()
            }
            CheckoutCommand::Retreat => {
                self.ensure_editable()?;
                let previous = self.step.previous().ok_or(CheckoutError::AtFirstStep)?;
                Ok(vec![CheckoutEvent::StepProgressed {
                    from_step: self.step,
                    to_step: previous,
                }])
            }
        }
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CheckoutEvent::Started { id, product } => {
                self.id = id;
                self.product = product;
                self.state = CheckoutState::Open;
            }
            CheckoutEvent::FieldUpdated { field, value } => {
                self.draft.set(field, value);
                self.errors.clear_field(field);
                self.clamp_redemption();
            }
            CheckoutEvent::InsuranceSelected { plan } => {
                self.draft.selected_insurance = plan;
                self.clamp_redemption();
            }
            CheckoutEvent::AddOnToggled { add_on, selected } => {
                self.add_ons.retain(|existing| existing.id != add_on.id);
                if selected {
                    self.add_ons.push(add_on);
                }
                self.clamp_redemption();
            }
            CheckoutEvent::MembershipAttached { membership, source } => {
                if let MembershipSource::Lookup { loyalty_number } = &source
                    && *loyalty_number != self.draft.loyalty_number
                {
                    // The number changed after this lookup was requested.
                    return;
                }
                self.membership = Some(membership);
                self.errors.clear_field(DraftField::LoyaltyNumber);
                self.clamp_redemption();
            }
            CheckoutEvent::LoyaltyLookupFailed { loyalty_number } => {
                if loyalty_number == self.draft.loyalty_number {
                    self.errors
                        .insert(DraftField::LoyaltyNumber, LOYALTY_NOT_FOUND_MESSAGE);
                }
            }
            CheckoutEvent::ValidationFailed { step: _, errors } => {
                self.errors = errors;
            }
            CheckoutEvent::StepProgressed { from_step, to_step } => {
                if to_step > from_step {
                    self.errors = ValidationErrors::new();
                }
                self.step = to_step;
            }
            CheckoutEvent::SubmissionStarted { booking_id } => {
                self.errors = ValidationErrors::new();
                self.pending_booking_id = Some(booking_id);
            }
            CheckoutEvent::BookingConfirmed { summary } => {
                self.pending_booking_id = None;
                self.summary = Some(summary);
                self.state = CheckoutState::Confirmed;
            }
            CheckoutEvent::PaymentFailed { message } => {
                self.pending_booking_id = None;
                self.errors.insert_key(PAYMENT_ERROR_KEY, message);
            }
            CheckoutEvent::Closed => {
                self.pending_booking_id = None;
                self.state = CheckoutState::Closed;
            }
        }
    }
}

impl Checkout {
    fn advance(&self) -> Result<Vec<CheckoutEvent>, CheckoutError> {
        let next = self.step.next().ok_or(CheckoutError::AlreadyConfirmed)?;

        // Stepping forward again after going back from confirmation never resubmits.
        if self.state == CheckoutState::Confirmed {
            return Ok(vec![CheckoutEvent::StepProgressed {
                from_step: self.step,
                to_step: next,
            }]);
        }

        let errors = validation::validate_step(self.step, &self.draft);
        if !errors.is_empty() {
            return Ok(vec![CheckoutEvent::ValidationFailed {
                step: self.step,
                errors,
            }]);
        }

        if self.step == CheckoutStep::Payment {
            Ok(vec![CheckoutEvent::SubmissionStarted {
                booking_id: new_booking_id(),
            }])
        } else {
            Ok(vec![CheckoutEvent::StepProgressed {
                from_step: self.step,
                to_step: next,
            }])
        }
    }

    async fn process_payment(
        &self,
        services: &CheckoutServices,
    ) -> Result<Vec<CheckoutEvent>, CheckoutError> {
        let booking_id = self
            .pending_booking_id
            .clone()
            .ok_or(CheckoutError::NoSubmissionInProgress)?;
        let price = self.pricing();
        let request = PaymentRequest {
            booking_id: booking_id.clone(),
            amount: price.total_price,
            cardholder_name: self.draft.cardholder_name.trim().to_string(),
            card_last_four: card_last_four(&self.draft.card_number),
        };

        if let Err(e) = services.payment_gateway().charge(&request).await {
            tracing::warn!(%booking_id, error = %e, "payment failed");
            return Ok(vec![CheckoutEvent::PaymentFailed {
                message: PAYMENT_FAILED_MESSAGE.to_string(),
            }]);
        }

        let summary = BookingSummary {
            booking_id,
            product: self.product.clone(),
            traveler: self.draft.clone(),
            total_amount: price.total_price,
            insurance: self.draft.selected_insurance.clone(),
            add_ons: self.add_ons.clone(),
            points_earned: price.points_earned(),
            membership: self.membership.clone(),
        };
        Ok(vec![
            CheckoutEvent::BookingConfirmed { summary },
            CheckoutEvent::StepProgressed {
                from_step: CheckoutStep::Payment,
                to_step: CheckoutStep::Confirmation,
            },
        ])
    }

    async fn lookup_loyalty(
        &self,
        loyalty_number: String,
        services: &CheckoutServices,
    ) -> Result<Vec<CheckoutEvent>, CheckoutError> {
        if loyalty_number.trim().is_empty() {
            return Err(CheckoutError::InvalidFieldValue {
                field: DraftField::LoyaltyNumber,
                reason: "enter a loyalty number".to_string(),
            });
        }
        if loyalty_number != self.draft.loyalty_number {
            return Err(CheckoutError::LoyaltyNumberMismatch(loyalty_number));
        }

        let found = services
            .membership_provider()
            .lookup(&loyalty_number)
            .await
            .map_err(|e| CheckoutError::MembershipProviderError(e.to_string()))?;

        Ok(vec![match found {
            Some(membership) => {
                tracing::info!(%loyalty_number, tier = ?membership.tier, "loyalty member found");
                CheckoutEvent::MembershipAttached {
                    membership,
                    source: MembershipSource::Lookup { loyalty_number },
                }
            }
            None => CheckoutEvent::LoyaltyLookupFailed { loyalty_number },
        }])
    }

    fn normalize(&self, field: DraftField, value: FieldValue) -> Result<FieldValue, CheckoutError> {
        if field.kind() != value.kind() {
            return Err(CheckoutError::FieldTypeMismatch(field));
        }
        match (field, value) {
            (DraftField::CardNumber, FieldValue::Text(text)) => {
                Ok(FieldValue::Text(format_card_number(&text)))
            }
            (DraftField::Adults, FieldValue::Count(0)) => Err(CheckoutError::InvalidFieldValue {
                field,
                reason: "at least one adult must travel".to_string(),
            }),
            (DraftField::UsePoints, FieldValue::Flag(true)) => {
                if self
                    .membership
                    .as_ref()
                    .is_some_and(LoyaltyMembership::can_redeem_points)
                {
                    Ok(FieldValue::Flag(true))
                } else {
                    Err(CheckoutError::PointsUnavailable)
                }
            }
            (DraftField::PointsToRedeem, FieldValue::Count(points)) => {
                Ok(FieldValue::Count(points.min(self.max_redeemable_points())))
            }
            (_, value) => Ok(value),
        }
    }

    fn toggle_insurance(&self, tier: Option<InsuranceTier>) -> Option<InsurancePlan> {
        let tier = tier?;
        let current = self.draft.selected_insurance.as_ref().map(|plan| plan.tier);
        if current == Some(tier) {
            None
        } else {
            Some(InsurancePlan::quote(tier, self.product.price))
        }
    }

    fn clamp_redemption(&mut self) {
        let max = self.max_redeemable_points();
        if self.draft.points_to_redeem > max {
            self.draft.points_to_redeem = max;
        }
    }

    fn ensure_open(&self) -> Result<(), CheckoutError> {
        if !self.is_started() {
            Err(CheckoutError::NotFound)
        } else if self.state == CheckoutState::Closed {
            Err(CheckoutError::AlreadyClosed)
        } else {
            Ok(())
        }
    }

    fn ensure_editable(&self) -> Result<(), CheckoutError> {
        self.ensure_open()?;
        if self.is_processing() {
            Err(CheckoutError::SubmissionInProgress)
        } else {
            Ok(())
        }
    }

    fn ensure_unconfirmed(&self) -> Result<(), CheckoutError> {
        if self.state == CheckoutState::Confirmed {
            Err(CheckoutError::AlreadyConfirmed)
        } else {
            Ok(())
        }
    }

    fn pricing_input(&self) -> PricingInput<'_> {
        PricingInput {
            base_price: self.product.price,
            insurance: self.draft.selected_insurance.as_ref(),
            add_ons: &self.add_ons,
            membership: self.membership.as_ref(),
            use_points: self.draft.use_points,
            points_to_redeem: self.draft.points_to_redeem,
        }
    }
}

fn new_booking_id() -> String {
    format!("BK{}", Utc::now().timestamp_millis())
}

#[derive(Error, Debug, PartialEq)]
pub enum CheckoutError {
    #[error("Checkout not found")]
    NotFound,
    #[error("Checkout already opened")]
    AlreadyStarted,
    #[error("Checkout already closed")]
    AlreadyClosed,
    #[error("Booking already confirmed")]
    AlreadyConfirmed,
    #[error("Already at the first step")]
    AtFirstStep,
    #[error("A submission is already being processed")]
    SubmissionInProgress,
    #[error("No submission is being processed")]
    NoSubmissionInProgress,
    #[error("Field {0} does not accept that kind of value")]
    FieldTypeMismatch(DraftField),
    #[error("Invalid value for {field}: {reason}")]
    InvalidFieldValue { field: DraftField, reason: String },
    #[error("Not enough loyalty points to redeem")]
    PointsUnavailable,
    #[error("Loyalty number {0} is not the number entered on the form")]
    LoyaltyNumberMismatch(String),
    #[error("Unknown add-on: {0}")]
    UnknownAddOn(String),
    #[error("Membership provider error: {0}")]
    MembershipProviderError(String),
}

pub struct CheckoutServices {
    membership_provider: Arc<dyn MembershipProvider>,
    payment_gateway: Arc<dyn PaymentGateway>,
}

impl CheckoutServices {
    pub fn new(
        membership_provider: Arc<dyn MembershipProvider>,
        payment_gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            membership_provider,
            payment_gateway,
        }
    }

    #[must_use]
    pub fn membership_provider(&self) -> &Arc<dyn MembershipProvider> {
        &self.membership_provider
    }

    #[must_use]
    pub fn payment_gateway(&self) -> &Arc<dyn PaymentGateway> {
        &self.payment_gateway
    }
}

impl Checkout {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.id != Uuid::default()
    }

    #[must_use]
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }

    #[must_use]
    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    #[must_use]
    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    #[must_use]
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    #[must_use]
    pub fn has_add_on(&self, add_on_id: &str) -> bool {
        self.add_ons.iter().any(|add_on| add_on.id == add_on_id)
    }

    #[must_use]
    pub fn membership(&self) -> Option<&LoyaltyMembership> {
        self.membership.as_ref()
    }

    #[must_use]
    pub fn available_points(&self) -> u32 {
        self.membership.as_ref().map_or(0, |m| m.points_balance)
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// True between a valid submission and the gateway's answer.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.pending_booking_id.is_some()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&BookingSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn pricing(&self) -> PriceBreakdown {
        PriceBreakdown::calculate(&self.pricing_input())
    }

    #[must_use]
    pub fn max_redeemable_points(&self) -> u32 {
        pricing::max_redeemable_points(&self.pricing_input())
    }

    #[must_use]
    pub fn insurance_options(&self) -> Vec<InsurancePlan> {
        InsurancePlan::quote_all(self.product.price)
    }
}
