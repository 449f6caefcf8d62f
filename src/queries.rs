pub mod callbacks;
pub mod payment_saga;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::catalog::{self, AddOn, InsurancePlan, Product};
use crate::domain::checkout::{Checkout, CheckoutState};
use crate::domain::draft::BookingDraft;
use crate::domain::events::BookingSummary;
use crate::domain::membership::LoyaltyMembership;
use crate::domain::pricing::PriceBreakdown;
use crate::domain::step::CheckoutStep;
use crate::domain::validation::ValidationErrors;

// The read model returned to the parent view. Derived values (pricing,
// insurance quotes, the redemption cap) are computed when the view is built
// so the client never recomputes them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub id: Uuid,
    pub state: CheckoutState,
    pub step: CheckoutStep,
    pub step_number: u8,
    pub step_title: String,
    pub product: Product,
    pub draft: BookingDraft,
    pub selected_add_ons: Vec<AddOn>,
    pub membership: Option<LoyaltyMembership>,
    pub available_points: u32,
    pub max_redeemable_points: u32,
    pub errors: ValidationErrors,
    pub processing: bool,
    pub pricing: PriceBreakdown,
    pub insurance_options: Vec<InsurancePlan>,
    pub add_on_catalog: Vec<AddOn>,
    pub summary: Option<BookingSummary>,
}

impl From<&Checkout> for CheckoutView {
    fn from(checkout: &Checkout) -> Self {
        Self {
            id: checkout.id(),
            state: checkout.state(),
            step: checkout.step(),
            step_number: checkout.step().number(),
            step_title: checkout.step().title().to_string(),
            product: checkout.product().clone(),
            draft: checkout.draft().clone(),
            selected_add_ons: checkout.add_ons().to_vec(),
            membership: checkout.membership().cloned(),
            available_points: checkout.available_points(),
            max_redeemable_points: checkout.max_redeemable_points(),
            errors: checkout.errors().clone(),
            processing: checkout.is_processing(),
            pricing: checkout.pricing(),
            insurance_options: checkout.insurance_options(),
            add_on_catalog: catalog::add_ons(),
            summary: checkout.summary().cloned(),
        }
    }
}
