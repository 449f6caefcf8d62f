use serde::{Deserialize, Serialize};

use crate::domain::catalog::{AddOn, InsurancePlan};
use crate::domain::membership::LoyaltyMembership;

pub const TAX_RATE: f64 = 0.12;
/// Dollar value of one redeemed loyalty point.
pub const POINT_VALUE: f64 = 0.01;
pub const POINTS_EARNED_PER_DOLLAR: f64 = 2.0;

/// Everything the price depends on, borrowed from the checkout state.
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub base_price: f64,
    pub insurance: Option<&'a InsurancePlan>,
    pub add_ons: &'a [AddOn],
    pub membership: Option<&'a LoyaltyMembership>,
    pub use_points: bool,
    pub points_to_redeem: u32,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    pub insurance_price: f64,
    pub add_ons_total: f64,
    pub subtotal: f64,
    pub loyalty_discount: f64,
    pub points_discount: f64,
    pub taxes: f64,
    pub total_price: f64,
}

impl PriceBreakdown {
    /// Both discounts come off the subtotal before tax is applied.
    #[must_use]
    pub fn calculate(input: &PricingInput<'_>) -> Self {
        let base_price = input.base_price;
        let insurance_price = input.insurance.map_or(0.0, |plan| plan.price);
        let add_ons_total: f64 = input.add_ons.iter().map(|add_on| add_on.price).sum();
        let subtotal = base_price + insurance_price + add_ons_total;
        let loyalty_discount = input
            .membership
            .map_or(0.0, |member| subtotal * (member.discount_rate / 100.0));
        let points_discount = if input.use_points {
            f64::from(input.points_to_redeem) * POINT_VALUE
        } else {
            0.0
        };
        let taxable = subtotal - loyalty_discount - points_discount;
        let taxes = taxable * TAX_RATE;
        let total_price = (taxable + taxes).max(0.0);

        Self {
            base_price,
            insurance_price,
            add_ons_total,
            subtotal,
            loyalty_discount,
            points_discount,
            taxes,
            total_price,
        }
    }

    #[must_use]
    pub fn points_earned(&self) -> u32 {
        points_earned(self.total_price)
    }
}

/// Loyalty points awarded for paying `total_price`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn points_earned(total_price: f64) -> u32 {
    (total_price.max(0.0) * POINTS_EARNED_PER_DOLLAR).floor() as u32
}

/// Upper bound for `points_to_redeem`: the member's balance, capped so the
/// points never pay for more than the discounted pre-tax amount.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn max_redeemable_points(input: &PricingInput<'_>) -> u32 {
    let Some(member) = input.membership else {
        return 0;
    };
    let without_points = PriceBreakdown::calculate(&PricingInput {
        use_points: false,
        points_to_redeem: 0,
        ..*input
    });
    let payable = (without_points.subtotal - without_points.loyalty_discount).max(0.0);
    // The epsilon keeps whole-cent amounts like 95.00 from flooring to 9499.
    let cap = (payable / POINT_VALUE + 1e-6)
        .floor()
        .min(f64::from(u32::MAX)) as u32;
    member.points_balance.min(cap)
}
