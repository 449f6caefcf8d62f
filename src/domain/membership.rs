use serde::{Deserialize, Serialize};

/// Members need at least this many points before redemption is offered.
pub const MIN_REDEEMABLE_POINTS: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoyaltyTier {
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl LoyaltyTier {
    /// Percentage taken off the booking subtotal.
    #[must_use]
    pub fn discount_rate(self) -> f64 {
        match self {
            LoyaltyTier::Silver => 5.0,
            LoyaltyTier::Gold => 10.0,
            LoyaltyTier::Platinum => 15.0,
            LoyaltyTier::Diamond => 20.0,
        }
    }

    #[must_use]
    pub fn benefits(self) -> Vec<String> {
        let benefits: &[&str] = match self {
            LoyaltyTier::Silver => &["5% discount", "Priority support"],
            LoyaltyTier::Gold => &["10% discount", "Priority support", "Free upgrades"],
            LoyaltyTier::Platinum => &["15% discount", "Guaranteed upgrades", "Concierge service"],
            LoyaltyTier::Diamond => &["20% discount", "Suite upgrades", "Personal travel advisor"],
        };
        benefits.iter().map(ToString::to_string).collect()
    }
}

/// A loyalty record as returned by the membership provider. Read-only to checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyMembership {
    pub member_id: String,
    pub tier: LoyaltyTier,
    pub discount_rate: f64,
    pub points_balance: u32,
    pub benefits: Vec<String>,
}

impl LoyaltyMembership {
    #[must_use]
    pub fn new(member_id: impl Into<String>, tier: LoyaltyTier, points_balance: u32) -> Self {
        Self {
            member_id: member_id.into(),
            tier,
            discount_rate: tier.discount_rate(),
            points_balance,
            benefits: tier.benefits(),
        }
    }

    #[must_use]
    pub fn can_redeem_points(&self) -> bool {
        self.points_balance >= MIN_REDEEMABLE_POINTS
    }
}

/// Where an attached membership came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum MembershipSource {
    /// The member already signed in on this device.
    Stored,
    /// Looked up from the loyalty number typed into the form.
    Lookup { loyalty_number: String },
}
