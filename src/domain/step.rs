use serde::{Deserialize, Serialize};

/// The five screens of the checkout wizard, in order.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckoutStep {
    #[default]
    PersonalInfo,
    TravelDetails,
    InsuranceAddOns,
    Payment,
    Confirmation,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 5] = [
        CheckoutStep::PersonalInfo,
        CheckoutStep::TravelDetails,
        CheckoutStep::InsuranceAddOns,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    /// One-based position shown as "Step n of 5".
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            CheckoutStep::PersonalInfo => 1,
            CheckoutStep::TravelDetails => 2,
            CheckoutStep::InsuranceAddOns => 3,
            CheckoutStep::Payment => 4,
            CheckoutStep::Confirmation => 5,
        }
    }

    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            CheckoutStep::PersonalInfo => "Personal Info",
            CheckoutStep::TravelDetails => "Travel Details",
            CheckoutStep::InsuranceAddOns => "Insurance & Add-ons",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    #[must_use]
    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }
}
