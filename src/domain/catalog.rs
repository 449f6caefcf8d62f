use serde::{Deserialize, Serialize};

/// The package the traveller picked before opening checkout.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub popular: bool,
}

// id, title, description, price, popular
const ADD_ONS: [(&str, &str, &str, f64, bool); 4] = [
    (
        "airport-lounge",
        "Airport Lounge Access",
        "Access to premium airport lounges worldwide",
        89.0,
        true,
    ),
    (
        "wifi-package",
        "International WiFi Package",
        "Stay connected with unlimited data",
        45.0,
        false,
    ),
    (
        "concierge-service",
        "24/7 Concierge Service",
        "Personal assistant for your entire trip",
        150.0,
        true,
    ),
    (
        "photo-package",
        "Professional Photo Session",
        "Capture memories with a professional photographer",
        299.0,
        false,
    ),
];

/// The fixed add-on catalog, in display order.
#[must_use]
pub fn add_ons() -> Vec<AddOn> {
    ADD_ONS
        .iter()
        .map(|(id, title, description, price, popular)| AddOn {
            id: (*id).to_string(),
            title: (*title).to_string(),
            description: (*description).to_string(),
            price: *price,
            popular: *popular,
        })
        .collect()
}

#[must_use]
pub fn find_add_on(id: &str) -> Option<AddOn> {
    add_ons().into_iter().find(|add_on| add_on.id == id)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceTier {
    Basic,
    Comprehensive,
    Premium,
}

impl InsuranceTier {
    pub const ALL: [InsuranceTier; 3] = [
        InsuranceTier::Basic,
        InsuranceTier::Comprehensive,
        InsuranceTier::Premium,
    ];

    /// Share of the trip cost charged for the plan.
    #[must_use]
    pub fn rate(self) -> f64 {
        match self {
            InsuranceTier::Basic => 0.05,
            InsuranceTier::Comprehensive => 0.08,
            InsuranceTier::Premium => 0.12,
        }
    }

    #[must_use]
    pub fn coverage_multiplier(self) -> f64 {
        match self {
            InsuranceTier::Basic => 1.0,
            InsuranceTier::Comprehensive => 1.5,
            InsuranceTier::Premium => 2.0,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            InsuranceTier::Basic => "Basic Protection",
            InsuranceTier::Comprehensive => "Comprehensive Protection",
            InsuranceTier::Premium => "Premium Protection Plus",
        }
    }

    #[must_use]
    pub fn popular(self) -> bool {
        matches!(self, InsuranceTier::Comprehensive)
    }

    fn features(self) -> &'static [&'static str] {
        match self {
            InsuranceTier::Basic => &[
                "Trip cancellation up to 100% of trip cost",
                "Trip interruption coverage",
                "Baggage loss/delay coverage up to $1,000",
                "Travel delay coverage up to $500",
                "24/7 travel assistance",
            ],
            InsuranceTier::Comprehensive => &[
                "Trip cancellation up to 150% of trip cost",
                "Trip interruption coverage",
                "Medical emergency coverage up to $50,000",
                "Emergency evacuation up to $500,000",
                "Baggage loss/delay coverage up to $2,500",
                "Travel delay coverage up to $1,500",
                "Rental car coverage",
                "Pre-existing medical conditions coverage",
                "24/7 concierge services",
            ],
            InsuranceTier::Premium => &[
                "Trip cancellation up to 200% of trip cost",
                "Trip interruption coverage",
                "Medical emergency coverage up to $100,000",
                "Emergency evacuation up to $1,000,000",
                "Baggage loss/delay coverage up to $5,000",
                "Travel delay coverage up to $2,500",
                "Rental car coverage",
                "Pre-existing medical conditions coverage",
                "Cancel for any reason (75% coverage)",
                "Adventure sports coverage",
                "Business equipment coverage",
                "24/7 premium concierge services",
                "Identity theft assistance",
            ],
        }
    }
}

/// An insurance tier priced against a specific trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePlan {
    pub tier: InsuranceTier,
    pub name: String,
    pub price: f64,
    pub coverage_multiplier: f64,
    pub coverage: f64,
    pub popular: bool,
    pub features: Vec<String>,
}

impl InsurancePlan {
    /// Quote a tier for the given trip cost. Prices are whole dollars.
    #[must_use]
    pub fn quote(tier: InsuranceTier, trip_cost: f64) -> Self {
        Self {
            tier,
            name: tier.name().to_string(),
            price: (trip_cost * tier.rate()).round(),
            coverage_multiplier: tier.coverage_multiplier(),
            coverage: trip_cost * tier.coverage_multiplier(),
            popular: tier.popular(),
            features: tier.features().iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn quote_all(trip_cost: f64) -> Vec<Self> {
        InsuranceTier::ALL
            .iter()
            .map(|tier| Self::quote(*tier, trip_cost))
            .collect()
    }
}
