use serde::Deserialize;
use uuid::Uuid;

use crate::domain::catalog::{InsuranceTier, Product};
use crate::domain::draft::{DraftField, FieldValue};

#[derive(Debug, Deserialize)]
pub enum CheckoutCommand {
    Start {
        id: Uuid,
        product: Product,
    },
    UpdateField {
        field: DraftField,
        value: FieldValue,
    },
    SelectInsurance {
        tier: Option<InsuranceTier>,
    },
    ToggleAddOn {
        add_on_id: String,
    },
    LookupLoyalty {
        loyalty_number: String,
    },
    Advance,
    Retreat,
    /// Issued by the payment saga once a submission has started.
    ProcessPayment,
    Close,
}
