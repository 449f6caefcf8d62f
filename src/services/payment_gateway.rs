use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// What checkout sends to the gateway. Only the last four card digits leave the aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: String,
    pub amount: f64,
    pub cardholder_name: String,
    pub card_last_four: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Charge the booking total. Any error fails the submission.
    async fn charge(
        &self,
        request: &PaymentRequest,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Stand-in gateway that approves every charge after `delay`.
pub struct SimulatedPaymentGateway {
    delay: Duration,
}

impl SimulatedPaymentGateway {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn charge(
        &self,
        request: &PaymentRequest,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        tracing::debug!(
            booking_id = %request.booking_id,
            amount = request.amount,
            "simulated charge approved"
        );
        Ok(())
    }
}
