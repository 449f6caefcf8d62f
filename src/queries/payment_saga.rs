use async_trait::async_trait;
use cqrs_es::{CqrsFramework, EventEnvelope, EventStore, Query};
use std::sync::Weak;

use crate::domain::checkout::Checkout;
use crate::domain::commands::CheckoutCommand;
use crate::domain::events::CheckoutEvent;

/// Saga that charges the payment gateway once a submission has been accepted.
///
/// Holds a weak handle because the framework owns its queries; build it with
/// `Arc::new_cyclic`.
pub struct PaymentSaga<ES>
where
    ES: EventStore<Checkout>,
{
    cqrs: Weak<CqrsFramework<Checkout, ES>>,
}

impl<ES> PaymentSaga<ES>
where
    ES: EventStore<Checkout>,
{
    pub fn new(cqrs: Weak<CqrsFramework<Checkout, ES>>) -> Self {
        Self { cqrs }
    }
}

#[async_trait]
impl<ES> Query<Checkout> for PaymentSaga<ES>
where
    ES: EventStore<Checkout>,
    ES::AC: Send,
{
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<Checkout>]) {
        let submitted = events
            .iter()
            .any(|envelope| matches!(envelope.payload, CheckoutEvent::SubmissionStarted { .. }));
        if !submitted {
            return;
        }

        let Some(cqrs) = self.cqrs.upgrade() else {
            tracing::warn!(%aggregate_id, "checkout framework dropped before payment");
            return;
        };

        tracing::info!(%aggregate_id, "processing payment");
        if let Err(e) = cqrs
            .execute(aggregate_id, CheckoutCommand::ProcessPayment)
            .await
        {
            tracing::warn!(%aggregate_id, error = %e, "failed to process payment");
        }
    }
}
