use async_trait::async_trait;
use cqrs_es::{EventEnvelope, Query};

use crate::domain::checkout::Checkout;
use crate::domain::events::{BookingSummary, CheckoutEvent};

type CloseCallback = Box<dyn Fn() + Send + Sync>;
type CompletionCallback = Box<dyn Fn(&BookingSummary) + Send + Sync>;

/// The parent view's hooks: dismissal and booking completion.
pub struct CheckoutCallbacks {
    on_close: CloseCallback,
    on_complete: CompletionCallback,
}

impl CheckoutCallbacks {
    pub fn new(
        on_close: impl Fn() + Send + Sync + 'static,
        on_complete: impl Fn(&BookingSummary) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_close: Box::new(on_close),
            on_complete: Box::new(on_complete),
        }
    }
}

#[async_trait]
impl Query<Checkout> for CheckoutCallbacks {
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<Checkout>]) {
        for event in events {
            match &event.payload {
                CheckoutEvent::BookingConfirmed { summary } => {
                    tracing::info!(
                        %aggregate_id,
                        booking_id = %summary.booking_id,
                        total = summary.total_amount,
                        points_earned = summary.points_earned,
                        "booking confirmed"
                    );
                    (self.on_complete)(summary);
                }
                CheckoutEvent::Closed => (self.on_close)(),
                _ => {}
            }
        }
    }
}
