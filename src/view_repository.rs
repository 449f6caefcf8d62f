use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use cqrs_es::{Aggregate, EventEnvelope, Query};
use tokio::sync::RwLock;

use crate::domain::checkout::Checkout;
use crate::domain::events::CheckoutEvent;
use crate::queries::CheckoutView;

#[derive(Debug, Default)]
struct Projection {
    checkout: Checkout,
    version: usize,
    // Events that arrived ahead of a gap in the sequence.
    pending: BTreeMap<usize, CheckoutEvent>,
}

/// In-memory read side for checkouts. Replays committed events into a
/// per-checkout state and builds a `CheckoutView` on load.
#[derive(Clone, Default)]
pub struct CheckoutViewRepository {
    projections: Arc<RwLock<HashMap<String, Projection>>>,
}

impl CheckoutViewRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a checkout view by aggregate id.
    pub async fn load(&self, checkout_id: &str) -> Option<CheckoutView> {
        let projections = self.projections.read().await;
        projections
            .get(checkout_id)
            .map(|projection| CheckoutView::from(&projection.checkout))
    }

    async fn update_view(&self, view_id: &str, event: &EventEnvelope<Checkout>) {
        let mut projections = self.projections.write().await;
        let projection = projections.entry(view_id.to_string()).or_default();

        // Redelivered events are skipped.
        if event.sequence <= projection.version {
            return;
        }
        projection
            .pending
            .insert(event.sequence, event.payload.clone());
        while let Some(payload) = projection.pending.remove(&(projection.version + 1)) {
            projection.checkout.apply(payload);
            projection.version += 1;
        }
    }
}

#[async_trait]
impl Query<Checkout> for CheckoutViewRepository {
    async fn dispatch(&self, view_id: &str, events: &[EventEnvelope<Checkout>]) {
        for event in events {
            self.update_view(view_id, event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use uuid::Uuid;

    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::draft::{DraftField, FieldValue};
    use crate::domain::step::CheckoutStep;

    fn envelope(id: &str, sequence: usize, payload: CheckoutEvent) -> EventEnvelope<Checkout> {
        EventEnvelope {
            aggregate_id: id.to_string(),
            sequence,
            payload,
            metadata: HashMap::new(),
        }
    }

    fn started(id: Uuid) -> CheckoutEvent {
        CheckoutEvent::Started {
            id,
            product: Product {
                id: "maldives".to_string(),
                title: "Maldives Overwater Villa".to_string(),
                price: 1000.0,
                location: "male-maldives".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn projects_events_into_a_view() {
        let repo = CheckoutViewRepository::new();
        let id = Uuid::new_v4();
        let key = id.to_string();

        repo.dispatch(
            &key,
            &[
                envelope(&key, 1, started(id)),
                envelope(
                    &key,
                    2,
                    CheckoutEvent::FieldUpdated {
                        field: DraftField::FirstName,
                        value: FieldValue::Text("Ada".to_string()),
                    },
                ),
                envelope(
                    &key,
                    3,
                    CheckoutEvent::StepProgressed {
                        from_step: CheckoutStep::PersonalInfo,
                        to_step: CheckoutStep::TravelDetails,
                    },
                ),
            ],
        )
        .await;

        let view = repo.load(&key).await.unwrap();
        assert_eq!(view.id, id);
        assert_eq!(view.step_number, 2);
        assert_eq!(view.step_title, "Travel Details");
        assert_eq!(view.draft.first_name, "Ada");
        assert!((view.pricing.total_price - 1120.0).abs() < 1e-9);
        assert_eq!(view.insurance_options.len(), 3);
        assert_eq!(view.add_on_catalog.len(), 4);
        assert!(!view.processing);
    }

    #[tokio::test]
    async fn redelivered_events_are_ignored() {
        let repo = CheckoutViewRepository::new();
        let id = Uuid::new_v4();
        let key = id.to_string();
        let forward = envelope(
            &key,
            2,
            CheckoutEvent::StepProgressed {
                from_step: CheckoutStep::PersonalInfo,
                to_step: CheckoutStep::TravelDetails,
            },
        );
        let back = envelope(
            &key,
            3,
            CheckoutEvent::StepProgressed {
                from_step: CheckoutStep::TravelDetails,
                to_step: CheckoutStep::PersonalInfo,
            },
        );

        repo.dispatch(&key, &[envelope(&key, 1, started(id)), forward.clone(), back])
            .await;
        repo.dispatch(&key, &[forward]).await;

        let view = repo.load(&key).await.unwrap();
        assert_eq!(view.step, CheckoutStep::PersonalInfo);
    }

    #[tokio::test]
    async fn out_of_order_delivery_waits_for_the_gap() {
        let repo = CheckoutViewRepository::new();
        let id = Uuid::new_v4();
        let key = id.to_string();

        repo.dispatch(&key, &[envelope(&key, 1, started(id))]).await;
        repo.dispatch(
            &key,
            &[envelope(
                &key,
                3,
                CheckoutEvent::StepProgressed {
                    from_step: CheckoutStep::TravelDetails,
                    to_step: CheckoutStep::InsuranceAddOns,
                },
            )],
        )
        .await;
        assert_eq!(repo.load(&key).await.unwrap().step, CheckoutStep::PersonalInfo);

        repo.dispatch(
            &key,
            &[envelope(
                &key,
                2,
                CheckoutEvent::StepProgressed {
                    from_step: CheckoutStep::PersonalInfo,
                    to_step: CheckoutStep::TravelDetails,
                },
            )],
        )
        .await;
        assert_eq!(
            repo.load(&key).await.unwrap().step,
            CheckoutStep::InsuranceAddOns
        );
    }

    #[tokio::test]
    async fn unknown_checkout_has_no_view() {
        let repo = CheckoutViewRepository::new();
        assert!(repo.load("missing").await.is_none());
    }
}
