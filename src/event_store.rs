use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cqrs_es::mem_store::MemStoreAggregateContext;
use cqrs_es::{Aggregate, AggregateError, EventEnvelope, EventStore};
use tokio::sync::RwLock;

type EventStreams<A> = HashMap<String, Vec<EventEnvelope<A>>>;

/// In-memory event store with optimistic concurrency.
///
/// A commit is accepted only when the stream still ends at the sequence the
/// aggregate was loaded at. Otherwise it fails with
/// `AggregateError::AggregateConflict` and nothing is stored, so two commands
/// that raced on the same checkout can never both commit.
pub struct InMemoryEventStore<A: Aggregate> {
    streams: Arc<RwLock<EventStreams<A>>>,
}

impl<A: Aggregate> Default for InMemoryEventStore<A> {
    fn default() -> Self {
        Self {
            streams: Arc::default(),
        }
    }
}

impl<A: Aggregate> Clone for InMemoryEventStore<A> {
    fn clone(&self) -> Self {
        Self {
            streams: Arc::clone(&self.streams),
        }
    }
}

impl<A: Aggregate> InMemoryEventStore<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl<A: Aggregate> EventStore<A> for InMemoryEventStore<A> {
    type AC = MemStoreAggregateContext<A>;

    async fn load_events(
        &self,
        aggregate_id: &str,
    ) -> Result<Vec<EventEnvelope<A>>, AggregateError<A::Error>> {
        let streams = self.streams.read().await;
        Ok(streams.get(aggregate_id).cloned().unwrap_or_default())
    }

    async fn load_aggregate(
        &self,
        aggregate_id: &str,
    ) -> Result<Self::AC, AggregateError<A::Error>> {
        let mut aggregate = A::default();
        let mut current_sequence = 0;
        for envelope in self.load_events(aggregate_id).await? {
            current_sequence = envelope.sequence;
            aggregate.apply(envelope.payload);
        }
        Ok(MemStoreAggregateContext {
            aggregate_id: aggregate_id.to_string(),
            aggregate,
            current_sequence,
        })
    }

    async fn commit(
        &self,
        events: Vec<A::Event>,
        context: Self::AC,
        metadata: HashMap<String, String>,
    ) -> Result<Vec<EventEnvelope<A>>, AggregateError<A::Error>> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let mut streams = self.streams.write().await;
        let stream = streams.entry(context.aggregate_id.clone()).or_default();
        let last_sequence = stream.last().map_or(0, |envelope| envelope.sequence);
        if last_sequence != context.current_sequence {
            tracing::debug!(
                aggregate_id = %context.aggregate_id,
                loaded = context.current_sequence,
                current = last_sequence,
                "rejecting stale commit"
            );
            return Err(AggregateError::AggregateConflict);
        }

        let committed: Vec<EventEnvelope<A>> = events
            .into_iter()
            .zip(last_sequence + 1..)
            .map(|(payload, sequence)| EventEnvelope {
                aggregate_id: context.aggregate_id.clone(),
                sequence,
                payload,
                metadata: metadata.clone(),
            })
            .collect();
        stream.extend(committed.iter().cloned());
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::catalog::Product;
    use crate::domain::checkout::Checkout;
    use crate::domain::events::CheckoutEvent;

    fn started() -> CheckoutEvent {
        CheckoutEvent::Started {
            id: Uuid::new_v4(),
            product: Product::default(),
        }
    }

    #[tokio::test]
    async fn commits_number_events_after_the_loaded_sequence() {
        let store = InMemoryEventStore::<Checkout>::new();
        let context = store.load_aggregate("c-1").await.unwrap();
        assert_eq!(context.current_sequence, 0);

        let committed = store
            .commit(vec![started(), CheckoutEvent::Closed], context, HashMap::new())
            .await
            .unwrap();
        assert_eq!(
            committed.iter().map(|e| e.sequence).collect::<Vec<_>>(),
            vec![1, 2]
        );

        let context = store.load_aggregate("c-1").await.unwrap();
        assert_eq!(context.current_sequence, 2);
        assert_eq!(store.load_events("c-1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn stale_context_is_a_conflict() {
        let store = InMemoryEventStore::<Checkout>::new();
        let first = store.load_aggregate("c-1").await.unwrap();
        let second = store.load_aggregate("c-1").await.unwrap();

        store
            .commit(vec![started()], first, HashMap::new())
            .await
            .unwrap();
        let result = store
            .commit(vec![started()], second, HashMap::new())
            .await;

        assert!(matches!(result, Err(AggregateError::AggregateConflict)));
        assert_eq!(store.load_events("c-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_commit_stores_nothing() {
        let store = InMemoryEventStore::<Checkout>::new();
        let context = store.load_aggregate("c-1").await.unwrap();
        let committed = store.commit(Vec::new(), context, HashMap::new()).await.unwrap();
        assert!(committed.is_empty());
        assert!(store.load_events("c-1").await.unwrap().is_empty());
    }
}
