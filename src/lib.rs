pub mod command_extractor;
pub mod config;
pub mod domain;
pub mod event_store;
pub mod queries;
pub mod route_handler;
pub mod services;
pub mod state;
pub mod utils;
pub mod view_repository;

use async_trait::async_trait;
use cqrs_es::{Aggregate, EventEnvelope, Query};

pub struct SimpleLoggingQuery {}

#[async_trait]
impl<A> Query<A> for SimpleLoggingQuery
where
    A: Aggregate,
{
    async fn dispatch(&self, aggregate_id: &str, events: &[EventEnvelope<A>]) {
        for event in events {
            tracing::debug!(
                %aggregate_id,
                sequence = event.sequence,
                payload = ?event.payload,
                "event committed"
            );
        }
    }
}
