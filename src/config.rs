use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cqrs_es::{CqrsFramework, Query};
use thiserror::Error;

use crate::SimpleLoggingQuery;
use crate::domain::checkout::{Checkout, CheckoutServices};
use crate::event_store::InMemoryEventStore;
use crate::queries::callbacks::CheckoutCallbacks;
use crate::queries::payment_saga::PaymentSaga;
use crate::view_repository::CheckoutViewRepository;

pub type CheckoutCqrs = CqrsFramework<Checkout, InMemoryEventStore<Checkout>>;

const DEFAULT_ADDR: &str = "0.0.0.0:3030";
const DEFAULT_PAYMENT_DELAY_MS: u64 = 3000;
const DEFAULT_LOOKUP_DELAY_MS: u64 = 1000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Process settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutConfig {
    pub addr: SocketAddr,
    pub payment_delay: Duration,
    pub lookup_delay: Duration,
    /// Member signed in to the host application, if any.
    pub stored_member_id: Option<String>,
}

impl CheckoutConfig {
    /// # Errors
    ///
    /// Returns an error when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("CHECKOUT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "CHECKOUT_ADDR",
                value: addr_value.clone(),
            })?;

        Ok(Self {
            addr,
            payment_delay: millis(&lookup, "CHECKOUT_PAYMENT_DELAY_MS", DEFAULT_PAYMENT_DELAY_MS)?,
            lookup_delay: millis(&lookup, "CHECKOUT_LOOKUP_DELAY_MS", DEFAULT_LOOKUP_DELAY_MS)?,
            stored_member_id: lookup("CHECKOUT_STORED_MEMBER_ID")
                .filter(|value| !value.trim().is_empty()),
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    match lookup(key) {
        None => Ok(Duration::from_millis(default)),
        Some(value) => value
            .trim()
            .parse()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

pub fn cqrs_framework(
    services: CheckoutServices,
    callbacks: Option<CheckoutCallbacks>,
) -> (Arc<CheckoutCqrs>, Arc<CheckoutViewRepository>) {
    // A very simple query that logs each event.
    let simple_query = SimpleLoggingQuery {};

    // Holds the current state of every checkout for the query endpoint.
    let checkout_view_repo = Arc::new(CheckoutViewRepository::new());

    // The saga runs last so the projection already shows the submission in
    // flight while payment is processed.
    let cqrs = Arc::new_cyclic(|cqrs| {
        let mut queries: Vec<Box<dyn Query<Checkout>>> = vec![
            Box::new(simple_query),
            Box::new(checkout_view_repo.as_ref().clone()),
        ];
        if let Some(callbacks) = callbacks {
            queries.push(Box::new(callbacks));
        }
        queries.push(Box::new(PaymentSaga::new(cqrs.clone())));
        CqrsFramework::new(InMemoryEventStore::new(), queries, services)
    });

    (cqrs, checkout_view_repo)
}
