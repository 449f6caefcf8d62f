use std::sync::Arc;

use crate::config::{CheckoutConfig, CheckoutCqrs, cqrs_framework};
use crate::domain::checkout::CheckoutServices;
use crate::queries::callbacks::CheckoutCallbacks;
use crate::services::membership_provider::StaticMembershipProvider;
use crate::services::payment_gateway::SimulatedPaymentGateway;
use crate::view_repository::CheckoutViewRepository;

#[derive(Clone)]
pub struct ApplicationState {
    pub cqrs: Arc<CheckoutCqrs>,
    pub checkout_query: Arc<CheckoutViewRepository>,
}

pub fn new_application_state(config: &CheckoutConfig) -> ApplicationState {
    // Configure the CQRS framework with an in-memory event store, the
    // simulated collaborators, and queries that:
    // - log each committed event
    // - keep the current state of every checkout for the query endpoint
    // - report completion and dismissal back to the host
    // - charge the card once a submission starts
    let services = CheckoutServices::new(
        Arc::new(StaticMembershipProvider::new(
            config.stored_member_id.clone(),
            config.lookup_delay,
        )),
        Arc::new(SimulatedPaymentGateway::new(config.payment_delay)),
    );
    let callbacks = CheckoutCallbacks::new(
        || tracing::info!("checkout dismissed"),
        |summary| tracing::info!(booking_id = %summary.booking_id, "booking completed"),
    );
    let (cqrs, checkout_query) = cqrs_framework(services, Some(callbacks));
    ApplicationState {
        cqrs,
        checkout_query,
    }
}
