pub mod membership_provider;
pub mod payment_gateway;
