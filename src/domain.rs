pub mod catalog;
pub mod checkout;
pub mod commands;
pub mod draft;
pub mod events;
pub mod membership;
pub mod pricing;
pub mod step;
pub mod validation;
