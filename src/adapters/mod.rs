//! Concrete adapter implementations for ports.

pub mod file_config_adapter;
pub mod fixed_rates;
pub mod open_exchange_rates;
pub mod seed_catalog;
#[cfg(feature = "web")]
pub mod web;
