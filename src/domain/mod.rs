//! Core domain types and logic.

pub mod currency;
pub mod market;
pub mod reference_data;
pub mod exchange_rate;
pub mod pricing;
pub mod listing;
pub mod filter;
pub mod calendar;
pub mod settings;
pub mod config_validation;
pub mod error;
