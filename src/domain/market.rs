//! Market reference records.

use serde::Serialize;

use crate::domain::currency::{AUD, EUR, ILS, JPY, USD};

pub const SAN_FRANCISCO: &str = "san-francisco";
pub const LISBON: &str = "lisbon";
pub const PARIS: &str = "paris";
pub const JERUSALEM: &str = "jerusalem";
pub const TOKYO: &str = "tokyo";
pub const BRISBANE: &str = "brisbane";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    pub code: String,
    pub name: String,
    pub currency: String,
}

impl Market {
    pub fn new(code: &str, name: &str, currency: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
        }
    }
}

/// The markets known to the service at startup.
pub fn standard_markets() -> Vec<Market> {
    vec![
        Market::new(SAN_FRANCISCO, "San Francisco", USD),
        Market::new(LISBON, "Lisbon", EUR),
        Market::new(PARIS, "Paris", EUR),
        Market::new(JERUSALEM, "Jerusalem", ILS),
        Market::new(TOKYO, "Tokyo", JPY),
        Market::new(BRISBANE, "Brisbane", AUD),
    ]
}
