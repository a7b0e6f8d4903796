#![allow(dead_code)]

use chrono::NaiveDate;
use nightrate::adapters::seed_catalog::seeded_catalog;
use nightrate::domain::error::PricingError;
use nightrate::domain::exchange_rate::RateSnapshot;
use nightrate::domain::listing::ListingCatalog;
use nightrate::domain::reference_data::ReferenceData;
use nightrate::ports::rate_port::RateSource;
use std::collections::HashMap;

/// Rates quoted against USD, round enough to check by hand.
pub const TEST_RATES: &[(&str, f64)] = &[
    ("USD", 1.0),
    ("EUR", 0.8),
    ("JPY", 160.0),
    ("ILS", 4.0),
    ("AUD", 1.6),
];

pub struct MockRateSource {
    pub rates: HashMap<String, f64>,
}

impl MockRateSource {
    pub fn new() -> Self {
        Self {
            rates: TEST_RATES
                .iter()
                .map(|(code, rate)| (code.to_string(), *rate))
                .collect(),
        }
    }

    pub fn without(mut self, code: &str) -> Self {
        self.rates.remove(code);
        self
    }
}

impl RateSource for MockRateSource {
    fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, PricingError> {
        RateSnapshot::new(base, self.rates.clone())
    }
}

pub fn test_rates() -> RateSnapshot {
    MockRateSource::new().fetch_rates("USD").unwrap()
}

/// Monday.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// The four demo listings, each available for two weeks from `start_date`.
pub fn test_catalog(reference: &ReferenceData) -> ListingCatalog {
    seeded_catalog(reference, start_date(), 14).unwrap()
}

pub fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
