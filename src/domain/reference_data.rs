//! Immutable market and currency tables.
//!
//! Built once at startup and shared by reference; nothing in the service
//! mutates them afterwards.

use std::collections::HashMap;

use crate::domain::currency::{normalize_code, standard_currencies, Currency};
use crate::domain::error::PricingError;
use crate::domain::market::{standard_markets, Market};

#[derive(Debug, Clone)]
pub struct ReferenceData {
    markets: Vec<Market>,
    currencies: Vec<Currency>,
    market_index: HashMap<String, usize>,
    currency_index: HashMap<String, usize>,
}

impl ReferenceData {
    /// Builds the tables. Later duplicates of a code are ignored by lookups.
    pub fn new(markets: Vec<Market>, currencies: Vec<Currency>) -> Self {
        let mut market_index = HashMap::with_capacity(markets.len());
        for (i, market) in markets.iter().enumerate() {
            market_index.entry(market.code.clone()).or_insert(i);
        }
        let mut currency_index = HashMap::with_capacity(currencies.len());
        for (i, currency) in currencies.iter().enumerate() {
            currency_index.entry(normalize_code(&currency.code)).or_insert(i);
        }
        Self {
            markets,
            currencies,
            market_index,
            currency_index,
        }
    }

    pub fn standard() -> Self {
        Self::new(standard_markets(), standard_currencies())
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Exact-match lookup; market codes are case-sensitive slugs.
    pub fn market(&self, code: &str) -> Result<&Market, PricingError> {
        self.market_index
            .get(code.trim())
            .map(|&i| &self.markets[i])
            .ok_or_else(|| PricingError::unknown_market(code))
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    /// Case-insensitive lookup against the stored uppercase codes.
    pub fn currency(&self, code: &str) -> Result<&Currency, PricingError> {
        let normalized = normalize_code(code);
        match self.currency_index.get(&normalized) {
            Some(&i) => Ok(&self.currencies[i]),
            None => Err(PricingError::unknown_currency(normalized)),
        }
    }
}
