//! Point-in-time exchange rate table.
//!
//! Every rate is quoted against a single base currency, so the conversion
//! coefficient between two currencies is the ratio of their rates.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::currency::normalize_code;
use crate::domain::error::PricingError;

#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    base: String,
    rates: HashMap<String, f64>,
}

impl RateSnapshot {
    /// Rejects non-finite or non-positive rates. The base currency is added
    /// at 1.0 when the source omits it.
    pub fn new(base: &str, rates: HashMap<String, f64>) -> Result<Self, PricingError> {
        let base = normalize_code(base);
        let mut normalized = HashMap::with_capacity(rates.len() + 1);
        for (code, rate) in rates {
            if !rate.is_finite() || rate <= 0.0 {
                return Err(PricingError::RateSourceUnavailable {
                    reason: format!("invalid rate {rate} for {code}"),
                });
            }
            normalized.insert(normalize_code(&code), rate);
        }
        normalized.entry(base.clone()).or_insert(1.0);
        Ok(Self {
            base,
            rates: normalized,
        })
    }

    /// Parses a provider body of the form `{"base": "USD", "rates": {...}}`.
    pub fn from_json(body: &str) -> Result<Self, PricingError> {
        #[derive(Deserialize)]
        struct LatestRates {
            base: String,
            rates: HashMap<String, f64>,
        }

        let parsed: LatestRates =
            serde_json::from_str(body).map_err(|e| PricingError::RateSourceUnavailable {
                reason: format!("unparseable rate response: {e}"),
            })?;
        Self::new(&parsed.base, parsed.rates)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn rate(&self, code: &str) -> Result<f64, PricingError> {
        let code = normalize_code(code);
        self.rates
            .get(&code)
            .copied()
            .ok_or(PricingError::UnknownCurrency { code })
    }

    /// Multiplier turning an amount in `from` into an amount in `to`.
    pub fn coefficient(&self, from: &str, to: &str) -> Result<f64, PricingError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        Ok(to_rate / from_rate)
    }

    /// Codes from `codes` that have no rate in this snapshot.
    pub fn missing_codes<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        codes
            .into_iter()
            .map(normalize_code)
            .filter(|code| !self.rates.contains_key(code))
            .collect()
    }
}
