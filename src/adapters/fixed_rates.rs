//! Rates read from configuration instead of a provider.
//!
//! `[rates] fixed = USD:1.0, EUR:0.92, JPY:149.5` quotes every listed
//! currency against `[rates] base`. Used for offline runs and tests.

use std::collections::HashMap;

use crate::domain::currency::normalize_code;
use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;
use crate::ports::rate_port::RateSource;

#[derive(Debug, Clone)]
pub struct FixedRateSource {
    rates: HashMap<String, f64>,
}

impl FixedRateSource {
    pub fn parse(spec: &str) -> Result<Self, PricingError> {
        let invalid = |reason: String| PricingError::ConfigInvalid {
            section: "rates".into(),
            key: "fixed".into(),
            reason,
        };

        let mut rates = HashMap::new();
        for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, rate) = entry
                .split_once(':')
                .ok_or_else(|| invalid(format!("expected CODE:rate, got '{entry}'")))?;
            let rate: f64 = rate
                .trim()
                .parse()
                .map_err(|_| invalid(format!("invalid rate in '{entry}'")))?;
            rates.insert(normalize_code(code), rate);
        }
        if rates.is_empty() {
            return Err(invalid("no rates given".into()));
        }
        Ok(Self { rates })
    }
}

impl RateSource for FixedRateSource {
    fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, PricingError> {
        RateSnapshot::new(base, self.rates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_code_rate_pairs() {
        let source = FixedRateSource::parse("USD:1.0, eur:0.9 ,JPY:150").unwrap();
        let snapshot = source.fetch_rates("USD").unwrap();
        assert_eq!(snapshot.rate("EUR").unwrap(), 0.9);
        assert_eq!(snapshot.coefficient("JPY", "EUR").unwrap(), 0.9 / 150.0);
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            FixedRateSource::parse("USD=1.0"),
            Err(PricingError::ConfigInvalid { .. })
        ));
        assert!(FixedRateSource::parse("USD:abc").is_err());
        assert!(FixedRateSource::parse(" , ").is_err());
    }

    #[test]
    fn non_positive_rate_fails_on_fetch() {
        let source = FixedRateSource::parse("USD:1, EUR:-2").unwrap();
        assert!(matches!(
            source.fetch_rates("USD"),
            Err(PricingError::RateSourceUnavailable { .. })
        ));
    }
}
