//! Exchange rate source port trait.

use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;

pub trait RateSource {
    /// Fetches the current rates quoted against `base`. Fails with
    /// `RateSourceUnavailable` when the source cannot be reached or parsed.
    fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, PricingError>;
}
