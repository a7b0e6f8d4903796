//! Date-specific pricing and currency conversion.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::currency::{AUD, EUR, ILS, JPY, USD};
use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;
use crate::domain::market::{BRISBANE, JERUSALEM, LISBON, PARIS, SAN_FRANCISCO, TOKYO};

/// Weekend multiplier for Lisbon and Paris.
pub const WEEKEND_MARKUP: f64 = 1.5;
/// Wednesday multiplier for San Francisco.
pub const MIDWEEK_DISCOUNT: f64 = 0.7;
/// Friday multiplier for every other market.
pub const FRIDAY_MARKUP: f64 = 1.25;

/// Nightly price of a listing in `market` on `date`.
///
/// The rules are mutually exclusive by market group:
/// - Lisbon, Paris: Saturday and Sunday cost `WEEKEND_MARKUP` times the base.
/// - San Francisco: Wednesday costs `MIDWEEK_DISCOUNT` times the base.
/// - Any other market: Friday costs `FRIDAY_MARKUP` times the base.
///
/// All other nights are priced at the base price.
pub fn compute_date_price(market: &str, base_price: f64, date: NaiveDate) -> f64 {
    let weekday = date.weekday();
    match market {
        LISBON | PARIS if matches!(weekday, Weekday::Sat | Weekday::Sun) => {
            base_price * WEEKEND_MARKUP
        }
        SAN_FRANCISCO if weekday == Weekday::Wed => base_price * MIDWEEK_DISCOUNT,
        SAN_FRANCISCO | LISBON | PARIS => base_price,
        _ if weekday == Weekday::Fri => base_price * FRIDAY_MARKUP,
        _ => base_price,
    }
}

/// Home currency of the known markets; `None` for anything else.
pub fn default_currency_for_market(market: &str) -> Option<&'static str> {
    match market {
        SAN_FRANCISCO => Some(USD),
        LISBON | PARIS => Some(EUR),
        JERUSALEM => Some(ILS),
        TOKYO => Some(JPY),
        BRISBANE => Some(AUD),
        _ => None,
    }
}

pub fn convert(
    amount: f64,
    from_currency: &str,
    to_currency: &str,
    rates: &RateSnapshot,
) -> Result<f64, PricingError> {
    Ok(amount * rates.coefficient(from_currency, to_currency)?)
}
