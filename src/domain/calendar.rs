//! Per-listing priced calendar.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;
use crate::domain::listing::Listing;
use crate::domain::pricing::compute_date_price;
use crate::domain::reference_data::ReferenceData;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub price: f64,
    pub currency: String,
}

/// Which price a converted calendar starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionBasis {
    /// Every night becomes `base_price × coefficient`; weekday
    /// adjustments are dropped. This is what existing clients see.
    #[default]
    BasePrice,
    /// Every night becomes its weekday-adjusted price × coefficient.
    AdjustedPrice,
}

impl FromStr for ConversionBasis {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::BasePrice),
            "adjusted" => Ok(Self::AdjustedPrice),
            other => Err(format!(
                "unknown calendar conversion '{other}' (expected base or adjusted)"
            )),
        }
    }
}

/// A built calendar and the currency it was requested in, if it differs
/// from the listing's own.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCalendar {
    pub converted_to: Option<String>,
    pub entries: Vec<CalendarEntry>,
}

/// Weekday-adjusted price for every date of the listing, in its own currency.
pub fn base_calendar(listing: &Listing) -> Vec<CalendarEntry> {
    listing
        .calendar
        .iter()
        .map(|&date| CalendarEntry {
            date,
            price: compute_date_price(&listing.market, listing.base_price, date),
            currency: listing.currency.clone(),
        })
        .collect()
}

pub fn build_calendar(
    listing: &Listing,
    requested_currency: Option<&str>,
    reference: &ReferenceData,
    rates: &RateSnapshot,
    basis: ConversionBasis,
) -> Result<PricedCalendar, PricingError> {
    let mut entries = base_calendar(listing);

    let Some(requested) = requested_currency else {
        return Ok(PricedCalendar {
            converted_to: None,
            entries,
        });
    };
    let target = reference.currency(requested)?.code.clone();
    if target == listing.currency {
        return Ok(PricedCalendar {
            converted_to: None,
            entries,
        });
    }

    let coefficient = rates.coefficient(&listing.currency, &target)?;
    for entry in &mut entries {
        entry.price = match basis {
            ConversionBasis::BasePrice => listing.base_price * coefficient,
            ConversionBasis::AdjustedPrice => entry.price * coefficient,
        };
        entry.currency = target.clone();
    }
    Ok(PricedCalendar {
        converted_to: Some(target),
        entries,
    })
}
