//! Built-in demo listings loaded at startup.

use chrono::NaiveDate;

use crate::domain::currency::{EUR, ILS, JPY, USD};
use crate::domain::error::PricingError;
use crate::domain::listing::{availability_window, ListingCatalog, NewListing};
use crate::domain::market::{JERUSALEM, LISBON, SAN_FRANCISCO, TOKYO};
use crate::domain::reference_data::ReferenceData;

fn demo(title: &str, base_price: f64, currency: &str, market: &str, host: &str) -> NewListing {
    NewListing {
        title: title.to_string(),
        base_price,
        currency: Some(currency.to_string()),
        market: market.to_string(),
        host_name: host.to_string(),
    }
}

pub fn demo_listings() -> Vec<NewListing> {
    vec![
        demo(
            "Comfortable Room In Cozy Neighborhood",
            867.0,
            USD,
            SAN_FRANCISCO,
            "John Smith",
        ),
        demo("Duplex Room In City Center", 650.0, EUR, LISBON, "Tim Jones"),
        demo("Private Villa In Village", 1200.0, JPY, TOKYO, "Billy Roberts"),
        demo("Apartment In Sub", 1200.0, ILS, JERUSALEM, "John Rogers"),
    ]
}

/// Catalog holding the demo listings, each available for `days` nights
/// starting on `start`.
pub fn seeded_catalog(
    reference: &ReferenceData,
    start: NaiveDate,
    days: u32,
) -> Result<ListingCatalog, PricingError> {
    let mut catalog = ListingCatalog::new(availability_window(start, days));
    for listing in demo_listings() {
        catalog.insert(listing, reference)?;
    }
    Ok(catalog)
}
