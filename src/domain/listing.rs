//! Listings and the in-memory listing catalog.
//!
//! Listings keep an identifier assigned once at creation. The catalog stores
//! them in insertion order; because ids come from a monotonic counter, that
//! order is also id order and lookups are a binary search.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::error::PricingError;
use crate::domain::pricing::default_currency_for_market;
use crate::domain::reference_data::ReferenceData;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub u64);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub base_price: f64,
    pub currency: String,
    pub market: String,
    pub host_name: String,
    #[serde(skip)]
    pub calendar: Vec<NaiveDate>,
}

/// Payload for creating a listing. A missing currency falls back to the
/// market's default currency.
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub base_price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub market: String,
    #[serde(default)]
    pub host_name: String,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub base_price: Option<f64>,
    pub currency: Option<String>,
    pub market: Option<String>,
    pub host_name: Option<String>,
}

/// `days` consecutive dates starting at `start`.
pub fn availability_window(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    start.iter_days().take(days as usize).collect()
}

fn validate_base_price(base_price: f64) -> Result<(), PricingError> {
    if !base_price.is_finite() || base_price < 0.0 {
        return Err(PricingError::invalid_listing(format!(
            "base_price must be a non-negative number, got {base_price}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct ListingCatalog {
    listings: Vec<Listing>,
    next_id: u64,
    calendar: Vec<NaiveDate>,
}

impl ListingCatalog {
    /// Empty catalog whose new listings are available on `calendar`.
    pub fn new(calendar: Vec<NaiveDate>) -> Self {
        Self {
            listings: Vec::new(),
            next_id: 0,
            calendar,
        }
    }

    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    fn position(&self, id: ListingId) -> Result<usize, PricingError> {
        self.listings
            .binary_search_by_key(&id, |l| l.id)
            .map_err(|_| PricingError::ListingNotFound { id })
    }

    pub fn get(&self, id: ListingId) -> Result<&Listing, PricingError> {
        let pos = self.position(id)?;
        Ok(&self.listings[pos])
    }

    pub fn insert(
        &mut self,
        new: NewListing,
        reference: &ReferenceData,
    ) -> Result<&Listing, PricingError> {
        validate_base_price(new.base_price)?;
        let market = reference.market(&new.market)?.code.clone();
        let currency = match new.currency {
            Some(code) => reference.currency(&code)?.code.clone(),
            None => match default_currency_for_market(&market) {
                Some(code) => code.to_string(),
                None => {
                    return Err(PricingError::invalid_listing(format!(
                        "market {market} has no default currency; currency is required"
                    )));
                }
            },
        };

        let id = ListingId(self.next_id);
        self.next_id += 1;
        self.listings.push(Listing {
            id,
            title: new.title,
            base_price: new.base_price,
            currency,
            market,
            host_name: new.host_name,
            calendar: self.calendar.clone(),
        });
        Ok(&self.listings[self.listings.len() - 1])
    }

    /// Applies `patch` atomically: nothing changes unless every field is valid.
    pub fn update(
        &mut self,
        id: ListingId,
        patch: ListingPatch,
        reference: &ReferenceData,
    ) -> Result<&Listing, PricingError> {
        let pos = self.position(id)?;
        if let Some(price) = patch.base_price {
            validate_base_price(price)?;
        }
        let market = match &patch.market {
            Some(code) => Some(reference.market(code)?.code.clone()),
            None => None,
        };
        let currency = match &patch.currency {
            Some(code) => Some(reference.currency(code)?.code.clone()),
            None => None,
        };

        let listing = &mut self.listings[pos];
        if let Some(title) = patch.title {
            listing.title = title;
        }
        if let Some(price) = patch.base_price {
            listing.base_price = price;
        }
        if let Some(market) = market {
            listing.market = market;
        }
        if let Some(currency) = currency {
            listing.currency = currency;
        }
        if let Some(host_name) = patch.host_name {
            listing.host_name = host_name;
        }
        Ok(&*listing)
    }

    pub fn remove(&mut self, id: ListingId) -> Result<Listing, PricingError> {
        let pos = self.position(id)?;
        Ok(self.listings.remove(pos))
    }
}
