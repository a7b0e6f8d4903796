//! Listing filters and query-parameter precedence.
//!
//! Filters borrow from the catalog and return the matching listings in their
//! original relative order; they never mutate the collection.

use std::str::FromStr;

use crate::domain::error::PricingError;
use crate::domain::listing::Listing;
use crate::domain::reference_data::ReferenceData;

/// Query key prefix selecting a price comparison, e.g. `base_price.gt`.
pub const PRICE_PARAM_PREFIX: &str = "base_price.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl Comparator {
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparator::Gt => value > threshold,
            Comparator::Gte => value >= threshold,
            Comparator::Lt => value < threshold,
            Comparator::Lte => value <= threshold,
            Comparator::Eq => value == threshold,
        }
    }
}

impl FromStr for Comparator {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" => Ok(Comparator::Gt),
            "gte" => Ok(Comparator::Gte),
            "lt" => Ok(Comparator::Lt),
            "lte" => Ok(Comparator::Lte),
            "e" => Ok(Comparator::Eq),
            other => Err(PricingError::UnknownComparator {
                comparator: other.to_string(),
            }),
        }
    }
}

/// What to do with a `base_price.<cmp>` key whose comparator is not known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownComparatorPolicy {
    /// Fail the query with `UnknownComparator`.
    #[default]
    Reject,
    /// Legacy behaviour: the price branch matches no listing at all.
    MatchNothing,
}

impl FromStr for UnknownComparatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "match_nothing" => Ok(Self::MatchNothing),
            other => Err(format!(
                "unknown comparator policy '{other}' (expected reject or match_nothing)"
            )),
        }
    }
}

pub fn filter_by_price<'a, I>(listings: I, comparator: Comparator, threshold: f64) -> Vec<&'a Listing>
where
    I: IntoIterator<Item = &'a Listing>,
{
    listings
        .into_iter()
        .filter(|l| comparator.matches(l.base_price, threshold))
        .collect()
}

/// `codes` is a comma-separated list of market codes. Every code must be
/// known, otherwise the first unknown one is reported.
pub fn filter_by_market<'a, I>(
    listings: I,
    codes: &str,
    reference: &ReferenceData,
) -> Result<Vec<&'a Listing>, PricingError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let wanted = codes
        .split(',')
        .map(|code| reference.market(code).map(|m| m.code.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(listings
        .into_iter()
        .filter(|l| wanted.contains(&l.market.as_str()))
        .collect())
}

pub fn filter_by_currency<'a, I>(
    listings: I,
    code: &str,
    reference: &ReferenceData,
) -> Result<Vec<&'a Listing>, PricingError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let currency = reference.currency(code)?;
    Ok(listings
        .into_iter()
        .filter(|l| l.currency == currency.code)
        .collect())
}

/// Price filter, optionally narrowed to one currency. Order follows the
/// price filter.
pub fn filter_by_price_and_currency<'a, I>(
    listings: I,
    comparator: Comparator,
    threshold: f64,
    currency: Option<&str>,
    reference: &ReferenceData,
) -> Result<Vec<&'a Listing>, PricingError>
where
    I: IntoIterator<Item = &'a Listing>,
{
    let priced = filter_by_price(listings, comparator, threshold);
    match currency {
        Some(code) => filter_by_currency(priced, code, reference),
        None => Ok(priced),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBound {
    pub comparator: Comparator,
    pub threshold: f64,
}

/// The filter branch selected by a set of query parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingQuery {
    /// No recognised parameter: every listing.
    All,
    /// One or more price bounds, all of which must hold.
    Price {
        bounds: Vec<PriceBound>,
        currency: Option<String>,
    },
    /// A price branch that can match nothing (legacy unknown comparator).
    Unsatisfiable,
    Market(String),
    Currency(String),
}

impl ListingQuery {
    /// Selects the branch from `params` in this order: any `base_price.<cmp>`
    /// key, then `market`, then `currency`, else `All`.
    pub fn from_params(
        params: &[(String, String)],
        policy: UnknownComparatorPolicy,
    ) -> Result<Self, PricingError> {
        let lookup = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        let mut bounds = Vec::new();
        let mut unsatisfiable = false;
        for (key, value) in params {
            let Some(raw) = key.strip_prefix(PRICE_PARAM_PREFIX) else {
                continue;
            };
            let threshold: f64 = value
                .trim()
                .parse()
                .map_err(|_| PricingError::InvalidThreshold {
                    value: value.clone(),
                })?;
            match (raw.parse::<Comparator>(), policy) {
                (Ok(comparator), _) => bounds.push(PriceBound {
                    comparator,
                    threshold,
                }),
                (Err(_), UnknownComparatorPolicy::MatchNothing) => unsatisfiable = true,
                (Err(e), UnknownComparatorPolicy::Reject) => return Err(e),
            }
        }

        if unsatisfiable {
            return Ok(ListingQuery::Unsatisfiable);
        }
        if !bounds.is_empty() {
            return Ok(ListingQuery::Price {
                bounds,
                currency: lookup("currency"),
            });
        }
        if let Some(codes) = lookup("market") {
            return Ok(ListingQuery::Market(codes));
        }
        if let Some(code) = lookup("currency") {
            return Ok(ListingQuery::Currency(code));
        }
        Ok(ListingQuery::All)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ListingQuery::All)
    }

    pub fn apply<'a>(
        &self,
        listings: &'a [Listing],
        reference: &ReferenceData,
    ) -> Result<Vec<&'a Listing>, PricingError> {
        match self {
            ListingQuery::All => Ok(listings.iter().collect()),
            ListingQuery::Unsatisfiable => Ok(Vec::new()),
            ListingQuery::Price { bounds, currency } => {
                let Some((last, earlier)) = bounds.split_last() else {
                    return Ok(listings.iter().collect());
                };
                let mut narrowed: Vec<&Listing> = listings.iter().collect();
                for bound in earlier {
                    narrowed = filter_by_price(narrowed, bound.comparator, bound.threshold);
                }
                filter_by_price_and_currency(
                    narrowed,
                    last.comparator,
                    last.threshold,
                    currency.as_deref(),
                    reference,
                )
            }
            ListingQuery::Market(codes) => filter_by_market(listings, codes, reference),
            ListingQuery::Currency(code) => filter_by_currency(listings, code, reference),
        }
    }
}
