//! End-to-end tests over the domain layer.
//!
//! Tests cover:
//! - Listing filters against the demo catalog
//! - Calendars in the listing's own currency and converted ones
//! - Failed operations leave the catalog untouched
//! - Listing ids stay stable across deletes

mod common;

use approx::assert_relative_eq;
use chrono::{Datelike, Weekday};
use common::*;
use nightrate::domain::calendar::{base_calendar, build_calendar, ConversionBasis};
use nightrate::domain::error::PricingError;
use nightrate::domain::filter::{ListingQuery, UnknownComparatorPolicy};
use nightrate::domain::listing::{ListingId, ListingPatch, NewListing};
use nightrate::domain::reference_data::ReferenceData;
use nightrate::ports::rate_port::RateSource;

fn ids(matched: &[&nightrate::domain::listing::Listing]) -> Vec<u64> {
    matched.iter().map(|l| l.id.0).collect()
}

mod filtering {
    use super::*;

    fn run(pairs: &[(&str, &str)]) -> Result<Vec<u64>, PricingError> {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let query = ListingQuery::from_params(&params(pairs), UnknownComparatorPolicy::Reject)?;
        let matched = query.apply(catalog.all(), &reference)?;
        Ok(ids(&matched))
    }

    #[test]
    fn no_params_returns_everything() {
        assert_eq!(run(&[]).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn price_greater_than() {
        assert_eq!(run(&[("base_price.gt", "700")]).unwrap(), vec![0, 2, 3]);
    }

    #[test]
    fn price_equal() {
        assert_eq!(run(&[("base_price.e", "1200")]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn price_with_currency() {
        assert_eq!(
            run(&[("base_price.gte", "1200"), ("currency", "jpy")]).unwrap(),
            vec![2]
        );
    }

    #[test]
    fn price_bounds_combine() {
        assert_eq!(
            run(&[("base_price.gt", "700"), ("base_price.lt", "1000")]).unwrap(),
            vec![0]
        );
    }

    #[test]
    fn price_takes_precedence_over_market() {
        assert_eq!(
            run(&[("market", "lisbon"), ("base_price.lt", "700")]).unwrap(),
            vec![1]
        );
        assert_eq!(
            run(&[("market", "tokyo"), ("base_price.lt", "700")]).unwrap(),
            vec![1]
        );
    }

    #[test]
    fn market_list() {
        assert_eq!(run(&[("market", "lisbon,tokyo")]).unwrap(), vec![1, 2]);
    }

    #[test]
    fn currency_only() {
        assert_eq!(run(&[("currency", "ils")]).unwrap(), vec![3]);
    }

    #[test]
    fn unknown_market_is_rejected() {
        let err = run(&[("market", "atlantis")]).unwrap_err();
        assert_eq!(err.to_string(), "Market with code=atlantis does not exist");
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let err = run(&[("currency", "GBP")]).unwrap_err();
        assert!(matches!(err, PricingError::UnknownCurrency { code } if code == "GBP"));
    }

    #[test]
    fn unknown_comparator_is_rejected() {
        let err = run(&[("base_price.ne", "5")]).unwrap_err();
        assert!(matches!(err, PricingError::UnknownComparator { .. }));
    }

    #[test]
    fn unknown_comparator_matches_nothing_under_legacy_policy() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let query = ListingQuery::from_params(
            &params(&[("base_price.ne", "5")]),
            UnknownComparatorPolicy::MatchNothing,
        )
        .unwrap();
        assert!(query.apply(catalog.all(), &reference).unwrap().is_empty());
    }

    #[test]
    fn non_numeric_threshold_is_rejected() {
        let err = run(&[("base_price.gt", "cheap")]).unwrap_err();
        assert!(matches!(err, PricingError::InvalidThreshold { value } if value == "cheap"));
    }
}

mod calendars {
    use super::*;

    #[test]
    fn tokyo_calendar_in_usd() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let tokyo = catalog.get(ListingId(2)).unwrap();

        let built = build_calendar(
            tokyo,
            Some("USD"),
            &reference,
            &test_rates(),
            ConversionBasis::BasePrice,
        )
        .unwrap();

        assert_eq!(built.converted_to.as_deref(), Some("USD"));
        assert_eq!(built.entries.len(), 14);
        for entry in &built.entries {
            assert_relative_eq!(entry.price, 1200.0 / 160.0);
            assert_eq!(entry.currency, "USD");
        }
    }

    #[test]
    fn lisbon_calendar_in_own_currency() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let lisbon = catalog.get(ListingId(1)).unwrap();

        let built = build_calendar(
            lisbon,
            Some("EUR"),
            &reference,
            &test_rates(),
            ConversionBasis::BasePrice,
        )
        .unwrap();

        assert_eq!(built.converted_to, None);
        assert_eq!(built.entries, base_calendar(lisbon));
        for entry in &built.entries {
            let expected = match entry.date.weekday() {
                Weekday::Sat | Weekday::Sun => 975.0,
                _ => 650.0,
            };
            assert_relative_eq!(entry.price, expected);
        }
    }

    #[test]
    fn san_francisco_wednesday_discount() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let sf = catalog.get(ListingId(0)).unwrap();

        let entries = base_calendar(sf);
        let wednesday = entries.iter().find(|e| e.date == date("2024-01-03")).unwrap();
        assert_relative_eq!(wednesday.price, 867.0 * 0.7);
        let friday = entries.iter().find(|e| e.date == date("2024-01-05")).unwrap();
        assert_relative_eq!(friday.price, 867.0);
    }

    #[test]
    fn jerusalem_friday_markup_converted_with_adjusted_basis() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let jerusalem = catalog.get(ListingId(3)).unwrap();

        let built = build_calendar(
            jerusalem,
            Some("usd"),
            &reference,
            &test_rates(),
            ConversionBasis::AdjustedPrice,
        )
        .unwrap();
        let friday = built
            .entries
            .iter()
            .find(|e| e.date == date("2024-01-05"))
            .unwrap();
        assert_relative_eq!(friday.price, 1500.0 / 4.0);
    }

    #[test]
    fn currency_without_rate_is_rejected() {
        let reference = ReferenceData::standard();
        let catalog = test_catalog(&reference);
        let rates = MockRateSource::new().without("AUD").fetch_rates("USD").unwrap();

        let err = build_calendar(
            catalog.get(ListingId(0)).unwrap(),
            Some("AUD"),
            &reference,
            &rates,
            ConversionBasis::BasePrice,
        )
        .unwrap_err();
        assert!(matches!(err, PricingError::UnknownCurrency { code } if code == "AUD"));
    }
}

mod catalog_mutation {
    use super::*;

    #[test]
    fn failed_update_leaves_listing_untouched() {
        let reference = ReferenceData::standard();
        let mut catalog = test_catalog(&reference);
        let before = catalog.get(ListingId(1)).unwrap().clone();

        let patch = ListingPatch {
            title: Some("Renamed".into()),
            market: Some("ATLANTIS".into()),
            ..ListingPatch::default()
        };
        let err = catalog.update(ListingId(1), patch, &reference).unwrap_err();

        assert!(matches!(err, PricingError::UnknownMarket { .. }));
        assert_eq!(catalog.get(ListingId(1)).unwrap(), &before);
    }

    #[test]
    fn failed_insert_leaves_catalog_untouched() {
        let reference = ReferenceData::standard();
        let mut catalog = test_catalog(&reference);

        let err = catalog
            .insert(
                NewListing {
                    title: "Nowhere".into(),
                    base_price: 100.0,
                    currency: None,
                    market: "ATLANTIS".into(),
                    host_name: String::new(),
                },
                &reference,
            )
            .unwrap_err();

        assert!(matches!(err, PricingError::UnknownMarket { .. }));
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn ids_stay_stable_after_delete() {
        let reference = ReferenceData::standard();
        let mut catalog = test_catalog(&reference);

        catalog.remove(ListingId(1)).unwrap();
        assert_eq!(catalog.get(ListingId(2)).unwrap().market, "tokyo");
        assert!(matches!(
            catalog.get(ListingId(1)),
            Err(PricingError::ListingNotFound { .. })
        ));

        let created = catalog
            .insert(
                NewListing {
                    title: "Riverside Loft".into(),
                    base_price: 180.0,
                    currency: None,
                    market: "paris".into(),
                    host_name: "Ana".into(),
                },
                &reference,
            )
            .unwrap();
        assert_eq!(created.id, ListingId(4));
        assert_eq!(created.currency, "EUR");
        assert_eq!(created.calendar.len(), 14);
    }
}
