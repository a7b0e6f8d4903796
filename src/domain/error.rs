//! Domain error types.

use crate::domain::listing::ListingId;

/// Top-level error type for nightrate.
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Currency with code={code} does not exist")]
    UnknownCurrency { code: String },

    #[error("Market with code={code} does not exist")]
    UnknownMarket { code: String },

    #[error("unknown price comparator '{comparator}' (expected gt, gte, lt, lte or e)")]
    UnknownComparator { comparator: String },

    #[error("invalid price threshold '{value}'")]
    InvalidThreshold { value: String },

    #[error("invalid listing: {reason}")]
    InvalidListing { reason: String },

    #[error("listing {id} does not exist")]
    ListingNotFound { id: ListingId },

    #[error("exchange rate source unavailable: {reason}")]
    RateSourceUnavailable { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PricingError {
    pub fn unknown_currency(code: impl Into<String>) -> Self {
        Self::UnknownCurrency { code: code.into() }
    }

    pub fn unknown_market(code: impl Into<String>) -> Self {
        Self::UnknownMarket { code: code.into() }
    }

    pub fn invalid_listing(reason: impl Into<String>) -> Self {
        Self::InvalidListing {
            reason: reason.into(),
        }
    }
}

impl From<&PricingError> for std::process::ExitCode {
    fn from(err: &PricingError) -> Self {
        let code: u8 = match err {
            PricingError::Io(_) => 1,
            PricingError::ConfigParse { .. }
            | PricingError::ConfigMissing { .. }
            | PricingError::ConfigInvalid { .. } => 2,
            PricingError::RateSourceUnavailable { .. } => 3,
            PricingError::UnknownCurrency { .. }
            | PricingError::UnknownMarket { .. }
            | PricingError::UnknownComparator { .. }
            | PricingError::InvalidThreshold { .. }
            | PricingError::InvalidListing { .. } => 4,
            PricingError::ListingNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
