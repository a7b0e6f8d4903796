//! Runtime behaviour switches read from configuration.

use crate::domain::calendar::ConversionBasis;
use crate::domain::config_validation::DEFAULT_CALENDAR_DAYS;
use crate::domain::filter::UnknownComparatorPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub calendar_days: u32,
    pub conversion_basis: ConversionBasis,
    pub comparator_policy: UnknownComparatorPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            calendar_days: DEFAULT_CALENDAR_DAYS as u32,
            conversion_basis: ConversionBasis::default(),
            comparator_policy: UnknownComparatorPolicy::default(),
        }
    }
}
