//! Configuration validation.
//!
//! Validates all config fields before the service starts.

use std::net::SocketAddr;

use crate::domain::calendar::ConversionBasis;
use crate::domain::error::PricingError;
use crate::domain::filter::UnknownComparatorPolicy;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:5000";
pub const DEFAULT_CALENDAR_DAYS: i64 = 365;
pub const MAX_CALENDAR_DAYS: i64 = 3660;

pub fn validate_service_config(config: &dyn ConfigPort) -> Result<(), PricingError> {
    validate_listen(config)?;
    validate_calendar_days(config)?;
    validate_conversion_basis(config)?;
    validate_comparator_policy(config)?;
    validate_rates(config)?;
    validate_log_format(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> PricingError {
    PricingError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), PricingError> {
    if let Some(listen) = config.get_string("server", "listen") {
        listen
            .parse::<SocketAddr>()
            .map_err(|_| invalid("server", "listen", "expected host:port"))?;
    }
    Ok(())
}

fn validate_calendar_days(config: &dyn ConfigPort) -> Result<(), PricingError> {
    let days = config.get_int("catalog", "calendar_days", DEFAULT_CALENDAR_DAYS);
    if !(1..=MAX_CALENDAR_DAYS).contains(&days) {
        return Err(invalid(
            "catalog",
            "calendar_days",
            format!("calendar_days must be between 1 and {MAX_CALENDAR_DAYS}"),
        ));
    }
    Ok(())
}

fn validate_conversion_basis(config: &dyn ConfigPort) -> Result<(), PricingError> {
    if let Some(value) = config.get_string("pricing", "calendar_conversion") {
        value
            .parse::<ConversionBasis>()
            .map_err(|reason| invalid("pricing", "calendar_conversion", reason))?;
    }
    Ok(())
}

fn validate_comparator_policy(config: &dyn ConfigPort) -> Result<(), PricingError> {
    if let Some(value) = config.get_string("filters", "unknown_comparator") {
        value
            .parse::<UnknownComparatorPolicy>()
            .map_err(|reason| invalid("filters", "unknown_comparator", reason))?;
    }
    Ok(())
}

fn validate_rates(config: &dyn ConfigPort) -> Result<(), PricingError> {
    let source = config
        .get_string("rates", "source")
        .unwrap_or_else(|| "openexchangerates".to_string());

    match source.trim().to_lowercase().as_str() {
        "openexchangerates" => {
            let app_id = config.get_string("rates", "app_id").unwrap_or_default();
            if app_id.trim().is_empty() {
                return Err(PricingError::ConfigMissing {
                    section: "rates".to_string(),
                    key: "app_id".to_string(),
                });
            }
            if config.get_int("rates", "timeout_secs", 10) <= 0 {
                return Err(invalid("rates", "timeout_secs", "timeout_secs must be positive"));
            }
            if config.get_int("rates", "retries", 3) < 0 {
                return Err(invalid("rates", "retries", "retries must be non-negative"));
            }
            if config.get_int("rates", "retry_delay_ms", 500) < 0 {
                return Err(invalid(
                    "rates",
                    "retry_delay_ms",
                    "retry_delay_ms must be non-negative",
                ));
            }
        }
        "fixed" => {
            let fixed = config.get_string("rates", "fixed").unwrap_or_default();
            if fixed.trim().is_empty() {
                return Err(PricingError::ConfigMissing {
                    section: "rates".to_string(),
                    key: "fixed".to_string(),
                });
            }
        }
        other => {
            return Err(invalid(
                "rates",
                "source",
                format!("unknown rate source '{other}' (expected openexchangerates or fixed)"),
            ));
        }
    }

    if let Some(base) = config.get_string("rates", "base") {
        let base = base.trim();
        if base.len() != 3 || !base.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid("rates", "base", "base must be a 3-letter currency code"));
        }
    }
    Ok(())
}

fn validate_log_format(config: &dyn ConfigPort) -> Result<(), PricingError> {
    if let Some(format) = config.get_string("log", "format") {
        match format.trim().to_lowercase().as_str() {
            "text" | "json" => {}
            _ => return Err(invalid("log", "format", "format must be text or json")),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[server]
listen = 0.0.0.0:8080

[catalog]
calendar_days = 30

[pricing]
calendar_conversion = adjusted

[filters]
unknown_comparator = match_nothing

[rates]
source = openexchangerates
app_id = abc123
base = USD
timeout_secs = 5
retries = 2

[log]
format = json
"#;

    fn assert_invalid(result: Result<(), PricingError>, section: &str, key: &str) {
        match result {
            Err(PricingError::ConfigInvalid {
                section: s, key: k, ..
            }) => {
                assert_eq!(s, section);
                assert_eq!(k, key);
            }
            other => panic!("expected ConfigInvalid [{section}] {key}, got {other:?}"),
        }
    }

    #[test]
    fn full_config_is_valid() {
        assert!(validate_service_config(&adapter(VALID)).is_ok());
    }

    #[test]
    fn fixed_rates_need_no_app_id() {
        let cfg = adapter("[rates]\nsource = fixed\nfixed = USD:1, EUR:0.9\n");
        assert!(validate_service_config(&cfg).is_ok());
    }

    #[test]
    fn missing_app_id() {
        let result = validate_service_config(&adapter("[rates]\nsource = openexchangerates\n"));
        assert!(matches!(
            result,
            Err(PricingError::ConfigMissing { section, key }) if section == "rates" && key == "app_id"
        ));
    }

    #[test]
    fn missing_fixed_rates() {
        let result = validate_service_config(&adapter("[rates]\nsource = fixed\n"));
        assert!(matches!(result, Err(PricingError::ConfigMissing { key, .. }) if key == "fixed"));
    }

    #[test]
    fn unknown_rate_source() {
        let result = validate_service_config(&adapter("[rates]\nsource = ecb\n"));
        assert_invalid(result, "rates", "source");
    }

    #[test]
    fn bad_listen_address() {
        let cfg = adapter("[server]\nlisten = localhost\n[rates]\nsource = fixed\nfixed = USD:1\n");
        assert_invalid(validate_service_config(&cfg), "server", "listen");
    }

    #[test]
    fn calendar_days_out_of_range() {
        let cfg = adapter("[catalog]\ncalendar_days = 0\n[rates]\nsource = fixed\nfixed = USD:1\n");
        assert_invalid(validate_service_config(&cfg), "catalog", "calendar_days");
    }

    #[test]
    fn unknown_conversion_basis() {
        let cfg =
            adapter("[pricing]\ncalendar_conversion = nightly\n[rates]\nsource = fixed\nfixed = USD:1\n");
        assert_invalid(validate_service_config(&cfg), "pricing", "calendar_conversion");
    }

    #[test]
    fn unknown_comparator_policy() {
        let cfg =
            adapter("[filters]\nunknown_comparator = ignore\n[rates]\nsource = fixed\nfixed = USD:1\n");
        assert_invalid(validate_service_config(&cfg), "filters", "unknown_comparator");
    }

    #[test]
    fn bad_base_currency() {
        let cfg = adapter("[rates]\nsource = fixed\nfixed = USD:1\nbase = US\n");
        assert_invalid(validate_service_config(&cfg), "rates", "base");
    }

    #[test]
    fn non_positive_timeout() {
        let cfg = adapter("[rates]\napp_id = x\ntimeout_secs = 0\n");
        assert_invalid(validate_service_config(&cfg), "rates", "timeout_secs");
    }

    #[test]
    fn bad_log_format() {
        let cfg = adapter("[log]\nformat = xml\n[rates]\nsource = fixed\nfixed = USD:1\n");
        assert_invalid(validate_service_config(&cfg), "log", "format");
    }
}
