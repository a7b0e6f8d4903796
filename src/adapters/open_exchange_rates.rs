//! openexchangerates.org rate source.
//!
//! Fetched once, synchronously, before the web runtime starts. Transport
//! failures, timeouts, 429 and 5xx responses are retried a fixed number of
//! times with a fixed delay; other client errors fail immediately.

use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;
use crate::ports::config_port::ConfigPort;
use crate::ports::rate_port::RateSource;

pub const DEFAULT_URL: &str = "https://openexchangerates.org/api/latest.json";

#[derive(Debug, Clone)]
pub struct OpenExchangeRatesConfig {
    pub url: String,
    pub app_id: String,
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl OpenExchangeRatesConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, PricingError> {
        let app_id = config
            .get_string("rates", "app_id")
            .ok_or_else(|| PricingError::ConfigMissing {
                section: "rates".into(),
                key: "app_id".into(),
            })?;
        Ok(Self {
            url: config
                .get_string("rates", "url")
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            app_id,
            timeout: Duration::from_secs(config.get_int("rates", "timeout_secs", 10).max(1) as u64),
            retries: config.get_int("rates", "retries", 3).max(0) as u32,
            retry_delay: Duration::from_millis(
                config.get_int("rates", "retry_delay_ms", 500).max(0) as u64,
            ),
        })
    }
}

enum Attempt {
    Retryable(String),
    Fatal(String),
}

pub struct OpenExchangeRatesSource {
    client: Client,
    config: OpenExchangeRatesConfig,
}

impl OpenExchangeRatesSource {
    pub fn new(config: OpenExchangeRatesConfig) -> Result<Self, PricingError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("nightrate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PricingError::RateSourceUnavailable {
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    fn attempt(&self, base: &str) -> Result<RateSnapshot, Attempt> {
        let response = self
            .client
            .get(&self.config.url)
            .query(&[("app_id", self.config.app_id.as_str()), ("base", base)])
            .send()
            .map_err(|e| Attempt::Retryable(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let reason = format!("provider returned HTTP {}", status.as_u16());
            return Err(if is_retryable_status(status) {
                Attempt::Retryable(reason)
            } else {
                Attempt::Fatal(reason)
            });
        }

        let body = response
            .text()
            .map_err(|e| Attempt::Retryable(format!("failed to read body: {e}")))?;
        RateSnapshot::from_json(&body).map_err(|e| Attempt::Fatal(e.to_string()))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

impl RateSource for OpenExchangeRatesSource {
    fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, PricingError> {
        let total = self.config.retries + 1;
        let mut last_reason = String::new();

        for attempt in 1..=total {
            debug!(attempt, url = %self.config.url, base, "fetching exchange rates");
            match self.attempt(base) {
                Ok(snapshot) => {
                    info!(base = snapshot.base(), currencies = snapshot.len(), "exchange rates loaded");
                    return Ok(snapshot);
                }
                Err(Attempt::Fatal(reason)) => {
                    return Err(PricingError::RateSourceUnavailable { reason });
                }
                Err(Attempt::Retryable(reason)) => {
                    warn!(attempt, total, %reason, "exchange rate fetch failed");
                    last_reason = reason;
                    if attempt < total {
                        thread::sleep(self.config.retry_delay);
                    }
                }
            }
        }

        Err(PricingError::RateSourceUnavailable {
            reason: format!("gave up after {total} attempts: {last_reason}"),
        })
    }
}
