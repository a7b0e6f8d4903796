//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::fixed_rates::FixedRateSource;
use crate::adapters::open_exchange_rates::{OpenExchangeRatesConfig, OpenExchangeRatesSource};
use crate::adapters::seed_catalog::seeded_catalog;
use crate::domain::calendar::{build_calendar, ConversionBasis};
use crate::domain::config_validation::{
    validate_service_config, DEFAULT_CALENDAR_DAYS, DEFAULT_LISTEN, MAX_CALENDAR_DAYS,
};
use crate::domain::currency::USD;
use crate::domain::error::PricingError;
use crate::domain::exchange_rate::RateSnapshot;
use crate::domain::filter::{ListingQuery, UnknownComparatorPolicy};
use crate::domain::listing::{ListingCatalog, ListingId};
use crate::domain::reference_data::ReferenceData;
use crate::domain::settings::ServiceSettings;
use crate::ports::config_port::ConfigPort;
use crate::ports::rate_port::RateSource;

#[derive(Parser, Debug)]
#[command(name = "nightrate", about = "Nightly pricing service for rental listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP service
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List the demo listings, optionally filtered like `GET /listings`
    Listings {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Query parameter as key=value, e.g. base_price.gt=700
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
    /// Print the priced calendar of a listing
    Calendar {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        listing: u64,
        #[arg(long)]
        currency: Option<String>,
    },
    /// List the known markets
    Markets,
    /// List the known currencies
    Currencies,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Serve { config } => run_serve(&config),
        Command::Listings { config, params } => run_listings(config.as_ref(), &params),
        Command::Calendar {
            config,
            listing,
            currency,
        } => run_calendar(&config, listing, currency.as_deref()),
        Command::Markets => run_markets(),
        Command::Currencies => run_currencies(),
    }
}

/// Installs the global subscriber. Logs go to stderr so command output on
/// stdout stays clean. `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(config: &dyn ConfigPort) {
    let json = config
        .get_string("log", "format")
        .is_some_and(|f| f.eq_ignore_ascii_case("json"));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let result = if json {
        registry
            .with(fmt::layer().json().with_current_span(false).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .try_init()
    };
    if result.is_err() {
        warn!("tracing subscriber already installed");
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

pub fn build_service_settings(config: &dyn ConfigPort) -> Result<ServiceSettings, PricingError> {
    let invalid = |section: &str, key: &str, reason: String| PricingError::ConfigInvalid {
        section: section.into(),
        key: key.into(),
        reason,
    };

    let conversion_basis = match config.get_string("pricing", "calendar_conversion") {
        Some(value) => value
            .parse::<ConversionBasis>()
            .map_err(|reason| invalid("pricing", "calendar_conversion", reason))?,
        None => ConversionBasis::default(),
    };
    let comparator_policy = match config.get_string("filters", "unknown_comparator") {
        Some(value) => value
            .parse::<UnknownComparatorPolicy>()
            .map_err(|reason| invalid("filters", "unknown_comparator", reason))?,
        None => UnknownComparatorPolicy::default(),
    };
    let days = config.get_int("catalog", "calendar_days", DEFAULT_CALENDAR_DAYS);
    let calendar_days = u32::try_from(days)
        .ok()
        .filter(|d| (1..=MAX_CALENDAR_DAYS).contains(&i64::from(*d)))
        .ok_or_else(|| {
            invalid(
                "catalog",
                "calendar_days",
                format!("calendar_days must be between 1 and {MAX_CALENDAR_DAYS}"),
            )
        })?;

    Ok(ServiceSettings {
        calendar_days,
        conversion_basis,
        comparator_policy,
    })
}

pub fn listen_addr(config: &dyn ConfigPort) -> Result<SocketAddr, PricingError> {
    config
        .get_string("server", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
        .parse()
        .map_err(|_| PricingError::ConfigInvalid {
            section: "server".into(),
            key: "listen".into(),
            reason: "expected host:port".into(),
        })
}

pub fn rate_base(config: &dyn ConfigPort) -> String {
    config
        .get_string("rates", "base")
        .unwrap_or_else(|| USD.to_string())
        .to_uppercase()
}

pub fn build_rate_source(config: &dyn ConfigPort) -> Result<Box<dyn RateSource>, PricingError> {
    let source = config
        .get_string("rates", "source")
        .unwrap_or_else(|| "openexchangerates".to_string());
    match source.to_lowercase().as_str() {
        "fixed" => {
            let spec = config.get_string("rates", "fixed").unwrap_or_default();
            Ok(Box::new(FixedRateSource::parse(&spec)?))
        }
        "openexchangerates" => {
            let oxr = OpenExchangeRatesConfig::from_config(config)?;
            Ok(Box::new(OpenExchangeRatesSource::new(oxr)?))
        }
        other => Err(PricingError::ConfigInvalid {
            section: "rates".into(),
            key: "source".into(),
            reason: format!("unknown rate source '{other}'"),
        }),
    }
}

/// Fetches the rate snapshot once and warns about reference currencies the
/// snapshot cannot convert.
pub fn load_rates(
    config: &dyn ConfigPort,
    reference: &ReferenceData,
) -> Result<RateSnapshot, PricingError> {
    let source = build_rate_source(config)?;
    let snapshot = source.fetch_rates(&rate_base(config))?;
    let missing =
        snapshot.missing_codes(reference.currencies().iter().map(|c| c.code.as_str()));
    if !missing.is_empty() {
        warn!(missing = ?missing, "no exchange rate for some currencies; conversions involving them will fail");
    }
    Ok(snapshot)
}

/// Splits `key=value` arguments into query pairs.
pub fn parse_params(raw: &[String]) -> Result<Vec<(String, String)>, String> {
    raw.iter()
        .map(|p| {
            p.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| format!("expected key=value, got '{p}'"))
        })
        .collect()
}

fn demo_catalog(
    reference: &ReferenceData,
    settings: &ServiceSettings,
) -> Result<ListingCatalog, PricingError> {
    seeded_catalog(reference, Local::now().date_naive(), settings.calendar_days)
}

fn prepare(config: &FileConfigAdapter) -> Result<ServiceSettings, ExitCode> {
    init_tracing(config);
    validate_service_config(config)
        .and_then(|_| build_service_settings(config))
        .map_err(|e| {
            error!("{e}");
            ExitCode::from(&e)
        })
}

fn run_serve(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match prepare(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };
    info!(path = %config_path.display(), "configuration loaded");

    let addr = match listen_addr(&config) {
        Ok(a) => a,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };

    let reference = std::sync::Arc::new(ReferenceData::standard());
    let rates = match load_rates(&config, &reference) {
        Ok(r) => r,
        Err(e) => {
            error!("cannot start without exchange rates: {e}");
            return (&e).into();
        }
    };
    let catalog = match demo_catalog(&reference, &settings) {
        Ok(c) => c,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };
    info!(listings = catalog.len(), days = settings.calendar_days, "catalog seeded");

    serve(addr, reference, rates, catalog, settings)
}

#[cfg(feature = "web")]
fn serve(
    addr: SocketAddr,
    reference: std::sync::Arc<ReferenceData>,
    rates: RateSnapshot,
    catalog: ListingCatalog,
    settings: ServiceSettings,
) -> ExitCode {
    use crate::adapters::web::{build_router, AppState};
    use std::sync::Arc;

    let state = AppState::new(reference, Arc::new(rates), catalog, settings);
    let router = build_router(state);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("cannot start async runtime: {e}");
            return ExitCode::from(1);
        }
    };
    let result: std::io::Result<()> = runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "listening");
        axum::serve(listener, router).await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err = PricingError::from(e);
            error!("server error: {err}");
            (&err).into()
        }
    }
}

#[cfg(not(feature = "web"))]
fn serve(
    _addr: SocketAddr,
    _reference: std::sync::Arc<ReferenceData>,
    _rates: RateSnapshot,
    _catalog: ListingCatalog,
    _settings: ServiceSettings,
) -> ExitCode {
    error!("web feature is required for serve");
    ExitCode::from(1)
}

fn run_listings(config_path: Option<&PathBuf>, raw_params: &[String]) -> ExitCode {
    let config = match config_path {
        Some(path) => match load_config(path) {
            Ok(c) => c,
            Err(code) => return code,
        },
        None => FileConfigAdapter::empty(),
    };
    init_tracing(&config);
    let settings = match build_service_settings(&config) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return (&e).into();
        }
    };
    let params = match parse_params(raw_params) {
        Ok(p) => p,
        Err(reason) => {
            error!("{reason}");
            return ExitCode::from(2);
        }
    };

    let reference = ReferenceData::standard();
    let result = demo_catalog(&reference, &settings).and_then(|catalog| {
        let query = ListingQuery::from_params(&params, settings.comparator_policy)?;
        let matched = query.apply(catalog.all(), &reference)?;
        println!("{:<4} {:<40} {:>10} {:<4} {}", "ID", "TITLE", "PRICE", "CUR", "MARKET");
        for l in matched {
            println!(
                "{:<4} {:<40} {:>10.2} {:<4} {}",
                l.id.0, l.title, l.base_price, l.currency, l.market
            );
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

fn run_calendar(config_path: &PathBuf, listing: u64, currency: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let settings = match prepare(&config) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let reference = ReferenceData::standard();
    let result = load_rates(&config, &reference).and_then(|rates| {
        let catalog = demo_catalog(&reference, &settings)?;
        let listing = catalog.get(ListingId(listing))?;
        let calendar = build_calendar(
            listing,
            currency,
            &reference,
            &rates,
            settings.conversion_basis,
        )?;
        println!("{} ({}, {})", listing.title, listing.market, listing.currency);
        for entry in &calendar.entries {
            println!("{}  {:>12.2} {}", entry.date, entry.price, entry.currency);
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            (&e).into()
        }
    }
}

fn run_markets() -> ExitCode {
    let reference = ReferenceData::standard();
    for market in reference.markets() {
        println!("{:<16} {:<16} {}", market.code, market.name, market.currency);
    }
    ExitCode::SUCCESS
}

fn run_currencies() -> ExitCode {
    let reference = ReferenceData::standard();
    for currency in reference.currencies() {
        println!("{:<4} {:<4} {}", currency.code, currency.symbol, currency.name);
    }
    ExitCode::SUCCESS
}
