//! Web server adapter.
//!
//! JSON API over the listing catalog, the reference tables and the priced
//! calendars. The catalog is the only mutable state and sits behind a
//! read/write lock; reference data and rates are shared read-only.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::*;

use axum::{Router, routing::get};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::trace::TraceLayer;

use crate::domain::exchange_rate::RateSnapshot;
use crate::domain::listing::ListingCatalog;
use crate::domain::reference_data::ReferenceData;
use crate::domain::settings::ServiceSettings;

pub struct AppState {
    pub reference: Arc<ReferenceData>,
    pub rates: Arc<RateSnapshot>,
    pub catalog: RwLock<ListingCatalog>,
    pub settings: ServiceSettings,
}

impl AppState {
    pub fn new(
        reference: Arc<ReferenceData>,
        rates: Arc<RateSnapshot>,
        catalog: ListingCatalog,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            reference,
            rates,
            catalog: RwLock::new(catalog),
            settings,
        }
    }

    fn read_catalog(&self) -> Result<RwLockReadGuard<'_, ListingCatalog>, WebError> {
        self.catalog
            .read()
            .map_err(|_| WebError::internal("listing catalog lock poisoned"))
    }

    fn write_catalog(&self) -> Result<RwLockWriteGuard<'_, ListingCatalog>, WebError> {
        self.catalog
            .write()
            .map_err(|_| WebError::internal("listing catalog lock poisoned"))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/markets", get(handlers::markets))
        .route("/currencies", get(handlers::currencies))
        .route(
            "/listings",
            get(handlers::list_listings).post(handlers::create_listing),
        )
        .route(
            "/listings/{id}",
            get(handlers::get_listing)
                .put(handlers::update_listing)
                .delete(handlers::delete_listing),
        )
        .route("/listings/{id}/calendar", get(handlers::listing_calendar))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
