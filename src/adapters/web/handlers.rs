//! HTTP request handlers for web adapter.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::domain::calendar::build_calendar;
use crate::domain::filter::ListingQuery;
use crate::domain::listing::{ListingId, ListingPatch, NewListing};

use super::error::{PAGE_NOT_FOUND, UNSUPPORTED_QUERY};
use super::{AppState, WebError};

type Params = Vec<(String, String)>;

fn listing_id(path: Result<Path<u64>, PathRejection>) -> Result<ListingId, WebError> {
    path.map(|Path(id)| ListingId(id))
        .map_err(|_| WebError::not_found(PAGE_NOT_FOUND))
}

fn query_params(query: Result<Query<Params>, QueryRejection>) -> Result<Params, WebError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| WebError::bad_request(e.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, WebError> {
    body.map(|Json(value)| value)
        .map_err(|e| WebError::bad_request(e.body_text()))
}

pub async fn markets(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.reference.markets()))
}

pub async fn currencies(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.reference.currencies()))
}

pub async fn list_listings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Params>, QueryRejection>,
) -> Result<Json<Value>, WebError> {
    let params = query_params(query)?;
    let listing_query = ListingQuery::from_params(&params, state.settings.comparator_policy)?;
    let catalog = state.read_catalog()?;
    let matched = listing_query.apply(catalog.all(), &state.reference)?;

    if listing_query.is_all() {
        Ok(Json(json!(matched)))
    } else {
        Ok(Json(json!({ "filtered_listings": matched })))
    }
}

pub async fn create_listing(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewListing>, JsonRejection>,
) -> Result<Response, WebError> {
    let new = json_body(body)?;
    let mut catalog = state.write_catalog()?;
    let created = catalog.insert(new, &state.reference)?;
    info!(id = %created.id, market = %created.market, "listing created");
    Ok((StatusCode::CREATED, Json(json!(created))).into_response())
}

pub async fn get_listing(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<Params>, QueryRejection>,
) -> Result<Json<Value>, WebError> {
    let id = listing_id(path)?;
    if !query_params(query)?.is_empty() {
        return Err(WebError::bad_request(UNSUPPORTED_QUERY));
    }
    let catalog = state.read_catalog()?;
    let listing = catalog.get(id)?;
    Ok(Json(json!({ "listing_item": listing })))
}

pub async fn update_listing(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    body: Result<Json<ListingPatch>, JsonRejection>,
) -> Result<Json<Value>, WebError> {
    let id = listing_id(path)?;
    let patch = json_body(body)?;
    let mut catalog = state.write_catalog()?;
    let listing = catalog.update(id, patch, &state.reference)?;
    info!(%id, "listing updated");
    Ok(Json(json!({ "listing_item": listing })))
}

pub async fn delete_listing(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
) -> Result<Json<Value>, WebError> {
    let id = listing_id(path)?;
    let mut catalog = state.write_catalog()?;
    catalog.remove(id)?;
    info!(%id, remaining = catalog.len(), "listing deleted");
    Ok(Json(json!({ "listing_list": catalog.all() })))
}

pub async fn listing_calendar(
    State(state): State<Arc<AppState>>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<Params>, QueryRejection>,
) -> Result<Json<Value>, WebError> {
    let id = listing_id(path)?;
    let params = query_params(query)?;
    let requested = match params.as_slice() {
        [] => None,
        _ => match params.iter().find(|(k, _)| k == "currency") {
            Some((_, code)) => Some(code.as_str()),
            None => return Err(WebError::bad_request(UNSUPPORTED_QUERY)),
        },
    };

    let catalog = state.read_catalog()?;
    let listing = catalog.get(id)?;
    let calendar = build_calendar(
        listing,
        requested,
        &state.reference,
        &state.rates,
        state.settings.conversion_basis,
    )?;

    let key = match &calendar.converted_to {
        Some(code) => format!("listing_calendar_{code}"),
        None => "base_listings_calendar".to_string(),
    };
    let mut body = serde_json::Map::new();
    body.insert(key, json!(calendar.entries));
    Ok(Json(Value::Object(body)))
}

pub async fn not_found() -> WebError {
    WebError::not_found(PAGE_NOT_FOUND)
}
