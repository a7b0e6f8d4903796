//! HTTP error responses for web adapter.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::PricingError;

pub const UNSUPPORTED_QUERY: &str = "Unsupported query args. Please try again.";
pub const PAGE_NOT_FOUND: &str = "Page Cannot Be Found";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &PricingError) -> StatusCode {
    match err {
        PricingError::UnknownCurrency { .. }
        | PricingError::UnknownMarket { .. }
        | PricingError::UnknownComparator { .. }
        | PricingError::InvalidThreshold { .. }
        | PricingError::InvalidListing { .. } => StatusCode::BAD_REQUEST,
        PricingError::ListingNotFound { .. } => StatusCode::NOT_FOUND,
        PricingError::RateSourceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        PricingError::ConfigParse { .. }
        | PricingError::ConfigMissing { .. }
        | PricingError::ConfigInvalid { .. }
        | PricingError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<PricingError> for WebError {
    fn from(err: PricingError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = self.status.as_u16(), message = %self.message, "request failed");
        } else {
            tracing::debug!(status = self.status.as_u16(), message = %self.message, "request rejected");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::ListingId;

    #[test]
    fn domain_errors_map_to_statuses() {
        assert_eq!(
            status_from_error(&PricingError::unknown_market("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_from_error(&PricingError::UnknownComparator {
                comparator: "ne".into()
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_from_error(&PricingError::ListingNotFound { id: ListingId(3) }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_from_error(&PricingError::RateSourceUnavailable {
                reason: "down".into()
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn from_pricing_error_keeps_message() {
        let err = WebError::from(PricingError::unknown_currency("GBP"));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Currency with code=GBP does not exist");
    }
}
