//! API error taxonomy and JSON error responses.
//!
//! Every error response carries `success: false` and a human-readable
//! message. Rate limits and credential problems additionally carry a
//! distinguishing flag so the frontend can render distinct guidance, and the
//! export endpoints report an empty filtered set as its own condition rather
//! than producing an empty document.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::sheets::DataSourceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Google Sheets API rate limit exceeded. Please wait a minute and try again.")]
    RateLimited,
    #[error("Google Sheets authentication failed: {0}")]
    Auth(String),
    #[error("Error loading data: {0}")]
    Upstream(String),
    #[error("No data to export for the selected filters")]
    NoData,
}

impl From<DataSourceError> for ApiError {
    fn from(err: DataSourceError) -> Self {
        match err {
            DataSourceError::RateLimited => ApiError::RateLimited,
            DataSourceError::Auth(detail) => ApiError::Auth(detail),
            DataSourceError::Fetch(detail) => ApiError::Upstream(detail),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "success": false, "error": message, "rate_limited": true }),
            ),
            ApiError::Auth(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "success": false, "error": message, "auth_error": true }),
            ),
            ApiError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                json!({ "success": false, "error": message }),
            ),
            ApiError::NoData => (
                StatusCode::NOT_FOUND,
                json!({ "success": false, "error": message, "no_data": true }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_errors_map_onto_the_taxonomy() {
        assert!(matches!(
            ApiError::from(DataSourceError::RateLimited),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from(DataSourceError::Auth("403".into())),
            ApiError::Auth(_)
        ));
        assert!(matches!(
            ApiError::from(DataSourceError::Fetch("timeout".into())),
            ApiError::Upstream(_)
        ));
    }

    #[test]
    fn rate_limit_response_is_429() {
        let response = ApiError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn no_data_response_is_404() {
        let response = ApiError::NoData.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
