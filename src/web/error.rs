//! JSON error responses for the web API.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::sedna::{Level, Listing, SednaError};

/// Machine-readable error kind, serialized alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ApiErrorCode {
    MissingParameter,
    InvalidParameter,
    NotFound,
    Upstream,
    Internal,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: ApiErrorCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    code: ApiErrorCode,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::InvalidParameter, message)
    }

    /// `400 "<Level> ID is required"`.
    pub fn missing_id(level: Level) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiErrorCode::MissingParameter,
            format!("{} ID is required", level.label()),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ApiErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Map a portal failure to a response. Details are logged here and never
    /// reach the client.
    pub fn from_sedna(listing: Listing, err: SednaError) -> Self {
        let fallback = format!("Failed to fetch {}", resource_name(listing));
        match &err {
            SednaError::EmptyResult { .. } if listing == Listing::Schedule => {
                Self::not_found("No events found in the schedule")
            }
            SednaError::EmptyResult { .. } => {
                warn!(listing = listing.as_str(), "Sedna returned no records");
                Self::internal_error(fallback)
            }
            SednaError::Transport { status, .. } => {
                warn!(listing = listing.as_str(), upstream_status = ?status, error = %err, "Sedna unreachable");
                Self::new(StatusCode::BAD_GATEWAY, ApiErrorCode::Upstream, fallback)
            }
            SednaError::Decode { .. } => {
                error!(listing = listing.as_str(), error = %err, "Failed to decode Sedna page");
                Self::internal_error(fallback)
            }
        }
    }
}

/// Noun used in client-facing `Failed to fetch ...` messages.
fn resource_name(listing: Listing) -> &'static str {
    match listing {
        Listing::Schedule => "schedule",
        other => other.as_str(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            message: &self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_id_message() {
        let err = ApiError::missing_id(Level::Department);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Department ID is required");
    }

    #[test]
    fn test_empty_schedule_is_not_found() {
        let err = ApiError::from_sedna(
            Listing::Schedule,
            SednaError::EmptyResult {
                listing: Listing::Schedule,
            },
        );
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "No events found in the schedule");
    }

    #[test]
    fn test_empty_list_is_internal() {
        let err = ApiError::from_sedna(
            Listing::Classes,
            SednaError::EmptyResult {
                listing: Listing::Classes,
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to fetch classes");
    }

    #[test]
    fn test_schedule_fetch_failure_message() {
        let err = ApiError::from_sedna(
            Listing::Schedule,
            SednaError::Transport {
                message: "request timed out".into(),
                status: None,
            },
        );
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.message(), "Failed to fetch schedule");

        let err = ApiError::from_sedna(
            Listing::Schedule,
            SednaError::Decode {
                encoding: "windows-1252",
                message: "bad byte".into(),
            },
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Failed to fetch schedule");
    }

    #[test]
    fn test_transport_hides_detail() {
        let err = ApiError::from_sedna(
            Listing::Departments,
            SednaError::Transport {
                message: "connection refused (10.0.0.1:443)".into(),
                status: None,
            },
        );
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.message(), "Failed to fetch departments");
    }
}
