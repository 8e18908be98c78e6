//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stockroom_core::{Error, Item};
use tracing::error;

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    /// Store or I/O failure.
    Internal(String),
    NotFound(String),
    BadRequest(String),
    /// Name collision; carries the existing record.
    Duplicate(Box<Item>),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::DuplicateExists(existing) => ApiError::Duplicate(existing),
            Error::NotFound(_) => ApiError::NotFound("Item not found".to_string()),
            Error::InvalidCategory(_) => ApiError::BadRequest("Unknown category".to_string()),
            e if e.is_validation() => ApiError::BadRequest(e.to_string()),
            e => {
                error!(subsystem = "api", error = %e, "Request failed");
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// A path id that is not an integer cannot name an item.
impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::NotFound("Item not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Duplicate(existing) => (
                StatusCode::CONFLICT,
                json!({ "error": "duplicate", "existing": existing }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use stockroom_core::Category;

    fn status_of(err: Error) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_of(Error::NotFound(3)), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(Error::InvalidCategory("tools".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::MissingName), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(Error::InvalidAmount("Weight".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(Error::Config("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages_are_client_facing() {
        match ApiError::from(Error::InvalidCategory("tools".into())) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Unknown category"),
            other => panic!("unexpected {:?}", other),
        }
        match ApiError::from(Error::InvalidAmount("Quantity".into())) {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Quantity must be a non-negative number"),
            other => panic!("unexpected {:?}", other),
        }
        match ApiError::from(Error::NotFound(9)) {
            ApiError::NotFound(msg) => assert_eq!(msg, "Item not found"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let now = Utc::now();
        let existing = Item {
            id: 1,
            category: Category::Supply,
            name: "Перчатки".into(),
            weight: 0.0,
            length: 0.0,
            quantity: 4.0,
            created_at: now,
            updated_at: now,
        };
        let response = ApiError::from(Error::DuplicateExists(Box::new(existing))).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
