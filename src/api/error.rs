//! HTTP error mapping.

use axum::{
    extract::rejection::{BytesRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::SchemaError;
use crate::store::StoreError;

/// Every failure a handler can return. Bad input is 422 (an unreadable body
/// keeps the status axum gives it), store failures become 500 with the
/// store's message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Body(#[from] BytesRejection),
    #[error(transparent)]
    Query(#[from] QueryRejection),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Body(rejection) => rejection.status(),
            Self::Query(_) | Self::Schema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> Value {
        match self {
            Self::Body(rejection) => Value::String(rejection.body_text()),
            Self::Query(rejection) => Value::String(rejection.body_text()),
            Self::Schema(SchemaError::Fields(errors)) => {
                serde_json::to_value(errors).unwrap_or_else(|_| Value::String(errors.to_string()))
            }
            Self::Schema(e) => Value::String(e.to_string()),
            Self::Store(e) => Value::String(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "request rejected");
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validate_product;

    #[test]
    fn test_store_errors_are_server_errors() {
        let err = ApiError::from(StoreError::Unavailable);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.detail().as_str().unwrap().starts_with("Database not available"));
    }

    #[test]
    fn test_field_errors_carry_field_names() {
        let err = ApiError::from(validate_product(json!({"title": "Mug", "price": -1})).unwrap_err());
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.detail().get("price").is_some());
    }

    #[test]
    fn test_unparsable_body_is_unprocessable() {
        let parse = serde_json::from_slice::<Value>(b"{\"title\":").unwrap_err();
        let err = ApiError::from(SchemaError::from(parse));
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.detail().as_str().unwrap().starts_with("invalid payload"));
    }
}
