//! API response envelopes
//!
//! Success bodies are `{ "success": true, "data": ..., "meta": ... }`, error
//! bodies are `{ "success": false, "error": { "code", "message", "details" } }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::features::shared::PaginationMetadata;

/// Standard success response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }

    /// List response with pagination under `meta.pagination`
    pub fn paginated(data: T, pagination: &PaginationMetadata) -> Self {
        Self::success_with_meta(data, serde_json::json!({ "pagination": pagination }))
    }

    /// Wrap in a `201 Created` response
    pub fn created(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::success(vec![1, 2])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2]));
        assert!(body.get("meta").is_none());
    }

    #[test]
    fn test_paginated_envelope_shape() {
        let pagination = PaginationMetadata::new(2, 10, 25);
        let body = serde_json::to_value(ApiResponse::paginated(Vec::<i32>::new(), &pagination))
            .unwrap();
        assert_eq!(body["meta"]["pagination"]["page"], 2);
        assert_eq!(body["meta"]["pagination"]["pages"], 3);
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = serde_json::to_value(ErrorResponse::with_details(
            "CONFLICT",
            "Department 'Sales' already exists",
            serde_json::json!({ "field": "name" }),
        ))
        .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(body["error"]["details"]["field"], "name");
    }
}
