// Copyright 2025 The Econ Model API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error responses shared across API versions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::error;
use serde::Serialize;
use utoipa::ToSchema;

use super::responses::ValidationErrorSchema;
use crate::batch::BatchError;
use crate::fields::{ValidationError, ValidationErrors};

/// Codes that are not the wire name of a single validation error.
pub mod error_codes {
    pub const MULTIPLE_VALIDATION_ERROR: &str = "MultipleValidationError";
    pub const INTERNAL_ERROR: &str = "InternalServerError";
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Wire name of the error, e.g. `TypeError`, or `MultipleValidationError`
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Individual failures with their locations
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[schema(value_type = Vec<ValidationErrorSchema>)]
    pub errors: Vec<ValidationError>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

impl From<ValidationErrors> for ErrorResponse {
    fn from(errors: ValidationErrors) -> Self {
        let (code, message) = match errors.errors() {
            [single] => (single.kind.name(), single.message.clone()),
            _ => (
                error_codes::MULTIPLE_VALIDATION_ERROR.to_string(),
                errors.to_string(),
            ),
        };
        Self {
            code,
            message,
            errors: errors.into_vec(),
        }
    }
}

/// Request-level failure of an API handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request as a whole was rejected; nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// A collaborator (store, reference checker, converter) failed.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation(error.into())
    }
}

impl From<BatchError> for ApiError {
    fn from(error: BatchError) -> Self {
        match error {
            BatchError::Rejected(errors) => ApiError::Validation(errors),
            BatchError::Collaborator(err) => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(errors) => errors.status_code(),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            ApiError::Validation(errors) => ErrorResponse::from(errors),
            ApiError::Internal(err) => {
                error!("Request failed: {err:#}");
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Internal server error")
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::ErrorKind;

    #[test]
    fn test_error_response_serialization_omits_empty_errors() {
        let response = ErrorResponse::new(error_codes::INTERNAL_ERROR, "boom");
        let json = serde_json::to_string(&response).expect("Failed to serialize");
        assert!(json.contains("\"code\":\"InternalServerError\""));
        assert!(json.contains("\"message\":\"boom\""));
        assert!(!json.contains("errors"));
    }

    #[test]
    fn test_single_error_uses_its_wire_name() {
        let errors = ValidationErrors::from(ValidationError::invalid_type("bad sort", "sort"));
        let response = ErrorResponse::from(errors);
        assert_eq!(response.code, "TypeError");
        assert_eq!(response.message, "bad sort");
        assert_eq!(response.errors.len(), 1);
    }

    #[test]
    fn test_multiple_errors() {
        let errors = ValidationErrors::new(vec![
            ValidationError::required("name", "name"),
            ValidationError::required("unique", "unique"),
        ]);
        let response = ErrorResponse::from(errors);
        assert_eq!(response.code, error_codes::MULTIPLE_VALIDATION_ERROR);
        let json = serde_json::to_value(&response).expect("Failed to serialize");
        assert_eq!(json["errors"][1]["name"], "RequiredFieldError");
        assert_eq!(json["errors"][1]["location"], "unique");
    }

    #[test]
    fn test_status_codes() {
        let not_found: ApiError =
            ValidationError::new(ErrorKind::NotFound("StreamProperties"), "missing").into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let count: ApiError = ValidationError::new(ErrorKind::RecordCount, "too many").into();
        assert_eq!(count.status_code(), StatusCode::BAD_REQUEST);

        let internal = ApiError::Internal(anyhow::anyhow!("store down"));
        assert_eq!(internal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_batch_errors_map_to_api_errors() {
        let rejected = BatchError::Rejected(ValidationError::new(ErrorKind::RecordCount, "x").into());
        assert!(matches!(ApiError::from(rejected), ApiError::Validation(_)));

        let failed = BatchError::Collaborator(anyhow::anyhow!("converter down"));
        assert!(matches!(ApiError::from(failed), ApiError::Internal(_)));
    }
}
