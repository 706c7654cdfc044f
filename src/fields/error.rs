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

//! Validation error taxonomy shared by field parsing, batch processing and
//! query parsing.

use axum::http::StatusCode;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

/// Kind of a validation failure.
///
/// Domain kinds carry a label (`"StreamProperties"`, `"Well"`, ...) that is
/// spliced into the wire name, e.g. `DuplicateStreamPropertiesError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    RequestStructure,
    FieldName,
    FieldNameFilter,
    RequiredField,
    Type,
    RecordCount,
    Duplicate(&'static str),
    Collision(&'static str),
    NotFound(&'static str),
    RowValidation(&'static str),
}

impl ErrorKind {
    /// Wire name of the error, as reported in the `name` property.
    pub fn name(&self) -> String {
        match self {
            ErrorKind::Validation => "ValidationError".to_string(),
            ErrorKind::RequestStructure => "RequestStructureError".to_string(),
            ErrorKind::FieldName => "FieldNameError".to_string(),
            ErrorKind::FieldNameFilter => "FieldNameFilterError".to_string(),
            ErrorKind::RequiredField => "RequiredFieldError".to_string(),
            ErrorKind::Type => "TypeError".to_string(),
            ErrorKind::RecordCount => "RecordCountError".to_string(),
            ErrorKind::Duplicate(label) => format!("Duplicate{label}Error"),
            ErrorKind::Collision(label) => format!("{label}CollisionError"),
            ErrorKind::NotFound(label) => format!("{label}NotFoundError"),
            ErrorKind::RowValidation(label) => format!("{label}RowValidationError"),
        }
    }

    /// HTTP status a failure of this kind maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound(_) => StatusCode::NOT_FOUND,
            ErrorKind::Duplicate(_) | ErrorKind::Collision(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// A single validation failure tagged with the location it applies to.
///
/// Locations use bracket indices for batch and array positions and dots for
/// nested keys, e.g. `[0].yields.ngl.rows[2].gasRate`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ValidationError {
    /// Serialized as its wire name under `name`.
    pub kind: ErrorKind,
    pub message: String,
    pub location: Option<String>,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn at(kind: ErrorKind, message: impl Into<String>, location: impl Into<String>) -> Self {
        let location = location.into();
        Self {
            kind,
            message: message.into(),
            location: (!location.is_empty()).then_some(location),
        }
    }

    pub fn required(key: &str, location: impl Into<String>) -> Self {
        Self::at(
            ErrorKind::RequiredField,
            format!("`{key}` is a required field"),
            location,
        )
    }

    pub fn unknown_field(key: &str, location: impl Into<String>) -> Self {
        Self::at(
            ErrorKind::FieldName,
            format!("`{key}` is not a valid field name"),
            location,
        )
    }

    pub fn invalid_type(message: impl Into<String>, location: impl Into<String>) -> Self {
        Self::at(ErrorKind::Type, message, location)
    }

    pub fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl Serialize for ValidationError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("name", &self.kind.name())?;
        state.serialize_field("message", &self.message)?;
        match &self.location {
            Some(location) => state.serialize_field("location", location)?,
            None => state.skip_field("location")?,
        }
        state.end()
    }
}

/// An ordered list of validation failures raised together for one record or
/// one request (a multiple-validation error).
#[derive(Debug, Clone, Default, PartialEq, thiserror::Error)]
#[error("{}", describe_all(.0))]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Status of the first error, or 400 for an empty list.
    pub fn status_code(&self) -> StatusCode {
        self.0
            .first()
            .map(ValidationError::status_code)
            .unwrap_or(StatusCode::BAD_REQUEST)
    }
}

fn describe_all(errors: &[ValidationError]) -> String {
    match errors {
        [single] => single.to_string(),
        errors => std::iter::once("Multiple validation errors:".to_string())
            .chain(errors.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Join a key onto a location: `""` + `name` is `name`, `[0]` + `name` is `[0].name`.
pub fn child_location(location: &str, key: &str) -> String {
    if location.is_empty() {
        key.to_string()
    } else {
        format!("{location}.{key}")
    }
}

/// Append an array index to a location: `rows` + 2 is `rows[2]`.
pub fn index_location(location: &str, index: usize) -> String {
    format!("{location}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_kind_names() {
        assert_eq!(
            ErrorKind::Duplicate("StreamProperties").name(),
            "DuplicateStreamPropertiesError"
        );
        assert_eq!(
            ErrorKind::Collision("StreamProperties").name(),
            "StreamPropertiesCollisionError"
        );
        assert_eq!(ErrorKind::NotFound("Well").name(), "WellNotFoundError");
        assert_eq!(ErrorKind::FieldNameFilter.name(), "FieldNameFilterError");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::NotFound("Project").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorKind::Duplicate("X").status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorKind::Type.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ValidationErrors::default().status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_serialization_uses_wire_name() {
        let error = ValidationError::required("name", "[1].name");
        let json = serde_json::to_value(&error).expect("Failed to serialize");
        assert_eq!(json["name"], "RequiredFieldError");
        assert_eq!(json["location"], "[1].name");
        assert_eq!(json["message"], "`name` is a required field");
    }

    #[test]
    fn test_empty_location_is_omitted() {
        let error = ValidationError::at(ErrorKind::RecordCount, "too many", "");
        let json = serde_json::to_string(&error).expect("Failed to serialize");
        assert!(!json.contains("location"));
    }

    #[test]
    fn test_locations() {
        assert_eq!(child_location("", "name"), "name");
        assert_eq!(child_location("[0]", "yields"), "[0].yields");
        assert_eq!(index_location("[0].yields.ngl.rows", 2), "[0].yields.ngl.rows[2]");
    }

    #[test]
    fn test_multiple_display() {
        let errors = ValidationErrors::new(vec![
            ValidationError::required("a", "a"),
            ValidationError::required("b", "b"),
        ]);
        let message = errors.to_string();
        assert!(message.starts_with("Multiple validation errors:"));
        assert!(message.contains("`a`"));
        assert!(message.contains("`b`"));
    }

    #[test]
    fn test_single_display_is_the_error_itself() {
        let error = ValidationError::required("name", "[0].name");
        let errors: Box<dyn std::error::Error> = Box::new(ValidationErrors::from(error.clone()));
        assert_eq!(errors.to_string(), error.to_string());
    }
}
