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

//! Field descriptors: one per public field of a resource.
//!
//! A descriptor maps a wire key (`btuContent`) to a storage dot path
//! (`econ_function.btu_content`) and knows how to
//!
//! - `parse` an incoming wire value into its normalized wire form,
//! - `write` a parsed value into a persistence document,
//! - `read` a persisted document back into wire form.
//!
//! The behaviour is selected by [`FieldKind`], a closed set of field shapes,
//! so no shape is ever inferred at runtime.

use std::sync::Arc;

use chrono::DateTime;
use serde_json::Value;

use super::error::{ErrorKind, ValidationError, ValidationErrors};
use super::rows::RowsSpec;
use super::table::FieldTable;
use super::values::{get_path, is_object_id, number, set_path, type_name};

/// Per-call parsing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    /// Reject unknown keys with `FieldNameError` instead of skipping them.
    pub strict: bool,
}

impl ParseContext {
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn lenient() -> Self {
        Self { strict: false }
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::strict()
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bounds {
    pub const ANY: Bounds = Bounds {
        min: None,
        max: None,
    };
    pub const NON_NEGATIVE: Bounds = Bounds {
        min: Some(0.0),
        max: None,
    };
    pub const POSITIVE_INT: Bounds = Bounds {
        min: Some(1.0),
        max: None,
    };
    pub const PERCENT: Bounds = Bounds {
        min: Some(0.0),
        max: Some(100.0),
    };

    fn check(&self, value: f64, key: &str, location: &str) -> Result<(), ValidationError> {
        let below = self.min.is_some_and(|min| value < min);
        let above = self.max.is_some_and(|max| value > max);
        if !below && !above {
            return Ok(());
        }
        let range = match (self.min, self.max) {
            (Some(min), Some(max)) => format!("between {min} and {max}"),
            (Some(min), None) => format!("greater than or equal to {min}"),
            (None, Some(max)) => format!("less than or equal to {max}"),
            (None, None) => return Ok(()),
        };
        Err(ValidationError::at(
            ErrorKind::Validation,
            format!("`{key}` must be {range}"),
            location,
        ))
    }
}

/// Shape of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Boolean,
    ObjectId,
    /// RFC 3339 timestamp.
    Timestamp,
    Number(Bounds),
    Integer(Bounds),
    Enum(&'static [&'static str]),
    /// Accepts any of `allowed` on input but always persists `value`.
    Fixed {
        allowed: &'static [&'static str],
        value: &'static str,
    },
    /// Nested object validated against its own table.
    Object(Arc<FieldTable>),
    /// Econ function criteria rows.
    Rows(RowsSpec),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub is_required: bool,
    pub is_filterable: bool,
    pub is_sortable: bool,
    /// Returned on reads, rejected on writes.
    pub is_read_only: bool,
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub api_key: &'static str,
    pub db_path: &'static str,
    pub kind: FieldKind,
    pub options: FieldOptions,
}

impl FieldDescriptor {
    pub fn new(api_key: &'static str, db_path: &'static str, kind: FieldKind) -> Self {
        Self {
            api_key,
            db_path,
            kind,
            options: FieldOptions::default(),
        }
    }

    pub fn required(mut self) -> Self {
        self.options.is_required = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.options.is_filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.options.is_sortable = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.options.is_read_only = true;
        self
    }

    /// Validate a wire value. `location` is the full location of the value.
    pub fn parse(
        &self,
        value: &Value,
        location: &str,
        ctx: ParseContext,
    ) -> Result<Value, ValidationErrors> {
        let key = self.api_key;
        match &self.kind {
            FieldKind::String => match value {
                Value::String(s) if !s.trim().is_empty() => Ok(value.clone()),
                Value::String(_) => Err(ValidationError::at(
                    ErrorKind::Validation,
                    format!("`{key}` must not be empty"),
                    location,
                )
                .into()),
                other => Err(expected(key, "a string", other, location)),
            },
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(expected(key, "a boolean", other, location)),
            },
            FieldKind::ObjectId => match value {
                Value::String(s) if is_object_id(s) => Ok(value.clone()),
                other => Err(expected(key, "a valid id", other, location)),
            },
            FieldKind::Timestamp => match value {
                Value::String(s) if DateTime::parse_from_rfc3339(s).is_ok() => Ok(value.clone()),
                other => Err(expected(key, "an RFC 3339 timestamp", other, location)),
            },
            FieldKind::Number(bounds) => match value.as_f64() {
                Some(n) => {
                    bounds.check(n, key, location)?;
                    Ok(value.clone())
                }
                None => Err(expected(key, "a number", value, location)),
            },
            FieldKind::Integer(bounds) => match as_integer(value) {
                Some(n) => {
                    bounds.check(n as f64, key, location)?;
                    Ok(Value::from(n))
                }
                None => Err(expected(key, "an integer", value, location)),
            },
            FieldKind::Enum(allowed) | FieldKind::Fixed { allowed, .. } => match value {
                Value::String(s) if allowed.contains(&s.as_str()) => Ok(value.clone()),
                _ => Err(ValidationError::invalid_type(
                    format!("`{key}` must be one of: {}", allowed.join(", ")),
                    location,
                )
                .into()),
            },
            FieldKind::Object(table) => table
                .parse_object(value, location, ctx)
                .map(Value::Object),
            FieldKind::Rows(spec) => spec.parse(value, location, ctx),
        }
    }

    /// Project a persisted document back to the wire value of this field.
    pub fn read(&self, document: &Value) -> Option<Value> {
        let stored = get_path(document, self.db_path).filter(|v| !v.is_null())?;
        match &self.kind {
            FieldKind::Object(table) => Some(Value::Object(table.to_api(stored))),
            FieldKind::Rows(spec) => Some(spec.read(stored)),
            _ => Some(stored.clone()),
        }
    }

    /// Store a parsed value at this field's path inside `target`.
    pub fn write(&self, target: &mut Value, parsed: &Value) {
        let stored = match &self.kind {
            FieldKind::Object(table) => match parsed {
                Value::Object(record) => table.to_internal(record),
                _ => return,
            },
            FieldKind::Rows(spec) => spec.write(parsed),
            FieldKind::Fixed { value, .. } => Value::from(*value),
            _ => parsed.clone(),
        };
        set_path(target, self.db_path, stored);
    }

    /// Cast a raw query-string value for filtering on this field.
    pub fn parse_query_value(&self, raw: &str, location: &str) -> Result<Value, ValidationErrors> {
        let key = self.api_key;
        let as_string = Value::String(raw.to_string());
        match &self.kind {
            FieldKind::String => Ok(as_string),
            FieldKind::Boolean => match raw {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(expected(key, "a boolean", &as_string, location)),
            },
            FieldKind::Number(_) => raw
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(number)
                .ok_or_else(|| expected(key, "a number", &as_string, location)),
            FieldKind::Integer(_) => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| expected(key, "an integer", &as_string, location)),
            FieldKind::ObjectId
            | FieldKind::Timestamp
            | FieldKind::Enum(_)
            | FieldKind::Fixed { .. } => self.parse(&as_string, location, ParseContext::strict()),
            FieldKind::Object(_) | FieldKind::Rows(_) => Err(ValidationError::invalid_type(
                format!("`{key}` cannot be used as a filter"),
                location,
            )
            .into()),
        }
    }
}

/// Integers, including whole floats such as `12.0`.
pub(crate) fn as_integer(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64)
        .map(|n| n as i64)
}

fn expected(key: &str, what: &str, got: &Value, location: &str) -> ValidationErrors {
    let shown = match got {
        Value::String(s) => format!("`{s}`"),
        other => type_name(other).to_string(),
    };
    ValidationError::invalid_type(format!("`{key}` must be {what}, got {shown}"), location).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(field: &FieldDescriptor, value: Value) -> Result<Value, ValidationErrors> {
        field.parse(&value, "[0].x", ParseContext::strict())
    }

    #[test]
    fn test_string_rejects_other_types() {
        let field = FieldDescriptor::new("name", "name", FieldKind::String);
        assert_eq!(parse(&field, json!("abc")), Ok(json!("abc")));

        let errors = parse(&field, json!(12)).expect_err("number is not a string");
        assert_eq!(errors.errors()[0].kind, ErrorKind::Type);
        assert_eq!(errors.errors()[0].location.as_deref(), Some("[0].x"));

        assert!(parse(&field, json!("   ")).is_err());
    }

    #[test]
    fn test_number_bounds() {
        let field = FieldDescriptor::new("pctRemaining", "pct_remaining", FieldKind::Number(Bounds::PERCENT));
        assert!(parse(&field, json!(0)).is_ok());
        assert!(parse(&field, json!(100)).is_ok());
        let errors = parse(&field, json!(100.5)).expect_err("out of range");
        assert!(errors.errors()[0].message.contains("between 0 and 100"));
        assert!(parse(&field, json!("50")).is_err());
    }

    #[test]
    fn test_integer_normalizes_whole_floats() {
        let field = FieldDescriptor::new("offsetToFpd", "offset_to_fpd", FieldKind::Integer(Bounds::POSITIVE_INT));
        assert_eq!(parse(&field, json!(12.0)), Ok(json!(12)));
        assert!(parse(&field, json!(1.5)).is_err());
        assert!(parse(&field, json!(0)).is_err());
    }

    #[test]
    fn test_fixed_accepts_allowed_but_writes_constant() {
        let field = FieldDescriptor::new(
            "rateType",
            "rate_type",
            FieldKind::Fixed {
                allowed: &["gross_well_head", "gross_sales"],
                value: "gross_well_head",
            },
        );
        let parsed = parse(&field, json!("gross_sales")).expect("allowed value");
        let mut doc = json!({});
        field.write(&mut doc, &parsed);
        assert_eq!(doc, json!({ "rate_type": "gross_well_head" }));
        assert_eq!(field.read(&doc), Some(json!("gross_well_head")));
        assert!(parse(&field, json!("net")).is_err());
    }

    #[test]
    fn test_read_skips_null_and_missing() {
        let field = FieldDescriptor::new("well", "well", FieldKind::ObjectId);
        assert_eq!(field.read(&json!({ "well": null })), None);
        assert_eq!(field.read(&json!({})), None);
    }

    #[test]
    fn test_query_value_casting() {
        let unique = FieldDescriptor::new("unique", "unique", FieldKind::Boolean);
        assert_eq!(unique.parse_query_value("true", "unique"), Ok(json!(true)));
        assert!(unique.parse_query_value("yes", "unique").is_err());

        let well = FieldDescriptor::new("well", "well", FieldKind::ObjectId);
        assert!(well.parse_query_value("5e272d38b78910dd2a1bd691", "well").is_ok());
        assert!(well.parse_query_value("nope", "well").is_err());

        let count = FieldDescriptor::new("count", "count", FieldKind::Number(Bounds::ANY));
        assert_eq!(count.parse_query_value("2.5", "count"), Ok(json!(2.5)));
    }
}
