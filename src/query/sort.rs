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

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

use crate::fields::{ErrorKind, FieldTable, ValidationError, ValidationErrors};

lazy_static! {
    // One optionally signed field name; multiple fields are not supported.
    static ref SORT_PATTERN: Regex =
        Regex::new(r"^([+-]?)([A-Za-z_][A-Za-z0-9_]*)$").expect("Invalid sort regex pattern");
}

pub const DEFAULT_SORT_FIELD: &str = "id";
pub const DEFAULT_SORT_PATH: &str = "_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn sign(self) -> i64 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }
}

/// Single-field sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub db_path: String,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: DEFAULT_SORT_FIELD.to_string(),
            db_path: DEFAULT_SORT_PATH.to_string(),
            direction: SortDirection::Descending,
        }
    }
}

impl SortSpec {
    /// Storage-level sort document, e.g. `{"name": -1}`.
    pub fn to_document(&self) -> Value {
        json!({ self.db_path.as_str(): self.direction.sign() })
    }

    /// Query-string form, e.g. `-name`.
    pub fn to_query(&self) -> String {
        match self.direction {
            SortDirection::Ascending => format!("+{}", self.field),
            SortDirection::Descending => format!("-{}", self.field),
        }
    }

    /// Parse a `sort` parameter against the sortable fields of `table`.
    pub fn parse(raw: &str, table: &FieldTable) -> Result<Self, ValidationErrors> {
        let captures = SORT_PATTERN.captures(raw).ok_or_else(|| {
            ValidationError::invalid_type(
                format!("`{raw}` is not a valid sort value, expected a single `+field` or `-field`"),
                "sort",
            )
        })?;
        let direction = match &captures[1] {
            "-" => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        let name = &captures[2];

        match table.get_field(name) {
            Some(field) if field.options.is_sortable => Ok(Self {
                field: field.api_key.to_string(),
                db_path: field.db_path.to_string(),
                direction,
            }),
            _ => Err(ValidationError::at(
                ErrorKind::FieldName,
                format!("`{name}` is not a sortable field"),
                "sort",
            )
            .into()),
        }
    }
}
