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

//! Fields shared by every econ-model resource.

use serde_json::Value;

use crate::fields::values::is_nil;
use crate::fields::{
    child_location, ApiRecord, ErrorKind, FieldDescriptor, FieldKind, FieldTable, ValidationError,
    ValidationErrors,
};

pub const ID_FIELD: &str = "id";
pub const NAME_FIELD: &str = "name";
pub const UNIQUE_FIELD: &str = "unique";
pub const WELL_FIELD: &str = "well";
pub const SCENARIO_FIELD: &str = "scenario";

pub fn base_table() -> FieldTable {
    FieldTable::new([
        FieldDescriptor::new(ID_FIELD, "_id", FieldKind::ObjectId)
            .read_only()
            .sortable(),
        FieldDescriptor::new(NAME_FIELD, "name", FieldKind::String)
            .required()
            .filterable()
            .sortable(),
        FieldDescriptor::new(UNIQUE_FIELD, "unique", FieldKind::Boolean)
            .required()
            .filterable(),
        FieldDescriptor::new(WELL_FIELD, "well", FieldKind::ObjectId).filterable(),
        FieldDescriptor::new(SCENARIO_FIELD, "scenario", FieldKind::ObjectId).filterable(),
        FieldDescriptor::new("createdAt", "createdAt", FieldKind::Timestamp)
            .read_only()
            .sortable(),
        FieldDescriptor::new("updatedAt", "updatedAt", FieldKind::Timestamp)
            .read_only()
            .sortable(),
    ])
}

/// Unique models are bound to one well and scenario; shared models to none.
pub fn check_unique_assignment(record: &ApiRecord, location: &str) -> Result<(), ValidationErrors> {
    let Some(unique) = record.get(UNIQUE_FIELD).and_then(Value::as_bool) else {
        return Ok(());
    };

    let errors: Vec<ValidationError> = [WELL_FIELD, SCENARIO_FIELD]
        .into_iter()
        .filter_map(|key| {
            let present = !is_nil(record.get(key));
            let key_location = child_location(location, key);
            match (unique, present) {
                (true, false) => Some(ValidationError::at(
                    ErrorKind::RequiredField,
                    format!("`{key}` is required when `unique` is true"),
                    key_location,
                )),
                (false, true) => Some(ValidationError::at(
                    ErrorKind::Validation,
                    format!("`{key}` must not be set when `unique` is false"),
                    key_location,
                )),
                _ => None,
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.into())
    }
}
