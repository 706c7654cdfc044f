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

//! Econ-model resources exposed by the API.

pub mod econ_model;
pub mod stream_properties;

use serde_json::Value;

use crate::fields::values::get_path;
use crate::fields::FieldTable;

pub use stream_properties::stream_properties;

/// Storage path of the econ function inside every econ-model document.
pub const ECON_FUNCTION_PATH: &str = "econ_function";

/// One econ-model resource kind.
#[derive(Debug, Clone)]
pub struct Resource {
    /// URL segment, e.g. `stream-properties`.
    pub kind: &'static str,
    /// Label spliced into domain error names, e.g. `StreamProperties`.
    pub label: &'static str,
    /// Value of `assumptionKey` on stored documents.
    pub assumption_key: &'static str,
    pub table: FieldTable,
}

impl Resource {
    /// The name field models are matched on for collisions, duplicates and upserts.
    pub fn name_field(&self) -> &'static str {
        econ_model::NAME_FIELD
    }

    /// Econ function of a stored document, with its model name.
    pub fn econ_function(&self, document: &Value) -> Option<Value> {
        let econ_function = get_path(document, ECON_FUNCTION_PATH)?.clone();
        Some(serde_json::json!({
            "name": document.get(econ_model::NAME_FIELD).cloned().unwrap_or(Value::Null),
            "econ_function": econ_function,
        }))
    }

    /// Collection path below a project, e.g. `/v1/projects/{id}/econ-models/stream-properties`.
    pub fn collection_path(&self, project: &str) -> String {
        format!("/v1/projects/{project}/econ-models/{}", self.kind)
    }
}

/// Every resource kind served by the API.
pub fn all() -> Vec<Resource> {
    vec![stream_properties()]
}
