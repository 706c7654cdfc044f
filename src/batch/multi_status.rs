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

use axum::http::StatusCode;
use serde::Serialize;

use crate::fields::ValidationError;

/// Outcome of one record of a batch write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStatus {
    pub status: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationError>,
}

impl RecordStatus {
    pub fn created(id: Option<String>, name: Option<String>) -> Self {
        Self::success(StatusCode::CREATED, id, name)
    }

    pub fn ok(id: Option<String>, name: Option<String>) -> Self {
        Self::success(StatusCode::OK, id, name)
    }

    fn success(code: StatusCode, id: Option<String>, name: Option<String>) -> Self {
        Self {
            status: code.canonical_reason().unwrap_or_default().to_string(),
            code: code.as_u16(),
            id,
            name,
            errors: Vec::new(),
        }
    }

    /// Failed record; the code follows the first error.
    pub fn failed(errors: Vec<ValidationError>) -> Self {
        let code = errors
            .first()
            .map(ValidationError::status_code)
            .unwrap_or(StatusCode::BAD_REQUEST);
        Self {
            status: "Error".to_string(),
            code: code.as_u16(),
            id: None,
            name: None,
            errors,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Body of every batch write response, always sent with `207 Multi-Status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiStatusResponse {
    pub results: Vec<RecordStatus>,
    pub success_count: usize,
    pub failed_count: usize,
}

/// Overlay per-index outcomes. An error wins over a success at the same
/// index; indices with neither are dropped.
pub fn merge_responses(
    errors: Vec<Option<RecordStatus>>,
    successes: Vec<Option<RecordStatus>>,
) -> Vec<RecordStatus> {
    let len = errors.len().max(successes.len());
    let mut errors = errors.into_iter();
    let mut successes = successes.into_iter();
    (0..len)
        .filter_map(|_| {
            let error = errors.next().flatten();
            let success = successes.next().flatten();
            error.or(success)
        })
        .collect()
}

pub fn with_counts(results: Vec<RecordStatus>) -> MultiStatusResponse {
    let failed_count = results.iter().filter(|r| r.is_error()).count();
    MultiStatusResponse {
        success_count: results.len() - failed_count,
        failed_count,
        results,
    }
}
