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

//! Response types shared across API versions.
//!
//! Engine types such as [`MultiStatusResponse`](crate::batch::MultiStatusResponse)
//! serialize themselves; the `*Schema` structs below only describe them in the
//! OpenAPI document.

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status of the server
    pub status: String,
    /// Current server timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Response listing available API versions
#[derive(Serialize, ToSchema)]
pub struct ApiVersionsResponse {
    /// List of available API versions
    pub versions: Vec<String>,
    /// The current/latest API version
    pub current: String,
}

/// A single validation failure
#[derive(Serialize, ToSchema)]
#[schema(as = ValidationError)]
pub struct ValidationErrorSchema {
    /// Error kind, e.g. `RequiredFieldError` or `DuplicateStreamPropertiesError`
    pub name: String,
    pub message: String,
    /// Path of the offending value, e.g. `[0].yields.ngl.rows[2].gasRate`
    pub location: Option<String>,
}

/// Outcome of one record of a batch write
#[derive(Serialize, ToSchema)]
#[schema(as = RecordStatus)]
pub struct RecordStatusSchema {
    /// `Created`, `OK` or `Error`
    pub status: String,
    pub code: u16,
    pub id: Option<String>,
    pub name: Option<String>,
    pub errors: Option<Vec<ValidationErrorSchema>>,
}

/// Body of a `207 Multi-Status` batch write response
#[derive(Serialize, ToSchema)]
#[schema(as = MultiStatusResponse)]
#[serde(rename_all = "camelCase")]
pub struct MultiStatusResponseSchema {
    /// One entry per input record, in request order
    pub results: Vec<RecordStatusSchema>,
    pub success_count: usize,
    pub failed_count: usize,
}

/// Stream properties econ model as exchanged over the wire
#[derive(Serialize, ToSchema)]
#[schema(as = StreamProperties)]
#[serde(rename_all = "camelCase")]
pub struct StreamPropertiesSchema {
    pub id: String,
    pub name: String,
    pub unique: bool,
    pub well: Option<String>,
    pub scenario: Option<String>,
    /// `rowsCalculationMethod`, `ngl` and `dripCondensate` row tables
    #[schema(value_type = Object)]
    pub yields: serde_json::Value,
    /// `rowsCalculationMethod`, `rateType`, `oil` and `gas` row tables
    #[schema(value_type = Object)]
    pub shrinkage: serde_json::Value,
    /// `rowsCalculationMethod`, `rateType`, `oilLoss`, `gasLoss` and `gasFlare` row tables
    #[schema(value_type = Object)]
    pub loss_flare: serde_json::Value,
    /// `unshrunkGas` and `shrunkGas`
    #[schema(value_type = Object)]
    pub btu_content: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
