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

//! API version identifiers.

use std::fmt;
use std::str::FromStr;

/// The version served by unversioned clients and reported as `current`.
pub const API_CURRENT_VERSION: ApiVersion = ApiVersion::V1;

/// Versions of the econ model REST API. Each version owns a module under
/// `src/api/` with its handlers, routes and OpenAPI document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
}

impl ApiVersion {
    /// URL prefix every route of this version is nested under.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "/v1",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
        }
    }

    pub fn all() -> &'static [ApiVersion] {
        &[ApiVersion::V1]
    }

    pub fn all_strings() -> Vec<String> {
        Self::all().iter().map(|v| v.as_str().to_string()).collect()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_start_matches('/') {
            "v1" | "1" => Ok(ApiVersion::V1),
            _ => Err(format!("Unknown API version: {s}")),
        }
    }
}
