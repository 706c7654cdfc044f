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

//! REST API of the econ model server.
//!
//! ```text
//! /health                                             - Health check (unversioned)
//! /api/versions                                       - List available API versions
//! /v1/projects/{projectId}/econ-models/{kind}         - Econ model collection
//! /v1/projects/{projectId}/econ-models/{kind}/{id}    - Single econ model
//! /v1/openapi.json                                    - OpenAPI document
//! ```
//!
//! - `shared` - context, errors, responses and handlers shared across versions
//! - `v1` - API version 1 routes, handler annotations and OpenAPI document
//! - `version` - version identifiers

pub mod shared;
pub mod v1;
pub mod version;

pub use shared::error::*;
pub use shared::responses::*;
pub use shared::ApiContext;

pub use v1::handlers::*;
pub use v1::openapi::ApiDocV1;
pub use v1::routes::build_v1_router;

pub use version::{ApiVersion, API_CURRENT_VERSION};
