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

//! API version 1.
//!
//! ## Endpoints
//!
//! - `GET /v1/projects/{projectId}/econ-models/{kind}` - list, paged by `skip`/`take` or `cursor`
//! - `HEAD /v1/projects/{projectId}/econ-models/{kind}` - count in `X-Query-Count`
//! - `GET /v1/projects/{projectId}/econ-models/{kind}/{id}` - one model
//! - `POST /v1/projects/{projectId}/econ-models/{kind}` - create, `207 Multi-Status`
//! - `PUT /v1/projects/{projectId}/econ-models/{kind}` - upsert by name, `207 Multi-Status`
//! - `DELETE /v1/projects/{projectId}/econ-models/{kind}/{id}` - delete, count in `X-Delete-Count`
//! - `GET /v1/openapi.json` - this version's OpenAPI document

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use handlers::*;
pub use openapi::ApiDocV1;
pub use routes::build_v1_router;
