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

//! API v1 handler functions with OpenAPI documentation.
//!
//! These wrap the shared handler implementations with v1 path annotations.
//! The handlers are resource agnostic; the OpenAPI document describes them
//! for the stream properties resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, RawQuery};
use axum::response::{Json, Response};
use serde_json::Value;
use std::sync::Arc;
use utoipa::OpenApi;

use super::openapi::ApiDocV1;
use crate::api::shared::handlers::{self as shared, ProjectPath, RecordPath};
use crate::api::shared::{
    ApiContext, ApiError, ApiVersionsResponse, ErrorResponse, HealthResponse,
    MultiStatusResponseSchema, StreamPropertiesSchema,
};
use crate::resources::Resource;

/// List available API versions
#[utoipa::path(
    get,
    path = "/api/versions",
    responses(
        (status = 200, description = "List of available API versions", body = ApiVersionsResponse),
    ),
    tag = "API"
)]
pub async fn list_api_versions() -> Json<ApiVersionsResponse> {
    shared::list_api_versions().await
}

/// Check server health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    shared::health_check().await
}

/// OpenAPI document of API v1
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDocV1::openapi())
}

/// List stream properties models
#[utoipa::path(
    get,
    path = "/v1/projects/{projectId}/econ-models/stream-properties",
    params(
        ("projectId" = String, Path, description = "Project id"),
        ("skip" = Option<usize>, Query, description = "Rows to skip (offset mode)"),
        ("take" = Option<usize>, Query, description = "Page size, at most the read record limit"),
        ("sort" = Option<String>, Query, description = "`+field` or `-field` on a sortable field"),
        ("cursor" = Option<String>, Query, description = "Cursor from a previous `rel=\"next\"` link"),
    ),
    responses(
        (status = 200, description = "One page of models; see the `Link` header", body = [StreamPropertiesSchema]),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 404, description = "Project not found", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn list_econ_models(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<ProjectPath>,
    query: RawQuery,
) -> Result<Response, ApiError> {
    shared::list_models(ctx, resource, path, query).await
}

/// Count stream properties models
#[utoipa::path(
    head,
    path = "/v1/projects/{projectId}/econ-models/stream-properties",
    params(
        ("projectId" = String, Path, description = "Project id"),
        ("skip" = Option<usize>, Query, description = "Rows to skip"),
        ("take" = Option<usize>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Matching count in `X-Query-Count`, pages in `Link`"),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn count_econ_models(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<ProjectPath>,
    query: RawQuery,
) -> Result<Response, ApiError> {
    shared::count_models(ctx, resource, path, query).await
}

/// Get a stream properties model by id
#[utoipa::path(
    get,
    path = "/v1/projects/{projectId}/econ-models/stream-properties/{id}",
    params(
        ("projectId" = String, Path, description = "Project id"),
        ("id" = String, Path, description = "Model id"),
    ),
    responses(
        (status = 200, description = "The model", body = StreamPropertiesSchema),
        (status = 404, description = "Model or project not found", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn get_econ_model(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<RecordPath>,
) -> Result<Json<Value>, ApiError> {
    shared::get_model(ctx, resource, path).await
}

/// Create stream properties models
#[utoipa::path(
    post,
    path = "/v1/projects/{projectId}/econ-models/stream-properties",
    params(("projectId" = String, Path, description = "Project id")),
    request_body(content = [StreamPropertiesSchema], description = "One model or an array of models"),
    responses(
        (status = 207, description = "Per-record outcome", body = MultiStatusResponseSchema),
        (status = 400, description = "Too many records or malformed body", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn create_econ_models(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<ProjectPath>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    shared::create_models(ctx, resource, path, body).await
}

/// Create or replace stream properties models by name
#[utoipa::path(
    put,
    path = "/v1/projects/{projectId}/econ-models/stream-properties",
    params(("projectId" = String, Path, description = "Project id")),
    request_body(content = [StreamPropertiesSchema], description = "One model or an array of models"),
    responses(
        (status = 207, description = "Per-record outcome", body = MultiStatusResponseSchema),
        (status = 400, description = "Too many records or malformed body", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn upsert_econ_models(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<ProjectPath>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    shared::upsert_models(ctx, resource, path, body).await
}

/// Delete a stream properties model
#[utoipa::path(
    delete,
    path = "/v1/projects/{projectId}/econ-models/stream-properties/{id}",
    params(
        ("projectId" = String, Path, description = "Project id"),
        ("id" = String, Path, description = "Model id"),
    ),
    responses(
        (status = 204, description = "Deleted; `X-Delete-Count` holds the count"),
        (status = 404, description = "Model or project not found", body = ErrorResponse),
    ),
    tag = "StreamProperties"
)]
pub async fn delete_econ_model(
    ctx: Extension<ApiContext>,
    resource: Extension<Arc<Resource>>,
    path: Path<RecordPath>,
) -> Result<Response, ApiError> {
    shared::delete_model(ctx, resource, path).await
}
