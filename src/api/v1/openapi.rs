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

//! OpenAPI document for API v1, served at `/v1/openapi.json`.

use utoipa::OpenApi;

use crate::api::shared::{
    ApiVersionsResponse, ErrorResponse, HealthResponse, MultiStatusResponseSchema,
    RecordStatusSchema, StreamPropertiesSchema, ValidationErrorSchema,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::list_api_versions,
        super::handlers::health_check,
        super::handlers::list_econ_models,
        super::handlers::count_econ_models,
        super::handlers::get_econ_model,
        super::handlers::create_econ_models,
        super::handlers::upsert_econ_models,
        super::handlers::delete_econ_model,
    ),
    components(
        schemas(
            HealthResponse,
            ApiVersionsResponse,
            ErrorResponse,
            ValidationErrorSchema,
            RecordStatusSchema,
            MultiStatusResponseSchema,
            StreamPropertiesSchema,
        )
    ),
    tags(
        (name = "API", description = "API version information"),
        (name = "Health", description = "Health check endpoints"),
        (name = "StreamProperties", description = "Stream properties econ models"),
    ),
    info(
        title = "Econ Model API",
        version = "1.0.0",
        description = "Econ model REST API v1.\n\nModels are scoped to a project: `/v1/projects/{projectId}/econ-models/{kind}`.\n\n## Batch writes\n\n`POST` and `PUT` accept one object or an array and always answer `207 Multi-Status` with one status per input record.\n\n## Pagination\n\nLists are paged with `skip`/`take` or, when `skip` is omitted, with the `cursor` of the previous page. Page links are returned in the `Link` header.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    )
)]
pub struct ApiDocV1;
