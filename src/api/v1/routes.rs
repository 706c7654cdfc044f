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

//! API v1 route definitions, nested under `/v1`.

use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use std::sync::Arc;

use super::handlers;
use crate::api::shared::ApiContext;
use crate::resources::Resource;

/// Build the v1 router serving every resource in `resources`.
pub fn build_v1_router(ctx: ApiContext, resources: Vec<Resource>) -> Router {
    resources
        .into_iter()
        .fold(Router::new(), |router, resource| router.merge(resource_router(resource)))
        .route("/openapi.json", get(handlers::openapi_json))
        .layer(Extension(ctx))
}

/// Routes of one resource kind. The resource travels with its routes so the
/// shared handlers know which field table and labels to use.
fn resource_router(resource: Resource) -> Router {
    let collection = format!("/projects/:projectId/econ-models/{}", resource.kind);
    let record = format!("{collection}/:id");

    Router::new()
        .route(
            &collection,
            get(handlers::list_econ_models)
                .head(handlers::count_econ_models)
                .post(handlers::create_econ_models)
                .put(handlers::upsert_econ_models),
        )
        .route(
            &record,
            get(handlers::get_econ_model).delete(handlers::delete_econ_model),
        )
        .layer(Extension(Arc::new(resource)))
}
