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

//! Handler implementations shared across API versions.
//!
//! Econ-model handlers are resource agnostic: the [`Resource`] they serve is
//! injected per route as an `Extension`, next to the shared [`ApiContext`].

use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, RawQuery};
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::context::ApiContext;
use super::error::ApiError;
use super::responses::{ApiVersionsResponse, HealthResponse};
use crate::api::version::{ApiVersion, API_CURRENT_VERSION};
use crate::batch::WriteMode;
use crate::fields::values::is_object_id;
use crate::fields::{ErrorAggregator, ErrorKind, ValidationError};
use crate::query::pagination::{CURSOR_PARAM, SKIP_PARAM, SORT_PARAM, TAKE_PARAM};
use crate::query::{link_header, parse_filters, Filter, PageDescriptor, PageRequest, QueryParams, SortSpec};
use crate::resources::Resource;
use crate::store::memory::ID_PATH;
use crate::store::FindOptions;

pub const X_QUERY_COUNT: HeaderName = HeaderName::from_static("x-query-count");
pub const X_DELETE_COUNT: HeaderName = HeaderName::from_static("x-delete-count");

/// Path parameters of collection routes
#[derive(Debug, Deserialize)]
pub struct ProjectPath {
    #[serde(rename = "projectId")]
    pub project_id: String,
}

/// Path parameters of single-record routes
#[derive(Debug, Deserialize)]
pub struct RecordPath {
    #[serde(rename = "projectId")]
    pub project_id: String,
    pub id: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

pub async fn list_api_versions() -> Json<ApiVersionsResponse> {
    Json(ApiVersionsResponse {
        versions: ApiVersion::all_strings(),
        current: API_CURRENT_VERSION.as_str().to_string(),
    })
}

/// Projects are addressed by 24-hex ids; anything else cannot exist.
fn check_project(project_id: &str) -> Result<(), ApiError> {
    if is_object_id(project_id) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ErrorKind::NotFound("Project"),
            format!("Project `{project_id}` not found"),
        )
        .into())
    }
}

fn record_filter(project_id: &str, resource: &Resource, id: &str) -> Result<Filter, ApiError> {
    if !is_object_id(id) {
        return Err(not_found(resource, id));
    }
    Ok(Filter::scoped(project_id, resource.assumption_key).eq(ID_PATH, Value::from(id)))
}

fn not_found(resource: &Resource, id: &str) -> ApiError {
    ValidationError::new(
        ErrorKind::NotFound(resource.label),
        format!("No {} was found with id `{id}`", resource.label),
    )
    .into()
}

fn header_value(value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Invalid header value `{value}`: {e}")))
}

fn link_headers(link: &str) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::LINK, header_value(link)?);
    Ok(headers)
}

/// `GET` a page of models, filtered, sorted and paginated by offset or cursor.
pub async fn list_models(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<ProjectPath>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    check_project(&path.project_id)?;
    let params = QueryParams::parse(query.as_deref());
    let settings = &ctx.settings;

    // Every query parameter problem is reported before the store is touched.
    let mut aggregator = ErrorAggregator::new();
    let page = aggregator.catch(PageRequest::parse(
        &params,
        settings.default_take,
        settings.read_record_limit,
        true,
    ));
    let sort = match params.get(SORT_PARAM) {
        Some(raw) => aggregator.catch(SortSpec::parse(raw, &resource.table)),
        None => Some(SortSpec::default()),
    };
    let filter = aggregator.catch(parse_filters(
        &params,
        &[SKIP_PARAM, TAKE_PARAM, SORT_PARAM, CURSOR_PARAM],
        &resource.table,
    ));
    aggregator.throw_all()?;
    let (Some(page), Some(sort), Some(filter)) = (page, sort, filter) else {
        return Err(ApiError::Internal(anyhow::anyhow!(
            "query parsing yielded no value without reporting an error"
        )));
    };

    let options = FindOptions {
        filter: Filter::scoped(&path.project_id, resource.assumption_key).and(filter),
        skip: page.store_skip(),
        limit: page.fetch_limit(),
        after: page.after().cloned(),
        sort,
    };
    debug!("Listing {} with {options:?}", resource.kind);
    let rows = ctx.store.find(&options).await?;
    let (rows, descriptor) = page.into_page(rows, &options.sort.db_path, None);

    let carried = params.without(&[SKIP_PARAM, TAKE_PARAM, CURSOR_PARAM]);
    let link = link_header(&resource.collection_path(&path.project_id), &carried, &descriptor);
    let body: Vec<Value> = rows
        .iter()
        .map(|row| Value::Object(resource.table.to_api(row)))
        .collect();

    Ok((link_headers(&link)?, Json(body)).into_response())
}

/// `HEAD`: the number of matching models and offset links including `last`.
pub async fn count_models(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<ProjectPath>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    check_project(&path.project_id)?;
    let params = QueryParams::parse(query.as_deref());
    let settings = &ctx.settings;

    let mut aggregator = ErrorAggregator::new();
    let page = aggregator.catch(PageRequest::parse(
        &params,
        settings.default_take,
        settings.read_record_limit,
        false,
    ));
    // A GET query reused on HEAD is accepted; ordering and cursors do not change a count.
    let filter = aggregator.catch(parse_filters(
        &params,
        &[SKIP_PARAM, TAKE_PARAM, SORT_PARAM, CURSOR_PARAM],
        &resource.table,
    ));
    aggregator.throw_all()?;
    let (Some(page), Some(filter)) = (page, filter) else {
        return Err(ApiError::Internal(anyhow::anyhow!(
            "query parsing yielded no value without reporting an error"
        )));
    };

    let scoped = Filter::scoped(&path.project_id, resource.assumption_key).and(filter);
    let total = ctx.store.count(&scoped).await?;
    let descriptor = PageDescriptor::for_count(page.skip, page.take, total);

    let carried = params.without(&[SKIP_PARAM, TAKE_PARAM, CURSOR_PARAM]);
    let link = link_header(&resource.collection_path(&path.project_id), &carried, &descriptor);
    let mut headers = link_headers(&link)?;
    headers.insert(X_QUERY_COUNT, header_value(&total.to_string())?);

    Ok((StatusCode::OK, headers).into_response())
}

/// `GET` one model by id.
pub async fn get_model(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<RecordPath>,
) -> Result<Json<Value>, ApiError> {
    check_project(&path.project_id)?;
    let filter = record_filter(&path.project_id, &resource, &path.id)?;
    match ctx.store.find_one(&filter).await? {
        Some(document) => Ok(Json(Value::Object(resource.table.to_api(&document)))),
        None => Err(not_found(&resource, &path.id)),
    }
}

async fn write_models(
    ctx: ApiContext,
    resource: Arc<Resource>,
    project_id: String,
    body: Result<Json<Value>, JsonRejection>,
    mode: WriteMode,
) -> Result<Response, ApiError> {
    check_project(&project_id)?;
    let Json(body) = body.map_err(|rejection| {
        ValidationError::new(
            ErrorKind::RequestStructure,
            format!("Request body is not valid JSON: {}", rejection.body_text()),
        )
    })?;

    let response = ctx.processor(&resource).write(&project_id, body, mode).await?;
    Ok((StatusCode::MULTI_STATUS, Json(response)).into_response())
}

/// `POST` one model or an array of models.
pub async fn create_models(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<ProjectPath>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    write_models(ctx, resource, path.project_id, body, WriteMode::Create).await
}

/// `PUT` one model or an array of models, replacing same-named models.
pub async fn upsert_models(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<ProjectPath>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    write_models(ctx, resource, path.project_id, body, WriteMode::Upsert).await
}

/// `DELETE` one model by id.
pub async fn delete_model(
    Extension(ctx): Extension<ApiContext>,
    Extension(resource): Extension<Arc<Resource>>,
    Path(path): Path<RecordPath>,
) -> Result<Response, ApiError> {
    check_project(&path.project_id)?;
    let filter = record_filter(&path.project_id, &resource, &path.id)?;
    let deleted = ctx.store.delete_one(&filter).await?;
    if deleted == 0 {
        return Err(not_found(&resource, &path.id));
    }
    info!("Deleted {} `{}` from project {}", resource.kind, path.id, path.project_id);

    let mut headers = HeaderMap::new();
    headers.insert(X_DELETE_COUNT, header_value(&deleted.to_string())?);
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}
