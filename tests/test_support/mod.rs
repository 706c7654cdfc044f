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

//! Shared helpers for the integration tests: a seeded in-memory server,
//! request plumbing and valid stream properties payloads.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use econ_model_api::config::{ReferenceSeed, ServerConfig};
use econ_model_api::{build_router, ApiContext};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PROJECT: &str = "5e272d38b78910dd2a1bd691";
pub const OTHER_PROJECT: &str = "5e272d38b78910dd2a1bd6ff";
pub const WELL: &str = "5e272d38b78910dd2a1bd692";
pub const SCENARIO: &str = "5e272d38b78910dd2a1bd693";

pub fn collection_uri(project: &str) -> String {
    format!("/v1/projects/{project}/econ-models/stream-properties")
}

pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.references.push(ReferenceSeed {
        project: PROJECT.to_string(),
        wells: vec![WELL.to_string()],
        scenarios: vec![SCENARIO.to_string()],
    });
    config
}

pub fn test_router() -> Router {
    router_with(test_config())
}

pub fn router_with(config: ServerConfig) -> Router {
    build_router(ApiContext::in_memory(&config))
}

/// Response status, headers and JSON body (`Null` when the body is empty).
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Link` header split into `(rel, url)` pairs.
    pub fn links(&self) -> Vec<(String, String)> {
        let Some(link) = self.header("link") else {
            return Vec::new();
        };
        link.split(',')
            .filter_map(|part| {
                let (url, rel) = part.split_once(';')?;
                let url = url.trim().trim_start_matches('<').trim_end_matches('>');
                let rel = rel.trim().trim_start_matches("rel=\"").trim_end_matches('"');
                Some((rel.to_string(), url.to_string()))
            })
            .collect()
    }

    pub fn link(&self, rel: &str) -> Option<String> {
        self.links()
            .into_iter()
            .find(|(r, _)| r == rel)
            .map(|(_, url)| url)
    }
}

pub async fn send_raw(router: &Router, method: Method, uri: &str, body: Option<String>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse { status, headers, body }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    send_raw(router, method, uri, body.map(|b| b.to_string())).await
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, project: &str, body: Value) -> TestResponse {
    send(router, Method::POST, &collection_uri(project), Some(body)).await
}

/// Create `names` in one batch and return their ids in request order.
pub async fn create_models(router: &Router, names: &[String]) -> Vec<String> {
    let body = Value::Array(names.iter().map(|n| stream_properties(n)).collect());
    let response = post(router, PROJECT, body).await;
    assert_eq!(response.status, StatusCode::MULTI_STATUS);
    assert_eq!(response.body["failedCount"], 0, "{}", response.body);
    response.body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

pub fn names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{prefix}-{i:02}")).collect()
}

/// A valid, non-unique stream properties model.
pub fn stream_properties(name: &str) -> Value {
    json!({
        "name": name,
        "unique": false,
        "yields": {
            "rowsCalculationMethod": "non_monotonic",
            "ngl": { "rows": [{ "gasRate": 123132132, "yield": 5, "shrinkCondition": "shrunk" }] },
            "dripCondensate": { "rows": [{ "entireWellLife": "Flat", "yield": 0, "shrinkCondition": "unshrunk" }] }
        },
        "shrinkage": {
            "rowsCalculationMethod": "monotonic",
            "rateType": "gross_well_head",
            "oil": { "rows": [{ "offsetToFpd": 12, "pctRemaining": 100 }] },
            "gas": { "rows": [{ "dates": "2024-01-01", "pctRemaining": 90 }] }
        },
        "lossFlare": {
            "rowsCalculationMethod": "non_monotonic",
            "rateType": "gross_well_head",
            "oilLoss": { "rows": [{ "entireWellLife": "Flat", "pctRemaining": 100 }] },
            "gasLoss": { "rows": [{ "oilRate": 0, "pctRemaining": 98 }, { "oilRate": 50, "pctRemaining": 97 }] },
            "gasFlare": { "rows": [{ "entireWellLife": "Flat", "pctRemaining": 100 }] }
        },
        "btuContent": { "unshrunkGas": 1000, "shrunkGas": 1100 }
    })
}

/// A unique model assigned to a well and a scenario.
pub fn unique_stream_properties(name: &str, well: &str, scenario: &str) -> Value {
    let mut model = stream_properties(name);
    model["unique"] = json!(true);
    model["well"] = json!(well);
    model["scenario"] = json!(scenario);
    model
}
