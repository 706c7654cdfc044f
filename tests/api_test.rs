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

//! Econ model API integration tests
//!
//! Drive the full router: parsing, batch validation, persistence in the
//! in-memory store and the multi-status responses.

#![allow(clippy::unwrap_used)]

mod test_support;

use axum::http::{Method, StatusCode};
use econ_model_api::config::ServerConfig;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_support::*;

fn without_generated(mut model: Value) -> Value {
    if let Some(map) = model.as_object_mut() {
        for key in ["id", "createdAt", "updatedAt"] {
            map.remove(key);
        }
    }
    model
}

#[tokio::test]
async fn test_create_and_read_back() {
    let router = test_router();

    let response = post(&router, PROJECT, stream_properties("sp-1")).await;
    assert_eq!(response.status, StatusCode::MULTI_STATUS);
    assert_eq!(response.body["successCount"], 1);
    assert_eq!(response.body["failedCount"], 0);
    let result = &response.body["results"][0];
    assert_eq!(result["status"], "Created");
    assert_eq!(result["code"], 201);
    assert_eq!(result["name"], "sp-1");
    let id = result["id"].as_str().unwrap();

    let fetched = get(&router, &format!("{}/{id}", collection_uri(PROJECT))).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["id"], id);
    assert!(fetched.body["createdAt"].is_string());
    assert_eq!(without_generated(fetched.body), stream_properties("sp-1"));
}

#[tokio::test]
async fn test_invalid_record_keeps_batch_alignment() {
    let router = test_router();
    let mut missing = stream_properties("sp-missing");
    missing.as_object_mut().unwrap().remove("btuContent");
    missing.as_object_mut().unwrap().remove("unique");

    let body = json!([stream_properties("sp-a"), missing, stream_properties("sp-c")]);
    let response = post(&router, PROJECT, body).await;

    assert_eq!(response.status, StatusCode::MULTI_STATUS);
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["name"], "sp-a");
    assert_eq!(results[2]["name"], "sp-c");

    assert_eq!(results[1]["status"], "Error");
    assert_eq!(results[1]["code"], 400);
    let errors = results[1]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e["name"] == "RequiredFieldError"));
    let locations: Vec<&str> = errors.iter().map(|e| e["location"].as_str().unwrap()).collect();
    assert!(locations.contains(&"[1].unique"));
    assert!(locations.contains(&"[1].btuContent"));

    assert_eq!(response.body["successCount"], 2);
    assert_eq!(response.body["failedCount"], 1);
}

#[tokio::test]
async fn test_row_errors_carry_nested_locations() {
    let router = test_router();
    let mut model = stream_properties("sp-rows");
    model["lossFlare"]["gasLoss"]["rows"] = json!([
        { "oilRate": 10, "pctRemaining": 98 },
        { "oilRate": 5, "pctRemaining": 97 }
    ]);
    model["shrinkage"]["oil"]["rows"] = json!([
        { "offsetToFpd": 12, "pctRemaining": 100 },
        { "gasRate": 5, "pctRemaining": 100 }
    ]);

    let response = post(&router, PROJECT, model).await;
    let errors = response.body["results"][0]["errors"].as_array().unwrap();
    let by_location = |location: &str| errors.iter().find(|e| e["location"] == location).cloned();

    let sequence = by_location("[0].lossFlare.gasLoss.rows[1].oilRate").unwrap();
    assert_eq!(sequence["name"], "StreamPropertiesRowValidationError");
    let criteria = by_location("[0].shrinkage.oil.rows[1].gasRate").unwrap();
    assert_eq!(criteria["name"], "StreamPropertiesRowValidationError");
}

#[tokio::test]
async fn test_duplicates_reject_every_occurrence() {
    let router = test_router();
    let body = json!([stream_properties("twin"), stream_properties("solo"), stream_properties("twin")]);
    let response = post(&router, PROJECT, body).await;

    let results = response.body["results"].as_array().unwrap();
    for index in [0, 2] {
        let error = &results[index]["errors"][0];
        assert_eq!(error["name"], "DuplicateStreamPropertiesError");
        assert_eq!(error["location"], "[0], [2]");
        assert_eq!(results[index]["code"], 409);
    }
    assert_eq!(results[1]["status"], "Created");

    let list = get(&router, &collection_uri(PROJECT)).await;
    assert_eq!(list.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_collides_and_put_replaces() {
    let router = test_router();
    create_models(&router, &["existing".to_string()]).await;

    let collision = post(&router, PROJECT, stream_properties("existing")).await;
    let error = &collision.body["results"][0]["errors"][0];
    assert_eq!(error["name"], "StreamPropertiesCollisionError");
    assert_eq!(error["location"], "[0].name");

    let mut replacement = stream_properties("existing");
    replacement["btuContent"]["shrunkGas"] = json!(1200);
    let body = json!([replacement, stream_properties("fresh")]);
    let upsert = send(&router, Method::PUT, &collection_uri(PROJECT), Some(body)).await;
    assert_eq!(upsert.status, StatusCode::MULTI_STATUS);
    assert_eq!(upsert.body["results"][0]["status"], "OK");
    assert_eq!(upsert.body["results"][0]["code"], 200);
    assert_eq!(upsert.body["results"][1]["status"], "Created");

    let list = get(&router, &format!("{}?name=existing", collection_uri(PROJECT))).await;
    let models = list.body.as_array().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0]["btuContent"]["shrunkGas"], 1200);
}

#[tokio::test]
async fn test_record_count_limit_rejects_request() {
    let mut config = test_config();
    config.engine.write_record_limit = 2;
    let router = router_with(config);

    let body = Value::Array(names("over", 3).iter().map(|n| stream_properties(n)).collect());
    let response = post(&router, PROJECT, body).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "RecordCountError");

    let list = get(&router, &collection_uri(PROJECT)).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_transactional_batch_writes_nothing_on_failure() {
    let mut config = test_config();
    config.engine.transactional = true;
    let router = router_with(config);

    let mut invalid = stream_properties("bad");
    invalid["unique"] = json!("yes");
    let response = post(&router, PROJECT, json!([stream_properties("good"), invalid])).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["errors"][0]["location"], "[1].unique");

    let list = get(&router, &collection_uri(PROJECT)).await;
    assert_eq!(list.body, json!([]));
}

#[tokio::test]
async fn test_unique_models_check_references() {
    let router = test_router();
    let unknown_well = "5e272d38b78910dd2a1bd6aa";
    let body = json!([
        unique_stream_properties("assigned", WELL, SCENARIO),
        unique_stream_properties("orphan", unknown_well, SCENARIO),
        { "name": "half", "unique": true }
    ]);

    let response = post(&router, PROJECT, body).await;
    let results = response.body["results"].as_array().unwrap();
    assert_eq!(results[0]["status"], "Created");

    assert_eq!(results[1]["code"], 404);
    assert_eq!(results[1]["errors"][0]["name"], "WellNotFoundError");
    assert_eq!(results[1]["errors"][0]["location"], "[1].well");

    let names: Vec<&str> = results[2]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"RequiredFieldError"));
}

#[tokio::test]
async fn test_extraneous_fields_depend_on_strict_mode() {
    let mut model = stream_properties("extra");
    model["color"] = json!("blue");
    model["id"] = json!("5e272d38b78910dd2a1bd699");

    let strict = post(&test_router(), PROJECT, model.clone()).await;
    let errors = strict.body["results"][0]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e["name"] == "FieldNameError"));

    let mut config = test_config();
    config.engine.error_on_extraneous_fields = false;
    let lenient = post(&router_with(config), PROJECT, model).await;
    assert_eq!(lenient.body["results"][0]["status"], "Created");
    assert_ne!(lenient.body["results"][0]["id"], "5e272d38b78910dd2a1bd699");
}

#[tokio::test]
async fn test_malformed_bodies() {
    let router = test_router();
    let uri = collection_uri(PROJECT);

    let broken = send_raw(&router, Method::POST, &uri, Some("{\"name\":".to_string())).await;
    assert_eq!(broken.status, StatusCode::BAD_REQUEST);
    assert_eq!(broken.body["code"], "RequestStructureError");

    let scalar = send(&router, Method::POST, &uri, Some(json!([42]))).await;
    assert_eq!(scalar.status, StatusCode::MULTI_STATUS);
    assert_eq!(scalar.body["results"][0]["errors"][0]["name"], "RequestStructureError");
}

#[tokio::test]
async fn test_get_and_delete_by_id() {
    let router = test_router();
    let ids = create_models(&router, &names("del", 2)).await;
    let uri = |id: &str| format!("{}/{id}", collection_uri(PROJECT));

    let deleted = send(&router, Method::DELETE, &uri(&ids[0]), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(deleted.header("x-delete-count"), Some("1"));

    let again = send(&router, Method::DELETE, &uri(&ids[0]), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
    assert_eq!(again.body["code"], "StreamPropertiesNotFoundError");

    let gone = get(&router, &uri(&ids[0])).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);

    let malformed = get(&router, &uri("not-an-id")).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);
    assert_eq!(malformed.body["code"], "StreamPropertiesNotFoundError");

    assert_eq!(get(&router, &uri(&ids[1])).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_models_are_scoped_to_their_project() {
    let router = test_router();
    let ids = create_models(&router, &["scoped".to_string()]).await;

    let other = get(&router, &collection_uri(OTHER_PROJECT)).await;
    assert_eq!(other.body, json!([]));
    let by_id = get(&router, &format!("{}/{}", collection_uri(OTHER_PROJECT), ids[0])).await;
    assert_eq!(by_id.status, StatusCode::NOT_FOUND);

    // Same name in another project is not a collision.
    let response = post(&router, OTHER_PROJECT, stream_properties("scoped")).await;
    assert_eq!(response.body["results"][0]["status"], "Created");
}

#[tokio::test]
async fn test_invalid_project_id() {
    let router = test_router();
    let response = get(&router, &collection_uri("nope")).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["code"], "ProjectNotFoundError");
}

#[tokio::test]
async fn test_operational_endpoints() {
    let router = router_with(ServerConfig::default());

    let health = get(&router, "/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");

    let versions = get(&router, "/api/versions").await;
    assert_eq!(versions.body, json!({ "versions": ["v1"], "current": "v1" }));

    let openapi = get(&router, "/v1/openapi.json").await;
    assert_eq!(openapi.status, StatusCode::OK);
    let paths = &openapi.body["paths"];
    let collection = &paths["/v1/projects/{projectId}/econ-models/stream-properties"];
    for method in ["get", "head", "post", "put"] {
        assert!(collection[method].is_object(), "missing {method}");
    }
    let record = &paths["/v1/projects/{projectId}/econ-models/stream-properties/{id}"];
    assert!(record["get"].is_object());
    assert!(record["delete"].is_object());
    assert!(openapi.body["components"]["schemas"]["MultiStatusResponse"].is_object());
}

struct UnavailableConverter;

#[async_trait::async_trait]
impl econ_model_api::store::EconFunctionConverter for UnavailableConverter {
    async fn convert(&self, _: &str, _: &str, _: &[Value]) -> anyhow::Result<()> {
        anyhow::bail!("conversion service unavailable")
    }
}

#[tokio::test]
async fn test_conversion_failure_is_internal_error_and_keeps_records() {
    use econ_model_api::store::{MemoryModelStore, MemoryReferenceChecker};
    use std::sync::Arc;

    let config = test_config();
    let references = MemoryReferenceChecker::new().with_project(
        PROJECT,
        [WELL.to_string()],
        [SCENARIO.to_string()],
    );
    let ctx = econ_model_api::ApiContext::new(
        config.engine.clone(),
        Arc::new(MemoryModelStore::new()),
        Arc::new(references),
        Arc::new(UnavailableConverter),
    );
    let router = econ_model_api::build_router(ctx);

    let response = post(&router, PROJECT, json!([stream_properties("kept")])).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], json!("InternalServerError"));

    let listed = get(&router, &collection_uri(PROJECT)).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.body.as_array().map(Vec::len), Some(1));
}
