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

use anyhow::Result;
use axum::{routing::get, Router};
use log::info;
use std::path::Path;
use tower_http::cors::CorsLayer;

use crate::api::{self, ApiContext, ApiVersion};
use crate::config::{load_config_file, ServerConfig};
use crate::resources;

/// Build the complete application router.
pub fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        // Operational endpoints, not versioned
        .route("/health", get(api::health_check))
        .route("/api/versions", get(api::list_api_versions))
        .nest(
            ApiVersion::V1.path_prefix(),
            api::build_v1_router(ctx, resources::all()),
        )
        .layer(CorsLayer::permissive())
}

pub struct ApiServer {
    config: ServerConfig,
    ctx: ApiContext,
}

impl ApiServer {
    /// Server with in-memory collaborators.
    pub fn new(config: ServerConfig) -> Self {
        let ctx = ApiContext::in_memory(&config);
        Self { config, ctx }
    }

    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(load_config_file(path)?))
    }

    /// Server with caller-provided collaborators.
    pub fn with_context(config: ServerConfig, ctx: ApiContext) -> Self {
        Self { config, ctx }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    /// Serve until Ctrl-C.
    #[allow(clippy::print_stdout)]
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let engine = &self.config.engine;
        println!("Starting Econ Model API");
        println!("  Listening on: {addr}");
        println!(
            "  Record limits: read {}, write {}",
            engine.read_record_limit, engine.write_record_limit
        );
        println!(
            "  Strict fields: {}, transactional: {}",
            engine.error_on_extraneous_fields, engine.transactional
        );

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("API v1 available at http://{addr}{}/", ApiVersion::V1.path_prefix());
        info!("OpenAPI document at http://{addr}/v1/openapi.json");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Econ Model API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
    info!("Shutting down Econ Model API");
}
