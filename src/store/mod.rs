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

//! Collaborators of the engine: the document store, reference lookups and
//! the econ-function conversion service.
//!
//! All collaborator failures are `anyhow::Error`. They are never turned into
//! validation errors and surface as internal server errors.

pub mod memory;

use std::collections::HashSet;

use async_trait::async_trait;
use log::warn;
use serde_json::Value;

use crate::query::{Filter, SortSpec};

pub use memory::{LoggingConverter, MemoryModelStore, MemoryReferenceChecker};

/// Options of a `find` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Filter,
    pub sort: SortSpec,
    pub skip: usize,
    pub limit: usize,
    /// Only rows strictly after this sort-key value, in sort direction.
    pub after: Option<Value>,
}

/// Result of upserting one document.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertOutcome {
    pub document: Value,
    pub created: bool,
}

/// Persistence for econ-model documents.
///
/// Documents carry `project`, `assumptionKey` and `name`; the store assigns
/// `_id`, `createdAt` and `updatedAt`.
#[async_trait]
pub trait ModelStore: Send + Sync {
    async fn find(&self, options: &FindOptions) -> anyhow::Result<Vec<Value>>;

    async fn count(&self, filter: &Filter) -> anyhow::Result<u64>;

    async fn find_one(&self, filter: &Filter) -> anyhow::Result<Option<Value>>;

    /// Which of `names` are already used by documents of this kind in `project`.
    async fn existing_names(
        &self,
        names: &[String],
        assumption_key: &str,
        project: &str,
    ) -> anyhow::Result<HashSet<String>>;

    async fn insert_many(&self, documents: Vec<Value>) -> anyhow::Result<Vec<Value>>;

    /// Replace documents matched on (project, assumptionKey, name), insert the rest.
    async fn upsert_many(&self, documents: Vec<Value>) -> anyhow::Result<Vec<UpsertOutcome>>;

    /// Returns the number of deleted documents.
    async fn delete_one(&self, filter: &Filter) -> anyhow::Result<u64>;
}

/// Well and scenario existence lookups.
#[async_trait]
pub trait ReferenceChecker: Send + Sync {
    async fn existing_wells(&self, project: &str, ids: &[String]) -> anyhow::Result<HashSet<String>>;

    async fn existing_scenarios(&self, project: &str, ids: &[String]) -> anyhow::Result<HashSet<String>>;
}

/// Downstream conversion of persisted econ functions into model options.
#[async_trait]
pub trait EconFunctionConverter: Send + Sync {
    async fn convert(&self, project: &str, assumption_key: &str, econ_functions: &[Value]) -> anyhow::Result<()>;
}

/// Call `converter` up to `attempts` times, returning the last error.
pub async fn convert_with_retries(
    converter: &dyn EconFunctionConverter,
    attempts: u32,
    project: &str,
    assumption_key: &str,
    econ_functions: &[Value],
) -> anyhow::Result<()> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match converter.convert(project, assumption_key, econ_functions).await {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                warn!("Econ function conversion attempt {attempt}/{attempts} failed: {e}");
                attempt += 1;
            }
            Err(e) => return Err(e.context(format!("Econ function conversion failed after {attempts} attempts"))),
        }
    }
}
