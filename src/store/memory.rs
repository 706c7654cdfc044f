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

//! In-process implementations of the collaborators, used by the binary and
//! by tests.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use log::{debug, info};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EconFunctionConverter, FindOptions, ModelStore, ReferenceChecker, UpsertOutcome};
use crate::fields::values::get_path;
use crate::query::filter::{ASSUMPTION_KEY_PATH, PROJECT_PATH};
use crate::query::{Filter, SortDirection};

pub const ID_PATH: &str = "_id";
pub const CREATED_AT_PATH: &str = "createdAt";
pub const UPDATED_AT_PATH: &str = "updatedAt";
pub const NAME_PATH: &str = "name";

/// Monotonic 24-hex-character ids: 8 hex of epoch seconds then a 16 hex counter.
#[derive(Debug)]
struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    fn new() -> Self {
        let (seed, _) = Uuid::new_v4().as_u64_pair();
        Self {
            counter: AtomicU64::new(seed >> 24),
        }
    }

    fn next(&self) -> String {
        let seconds = Utc::now().timestamp() as u32;
        let count = self.counter.fetch_add(1, AtomicOrdering::SeqCst);
        format!("{seconds:08x}{count:016x}")
    }
}

fn now() -> Value {
    Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Order used for sorting and cursors: null, numbers, strings, objects,
/// arrays, booleans; numbers compare by value.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Number(_) => 1,
            Value::String(_) => 2,
            Value::Object(_) => 3,
            Value::Array(_) => 4,
            Value::Bool(_) => 5,
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Equality with `1` and `1.0` treated as the same number.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

pub fn matches_filter(document: &Value, filter: &Filter) -> bool {
    filter.clauses.iter().all(|clause| {
        let stored = get_path(document, &clause.path).unwrap_or(&Value::Null);
        clause.any_of.iter().any(|wanted| values_equal(stored, wanted))
    })
}

fn sort_key<'a>(document: &'a Value, path: &str) -> &'a Value {
    get_path(document, path).unwrap_or(&Value::Null)
}

fn same_model(a: &Value, b: &Value) -> bool {
    [PROJECT_PATH, ASSUMPTION_KEY_PATH, NAME_PATH]
        .iter()
        .all(|path| values_equal(sort_key(a, path), sort_key(b, path)))
}

/// Documents kept in insertion order behind an async lock.
#[derive(Debug)]
pub struct MemoryModelStore {
    documents: RwLock<IndexMap<String, Value>>,
    ids: IdGenerator,
}

impl Default for MemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryModelStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
            ids: IdGenerator::new(),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn stamp_new(&self, mut document: Value) -> (String, Value) {
        let id = self.ids.next();
        if let Value::Object(map) = &mut document {
            map.insert(ID_PATH.to_string(), Value::from(id.clone()));
            let timestamp = now();
            map.insert(CREATED_AT_PATH.to_string(), timestamp.clone());
            map.insert(UPDATED_AT_PATH.to_string(), timestamp);
        }
        (id, document)
    }
}

#[async_trait]
impl ModelStore for MemoryModelStore {
    async fn find(&self, options: &FindOptions) -> anyhow::Result<Vec<Value>> {
        let documents = self.documents.read().await;
        let path = options.sort.db_path.as_str();
        let direction = options.sort.direction;

        let mut rows: Vec<&Value> = documents
            .values()
            .filter(|doc| matches_filter(doc, &options.filter))
            .filter(|doc| match &options.after {
                Some(after) => {
                    let ordering = compare_values(sort_key(doc, path), after);
                    match direction {
                        SortDirection::Ascending => ordering == Ordering::Greater,
                        SortDirection::Descending => ordering == Ordering::Less,
                    }
                }
                None => true,
            })
            .collect();

        rows.sort_by(|a, b| {
            let ordering = compare_values(sort_key(a, path), sort_key(b, path));
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        Ok(rows
            .into_iter()
            .skip(options.skip)
            .take(options.limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &Filter) -> anyhow::Result<u64> {
        let documents = self.documents.read().await;
        Ok(documents.values().filter(|doc| matches_filter(doc, filter)).count() as u64)
    }

    async fn find_one(&self, filter: &Filter) -> anyhow::Result<Option<Value>> {
        let documents = self.documents.read().await;
        Ok(documents.values().find(|doc| matches_filter(doc, filter)).cloned())
    }

    async fn existing_names(
        &self,
        names: &[String],
        assumption_key: &str,
        project: &str,
    ) -> anyhow::Result<HashSet<String>> {
        let scope = Filter::scoped(project, assumption_key);
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|doc| matches_filter(doc, &scope))
            .filter_map(|doc| doc.get(NAME_PATH).and_then(Value::as_str))
            .filter(|name| names.iter().any(|wanted| wanted.as_str() == *name))
            .map(str::to_string)
            .collect())
    }

    async fn insert_many(&self, documents: Vec<Value>) -> anyhow::Result<Vec<Value>> {
        let mut stored = self.documents.write().await;
        let inserted: Vec<Value> = documents
            .into_iter()
            .map(|document| {
                let (id, document) = self.stamp_new(document);
                stored.insert(id, document.clone());
                document
            })
            .collect();
        debug!("Inserted {} documents", inserted.len());
        Ok(inserted)
    }

    async fn upsert_many(&self, documents: Vec<Value>) -> anyhow::Result<Vec<UpsertOutcome>> {
        let mut stored = self.documents.write().await;
        let mut outcomes = Vec::with_capacity(documents.len());

        for mut document in documents {
            let existing = stored
                .iter()
                .find(|(_, current)| same_model(current, &document))
                .map(|(id, current)| (id.clone(), current.get(CREATED_AT_PATH).cloned()));

            match existing {
                Some((id, created_at)) => {
                    if let Value::Object(map) = &mut document {
                        map.insert(ID_PATH.to_string(), Value::from(id.clone()));
                        map.insert(CREATED_AT_PATH.to_string(), created_at.unwrap_or_else(now));
                        map.insert(UPDATED_AT_PATH.to_string(), now());
                    }
                    stored.insert(id, document.clone());
                    outcomes.push(UpsertOutcome {
                        document,
                        created: false,
                    });
                }
                None => {
                    let (id, document) = self.stamp_new(document);
                    stored.insert(id, document.clone());
                    outcomes.push(UpsertOutcome {
                        document,
                        created: true,
                    });
                }
            }
        }
        Ok(outcomes)
    }

    async fn delete_one(&self, filter: &Filter) -> anyhow::Result<u64> {
        let mut stored = self.documents.write().await;
        let id = stored
            .iter()
            .find(|(_, doc)| matches_filter(doc, filter))
            .map(|(id, _)| id.clone());
        Ok(match id {
            Some(id) => {
                stored.shift_remove(&id);
                1
            }
            None => 0,
        })
    }
}

/// Wells and scenarios per project, seeded from configuration.
#[derive(Debug, Default, Clone)]
pub struct MemoryReferenceChecker {
    wells: HashMap<String, HashSet<String>>,
    scenarios: HashMap<String, HashSet<String>>,
}

impl MemoryReferenceChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(
        mut self,
        project: impl Into<String>,
        wells: impl IntoIterator<Item = String>,
        scenarios: impl IntoIterator<Item = String>,
    ) -> Self {
        let project = project.into();
        self.wells.entry(project.clone()).or_default().extend(wells);
        self.scenarios.entry(project).or_default().extend(scenarios);
        self
    }

    fn lookup(known: &HashMap<String, HashSet<String>>, project: &str, ids: &[String]) -> HashSet<String> {
        known
            .get(project)
            .map(|set| ids.iter().filter(|id| set.contains(*id)).cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ReferenceChecker for MemoryReferenceChecker {
    async fn existing_wells(&self, project: &str, ids: &[String]) -> anyhow::Result<HashSet<String>> {
        Ok(Self::lookup(&self.wells, project, ids))
    }

    async fn existing_scenarios(&self, project: &str, ids: &[String]) -> anyhow::Result<HashSet<String>> {
        Ok(Self::lookup(&self.scenarios, project, ids))
    }
}

/// Converter that only records and logs what it was given.
#[derive(Debug, Default)]
pub struct LoggingConverter {
    calls: AtomicUsize,
    converted: AtomicUsize,
}

impl LoggingConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub fn converted(&self) -> usize {
        self.converted.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl EconFunctionConverter for LoggingConverter {
    async fn convert(&self, project: &str, assumption_key: &str, econ_functions: &[Value]) -> anyhow::Result<()> {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.converted.fetch_add(econ_functions.len(), AtomicOrdering::SeqCst);
        info!(
            "Converted {} {assumption_key} econ functions for project {project}",
            econ_functions.len()
        );
        Ok(())
    }
}
