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

//! Batch writes: validate, cross-check, persist and report per record.
//!
//! A record is either written in full or excluded in full. Records are
//! checked in passes (parse, references, name collisions, in-batch
//! duplicates); each pass only sees the survivors of the previous one and
//! reports its failures under the record's input index.

use std::collections::HashSet;

use log::{debug, info};
use serde_json::Value;

use super::duplicates::check_model_duplicates;
use super::multi_status::{merge_responses, with_counts, MultiStatusResponse, RecordStatus};
use super::BatchError;
use crate::config::EngineSettings;
use crate::fields::values::get_path;
use crate::fields::{
    child_location, index_location, ApiRecord, ErrorKind, IndexedErrors, ParseContext,
    ValidationError,
};
use crate::query::filter::{ASSUMPTION_KEY_PATH, PROJECT_PATH};
use crate::resources::econ_model::{check_unique_assignment, SCENARIO_FIELD, WELL_FIELD};
use crate::resources::Resource;
use crate::store::memory::ID_PATH;
use crate::store::{convert_with_retries, EconFunctionConverter, ModelStore, ReferenceChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: names must not exist yet.
    Create,
    /// PUT: existing names are replaced.
    Upsert,
}

impl WriteMode {
    fn verb(self) -> &'static str {
        match self {
            WriteMode::Create => "create",
            WriteMode::Upsert => "upsert",
        }
    }
}

/// A record that passed every check, in both shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRecord {
    pub record: ApiRecord,
    pub document: Value,
}

/// Index-aligned outcome of validating a batch.
#[derive(Debug, Clone, Default)]
pub struct PreparedBatch {
    pub records: Vec<Option<PreparedRecord>>,
    pub errors: IndexedErrors,
}

impl PreparedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn valid_count(&self) -> usize {
        self.records.iter().flatten().count()
    }
}

/// Validates and writes batches of one resource inside one project.
pub struct BatchProcessor<'a> {
    pub resource: &'a Resource,
    pub settings: &'a EngineSettings,
    pub store: &'a dyn ModelStore,
    pub references: &'a dyn ReferenceChecker,
    pub converter: &'a dyn EconFunctionConverter,
}

impl BatchProcessor<'_> {
    fn context(&self) -> ParseContext {
        ParseContext {
            strict: self.settings.error_on_extraneous_fields,
        }
    }

    /// Validate `body` (one object or an array of objects) without writing.
    ///
    /// Request-level failures (too many records, transactional abort) and
    /// collaborator failures are returned as `Err`; record failures are
    /// collected in the returned batch.
    pub async fn prepare(&self, project: &str, body: Value, mode: WriteMode) -> Result<PreparedBatch, BatchError> {
        let items = match body {
            Value::Array(items) => items,
            single => vec![single],
        };

        let limit = self.settings.write_record_limit;
        if items.len() > limit {
            return Err(BatchError::Rejected(
                ValidationError::new(
                    ErrorKind::RecordCount,
                    format!(
                        "Cannot {} more than {limit} {} records in one request, got {}",
                        mode.verb(),
                        self.resource.label,
                        items.len()
                    ),
                )
                .into(),
            ));
        }

        let mut errors = IndexedErrors::new();
        let mut records = self.parse_records(&items, &mut errors);

        self.check_references(project, &mut records, &mut errors).await?;
        if mode == WriteMode::Create {
            self.check_collisions(project, &mut records, &mut errors).await?;
        }
        check_model_duplicates(
            &mut records,
            self.resource.name_field(),
            self.resource.label,
            &mut errors,
        );

        if self.settings.transactional && !errors.is_empty() {
            info!(
                "Aborting transactional {} batch of {} {} records: {} failed",
                mode.verb(),
                items.len(),
                self.resource.label,
                errors.failed_records()
            );
            return Err(errors.into_errors().into());
        }

        let records = records
            .into_iter()
            .map(|slot| {
                slot.map(|record| {
                    let document = self.to_document(project, &record);
                    PreparedRecord { record, document }
                })
            })
            .collect();

        Ok(PreparedBatch { records, errors })
    }

    fn parse_records(&self, items: &[Value], errors: &mut IndexedErrors) -> Vec<Option<ApiRecord>> {
        let ctx = self.context();
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let location = index_location("", index);
                let record = errors.catch(index, self.resource.table.parse_object(item, &location, ctx))?;
                errors.catch(index, check_unique_assignment(&record, &location))?;
                Some(record)
            })
            .collect()
    }

    /// One lookup per reference kind for the whole batch.
    async fn check_references(
        &self,
        project: &str,
        records: &mut [Option<ApiRecord>],
        errors: &mut IndexedErrors,
    ) -> anyhow::Result<()> {
        let wells = referenced_ids(records, WELL_FIELD);
        let scenarios = referenced_ids(records, SCENARIO_FIELD);

        let known_wells = if wells.is_empty() {
            HashSet::new()
        } else {
            self.references.existing_wells(project, &wells).await?
        };
        let known_scenarios = if scenarios.is_empty() {
            HashSet::new()
        } else {
            self.references.existing_scenarios(project, &scenarios).await?
        };

        for (index, slot) in records.iter_mut().enumerate() {
            let Some(record) = slot.as_ref() else {
                continue;
            };
            let location = index_location("", index);
            let mut failed = false;
            for (field, label, known) in [
                (WELL_FIELD, "Well", &known_wells),
                (SCENARIO_FIELD, "Scenario", &known_scenarios),
            ] {
                if let Some(id) = record.get(field).and_then(Value::as_str) {
                    if !known.contains(id) {
                        errors.push(
                            index,
                            ValidationError::at(
                                ErrorKind::NotFound(label),
                                format!("No {} with id `{id}` exists in project `{project}`", label.to_lowercase()),
                                child_location(&location, field),
                            ),
                        );
                        failed = true;
                    }
                }
            }
            if failed {
                *slot = None;
            }
        }
        Ok(())
    }

    async fn check_collisions(
        &self,
        project: &str,
        records: &mut [Option<ApiRecord>],
        errors: &mut IndexedErrors,
    ) -> anyhow::Result<()> {
        let name_field = self.resource.name_field();
        let names: Vec<String> = records
            .iter()
            .flatten()
            .filter_map(|r| r.get(name_field).and_then(Value::as_str))
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Ok(());
        }

        let existing = self
            .store
            .existing_names(&names, self.resource.assumption_key, project)
            .await?;

        for (index, slot) in records.iter_mut().enumerate() {
            let Some(name) = slot
                .as_ref()
                .and_then(|r| r.get(name_field))
                .and_then(Value::as_str)
                .filter(|name| existing.contains(*name))
                .map(str::to_string)
            else {
                continue;
            };
            errors.push(
                index,
                ValidationError::at(
                    ErrorKind::Collision(self.resource.label),
                    format!("{} model with name `{name}` already exists in project", self.resource.label),
                    child_location(&index_location("", index), name_field),
                ),
            );
            *slot = None;
        }
        Ok(())
    }

    fn to_document(&self, project: &str, record: &ApiRecord) -> Value {
        let mut document = self.resource.table.to_internal(record);
        if let Value::Object(map) = &mut document {
            map.insert(PROJECT_PATH.to_string(), Value::from(project));
            map.insert(
                ASSUMPTION_KEY_PATH.to_string(),
                Value::from(self.resource.assumption_key),
            );
        }
        document
    }

    /// Validate, persist and report a batch.
    pub async fn write(&self, project: &str, body: Value, mode: WriteMode) -> Result<MultiStatusResponse, BatchError> {
        let batch = self.prepare(project, body, mode).await?;
        let len = batch.len();

        let (indices, documents): (Vec<usize>, Vec<Value>) = batch
            .records
            .into_iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|prepared| (index, prepared.document)))
            .unzip();

        let mut successes: Vec<Option<RecordStatus>> = vec![None; len];
        let mut persisted = Vec::with_capacity(documents.len());

        if !documents.is_empty() {
            match mode {
                WriteMode::Create => {
                    for (index, document) in indices.iter().zip(self.store.insert_many(documents).await?) {
                        successes[*index] = Some(RecordStatus::created(id_of(&document), name_of(&document)));
                        persisted.push(document);
                    }
                }
                WriteMode::Upsert => {
                    for (index, outcome) in indices.iter().zip(self.store.upsert_many(documents).await?) {
                        let document = outcome.document;
                        successes[*index] = Some(if outcome.created {
                            RecordStatus::created(id_of(&document), name_of(&document))
                        } else {
                            RecordStatus::ok(id_of(&document), name_of(&document))
                        });
                        persisted.push(document);
                    }
                }
            }
        }

        if !persisted.is_empty() {
            let econ_functions: Vec<Value> = persisted
                .iter()
                .filter_map(|document| self.resource.econ_function(document))
                .collect();
            convert_with_retries(
                self.converter,
                self.settings.econ_function_attempts,
                project,
                self.resource.assumption_key,
                &econ_functions,
            )
            .await?;
        }

        let mut failures: Vec<Option<RecordStatus>> = vec![None; len];
        for (index, errors) in batch.errors.iter() {
            if let Some(slot) = failures.get_mut(index) {
                *slot = Some(RecordStatus::failed(errors.to_vec()));
            }
        }

        let response = with_counts(merge_responses(failures, successes));
        info!(
            "{} batch for {} in project {project}: {} succeeded, {} failed",
            mode.verb(),
            self.resource.label,
            response.success_count,
            response.failed_count
        );
        debug!("Persisted {} documents", persisted.len());
        Ok(response)
    }
}

fn referenced_ids(records: &[Option<ApiRecord>], field: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in records
        .iter()
        .flatten()
        .filter_map(|r| r.get(field).and_then(Value::as_str))
    {
        if !ids.iter().any(|known| known == id) {
            ids.push(id.to_string());
        }
    }
    ids
}

fn id_of(document: &Value) -> Option<String> {
    get_path(document, ID_PATH).and_then(Value::as_str).map(str::to_string)
}

fn name_of(document: &Value) -> Option<String> {
    document.get("name").and_then(Value::as_str).map(str::to_string)
}
