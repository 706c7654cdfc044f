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

//! Collect-all-errors helpers.
//!
//! Parsing never stops at the first failure: every field (and every record of
//! a batch) that can be validated independently is validated in the same pass.
//! [`ErrorAggregator`] is the per-record scope, [`IndexedErrors`] the per-batch
//! scope keyed by the record's position in the request body.
//!
//! Only [`ValidationErrors`] can be caught. Collaborator failures use other
//! error types and therefore always propagate through `?`.

use std::collections::BTreeMap;

use super::error::{ValidationError, ValidationErrors};

/// Ordered accumulator of validation failures.
#[derive(Debug, Default)]
pub struct ErrorAggregator {
    entries: Vec<ValidationError>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwrap `result`, recording its errors and yielding `None` on failure.
    pub fn catch<T>(&mut self, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.entries.extend(errors);
                None
            }
        }
    }

    pub fn push(&mut self, error: ValidationError) {
        self.entries.push(error);
    }

    pub fn error_entries(&self) -> &[ValidationError] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise every entry at once.
    pub fn throw_all(self) -> Result<(), ValidationErrors> {
        if self.entries.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(self.entries))
        }
    }

    /// Like [`throw_all`](Self::throw_all) but hands back `value` on success.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        self.throw_all().map(|_| value)
    }
}

/// Validation failures of a batch, grouped by input index.
#[derive(Debug, Default, Clone)]
pub struct IndexedErrors {
    by_index: BTreeMap<usize, Vec<ValidationError>>,
}

impl IndexedErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, index: usize, error: ValidationError) {
        self.by_index.entry(index).or_default().push(error);
    }

    pub fn extend(&mut self, index: usize, errors: ValidationErrors) {
        self.by_index.entry(index).or_default().extend(errors);
    }

    /// Unwrap `result` for the record at `index`, recording its errors on failure.
    pub fn catch<T>(&mut self, index: usize, result: Result<T, ValidationErrors>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.extend(index, errors);
                None
            }
        }
    }

    pub fn get(&self, index: usize) -> Option<&[ValidationError]> {
        self.by_index.get(&index).map(Vec::as_slice)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.by_index.contains_key(&index)
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// Number of records with at least one error.
    pub fn failed_records(&self) -> usize {
        self.by_index.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[ValidationError])> {
        self.by_index
            .iter()
            .map(|(index, errors)| (*index, errors.as_slice()))
    }

    /// Flatten into one list ordered by input index.
    pub fn into_errors(self) -> ValidationErrors {
        ValidationErrors::new(self.by_index.into_values().flatten().collect())
    }
}
