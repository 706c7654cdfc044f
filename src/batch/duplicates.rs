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

use indexmap::IndexMap;
use serde_json::Value;

use crate::fields::{ApiRecord, ErrorKind, IndexedErrors, ValidationError};

/// Reject every record whose name appears more than once in the batch.
///
/// All colliding records fail, including the first occurrence. The error
/// location lists every colliding index, e.g. `[0], [1]`.
pub fn check_model_duplicates(
    records: &mut [Option<ApiRecord>],
    name_field: &str,
    label: &'static str,
    errors: &mut IndexedErrors,
) {
    let mut by_name: IndexMap<String, Vec<usize>> = IndexMap::new();
    for (index, record) in records.iter().enumerate() {
        if let Some(name) = record
            .as_ref()
            .and_then(|r| r.get(name_field))
            .and_then(Value::as_str)
        {
            by_name.entry(name.to_string()).or_default().push(index);
        }
    }

    for (name, indices) in by_name.into_iter().filter(|(_, i)| i.len() > 1) {
        let location = indices
            .iter()
            .map(|i| format!("[{i}]"))
            .collect::<Vec<_>>()
            .join(", ");
        for &index in &indices {
            errors.push(
                index,
                ValidationError::at(
                    ErrorKind::Duplicate(label),
                    format!("More than one {label} model supplied with name `{name}`"),
                    location.clone(),
                ),
            );
            records[index] = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> Option<ApiRecord> {
        json!({ "name": name }).as_object().cloned()
    }

    #[test]
    fn test_all_colliding_records_are_rejected() {
        let mut records = vec![record("a"), record("b"), None, record("a")];
        let mut errors = IndexedErrors::new();
        check_model_duplicates(&mut records, "name", "StreamProperties", &mut errors);

        assert!(records[0].is_none());
        assert!(records[1].is_some());
        assert!(records[3].is_none());

        for index in [0, 3] {
            let error = &errors.get(index).expect("error recorded")[0];
            assert_eq!(error.kind.name(), "DuplicateStreamPropertiesError");
            assert_eq!(error.location.as_deref(), Some("[0], [3]"));
        }
        assert_eq!(errors.failed_records(), 2);
    }

    #[test]
    fn test_no_duplicates() {
        let mut records = vec![record("a"), record("b")];
        let mut errors = IndexedErrors::new();
        check_model_duplicates(&mut records, "name", "StreamProperties", &mut errors);
        assert!(errors.is_empty());
        assert!(records.iter().all(Option::is_some));
    }
}
