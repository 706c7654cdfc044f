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

use serde_json::Value;

use super::params::QueryParams;
use crate::fields::{ErrorAggregator, ErrorKind, FieldTable, ValidationError, ValidationErrors};

pub const PROJECT_PATH: &str = "project";
pub const ASSUMPTION_KEY_PATH: &str = "assumptionKey";

/// One storage path matched against any of several values.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    pub path: String,
    pub any_of: Vec<Value>,
}

/// Conjunction of clauses over storage paths.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub clauses: Vec<FilterClause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Documents of one resource kind inside one project.
    pub fn scoped(project: &str, assumption_key: &str) -> Self {
        Self::new()
            .eq(PROJECT_PATH, Value::from(project))
            .eq(ASSUMPTION_KEY_PATH, Value::from(assumption_key))
    }

    pub fn eq(self, path: impl Into<String>, value: Value) -> Self {
        self.any_of(path, vec![value])
    }

    pub fn any_of(mut self, path: impl Into<String>, values: Vec<Value>) -> Self {
        self.clauses.push(FilterClause {
            path: path.into(),
            any_of: values,
        });
        self
    }

    /// Append the clauses of `other`. Clauses are ANDed, so nothing in `self`
    /// can widen what `other` restricts.
    pub fn and(mut self, other: Filter) -> Self {
        self.clauses.extend(other.clauses);
        self
    }
}

/// Build a filter from every non-reserved query parameter.
///
/// Repeated keys are ORed within the field; distinct keys are ANDed. Every
/// bad key or value is reported together.
pub fn parse_filters(
    params: &QueryParams,
    reserved: &[&str],
    table: &FieldTable,
) -> Result<Filter, ValidationErrors> {
    let mut aggregator = ErrorAggregator::new();
    let mut filter = Filter::new();

    for key in params.keys() {
        if reserved.contains(&key) {
            continue;
        }
        let Some(field) = table.get_field(key).filter(|f| f.options.is_filterable) else {
            aggregator.push(ValidationError::at(
                ErrorKind::FieldNameFilter,
                format!("`{key}` is not a valid filter field"),
                key,
            ));
            continue;
        };

        let values: Vec<Value> = params
            .get_all(key)
            .into_iter()
            .filter_map(|raw| aggregator.catch(field.parse_query_value(raw, key)))
            .collect();
        filter = filter.any_of(field.db_path, values);
    }

    aggregator.finish(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{FieldDescriptor, FieldKind};
    use serde_json::json;

    fn table() -> FieldTable {
        FieldTable::new([
            FieldDescriptor::new("name", "name", FieldKind::String).filterable(),
            FieldDescriptor::new("unique", "unique", FieldKind::Boolean).filterable(),
            FieldDescriptor::new("btuContent", "econ_function.btu_content", FieldKind::String),
        ])
    }

    #[test]
    fn test_repeated_keys_or_and_distinct_keys_and() {
        let params = QueryParams::parse(Some("name=a&skip=1&name=b&unique=true"));
        let filter = parse_filters(&params, &["skip", "take"], &table()).expect("valid filters");
        assert_eq!(
            filter,
            Filter::new()
                .any_of("name", vec![json!("a"), json!("b")])
                .eq("unique", json!(true))
        );
    }

    #[test]
    fn test_unknown_and_unfilterable_keys() {
        let params = QueryParams::parse(Some("bogus=1&btuContent=2&unique=maybe"));
        let errors = parse_filters(&params, &[], &table()).expect_err("invalid filters");
        let kinds: Vec<_> = errors.errors().iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorKind::FieldNameFilter, ErrorKind::FieldNameFilter, ErrorKind::Type]
        );
    }

    #[test]
    fn test_scope_is_appended_last() {
        let filter = Filter::new()
            .eq("name", json!("a"))
            .and(Filter::scoped("5e272d38b78910dd2a1bd691", "stream_properties"));
        let paths: Vec<_> = filter.clauses.iter().map(|c| c.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "project", "assumptionKey"]);
    }
}
