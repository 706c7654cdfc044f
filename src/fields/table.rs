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
use serde_json::{Map, Value};

use super::aggregator::ErrorAggregator;
use super::descriptor::{FieldDescriptor, FieldKind, ParseContext};
use super::error::{child_location, ErrorKind, ValidationError, ValidationErrors};
use super::values::{is_nil, type_name};

/// A record in its public (camelCase) shape.
pub type ApiRecord = Map<String, Value>;

/// Ordered map of public field name to descriptor.
#[derive(Debug, Clone, Default)]
pub struct FieldTable {
    fields: IndexMap<&'static str, FieldDescriptor>,
}

impl FieldTable {
    pub fn new(fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        Self {
            fields: fields.into_iter().map(|f| (f.api_key, f)).collect(),
        }
    }

    /// Combine two tables. Entries of `other` replace entries with the same key.
    pub fn merge(mut self, other: FieldTable) -> Self {
        self.fields.extend(other.fields);
        self
    }

    pub fn get_field(&self, api_key: &str) -> Option<&FieldDescriptor> {
        self.fields.get(api_key)
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn filterable_fields(&self) -> Vec<&'static str> {
        self.keys_where(|f| f.options.is_filterable)
    }

    pub fn sortable_fields(&self) -> Vec<&'static str> {
        self.keys_where(|f| f.options.is_sortable)
    }

    pub fn required_fields(&self) -> Vec<&'static str> {
        self.keys_where(|f| f.options.is_required)
    }

    fn keys_where(&self, predicate: impl Fn(&FieldDescriptor) -> bool) -> Vec<&'static str> {
        self.fields
            .values()
            .filter(|f| predicate(f))
            .map(|f| f.api_key)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate a wire object against this table.
    ///
    /// Null values count as absent. Unknown and read-only keys are rejected
    /// in strict mode and dropped otherwise. Every failure of the object is
    /// reported together.
    pub fn parse_object(
        &self,
        value: &Value,
        location: &str,
        ctx: ParseContext,
    ) -> Result<ApiRecord, ValidationErrors> {
        let Value::Object(input) = value else {
            return Err(ValidationError::at(
                ErrorKind::RequestStructure,
                format!("Expected an object, got {}", type_name(value)),
                location,
            )
            .into());
        };

        let mut aggregator = ErrorAggregator::new();
        let mut parsed = ApiRecord::new();

        for (key, raw) in input {
            if raw.is_null() {
                continue;
            }
            let key_location = child_location(location, key);
            match self.get_field(key) {
                Some(field) if !field.options.is_read_only => {
                    if let Some(value) = aggregator.catch(field.parse(raw, &key_location, ctx)) {
                        parsed.insert(key.clone(), value);
                    }
                }
                Some(_) if ctx.strict => aggregator.push(ValidationError::at(
                    ErrorKind::FieldName,
                    format!("`{key}` is a read-only field"),
                    key_location,
                )),
                None if ctx.strict => aggregator.push(ValidationError::unknown_field(key, key_location)),
                _ => {}
            }
        }

        for field in self.fields() {
            let options = &field.options;
            if options.is_required && !options.is_read_only && is_nil(input.get(field.api_key)) {
                aggregator.push(ValidationError::required(
                    field.api_key,
                    child_location(location, field.api_key),
                ));
            }
        }

        aggregator.finish(parsed)
    }

    /// Public record to stored document. Fixed fields are always written.
    pub fn to_internal(&self, record: &ApiRecord) -> Value {
        let mut document = Value::Object(Map::new());
        for field in self.fields() {
            match record.get(field.api_key) {
                Some(value) => field.write(&mut document, value),
                None if matches!(field.kind, FieldKind::Fixed { .. }) => {
                    field.write(&mut document, &Value::Null)
                }
                None => {}
            }
        }
        document
    }

    /// Stored document to public record. Fields absent from the document are
    /// left out.
    pub fn to_api(&self, document: &Value) -> ApiRecord {
        self.fields()
            .filter_map(|field| field.read(document).map(|v| (field.api_key.to_string(), v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::descriptor::Bounds;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn table() -> FieldTable {
        FieldTable::new([
            FieldDescriptor::new("id", "_id", FieldKind::ObjectId).read_only().sortable(),
            FieldDescriptor::new("name", "name", FieldKind::String)
                .required()
                .filterable()
                .sortable(),
            FieldDescriptor::new("unique", "unique", FieldKind::Boolean).required().filterable(),
            FieldDescriptor::new(
                "btuContent",
                "econ_function.btu_content",
                FieldKind::Object(std::sync::Arc::new(FieldTable::new([
                    FieldDescriptor::new("unshrunkGas", "unshrunk_gas", FieldKind::Number(Bounds::NON_NEGATIVE))
                        .required(),
                    FieldDescriptor::new("shrunkGas", "shrunk_gas", FieldKind::Number(Bounds::NON_NEGATIVE))
                        .required(),
                ]))),
            )
            .required(),
        ])
    }

    fn locations(errors: &ValidationErrors) -> Vec<String> {
        errors
            .errors()
            .iter()
            .map(|e| format!("{}@{}", e.kind.name(), e.location.clone().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn test_round_trip() {
        let table = table();
        let input = json!({
            "name": "a",
            "unique": false,
            "btuContent": { "unshrunkGas": 1000, "shrunkGas": 1100 }
        });
        let parsed = table.parse_object(&input, "[0]", ParseContext::strict()).expect("valid record");
        let document = table.to_internal(&parsed);
        assert_eq!(
            document,
            json!({
                "name": "a",
                "unique": false,
                "econ_function": { "btu_content": { "unshrunk_gas": 1000, "shrunk_gas": 1100 } }
            })
        );
        assert_eq!(Value::Object(table.to_api(&document)), input);
    }

    #[test]
    fn test_strict_rejects_unknown_and_read_only() {
        let input = json!({ "id": "5e272d38b78910dd2a1bd691", "name": "a", "unique": true, "bogus": 1,
            "btuContent": { "unshrunkGas": 1, "shrunkGas": 1 } });
        let errors = table()
            .parse_object(&input, "[2]", ParseContext::strict())
            .expect_err("strict mode");
        assert_eq!(
            locations(&errors),
            vec!["FieldNameError@[2].id", "FieldNameError@[2].bogus"]
        );
    }

    #[test]
    fn test_lenient_drops_unknown_and_read_only() {
        let input = json!({ "id": "5e272d38b78910dd2a1bd691", "name": "a", "unique": true, "bogus": 1,
            "btuContent": { "unshrunkGas": 1, "shrunkGas": 1 } });
        let parsed = table()
            .parse_object(&input, "", ParseContext::lenient())
            .expect("lenient mode");
        assert!(!parsed.contains_key("id"));
        assert!(!parsed.contains_key("bogus"));
    }

    #[test]
    fn test_all_errors_reported_together() {
        let input = json!({ "name": null, "unique": "yes", "btuContent": { "shrunkGas": -1 } });
        let errors = table()
            .parse_object(&input, "[0]", ParseContext::strict())
            .expect_err("invalid record");
        assert_eq!(
            locations(&errors),
            vec![
                "TypeError@[0].unique",
                "ValidationError@[0].btuContent.shrunkGas",
                "RequiredFieldError@[0].btuContent.unshrunkGas",
                "RequiredFieldError@[0].name",
            ]
        );
    }

    #[test]
    fn test_non_object_is_structural() {
        let errors = table()
            .parse_object(&json!([1]), "[4]", ParseContext::strict())
            .expect_err("array is not a record");
        assert_eq!(locations(&errors), vec!["RequestStructureError@[4]"]);
    }

    #[test]
    fn test_merge_later_wins() {
        let merged = table().merge(FieldTable::new([FieldDescriptor::new(
            "name",
            "name",
            FieldKind::String,
        )]));
        assert_eq!(merged.len(), 4);
        assert!(!merged.required_fields().contains(&"name"));
        assert_eq!(merged.sortable_fields(), vec!["id"]);
        assert_eq!(merged.filterable_fields(), vec!["unique"]);
    }
}
