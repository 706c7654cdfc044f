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

//! Econ function criteria rows.
//!
//! Each row carries exactly one criteria key plus the value columns of the
//! econ function (e.g. `yield` and `shrinkCondition`). The criteria key of the
//! first row fixes the criteria for the whole array; every other row must use
//! the same key.
//!
//! Wire rows hold only the start of each range. Persisted rows carry the
//! materialized range:
//!
//! | kind   | wire                   | stored                                           |
//! |--------|------------------------|--------------------------------------------------|
//! | flat   | `"Flat"`               | `"Flat"`                                         |
//! | period | months (`12`)          | `{ start, end, period }` cumulative month bounds |
//! | rate   | start rate (`100`)     | `{ start, end }`, last `end` is `"inf"`          |
//! | dates  | `"2024-01-01"`         | `{ start_date, end_date }`, last is `"Econ Limit"` |

use std::sync::Arc;

use chrono::Duration;
use serde_json::{Map, Value};

use super::aggregator::ErrorAggregator;
use super::descriptor::{as_integer, ParseContext};
use super::error::{child_location, index_location, ErrorKind, ValidationError, ValidationErrors};
use super::table::{ApiRecord, FieldTable};
use super::values::{is_nil, parse_date, type_name, DATE_FORMAT};

pub const FLAT_VALUE: &str = "Flat";
pub const RATE_END: &str = "inf";
pub const DATES_END: &str = "Econ Limit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriteriaKind {
    Flat,
    Period,
    Rate,
    Dates,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criterion {
    pub api_key: &'static str,
    pub db_key: &'static str,
    pub kind: CriteriaKind,
}

pub const CRITERIA: &[Criterion] = &[
    Criterion {
        api_key: "entireWellLife",
        db_key: "entire_well_life",
        kind: CriteriaKind::Flat,
    },
    Criterion {
        api_key: "offsetToFpd",
        db_key: "offset_to_fpd",
        kind: CriteriaKind::Period,
    },
    Criterion {
        api_key: "offsetToAsOf",
        db_key: "offset_to_as_of_date",
        kind: CriteriaKind::Period,
    },
    Criterion {
        api_key: "offsetToDiscountDate",
        db_key: "offset_to_discount_date",
        kind: CriteriaKind::Period,
    },
    Criterion {
        api_key: "offsetToFirstSegment",
        db_key: "offset_to_first_segment",
        kind: CriteriaKind::Period,
    },
    Criterion {
        api_key: "offsetToEndHistory",
        db_key: "offset_to_end_history",
        kind: CriteriaKind::Period,
    },
    Criterion {
        api_key: "oilRate",
        db_key: "oil_rate",
        kind: CriteriaKind::Rate,
    },
    Criterion {
        api_key: "gasRate",
        db_key: "gas_rate",
        kind: CriteriaKind::Rate,
    },
    Criterion {
        api_key: "waterRate",
        db_key: "water_rate",
        kind: CriteriaKind::Rate,
    },
    Criterion {
        api_key: "dates",
        db_key: "dates",
        kind: CriteriaKind::Dates,
    },
];

pub fn criterion_by_api_key(key: &str) -> Option<&'static Criterion> {
    CRITERIA.iter().find(|c| c.api_key == key)
}

pub fn criterion_by_db_key(key: &str) -> Option<&'static Criterion> {
    CRITERIA.iter().find(|c| c.db_key == key)
}

fn criteria_list() -> String {
    CRITERIA
        .iter()
        .map(|c| c.api_key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A `rows` array of an econ function.
#[derive(Debug, Clone)]
pub struct RowsSpec {
    /// Resource label used in `*RowValidationError` names.
    pub label: &'static str,
    /// Value columns of every row.
    pub values: Arc<FieldTable>,
}

impl RowsSpec {
    pub fn new(label: &'static str, values: FieldTable) -> Self {
        Self {
            label,
            values: Arc::new(values),
        }
    }

    fn row_error(&self, message: impl Into<String>, location: &str) -> ValidationError {
        ValidationError::at(ErrorKind::RowValidation(self.label), message, location)
    }

    /// Validate a wire `rows` array. Empty arrays are valid.
    pub fn parse(
        &self,
        value: &Value,
        location: &str,
        ctx: ParseContext,
    ) -> Result<Value, ValidationErrors> {
        let Value::Array(rows) = value else {
            return Err(ValidationError::invalid_type(
                format!("`rows` must be an array, got {}", type_name(value)),
                location,
            )
            .into());
        };
        let Some(first) = rows.first() else {
            return Ok(Value::Array(Vec::new()));
        };

        let criterion = self.detect(first, &index_location(location, 0))?;

        let mut aggregator = ErrorAggregator::new();
        let mut parsed_rows = Vec::with_capacity(rows.len());
        let mut starts: Vec<(usize, Value)> = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let row_location = index_location(location, index);
            if let Some(start) = row.get(criterion.api_key) {
                if let Ok(start) = parse_start(criterion, start, &row_location) {
                    starts.push((index, start));
                }
            }
            if let Some(parsed) = aggregator.catch(self.parse_row(row, &row_location, criterion, ctx)) {
                parsed_rows.push(Value::Object(parsed));
            }
        }

        for error in self.check_sequence(criterion, rows.len(), &starts, location) {
            aggregator.push(error);
        }

        aggregator.finish(Value::Array(parsed_rows))
    }

    /// Pick the criteria from the shape of the first row.
    fn detect(&self, row: &Value, location: &str) -> Result<&'static Criterion, ValidationErrors> {
        let Value::Object(map) = row else {
            return Err(not_an_object(row, location));
        };
        let present: Vec<&'static Criterion> = map
            .iter()
            .filter(|(_, v)| !v.is_null())
            .filter_map(|(k, _)| criterion_by_api_key(k))
            .collect();

        match present.as_slice() {
            [single] => Ok(*single),
            [] => Err(ValidationError::at(
                ErrorKind::RequiredField,
                format!("Row must contain one criteria key, one of: {}", criteria_list()),
                location,
            )
            .into()),
            many => Err(self
                .row_error(
                    format!(
                        "Row contains more than one criteria key: {}",
                        many.iter().map(|c| c.api_key).collect::<Vec<_>>().join(", ")
                    ),
                    location,
                )
                .into()),
        }
    }

    fn parse_row(
        &self,
        row: &Value,
        location: &str,
        criterion: &Criterion,
        ctx: ParseContext,
    ) -> Result<ApiRecord, ValidationErrors> {
        let Value::Object(map) = row else {
            return Err(not_an_object(row, location));
        };

        let mut aggregator = ErrorAggregator::new();
        let mut start = None;
        let mut columns = Map::new();

        for (key, raw) in map {
            match criterion_by_api_key(key) {
                Some(_) if raw.is_null() => {}
                Some(found) if found.api_key == criterion.api_key => {
                    let key_location = child_location(location, key);
                    start = aggregator.catch(parse_start(criterion, raw, &key_location));
                }
                Some(found) => aggregator.push(self.row_error(
                    format!(
                        "`{}` does not match the `{}` criteria used by the first row",
                        found.api_key, criterion.api_key
                    ),
                    &child_location(location, key),
                )),
                None => {
                    columns.insert(key.clone(), raw.clone());
                }
            }
        }

        if is_nil(map.get(criterion.api_key)) {
            aggregator.push(self.row_error(
                format!("Row must use the `{}` criteria", criterion.api_key),
                location,
            ));
        }

        let values = aggregator.catch(self.values.parse_object(&Value::Object(columns), location, ctx));

        let mut parsed = ApiRecord::new();
        if let Some(start) = start {
            parsed.insert(criterion.api_key.to_string(), start);
        }
        if let Some(values) = values {
            parsed.extend(values);
        }
        aggregator.finish(parsed)
    }

    fn check_sequence(
        &self,
        criterion: &Criterion,
        row_count: usize,
        starts: &[(usize, Value)],
        location: &str,
    ) -> Vec<ValidationError> {
        let key = criterion.api_key;
        match criterion.kind {
            CriteriaKind::Flat if row_count > 1 => vec![self.row_error(
                format!("`{key}` can only be used with a single row"),
                location,
            )],
            CriteriaKind::Rate | CriteriaKind::Dates => starts
                .windows(2)
                .filter(|pair| !is_increasing(criterion.kind, &pair[0].1, &pair[1].1))
                .map(|pair| {
                    self.row_error(
                        format!("`{key}` must be greater than the value of the previous row"),
                        &child_location(&index_location(location, pair[1].0), key),
                    )
                })
                .collect(),
            CriteriaKind::Period => {
                let mut total: i64 = 0;
                let mut errors = Vec::new();
                for (index, start) in starts {
                    let Some(period) = as_integer(start) else {
                        continue;
                    };
                    match total.checked_add(period) {
                        Some(next) => total = next,
                        None => {
                            errors.push(self.row_error(
                                format!("`{key}` months add up to more than {}", i64::MAX),
                                &child_location(&index_location(location, *index), key),
                            ));
                            break;
                        }
                    }
                }
                errors
            }
            _ => Vec::new(),
        }
    }

    /// Convert validated wire rows into stored rows.
    pub fn write(&self, parsed: &Value) -> Value {
        let Some(rows) = parsed.as_array() else {
            return Value::Array(Vec::new());
        };
        let Some(criterion) = rows
            .first()
            .and_then(Value::as_object)
            .and_then(|row| row.keys().find_map(|k| criterion_by_api_key(k)))
        else {
            return Value::Array(Vec::new());
        };

        let starts: Vec<&Value> = rows
            .iter()
            .map(|row| row.get(criterion.api_key).unwrap_or(&Value::Null))
            .collect();

        let mut period_end: i64 = 0;
        let stored = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let next = starts.get(index + 1).copied();
                let range = match criterion.kind {
                    CriteriaKind::Flat => Value::from(FLAT_VALUE),
                    CriteriaKind::Period => {
                        let period = as_integer(starts[index]).unwrap_or(0);
                        let start = period_end.saturating_add(1);
                        period_end = period_end.saturating_add(period);
                        serde_json::json!({ "start": start, "end": period_end, "period": period })
                    }
                    CriteriaKind::Rate => serde_json::json!({
                        "start": starts[index],
                        "end": next.cloned().unwrap_or_else(|| Value::from(RATE_END)),
                    }),
                    CriteriaKind::Dates => serde_json::json!({
                        "start_date": starts[index],
                        "end_date": next
                            .and_then(Value::as_str)
                            .and_then(parse_date)
                            .map(|date| (date - Duration::days(1)).format(DATE_FORMAT).to_string())
                            .unwrap_or_else(|| DATES_END.to_string()),
                    }),
                };

                let mut stored = match row.as_object() {
                    Some(columns) => self.values.to_internal(columns),
                    None => Value::Object(Map::new()),
                };
                if let Value::Object(map) = &mut stored {
                    map.insert(criterion.db_key.to_string(), range);
                }
                stored
            })
            .collect();

        Value::Array(stored)
    }

    /// Convert stored rows back into wire rows.
    pub fn read(&self, stored: &Value) -> Value {
        let Some(rows) = stored.as_array() else {
            return Value::Array(Vec::new());
        };

        let wire = rows
            .iter()
            .filter_map(Value::as_object)
            .map(|row| {
                let mut record = ApiRecord::new();
                if let Some((criterion, range)) = row
                    .iter()
                    .find_map(|(k, v)| criterion_by_db_key(k).map(|c| (c, v)))
                {
                    let start = match criterion.kind {
                        CriteriaKind::Flat => Some(range.clone()),
                        CriteriaKind::Period => range.get("period").cloned(),
                        CriteriaKind::Rate => range.get("start").cloned(),
                        CriteriaKind::Dates => range.get("start_date").cloned(),
                    };
                    if let Some(start) = start {
                        record.insert(criterion.api_key.to_string(), start);
                    }
                }
                record.extend(self.values.to_api(&Value::Object(row.clone())));
                Value::Object(record)
            })
            .collect();

        Value::Array(wire)
    }
}

fn parse_start(criterion: &Criterion, raw: &Value, location: &str) -> Result<Value, ValidationErrors> {
    let key = criterion.api_key;
    if criterion.kind == CriteriaKind::Period {
        if let Some(months) = as_integer(raw).filter(|n| *n >= 1) {
            return Ok(Value::from(months));
        }
    }
    let valid = match criterion.kind {
        CriteriaKind::Flat => raw.as_str() == Some(FLAT_VALUE),
        CriteriaKind::Period => false,
        CriteriaKind::Rate => raw.as_f64().is_some_and(|n| n >= 0.0),
        CriteriaKind::Dates => raw.as_str().and_then(parse_date).is_some(),
    };
    if valid {
        return Ok(raw.clone());
    }
    let expected = match criterion.kind {
        CriteriaKind::Flat => format!("\"{FLAT_VALUE}\""),
        CriteriaKind::Period => "a positive integer number of months".to_string(),
        CriteriaKind::Rate => "a number greater than or equal to 0".to_string(),
        CriteriaKind::Dates => "a date in YYYY-MM-DD format".to_string(),
    };
    Err(ValidationError::invalid_type(format!("`{key}` must be {expected}"), location).into())
}

fn is_increasing(kind: CriteriaKind, previous: &Value, current: &Value) -> bool {
    match kind {
        CriteriaKind::Rate => match (previous.as_f64(), current.as_f64()) {
            (Some(a), Some(b)) => b > a,
            _ => true,
        },
        CriteriaKind::Dates => match (
            previous.as_str().and_then(parse_date),
            current.as_str().and_then(parse_date),
        ) {
            (Some(a), Some(b)) => b > a,
            _ => true,
        },
        _ => true,
    }
}

fn not_an_object(value: &Value, location: &str) -> ValidationErrors {
    ValidationError::at(
        ErrorKind::RequestStructure,
        format!("Expected an object, got {}", type_name(value)),
        location,
    )
    .into()
}
