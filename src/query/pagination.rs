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

//! Offset and cursor pagination.
//!
//! A request is in offset mode when it carries `skip` and in cursor mode
//! otherwise; `skip` together with `cursor` is rejected. In both modes the
//! store is asked for `take + 1` rows so that `has_next` can be answered
//! without a count.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use super::params::QueryParams;
use crate::fields::values::get_path;
use crate::fields::{ErrorAggregator, ErrorKind, ValidationError, ValidationErrors};

pub const SKIP_PARAM: &str = "skip";
pub const TAKE_PARAM: &str = "take";
pub const CURSOR_PARAM: &str = "cursor";
pub const SORT_PARAM: &str = "sort";

#[derive(Debug, Clone, PartialEq)]
pub enum PageMode {
    Offset,
    /// Rows strictly after the decoded sort-key value, or from the start.
    Cursor(Option<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub skip: usize,
    pub take: usize,
    pub mode: PageMode,
}

impl PageRequest {
    /// Parse `skip`, `take` and (when `allow_cursor`) `cursor`.
    pub fn parse(
        params: &QueryParams,
        default_take: usize,
        limit: usize,
        allow_cursor: bool,
    ) -> Result<Self, ValidationErrors> {
        let mut aggregator = ErrorAggregator::new();

        let skip = params
            .get(SKIP_PARAM)
            .and_then(|raw| aggregator.catch(parse_count(SKIP_PARAM, raw)));
        let take = params
            .get(TAKE_PARAM)
            .and_then(|raw| aggregator.catch(parse_count(TAKE_PARAM, raw)))
            .unwrap_or(default_take);

        if take == 0 || take > limit {
            aggregator.push(ValidationError::at(
                ErrorKind::Validation,
                format!("`take` must be between 1 and {limit}"),
                TAKE_PARAM,
            ));
        }

        let cursor = if allow_cursor { params.get(CURSOR_PARAM) } else { None };
        if skip.is_some() && cursor.is_some() {
            aggregator.push(ValidationError::at(
                ErrorKind::Validation,
                "`skip` and `cursor` cannot be used together",
                CURSOR_PARAM,
            ));
        }

        let mode = match (skip, cursor) {
            (Some(_), _) => PageMode::Offset,
            (None, Some(raw)) => match aggregator.catch(decode_cursor(raw)) {
                Some(value) => PageMode::Cursor(Some(value)),
                None => PageMode::Offset,
            },
            (None, None) if allow_cursor => PageMode::Cursor(None),
            (None, None) => PageMode::Offset,
        };

        aggregator.finish(Self {
            skip: skip.unwrap_or(0),
            take,
            mode,
        })
    }

    /// Number of rows to fetch: one extra to detect a following page.
    pub fn fetch_limit(&self) -> usize {
        self.take + 1
    }

    /// Rows to skip at the store. Cursor mode never skips.
    pub fn store_skip(&self) -> usize {
        match self.mode {
            PageMode::Offset => self.skip,
            PageMode::Cursor(_) => 0,
        }
    }

    pub fn after(&self) -> Option<&Value> {
        match &self.mode {
            PageMode::Cursor(after) => after.as_ref(),
            PageMode::Offset => None,
        }
    }

    /// Trim the `take + 1` fetch to one page and describe it.
    pub fn into_page(self, mut rows: Vec<Value>, sort_path: &str, total: Option<u64>) -> (Vec<Value>, PageDescriptor) {
        let has_next = rows.len() > self.take;
        rows.truncate(self.take);

        let cursor = match self.mode {
            PageMode::Cursor(_) if has_next => rows
                .last()
                .and_then(|row| get_path(row, sort_path))
                .map(encode_cursor),
            _ => None,
        };

        let descriptor = PageDescriptor {
            skip: self.skip,
            take: self.take,
            total,
            has_next,
            cursor,
            offset: matches!(self.mode, PageMode::Offset),
        };
        (rows, descriptor)
    }
}

/// Position of one returned page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDescriptor {
    pub skip: usize,
    pub take: usize,
    pub total: Option<u64>,
    pub has_next: bool,
    /// Cursor of the next page, cursor mode only.
    pub cursor: Option<String>,
    pub offset: bool,
}

impl PageDescriptor {
    /// Descriptor for a count-only request.
    pub fn for_count(skip: usize, take: usize, total: u64) -> Self {
        Self {
            skip,
            take,
            total: Some(total),
            has_next: (skip as u64).saturating_add(take as u64) < total,
            cursor: None,
            offset: true,
        }
    }
}

fn parse_count(key: &str, raw: &str) -> Result<usize, ValidationErrors> {
    raw.parse::<usize>().map_err(|_| {
        ValidationError::invalid_type(
            format!("`{key}` must be a non-negative integer, got `{raw}`"),
            key,
        )
        .into()
    })
}

/// Base64 of the JSON encoding of a sort-key value.
pub fn encode_cursor(value: &Value) -> String {
    STANDARD.encode(value.to_string())
}

pub fn decode_cursor(raw: &str) -> Result<Value, ValidationErrors> {
    let invalid = || -> ValidationErrors {
        ValidationError::invalid_type(format!("`{raw}` is not a valid cursor"), CURSOR_PARAM).into()
    };
    let bytes = STANDARD.decode(raw).map_err(|_| invalid())?;
    serde_json::from_slice(&bytes).map_err(|_| invalid())
}
