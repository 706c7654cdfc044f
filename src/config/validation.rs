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

//! Semantic checks on a deserialized [`ServerConfig`]. Unknown keys are
//! already rejected by `deny_unknown_fields` during deserialization.

use super::types::ServerConfig;
use crate::fields::values::is_object_id;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace", "off"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("Invalid setting '{field}': {reason}")]
    InvalidSetting { field: String, reason: String },

    #[error("Multiple validation errors:\n{}", .0.join("\n"))]
    Multiple(Vec<String>),
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidSetting {
        field: field.to_string(),
        reason: reason.into(),
    }
}

impl ServerConfig {
    /// Check every setting and report all problems together.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let engine = &self.engine;
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push(invalid("port", "cannot be 0"));
        }
        if self.host.trim().is_empty() {
            errors.push(invalid("host", "cannot be empty"));
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(invalid(
                "logLevel",
                format!("'{}' is not one of {}", self.log_level, LOG_LEVELS.join(", ")),
            ));
        }
        if engine.read_record_limit == 0 {
            errors.push(invalid("engine.readRecordLimit", "must be positive"));
        }
        if engine.write_record_limit == 0 {
            errors.push(invalid("engine.writeRecordLimit", "must be positive"));
        }
        if engine.default_take == 0 || engine.default_take > engine.read_record_limit {
            errors.push(invalid(
                "engine.defaultTake",
                format!("must be between 1 and readRecordLimit ({})", engine.read_record_limit),
            ));
        }
        if engine.econ_function_attempts == 0 {
            errors.push(invalid("engine.econFunctionAttempts", "must be at least 1"));
        }
        for (index, seed) in self.references.iter().enumerate() {
            if !is_object_id(&seed.project) {
                errors.push(invalid(
                    &format!("references[{index}].project"),
                    format!("'{}' is not a valid project id", seed.project),
                ));
            }
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ConfigValidationError::Multiple(
                errors.iter().map(ToString::to_string).collect(),
            )),
        }
    }
}
