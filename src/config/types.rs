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

use serde::{Deserialize, Serialize};

/// Top-level configuration of the econ model API server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub engine: EngineSettings,
    /// Wells and scenarios known to the in-memory reference checker.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<ReferenceSeed>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            engine: EngineSettings::default(),
            references: Vec::new(),
        }
    }
}

/// Limits and switches of the field mapping and batch engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EngineSettings {
    #[serde(default = "default_read_record_limit")]
    pub read_record_limit: usize,
    #[serde(default = "default_write_record_limit")]
    pub write_record_limit: usize,
    #[serde(default = "default_take")]
    pub default_take: usize,
    /// Strict mode: unknown and read-only fields are errors instead of being ignored.
    #[serde(default = "default_true")]
    pub error_on_extraneous_fields: bool,
    /// Abort a whole batch when any record fails.
    #[serde(default)]
    pub transactional: bool,
    #[serde(default = "default_econ_function_attempts")]
    pub econ_function_attempts: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            read_record_limit: default_read_record_limit(),
            write_record_limit: default_write_record_limit(),
            default_take: default_take(),
            error_on_extraneous_fields: true,
            transactional: false,
            econ_function_attempts: default_econ_function_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ReferenceSeed {
    pub project: String,
    #[serde(default)]
    pub wells: Vec<String>,
    #[serde(default)]
    pub scenarios: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_read_record_limit() -> usize {
    200
}

fn default_write_record_limit() -> usize {
    500
}

fn default_take() -> usize {
    25
}

fn default_true() -> bool {
    true
}

fn default_econ_function_attempts() -> u32 {
    3
}
