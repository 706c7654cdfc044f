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

//! Loading and saving of [`ServerConfig`] files.

use super::env_interpolation::{self, InterpolationError};
use super::types::ServerConfig;
use super::validation::ConfigValidationError;
use log::debug;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] InterpolationError),

    #[error("Failed to parse config file '{path}': YAML error: {yaml_err}, JSON error: {json_err}")]
    ParseError {
        path: String,
        yaml_err: String,
        json_err: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(#[from] ConfigValidationError),
}

/// Deserialize YAML after environment interpolation.
pub fn from_yaml_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_yaml::from_str(&env_interpolation::interpolate(s)?)?)
}

/// Deserialize JSON after environment interpolation.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(&env_interpolation::interpolate(s)?)?)
}

/// Read, interpolate, parse (YAML, then JSON) and validate a config file.
///
/// A `.env` file next to the config file is loaded first so that its
/// variables are visible to interpolation. Variables already set in the
/// process environment win.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<ServerConfig, ConfigError> {
    let path = path.as_ref();
    load_dotenv_beside(path);

    let content = fs::read_to_string(path)?;
    let interpolated = env_interpolation::interpolate(&content)?;

    let config = serde_yaml::from_str::<ServerConfig>(&interpolated).or_else(|yaml_err| {
        serde_json::from_str::<ServerConfig>(&interpolated).map_err(|json_err| ConfigError::ParseError {
            path: path.display().to_string(),
            yaml_err: yaml_err.to_string(),
            json_err: json_err.to_string(),
        })
    })?;

    config.validate()?;
    Ok(config)
}

fn load_dotenv_beside(config_path: &Path) {
    let Some(dir) = config_path.parent() else {
        return;
    };
    let env_file = dir.join(".env");
    if env_file.is_file() {
        match dotenvy::from_path(&env_file) {
            Ok(()) => debug!("Loaded environment from {}", env_file.display()),
            Err(e) => debug!("Ignoring {}: {e}", env_file.display()),
        }
    }
}

/// Write `config` as YAML. Interpolated values are written, not the `${...}` references.
pub fn save_config_file<P: AsRef<Path>>(config: &ServerConfig, path: P) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(config)?;
    Ok(fs::write(path, content)?)
}
