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

//! `${VAR}` and `${VAR:-default}` substitution in configuration text.
//!
//! ```
//! use econ_model_api::config::env_interpolation::interpolate;
//!
//! std::env::set_var("ECON_DOC_PORT", "9000");
//! let text = interpolate("port: ${ECON_DOC_PORT}\nhost: ${ECON_DOC_HOST:-127.0.0.1}").unwrap();
//! assert_eq!(text, "port: 9000\nhost: 127.0.0.1");
//! ```

use lazy_static::lazy_static;
use log::debug;
use regex::{Captures, Regex};
use std::env;

/// Upper bound on the size of the substituted text.
const MAX_INTERPOLATED_LENGTH: usize = 10_000_000;

lazy_static! {
    // 1: POSIX variable name, 3: default value after `:-`
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("Invalid regex pattern");
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("Environment variable '{name}' is not set and has no default value")]
    MissingVariable { name: String },

    #[error("Interpolated result exceeds maximum allowed length of {MAX_INTERPOLATED_LENGTH} bytes")]
    ResultTooLarge,
}

/// Resolve one reference. Unset and empty variables fall back to the default.
fn resolve(caps: &Captures<'_>) -> Result<String, InterpolationError> {
    let name = &caps[1];
    let default = caps.get(3).map(|m| m.as_str());

    match (env::var(name), default) {
        (Ok(value), _) if !value.is_empty() => Ok(value),
        (Err(env::VarError::NotUnicode(_)), _) => Err(InterpolationError::MissingVariable {
            name: format!("{name} (contains invalid Unicode)"),
        }),
        (_, Some(default)) => Ok(default.to_string()),
        (_, None) => Err(InterpolationError::MissingVariable {
            name: name.to_string(),
        }),
    }
}

/// Substitute every environment reference in `input`. No recursive expansion.
pub fn interpolate(input: &str) -> Result<String, InterpolationError> {
    let mut output = String::with_capacity(input.len());
    let mut cursor = 0;
    let mut names = Vec::new();

    for caps in ENV_VAR_PATTERN.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&input[cursor..whole.start()]);
        output.push_str(&resolve(&caps)?);
        cursor = whole.end();
        names.push(caps[1].to_string());

        if output.len() > MAX_INTERPOLATED_LENGTH {
            return Err(InterpolationError::ResultTooLarge);
        }
    }
    output.push_str(&input[cursor..]);

    if !names.is_empty() {
        // Names only; values may be secrets.
        debug!("Interpolated environment variables: {}", names.join(", "));
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_set_variables_are_substituted() {
        env::set_var("ECON_TEST_HOST", "api.local");
        env::set_var("ECON_TEST_PORT", "9090");
        let result = interpolate("url: http://${ECON_TEST_HOST}:${ECON_TEST_PORT}/v1").unwrap();
        assert_eq!(result, "url: http://api.local:9090/v1");
    }

    #[test]
    #[serial]
    fn test_defaults_apply_to_unset_and_empty() {
        env::remove_var("ECON_TEST_UNSET");
        env::set_var("ECON_TEST_EMPTY", "");
        let result = interpolate("a: ${ECON_TEST_UNSET:-200}\nb: ${ECON_TEST_EMPTY:-x}\nc: ${ECON_TEST_UNSET:-}").unwrap();
        assert_eq!(result, "a: 200\nb: x\nc: ");
    }

    #[test]
    #[serial]
    fn test_value_beats_default() {
        env::set_var("ECON_TEST_TAKE", "10");
        assert_eq!(interpolate("${ECON_TEST_TAKE:-25}").unwrap(), "10");
    }

    #[test]
    #[serial]
    fn test_missing_variable() {
        env::remove_var("ECON_TEST_REQUIRED");
        assert_eq!(
            interpolate("host: ${ECON_TEST_REQUIRED}"),
            Err(InterpolationError::MissingVariable {
                name: "ECON_TEST_REQUIRED".to_string()
            })
        );
    }

    #[test]
    fn test_text_without_valid_references_is_unchanged() {
        let input = "plain: text\nbad: ${NOT-A-NAME}\nsort: -name";
        assert_eq!(interpolate(input).unwrap(), input);
    }

    #[test]
    #[serial]
    fn test_result_size_is_capped() {
        env::set_var("ECON_TEST_HUGE", "x".repeat(MAX_INTERPOLATED_LENGTH + 1));
        assert_eq!(
            interpolate("${ECON_TEST_HUGE}"),
            Err(InterpolationError::ResultTooLarge)
        );
        env::remove_var("ECON_TEST_HUGE");
    }
}
