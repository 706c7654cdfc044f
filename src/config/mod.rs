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

//! Server configuration.
//!
//! Files are YAML or JSON with camelCase keys. Environment references are
//! substituted before parsing:
//! - `${VAR_NAME}` - required variable
//! - `${VAR_NAME:-default}` - variable with a default
//!
//! ```yaml
//! host: ${ECON_HOST:-0.0.0.0}
//! port: ${ECON_PORT:-8080}
//! logLevel: info
//! engine:
//!   readRecordLimit: 200
//!   writeRecordLimit: 500
//!   defaultTake: 25
//!   errorOnExtraneousFields: true
//!   transactional: false
//!   econFunctionAttempts: 3
//! references:
//!   - project: 5e272d38b78910dd2a1bd691
//!     wells: [5e272d38b78910dd2a1bd692]
//!     scenarios: [5e272d38b78910dd2a1bd693]
//! ```

pub mod env_interpolation;
pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{from_json_str, from_yaml_str, load_config_file, save_config_file, ConfigError};
pub use types::{EngineSettings, ReferenceSeed, ServerConfig};
pub use validation::ConfigValidationError;
