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

//! Econ model REST API.
//!
//! A schema-driven field mapping and batch validation engine for econ-model
//! resources, served over HTTP:
//!
//! - [`fields`] maps wire records to stored documents and back, collecting
//!   every validation failure with its location
//! - [`batch`] validates and writes multi-record requests and reports one
//!   status per record
//! - [`query`] parses filters, sorting and offset or cursor pagination
//! - [`resources`] declares the econ-model field tables
//! - [`store`] defines the persistence and collaborator interfaces
//! - [`api`] and [`server`] expose it all through axum

pub mod api;
pub mod batch;
pub mod config;
pub mod fields;
pub mod query;
pub mod resources;
pub mod server;
pub mod store;

pub use api::ApiContext;
pub use config::{load_config_file, save_config_file, ServerConfig};
pub use server::{build_router, ApiServer};
