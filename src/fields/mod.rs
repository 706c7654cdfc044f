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

//! Declarative field mapping between the public API shape and the stored
//! document shape, with collect-all validation.

pub mod aggregator;
pub mod descriptor;
pub mod error;
pub mod rows;
pub mod table;
pub mod values;

pub use aggregator::{ErrorAggregator, IndexedErrors};
pub use descriptor::{Bounds, FieldDescriptor, FieldKind, FieldOptions, ParseContext};
pub use error::{child_location, index_location, ErrorKind, ValidationError, ValidationErrors};
pub use rows::{CriteriaKind, Criterion, RowsSpec, CRITERIA};
pub use table::{ApiRecord, FieldTable};
