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

//! Read-path query handling: filters, sort, pagination and `Link` headers.

pub mod filter;
pub mod links;
pub mod pagination;
pub mod params;
pub mod sort;

pub use filter::{parse_filters, Filter, FilterClause};
pub use links::link_header;
pub use pagination::{PageDescriptor, PageMode, PageRequest};
pub use params::QueryParams;
pub use sort::{SortDirection, SortSpec};
