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

//! Batch write processing and multi-status reporting.

pub mod duplicates;
pub mod multi_status;
pub mod processor;

use crate::fields::ValidationErrors;

pub use duplicates::check_model_duplicates;
pub use multi_status::{merge_responses, with_counts, MultiStatusResponse, RecordStatus};
pub use processor::{BatchProcessor, PreparedBatch, PreparedRecord, WriteMode};

/// Failure of a whole batch request.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Rejected before any record was written.
    #[error(transparent)]
    Rejected(#[from] ValidationErrors),

    /// A collaborator failed; not a client error.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}
