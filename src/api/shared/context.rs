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

//! State shared by every econ-model handler.

use std::sync::Arc;

use crate::batch::BatchProcessor;
use crate::config::{EngineSettings, ServerConfig};
use crate::resources::Resource;
use crate::store::{
    EconFunctionConverter, LoggingConverter, MemoryModelStore, MemoryReferenceChecker, ModelStore,
    ReferenceChecker,
};

/// Engine settings and collaborators, injected into the router as an `Extension`.
#[derive(Clone)]
pub struct ApiContext {
    pub settings: Arc<EngineSettings>,
    pub store: Arc<dyn ModelStore>,
    pub references: Arc<dyn ReferenceChecker>,
    pub converter: Arc<dyn EconFunctionConverter>,
}

impl ApiContext {
    pub fn new(
        settings: EngineSettings,
        store: Arc<dyn ModelStore>,
        references: Arc<dyn ReferenceChecker>,
        converter: Arc<dyn EconFunctionConverter>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            store,
            references,
            converter,
        }
    }

    /// In-memory collaborators, with wells and scenarios seeded from `config.references`.
    pub fn in_memory(config: &ServerConfig) -> Self {
        let references = config
            .references
            .iter()
            .fold(MemoryReferenceChecker::new(), |checker, seed| {
                checker.with_project(
                    seed.project.clone(),
                    seed.wells.iter().cloned(),
                    seed.scenarios.iter().cloned(),
                )
            });
        Self::new(
            config.engine.clone(),
            Arc::new(MemoryModelStore::new()),
            Arc::new(references),
            Arc::new(LoggingConverter::new()),
        )
    }

    pub fn processor<'a>(&'a self, resource: &'a Resource) -> BatchProcessor<'a> {
        BatchProcessor {
            resource,
            settings: self.settings.as_ref(),
            store: self.store.as_ref(),
            references: self.references.as_ref(),
            converter: self.converter.as_ref(),
        }
    }
}
