//! In-memory sink

use std::sync::Mutex;

use async_trait::async_trait;

use super::{EmitMode, PersistedArtifact, PersistenceSink, StorageError};

/// Keeps artifacts in persistence order
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<PersistedArtifact>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything persisted so far
    pub fn results(&self) -> Vec<PersistedArtifact> {
        match self.results.lock() {
            Ok(results) => results.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Text of the artifact called `name`
    pub fn text(&self, name: &str) -> Option<String> {
        self.results()
            .into_iter()
            .find(|artifact| artifact.name == name)
            .map(|artifact| artifact.text)
    }
}

#[async_trait(?Send)]
impl PersistenceSink for MemorySink {
    async fn persist(&self, name: &str, text: &str, mode: EmitMode) -> Result<(), StorageError> {
        let mut results = self
            .results
            .lock()
            .map_err(|e| StorageError::BackendError(format!("Memory sink poisoned: {}", e)))?;

        match results.iter_mut().find(|artifact| artifact.name == name) {
            Some(existing) => match mode {
                EmitMode::Append => existing.text.push_str(text),
                EmitMode::Replace => existing.text = text.to_string(),
            },
            None => results.push(PersistedArtifact {
                name: name.to_string(),
                text: text.to_string(),
            }),
        }
        Ok(())
    }
}
