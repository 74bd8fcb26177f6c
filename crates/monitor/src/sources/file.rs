use std::path::{Path, PathBuf};

use wxguard_core::Batch;

use crate::traits::{DataSource, SourceError};

/// Reads a JSON array of records from disk on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl DataSource for JsonFileSource {
    async fn fetch(&self) -> Result<Batch, SourceError> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let batch = Batch::from_json(&json)?;
        tracing::debug!(path = %self.path.display(), records = batch.len(), "batch loaded");
        Ok(batch)
    }

    fn source_name(&self) -> &str {
        "json-file"
    }
}
