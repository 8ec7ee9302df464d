//! # Per-task JSON persistence.
//!
//! Each task keeps one JSON document under the data directory; the runtime
//! never reads it and hands out a [`JsonStore`] via
//! [`Context::store`](crate::Context::store). Writes go through a sibling
//! temp file and a rename, so a crash mid-write leaves the previous document
//! intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TaskError;

/// Handle to one on-disk JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a handle for the given document path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the document.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<T, TaskError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Loads the document, or returns `T::default()` when it does not exist.
    pub async fn load_or_default<T>(&self) -> Result<T, TaskError>
    where
        T: DeserializeOwned + Default,
    {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(T::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Serializes and writes the document via temp file + rename.
    pub async fn save<T: Serialize>(&self, value: &T) -> Result<(), TaskError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Doc {
        ticks: u64,
        note: String,
    }

    #[tokio::test]
    async fn round_trips_a_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("status.json"));

        let doc = Doc {
            ticks: 41,
            note: "opening day".into(),
        };
        store.save(&doc).await.unwrap();

        let loaded: Doc = store.load().await.unwrap();
        assert_eq!(loaded, doc);
    }

    #[tokio::test]
    async fn missing_document_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/absent.json"));

        let loaded: Doc = store.load_or_default().await.unwrap();
        assert_eq!(loaded, Doc::default());
    }

    #[tokio::test]
    async fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("deep/inside/doc.json"));

        store.save(&Doc::default()).await.unwrap();
        let loaded: Doc = store.load().await.unwrap();
        assert_eq!(loaded, Doc::default());
    }
}
