//! # JSON page writer.
//!
//! Reference [`Renderer`] that skips templating entirely: each committed
//! page becomes one JSON document under the output root, carrying subtitle,
//! template name and data as-is. Published batches are staged in memory
//! until the runtime commits a changed tick.

use std::mem;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::Mutex;

use crate::collab::{CollabError, PageSpec, Renderer};

/// Stages page batches and writes them out on commit.
#[derive(Debug)]
pub struct JsonPages {
    root: PathBuf,
    staged: Mutex<Vec<PageSpec>>,
}

impl JsonPages {
    /// Creates a writer rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Renderer for JsonPages {
    async fn publish(&self, pages: Vec<PageSpec>) -> Result<(), CollabError> {
        self.staged.lock().await.extend(pages);
        Ok(())
    }

    async fn commit(&self) -> Result<(), CollabError> {
        let staged = mem::take(&mut *self.staged.lock().await);
        for page in staged {
            let path = self.root.join(&page.output_path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            let doc = json!({
                "subtitle": page.subtitle,
                "template": page.template,
                "data": page.data,
            });
            tokio::fs::write(&path, serde_json::to_vec_pretty(&doc)?).await?;
        }
        Ok(())
    }
}
