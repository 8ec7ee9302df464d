//! # Render collaborator boundary.
//!
//! Tasks produce [`PageSpec`] batches from `setup`/`run`; the collaborator
//! consumes them. The runtime never inspects page contents — its only touch
//! point is [`Renderer::commit`], called after a tick in which some task's
//! data changed.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::collab::CollabError;

/// One page a task wants rendered.
#[derive(Debug, Clone)]
pub struct PageSpec {
    /// Output path, relative to the collaborator's root.
    pub output_path: PathBuf,
    /// Page subtitle.
    pub subtitle: String,
    /// Template name; meaning is collaborator-private.
    pub template: String,
    /// Opaque template data.
    pub data: Value,
}

impl PageSpec {
    /// Bundles the four fields of a page.
    pub fn new(
        output_path: impl Into<PathBuf>,
        subtitle: impl Into<String>,
        template: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            subtitle: subtitle.into(),
            template: template.into(),
            data,
        }
    }
}

/// Template renderer collaborator.
#[async_trait]
pub trait Renderer: Send + Sync + 'static {
    /// Accepts a batch of pages from a task. Tasks call this; the runtime
    /// does not look at the batch.
    async fn publish(&self, pages: Vec<PageSpec>) -> Result<(), CollabError>;

    /// Flushes staged output. Called by the poll worker after a changed
    /// tick; errors are logged by the runtime, never propagated.
    async fn commit(&self) -> Result<(), CollabError> {
        Ok(())
    }
}
