// Filesystem-backed asset store for event images

use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use base64::prelude::{Engine, BASE64_STANDARD};

use agenda_core::{AssetStore, EventError, Result};

/// Stores image blobs under a root directory, keyed by the destination path
/// the coordinator computes (`{year-of-first-occurrence}/{event-id}`)
#[derive(Debug, Clone)]
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn blob_exists(&self, path: &str) -> Result<bool> {
        let exists = tokio::fs::try_exists(self.root.join(path))
            .await
            .with_context(|| format!("checking asset {path}"))
            .map_err(EventError::Storage)?;
        Ok(exists)
    }

    async fn upload_from_base64(
        &self,
        filename: &str,
        destination: &str,
        data: &str,
    ) -> Result<()> {
        let binary = BASE64_STANDARD
            .decode(data)
            .map_err(|e| EventError::validation(format!("invalid base64 image data: {e}")))?;

        let target = self.root.join(destination);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating asset directory for {destination}"))
                .map_err(EventError::Storage)?;
        }
        tokio::fs::write(&target, &binary)
            .await
            .with_context(|| format!("writing asset {destination}"))
            .map_err(EventError::Storage)?;

        tracing::info!(
            filename,
            destination,
            bytes = binary.len(),
            "uploaded image asset"
        );
        Ok(())
    }
}
