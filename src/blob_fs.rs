//! Filesystem-backed [`BlobStore`].
//!
//! Raw uploads land under a configured root directory, one file per blob
//! path, overwritten on re-ingestion. URLs use the `file://` scheme.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{CatalogError, CatalogResult};
use crate::store::{BlobStore, StoredBlob};

pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> CatalogResult<StoredBlob> {
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CatalogError::Blob(format!("create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&full, bytes)
            .await
            .map_err(|e| CatalogError::Blob(format!("write {}: {e}", full.display())))?;
        Ok(StoredBlob {
            url: format!("file://{}", full.display()),
        })
    }
}
