//! Filesystem-backed object store, served publicly by whatever fronts
//! `public_base` (nginx, CDN). Used by the StoreUpload acquisition mode.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use riposte_core::ObjectStore;
use uuid::Uuid;

pub struct FsStore {
    root: PathBuf,
    public_base: String,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn put(&self, data: Bytes, name: &str) -> Result<String> {
        let key = format!("images/{}-{}", Uuid::new_v4(), name);
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        tokio::fs::write(&path, &data)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        let path = self.root.join(key);
        let data = tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Bytes::from(data))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base.trim_end_matches('/'), key)
    }
}
