//! Object store seam.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store bytes under a new content key derived from `name`.
    async fn put(&self, data: Bytes, name: &str) -> Result<String>;

    async fn get(&self, key: &str) -> Result<Bytes>;

    /// Publicly resolvable URL for a stored key.
    fn public_url(&self, key: &str) -> String;
}

// ---------------------------------------------------------------------------
// MemoryStore (tests — no bucket required)
// ---------------------------------------------------------------------------

/// In-memory object store for testing. Thread-safe.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put(&self, data: Bytes, name: &str) -> Result<String> {
        let key = format!("images/{}-{}", Uuid::new_v4(), name);
        self.objects.lock().unwrap().insert(key.clone(), data);
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("no object stored under {key}"))
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://store/{key}")
    }
}
