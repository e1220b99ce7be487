//! In-memory storage backend
//!
//! Simple storage for testing and for driving the adapter from the CLI.

use super::{Resource, ResourceId, ResourceStore, Result, StoreError};
use async_trait::async_trait;
use cirrus_common::Context;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

/// In-memory storage backend
pub struct MemoryStore {
    resources: RwLock<HashMap<ResourceId, Resource>>,
}

impl MemoryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self {
            resources: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored resources
    pub fn len(&self) -> usize {
        self.resources.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn get(&self, ctx: &Context, id: &ResourceId) -> Result<Resource> {
        ctx.check()?;

        let guard = self
            .resources
            .read()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {}", e)))?;

        guard
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn create(&self, ctx: &Context, resource: Resource) -> Result<()> {
        ctx.check()?;

        let id = resource.id();
        let mut guard = self
            .resources
            .write()
            .map_err(|e| StoreError::Database(format!("lock poisoned: {}", e)))?;

        if guard.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }

        debug!(resource = %id, "creating resource");
        guard.insert(id, resource);
        Ok(())
    }
}
