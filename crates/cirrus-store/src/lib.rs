//! Resource store contract
//!
//! The platform adapter consumes a shared, possibly multi-writer store
//! through two operations only:
//! - `get` - read a resource, failing with [`StoreError::NotFound`] if absent
//! - `create` - insert a resource, failing with [`StoreError::AlreadyExists`]
//!   if one with the same id is already present
//!
//! `create` is the only synchronization point between concurrent writers:
//! whoever inserts first wins, everybody else observes a conflict.
//!
//! Implementations:
//! - `MemoryStore` - in-process map, used by tests and the CLI

mod memory;
pub mod resource;

pub use memory::MemoryStore;
pub use resource::{meta, MetaKey, Resource, ResourceId, SystemInformation};

use async_trait::async_trait;
use cirrus_common::{Context, ContextError};
use thiserror::Error;

/// Errors from storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(ResourceId),

    #[error("already exists: {0}")]
    AlreadyExists(ResourceId),

    #[error(transparent)]
    Cancelled(#[from] ContextError),

    #[error("database error: {0}")]
    Database(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// The resource already existed on create
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::AlreadyExists(_))
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Get/create access to a resource store
///
/// Both operations must return promptly with [`StoreError::Cancelled`] once
/// `ctx` is done. The trait is object-safe and can be used as
/// `Arc<dyn ResourceStore>`.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Get a resource by id
    async fn get(&self, ctx: &Context, id: &ResourceId) -> Result<Resource>;

    /// Insert a resource if no resource with its id exists
    async fn create(&self, ctx: &Context, resource: Resource) -> Result<()>;
}

/// Read the meta key stored under `tag`
pub async fn get_meta_key<S>(store: &S, ctx: &Context, tag: u8) -> Result<MetaKey>
where
    S: ResourceStore + ?Sized,
{
    let id = MetaKey::resource_id(tag);
    match store.get(ctx, &id).await? {
        Resource::MetaKey(key) => Ok(key),
        other => Err(StoreError::InvalidData(format!(
            "{} holds a {} resource",
            id,
            other.kind()
        ))),
    }
}

/// Read the discovered system information
pub async fn get_system_information<S>(store: &S, ctx: &Context) -> Result<SystemInformation>
where
    S: ResourceStore + ?Sized,
{
    let id = SystemInformation::resource_id();
    match store.get(ctx, &id).await? {
        Resource::SystemInformation(info) => Ok(info),
        other => Err(StoreError::InvalidData(format!(
            "{} holds a {} resource",
            id,
            other.kind()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn test_store_get_create(store: Arc<dyn ResourceStore>) {
        let ctx = Context::background();

        let err = get_meta_key(store.as_ref(), &ctx, meta::UUID_OVERRIDE)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let key = MetaKey::new(meta::UUID_OVERRIDE, "00000000-0000-0000-0000-000000000042");
        store.create(&ctx, Resource::MetaKey(key.clone())).await.unwrap();

        let stored = get_meta_key(store.as_ref(), &ctx, meta::UUID_OVERRIDE)
            .await
            .unwrap();
        assert_eq!(stored, key);

        let err = store
            .create(&ctx, Resource::MetaKey(MetaKey::new(meta::UUID_OVERRIDE, "other")))
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let stored = get_meta_key(store.as_ref(), &ctx, meta::UUID_OVERRIDE)
            .await
            .unwrap();
        assert_eq!(stored.value, "00000000-0000-0000-0000-000000000042");
    }

    #[tokio::test]
    async fn test_memory_store_get_create() {
        let store: Arc<dyn ResourceStore> = Arc::new(MemoryStore::new());
        test_store_get_create(store).await;
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound(SystemInformation::resource_id());
        assert_eq!(
            err.to_string(),
            "not found: hardware/SystemInformation/systeminformation"
        );

        let err = StoreError::Cancelled(ContextError::DeadlineExceeded);
        assert_eq!(err.to_string(), "context deadline exceeded");
    }
}
