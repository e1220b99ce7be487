//! SMBIOS UUID override reconciliation
//!
//! Some hypervisor templates report an empty or all-zero SMBIOS UUID, so
//! every instance built from them shares one machine identity. When that
//! happens the adapter writes a UUID override derived from the Linode id:
//!
//! ```text
//! 00000000-0000-0000-0000-{linode id, zero padded to 12 digits}
//! ```
//!
//! The override is write-once. An override that already holds a value is
//! never touched, and concurrent reconcilers settle on whichever value the
//! store accepted first.

use crate::error::UuidError;
use cirrus_common::Context;
use cirrus_store::{get_meta_key, get_system_information, meta, MetaKey, ResourceStore};
use tracing::{debug, info, warn};

/// The all-zero UUID reported by affected templates
pub const ZERO_UUID: &str = "00000000-0000-0000-0000-000000000000";

const LINODE_UUID_PREFIX: &str = "00000000-0000-0000-0000-";

/// Stands in for the hardware UUID in errors when system information has
/// not been discovered yet
const UNAVAILABLE_UUID: &str = "not-available-yet";

/// Whether an SMBIOS UUID needs replacing
///
/// Only the empty string and [`ZERO_UUID`] are invalid; anything else is
/// accepted as-is.
pub fn is_invalid_uuid(uuid: &str) -> bool {
    uuid.is_empty() || uuid == ZERO_UUID
}

/// Deterministic UUID for a Linode id
pub fn generate_linode_uuid(linode_id: i64) -> String {
    format!("{}{:012}", LINODE_UUID_PREFIX, linode_id)
}

/// Create a UUID override if the hardware UUID is missing or invalid
///
/// Idempotent and safe to run on every boot:
/// - an override with a non-empty value ends reconciliation
/// - system information that is not discovered yet counts as invalid
/// - a non-positive `linode_id` never produces an override
/// - losing the create race to another writer is not an error
pub async fn ensure_valid_uuid<S>(store: &S, ctx: &Context, linode_id: i64) -> Result<(), UuidError>
where
    S: ResourceStore + ?Sized,
{
    match get_meta_key(store, ctx, meta::UUID_OVERRIDE).await {
        Ok(key) if !key.value.is_empty() => {
            debug!(uuid = %key.value, "UUID override already set");
            return Ok(());
        }
        Ok(_) => {}
        Err(e) if e.is_not_found() => {}
        Err(e) => return Err(UuidError::ReadOverride(e)),
    }

    let current = match get_system_information(store, ctx).await {
        Ok(info) => Some(info.uuid),
        // Early boot: SMBIOS has not been read yet
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(UuidError::SystemInformation(e)),
    };

    let observed = match &current {
        Some(uuid) if !is_invalid_uuid(uuid) => return Ok(()),
        Some(uuid) => uuid.as_str(),
        None => UNAVAILABLE_UUID,
    };

    if linode_id <= 0 {
        warn!(linode_id, smbios_uuid = %observed, "invalid SMBIOS UUID but no usable Linode id, skipping override");
        return Ok(());
    }

    let generated = generate_linode_uuid(linode_id);
    let override_key = MetaKey::new(meta::UUID_OVERRIDE, generated.clone());

    match store.create(ctx, override_key.into()).await {
        Ok(()) => {
            info!(linode_id, smbios_uuid = %observed, uuid = %generated, "created UUID override");
            Ok(())
        }
        Err(e) if e.is_conflict() => {
            debug!(linode_id, "UUID override created concurrently");
            Ok(())
        }
        Err(source) => Err(UuidError::CreateOverride {
            uuid: observed.to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cirrus_common::ContextError;
    use cirrus_store::{
        MemoryStore, Resource, ResourceId, StoreError, SystemInformation,
    };
    use proptest::prelude::*;
    use std::sync::Arc;

    async fn override_value(store: &MemoryStore) -> Option<String> {
        match get_meta_key(store, &Context::background(), meta::UUID_OVERRIDE).await {
            Ok(key) => Some(key.value),
            Err(e) if e.is_not_found() => None,
            Err(e) => panic!("unexpected store error: {e}"),
        }
    }

    async fn store_with_uuid(uuid: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create(&Context::background(), SystemInformation::new(uuid).into())
            .await
            .unwrap();
        store
    }

    /// Wraps a memory store and fails selected operations
    struct FaultyStore {
        inner: MemoryStore,
        fail_get: Option<ResourceId>,
        fail_create: bool,
    }

    #[async_trait]
    impl ResourceStore for FaultyStore {
        async fn get(&self, ctx: &Context, id: &ResourceId) -> cirrus_store::Result<Resource> {
            if self.fail_get.as_ref() == Some(id) {
                return Err(StoreError::Database("read failed".to_string()));
            }
            self.inner.get(ctx, id).await
        }

        async fn create(&self, ctx: &Context, resource: Resource) -> cirrus_store::Result<()> {
            if self.fail_create {
                return Err(StoreError::Database("write failed".to_string()));
            }
            self.inner.create(ctx, resource).await
        }
    }

    #[test]
    fn test_generate_linode_uuid() {
        let cases = [
            (123, "00000000-0000-0000-0000-000000000123"),
            (79475478, "00000000-0000-0000-0000-000079475478"),
            (999999999999, "00000000-0000-0000-0000-999999999999"),
            (1, "00000000-0000-0000-0000-000000000001"),
        ];

        for (linode_id, expected) in cases {
            assert_eq!(generate_linode_uuid(linode_id), expected, "linode id {linode_id}");
        }
    }

    #[test]
    fn test_is_invalid_uuid() {
        let cases = [
            ("", true),
            ("00000000-0000-0000-0000-000000000000", true),
            ("550e8400-e29b-41d4-a716-446655440000", false),
            ("00000000-0000-0000-0000-000079475478", false),
            ("6ba7b810-9dad-11d1-80b4-00c04fd430c8", false),
        ];

        for (uuid, expected) in cases {
            assert_eq!(is_invalid_uuid(uuid), expected, "uuid {uuid:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_generated_uuid_shape(linode_id in 0i64..1_000_000_000_000) {
            let uuid = generate_linode_uuid(linode_id);
            let bytes = uuid.as_bytes();

            prop_assert_eq!(uuid.len(), 36);
            for offset in [8, 13, 18, 23] {
                prop_assert_eq!(bytes[offset], b'-');
            }
            prop_assert_eq!(&uuid[24..], format!("{:012}", linode_id));
            prop_assert!(!is_invalid_uuid(&uuid) || linode_id == 0);
        }
    }

    #[tokio::test]
    async fn test_valid_uuid_needs_no_override() {
        let store = store_with_uuid("550e8400-e29b-41d4-a716-446655440000").await;

        ensure_valid_uuid(&store, &Context::background(), 79475478)
            .await
            .unwrap();

        assert_eq!(override_value(&store).await, None);
    }

    #[tokio::test]
    async fn test_zero_uuid_gets_override() {
        let store = store_with_uuid(ZERO_UUID).await;

        ensure_valid_uuid(&store, &Context::background(), 79475478)
            .await
            .unwrap();

        assert_eq!(
            override_value(&store).await.as_deref(),
            Some("00000000-0000-0000-0000-000079475478")
        );
    }

    #[tokio::test]
    async fn test_empty_uuid_gets_override() {
        let store = store_with_uuid("").await;

        ensure_valid_uuid(&store, &Context::background(), 1000)
            .await
            .unwrap();

        assert_eq!(
            override_value(&store).await.as_deref(),
            Some("00000000-0000-0000-0000-000000001000")
        );
    }

    #[tokio::test]
    async fn test_missing_system_information_gets_override() {
        let store = MemoryStore::new();

        ensure_valid_uuid(&store, &Context::background(), 12345)
            .await
            .unwrap();

        assert_eq!(
            override_value(&store).await.as_deref(),
            Some("00000000-0000-0000-0000-000000012345")
        );
    }

    #[tokio::test]
    async fn test_existing_override_not_modified() {
        let store = store_with_uuid(ZERO_UUID).await;
        store
            .create(
                &Context::background(),
                MetaKey::new(meta::UUID_OVERRIDE, "existing-uuid-should-not-change").into(),
            )
            .await
            .unwrap();

        ensure_valid_uuid(&store, &Context::background(), 79475478)
            .await
            .unwrap();

        assert_eq!(
            override_value(&store).await.as_deref(),
            Some("existing-uuid-should-not-change")
        );
    }

    #[tokio::test]
    async fn test_idempotent() {
        let store = store_with_uuid(ZERO_UUID).await;
        let ctx = Context::background();

        ensure_valid_uuid(&store, &ctx, 79475478).await.unwrap();
        let first = override_value(&store).await;

        ensure_valid_uuid(&store, &ctx, 79475478).await.unwrap();
        ensure_valid_uuid(&store, &ctx, 42).await.unwrap();

        assert_eq!(override_value(&store).await, first);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_non_positive_linode_id_never_overrides() {
        for linode_id in [0, -1] {
            let store = store_with_uuid(ZERO_UUID).await;
            ensure_valid_uuid(&store, &Context::background(), linode_id)
                .await
                .unwrap();
            assert_eq!(override_value(&store).await, None);

            let store = MemoryStore::new();
            ensure_valid_uuid(&store, &Context::background(), linode_id)
                .await
                .unwrap();
            assert_eq!(override_value(&store).await, None);
        }
    }

    #[tokio::test]
    async fn test_empty_override_conflict_is_tolerated() {
        // An empty override does not count as set, but still occupies the key
        let store = store_with_uuid(ZERO_UUID).await;
        store
            .create(&Context::background(), MetaKey::new(meta::UUID_OVERRIDE, "").into())
            .await
            .unwrap();

        ensure_valid_uuid(&store, &Context::background(), 79475478)
            .await
            .unwrap();

        assert_eq!(override_value(&store).await.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_concurrent_reconcilers_converge() {
        let store = Arc::new(MemoryStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    ensure_valid_uuid(store.as_ref(), &Context::background(), 79475478).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(
            override_value(&store).await.as_deref(),
            Some("00000000-0000-0000-0000-000079475478")
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_system_information_read_failure_propagates() {
        let store = FaultyStore {
            inner: MemoryStore::new(),
            fail_get: Some(SystemInformation::resource_id()),
            fail_create: false,
        };

        let err = ensure_valid_uuid(&store, &Context::background(), 12345)
            .await
            .unwrap_err();
        assert!(matches!(err, UuidError::SystemInformation(StoreError::Database(_))));
        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn test_override_read_failure_propagates() {
        let store = FaultyStore {
            inner: MemoryStore::new(),
            fail_get: Some(MetaKey::resource_id(meta::UUID_OVERRIDE)),
            fail_create: false,
        };

        let err = ensure_valid_uuid(&store, &Context::background(), 12345)
            .await
            .unwrap_err();
        assert!(matches!(err, UuidError::ReadOverride(_)));
    }

    #[tokio::test]
    async fn test_create_failure_carries_observed_uuid() {
        let store = FaultyStore {
            inner: store_with_uuid(ZERO_UUID).await,
            fail_get: None,
            fail_create: true,
        };

        let err = ensure_valid_uuid(&store, &Context::background(), 12345)
            .await
            .unwrap_err();
        match err {
            UuidError::CreateOverride { uuid, source } => {
                assert_eq!(uuid, ZERO_UUID);
                assert!(matches!(source, StoreError::Database(_)));
            }
            other => panic!("unexpected error: {other}"),
        }

        let store = FaultyStore {
            inner: MemoryStore::new(),
            fail_get: None,
            fail_create: true,
        };
        let err = ensure_valid_uuid(&store, &Context::background(), 12345)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("\"not-available-yet\""));
    }

    #[tokio::test]
    async fn test_cancelled_context_is_fatal() {
        let store = MemoryStore::new();
        let (_tx, rx) = tokio::sync::watch::channel(true);

        let err = ensure_valid_uuid(&store, &Context::new(rx), 12345)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            UuidError::ReadOverride(StoreError::Cancelled(ContextError::Cancelled))
        ));
        assert!(store.is_empty());
    }
}
