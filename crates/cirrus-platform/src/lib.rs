//! Cirrus Akamai platform adapter
//!
//! Turns the Akamai (Linode) metadata service into network configuration
//! for a booting node, and repairs the node's machine identity when the
//! hypervisor reports a degenerate SMBIOS UUID.
//!
//! # Network configuration cycle
//!
//! ```text
//! wait for network ──▶ get instance ──▶ ensure valid UUID
//!                                              │
//!        consumer ◀── send (1 slot) ◀── parse metadata ◀── get network
//! ```
//!
//! Each step observes the caller's [`Context`](cirrus_common::Context); the
//! first failure or cancellation aborts the cycle and nothing is sent.
//!
//! # Example
//!
//! ```ignore
//! use cirrus_platform::{Akamai, Platform};
//! use std::sync::Arc;
//!
//! let platform = Akamai::new(Arc::new(metadata_client), Arc::new(store));
//! let (tx, mut rx) = tokio::sync::mpsc::channel(1);
//!
//! platform.network_configuration(&ctx, &tx).await?;
//! let config = rx.recv().await;
//! ```

pub mod akamai;
pub mod error;
pub mod platform;
pub mod readiness;
pub mod translate;
pub mod uuid;

pub use akamai::Akamai;
pub use error::{PlatformError, Result, TranslateError, UuidError};
pub use platform::Platform;
pub use readiness::{AlwaysReady, NetworkReadiness};
pub use translate::parse_metadata;
pub use uuid::{ensure_valid_uuid, generate_linode_uuid, is_invalid_uuid};
