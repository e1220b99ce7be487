//! Cirrus common types
//!
//! Shared vocabulary for the platform adapter crates: the network
//! configuration a platform hands to the node runtime, the enums and flags
//! it is expressed in, and the cancellable [`Context`] every blocking call
//! observes.

pub mod context;
pub mod error;
pub mod nethelpers;
pub mod network;

pub use context::{Context, ContextError};
pub use error::NetworkError;
pub use nethelpers::*;
pub use network::*;

pub type Result<T> = std::result::Result<T, NetworkError>;
