//! RPC Dispatch Gen - Perfect-hash dispatch tables for CBOR RPC servers
//!
//! Reads a method table, builds a minimal perfect hash over the method names
//! and emits the C lookup code and handler table an embedded CBOR RPC runtime
//! links against. Lookups on the device cost one hash and one string compare.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;
pub mod types;

// Generator stages
pub mod keyset;
pub mod mph;
pub mod dispatch;
pub mod emit;
pub mod generator;

// Re-export commonly used items for convenience
pub use core::{Config, Error, Result};
pub use dispatch::{DispatchEntry, DispatchTable};
pub use generator::{GenerationReport, Generator};
pub use keyset::{KeySet, RESERVED_METHODS};
pub use types::{MethodDescriptor, ParamType};

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
