//! Minimal perfect hash over method names (hash-and-displace).

/// Salted hash shared with the emitted C runtime.
pub mod salt;
/// Hash parameters and slot evaluation.
pub mod indexer;
/// Bucket partition and displacement search.
pub mod builder;

pub use builder::{construct, Construction, MphConfig, MAX_BUCKET_FACTOR};
pub use indexer::{HashParams, MphIndexer};
pub use salt::{Salt, SALT_LEN};

#[cfg(test)]
mod tests {
    mod builder_tests;
    mod builder_property_tests;
}
