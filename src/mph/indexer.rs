//! Hash parameters and slot evaluation.

use serde::Serialize;

use super::salt::Salt;

/// Evaluate a perfect hash for a key - pure compile-time polymorphism, no dynamic dispatch.
pub trait MphIndexer: Send + Sync + Clone {
    /// Evaluate the hash function for a key, returning a slot index in `[0, slot_count())`.
    ///
    /// Distinct members of the build set get distinct slots. Any other input still
    /// lands on some slot, so callers must compare the stored key.
    fn eval(&self, key: &str) -> usize;

    /// Number of slots (equals the number of keys).
    fn slot_count(&self) -> usize;
}

/// Two salts plus the displacement array `G`.
///
/// `slot(k) = (h2(k) + G[h1(k) mod m]) mod n`. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashParams {
    /// Bucket hash salt
    pub salt1: Salt,
    /// Slot hash salt
    pub salt2: Salt,
    /// Displacement per bucket; length is the bucket count `m`
    pub displacements: Vec<u32>,
    /// Number of keys `n`
    pub key_count: usize,
    /// Seed the salts were drawn from
    pub seed: u64,
}

impl HashParams {
    /// Number of buckets `m`
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.displacements.len()
    }

    /// Bucket a key falls into
    #[inline]
    pub fn bucket(&self, key: &str) -> usize {
        (self.salt1.hash(key.as_bytes()) % self.bucket_count() as u64) as usize
    }
}

impl MphIndexer for HashParams {
    #[inline]
    fn eval(&self, key: &str) -> usize {
        let d = u64::from(self.displacements[self.bucket(key)]);
        let n = self.key_count as u64;
        let h2 = self.salt2.hash(key.as_bytes()) % n;
        ((h2 + d) % n) as usize
    }

    #[inline]
    fn slot_count(&self) -> usize {
        self.key_count
    }
}
