//! Salted character-product hash.
//!
//! `h(key, salt) = mix(sum(salt[i] * key[i]))` over the first `SALT_LEN` bytes.
//! The sum alone is linear, so two keys whose byte differences are all multiples
//! of `n` would share a slot under every salt; the finalizer breaks that.
//! Cheap enough to recompute in the emitted C.

use rand::Rng;
use serde::Serialize;

use crate::types::MAX_KEY_LEN;

/// Salt length in bytes; covers every byte of a valid key
pub const SALT_LEN: usize = MAX_KEY_LEN;

/// Fixed-size salt vector. Every byte is non-zero so each key byte contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Wrap raw salt bytes.
    ///
    /// Returns `None` if any byte is zero.
    pub fn from_bytes(bytes: [u8; SALT_LEN]) -> Option<Self> {
        if bytes.iter().any(|b| *b == 0) {
            return None;
        }
        Some(Self(bytes))
    }

    /// Draw a fresh salt from `rng`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SALT_LEN];
        for b in bytes.iter_mut() {
            *b = rng.random_range(1..=u8::MAX);
        }
        Self(bytes)
    }

    /// Raw salt bytes
    #[inline]
    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Hash `key` with this salt.
    #[inline]
    pub fn hash(&self, key: &[u8]) -> u64 {
        mix(self.weighted_sum(key))
    }

    /// Salt-weighted byte sum before finalization
    #[inline]
    pub fn weighted_sum(&self, key: &[u8]) -> u64 {
        key.iter()
            .zip(self.0.iter())
            .fold(0u64, |acc, (&k, &s)| acc.wrapping_add(u64::from(k) * u64::from(s)))
    }
}

/// SplitMix64 finalizer.
#[inline]
pub fn mix(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
