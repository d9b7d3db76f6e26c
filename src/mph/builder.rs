//! Hash-and-displace construction.
//!
//! Keys are partitioned into `m` buckets by `h1`. Buckets are placed
//! largest-first: for each one, the smallest displacement `d` that moves every
//! member's `h2` onto a free, distinct slot is recorded in `G`. A bucket with no
//! valid `d` throws the whole attempt away and fresh salts are drawn.

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::indexer::HashParams;
use super::salt::Salt;
use crate::core::config::HashConfig;
use crate::core::error::ConstructionError;
use crate::{log_debug, log_info, log_trace};

/// Largest accepted `bucket_factor`
pub const MAX_BUCKET_FACTOR: f64 = 16.0;

/// Construction configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MphConfig {
    /// buckets per key, `1.0..=MAX_BUCKET_FACTOR`
    pub bucket_factor: f64,
    /// salt pairs tried after the first one fails
    pub max_restarts: usize,
    /// pinned salt seed; drawn from the thread RNG when `None`
    pub seed: Option<u64>,
}

impl Default for MphConfig {
    fn default() -> Self {
        Self { bucket_factor: 1.0, max_restarts: 1_000, seed: None }
    }
}

impl From<&HashConfig> for MphConfig {
    fn from(cfg: &HashConfig) -> Self {
        Self {
            bucket_factor: cfg.bucket_factor,
            max_restarts: cfg.max_restarts,
            seed: cfg.seed,
        }
    }
}

impl MphConfig {
    /// Bucket count for `n` keys; never below `n`.
    ///
    /// `None` when the factor is NaN, above [`MAX_BUCKET_FACTOR`], or the count
    /// does not fit in a `usize`.
    pub fn bucket_count(&self, n: usize) -> Option<usize> {
        if self.bucket_factor.is_nan() || self.bucket_factor > MAX_BUCKET_FACTOR {
            return None;
        }
        let m = ((n as f64) * self.bucket_factor.max(1.0)).ceil();
        if m >= usize::MAX as f64 {
            return None;
        }
        Some((m as usize).max(n))
    }
}

/// Result of a successful construction.
#[derive(Debug, Clone)]
pub struct Construction {
    /// Salts and displacements
    pub params: HashParams,
    /// `slots[i]` is the slot of the i-th input key
    pub slots: Vec<usize>,
    /// Salt pairs discarded before success
    pub restarts: usize,
}

/// Build a minimal perfect hash over `keys`.
///
/// Keys must be distinct; the caller guarantees this (see `KeySet`).
pub fn construct<S: AsRef<str>>(
    keys: &[S],
    config: &MphConfig,
) -> Result<Construction, ConstructionError> {
    if keys.is_empty() {
        return Err(ConstructionError::EmptyKeySet);
    }

    let n = keys.len();
    let m = config
        .bucket_count(n)
        .ok_or(ConstructionError::BucketCountOverflow { keys: n })?;
    let seed = match config.seed {
        Some(seed) => seed,
        None => {
            let seed = rand::rng().random::<u64>();
            log_info!("no seed pinned, drew seed {}", seed);
            seed
        }
    };
    let mut rng = StdRng::seed_from_u64(seed);
    let bytes: Vec<&[u8]> = keys.iter().map(|k| k.as_ref().as_bytes()).collect();

    for attempt in 0..=config.max_restarts {
        let salt1 = Salt::random(&mut rng);
        let salt2 = Salt::random(&mut rng);

        if let Some((displacements, slots)) = try_displace(&bytes, &salt1, &salt2, m) {
            log_debug!(
                "perfect hash over {} keys / {} buckets found after {} restarts",
                n, m, attempt
            );
            return Ok(Construction {
                params: HashParams { salt1, salt2, displacements, key_count: n, seed },
                slots,
                restarts: attempt,
            });
        }
        log_trace!("attempt {} failed, reseeding", attempt);
    }

    Err(ConstructionError::RetriesExhausted {
        keys: n,
        buckets: m,
        attempts: config.max_restarts + 1,
    })
}

/// One attempt with a fixed salt pair. Returns `(G, slots)` or `None` when some
/// bucket cannot be placed.
fn try_displace(
    keys: &[&[u8]],
    salt1: &Salt,
    salt2: &Salt,
    m: usize,
) -> Option<(Vec<u32>, Vec<usize>)> {
    let n = keys.len();

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); m];
    for (ix, key) in keys.iter().enumerate() {
        buckets[(salt1.hash(key) % m as u64) as usize].push(ix);
    }
    let h2: Vec<usize> = keys.iter().map(|k| (salt2.hash(k) % n as u64) as usize).collect();

    // largest first; stable sort keeps bucket index order among equals
    let mut order: Vec<usize> = (0..m).filter(|&b| !buckets[b].is_empty()).collect();
    order.sort_by(|&a, &b| buckets[b].len().cmp(&buckets[a].len()));

    let mut claimed = vec![false; n];
    let mut displacements = vec![0u32; m];
    let mut slots = vec![usize::MAX; n];
    let mut trial: Vec<usize> = Vec::new();

    for b in order {
        let members = &buckets[b];
        let d = (0..n).find(|&d| {
            trial.clear();
            for &ix in members {
                let s = (h2[ix] + d) % n;
                if claimed[s] || trial.contains(&s) {
                    return false;
                }
                trial.push(s);
            }
            true
        })?;

        for (&ix, &s) in members.iter().zip(trial.iter()) {
            claimed[s] = true;
            slots[ix] = s;
        }
        displacements[b] = d as u32;
    }

    Some((displacements, slots))
}
