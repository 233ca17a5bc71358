//! Content fingerprinting for compile memoization.
//!
//! Uses `rustc_hash::FxHasher`: fast, deterministic within a process, and
//! already the hasher behind the crate's `FxHashMap` state.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute a 64-bit hash over a sequence of byte chunks.
#[inline]
pub fn compute<'a, I>(chunks: I) -> u64
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut hasher = FxHasher::default();
    for chunk in chunks {
        hasher.write(chunk);
    }
    hasher.finish()
}

/// Compute a hash and return it as an 8-char hex fingerprint.
#[inline]
pub fn fingerprint<'a, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'a [u8]>,
{
    format!("{:016x}", compute(chunks))[..8].to_string()
}
