//! Byte-sequence hashing and bucket selection.
//!
//! Keys are hashed as raw bytes with a polynomial fold
//! (`acc = acc * 31 + byte`, starting from 0) in wrapping `u64`
//! arithmetic, so the result is identical on every platform. The bucket
//! index is always computed against an explicit target bucket count, which
//! lets a resize place entries into an array other than the current one.

/// Hashes key bytes to a `u64`. The table reduces the result modulo its
/// bucket count; implementations only decide the spread.
pub trait BucketHasher: Clone + Default {
    fn hash_bytes(&self, bytes: &[u8]) -> u64;
}

/// The default hasher: left fold of `acc * 31 + byte` from 0.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Polynomial31;

impl BucketHasher for Polynomial31 {
    #[inline]
    fn hash_bytes(&self, bytes: &[u8]) -> u64 {
        polynomial31(bytes)
    }
}

/// Left fold of `acc * 31 + byte` over `bytes`, wrapping on overflow.
#[inline]
pub fn polynomial31(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &b| acc.wrapping_mul(31).wrapping_add(u64::from(b)))
}

/// Index of `key` in an array of `bucket_count` buckets using the default
/// hasher. `bucket_count` must be non-zero.
#[inline]
pub fn bucket_index(key: &[u8], bucket_count: usize) -> usize {
    reduce(polynomial31(key), bucket_count)
}

#[inline]
pub(crate) fn reduce(hash: u64, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0, "bucket array must never be empty");
    (hash % bucket_count as u64) as usize
}
