//! chained-hashmap: a single-threaded, separate-chaining hash table over
//! byte-sequence keys, resized automatically by load factor.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a hash table built from first principles whose chains can be
//!   spliced and relinked without raw pointers or shared-mutable aliases.
//! - Layers:
//!   - `hash`: the polynomial-31 byte fold and the `BucketHasher` seam.
//!     The bucket index is always computed against an explicit target
//!     bucket count, so resizing can place entries into the new array.
//!   - `ChainedHashMap<K, V, S>`: buckets of singly linked chains. Entries
//!     live in a generational arena (`slotmap`) and link to each other by
//!     arena handle; a bucket stores the handle of its chain head.
//!   - `TableConfig`: initial bucket count and maximum load factor.
//!
//! Constraints
//! - Single-threaded; every mutation takes `&mut self`. Callers needing
//!   shared access wrap the whole map in a lock.
//! - Keys are any `K: AsRef<[u8]>` and are hashed and compared as bytes,
//!   so a `String`-keyed map is queried with `&str`.
//! - Keys are unique; `set` on a present key overwrites the value in place.
//! - Bucket count is never zero. Growth and shrink clamp at one bucket.
//!
//! Chain layout
//! - New keys are prepended to their chain. `entries()` walks buckets in
//!   ascending index order, each chain head first.
//! - `remove` unlinks exactly one entry: the head is replaced by its
//!   successor, or the predecessor is relinked past the match.
//! - Resize sweeps the old buckets in order and prepends every entry onto
//!   its new chain; entries are relinked, never copied.
//!
//! Load factor
//! - Before inserting a new key, `set` doubles the bucket array while
//!   `(len + 1) >= max_load_factor * bucket_count` (0.75 by default). After
//!   any insertion of a new key, `len <= max_load_factor * bucket_count`.
//! - Overwriting an existing key never resizes. `clear()` keeps the bucket
//!   count.
//!
//! Hasher and rehashing invariants
//! - Each entry stores its precomputed `u64` hash and resizing reduces the
//!   stored hash against the new bucket count; the hasher is never invoked
//!   after insertion.
//!
//! Notes and non-goals
//! - No iteration-order guarantee across buckets beyond the above.
//! - Not a cryptographic hash; hashing is deterministic across platforms.
//! - `serde` support is behind the `serde` feature.

mod chained_hash_map;
mod chained_hash_map_proptest;
pub mod config;
pub mod hash;
#[cfg(feature = "serde")]
mod ser;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, IterMut};
pub use config::{ConfigError, TableConfig};
pub use hash::{bucket_index, BucketHasher, Polynomial31};
