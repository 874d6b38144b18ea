//! ChainedHashMap: separate-chaining table over an entry arena.
//!
//! Buckets hold the arena handle of their chain head; each entry holds the
//! handle of its successor. Unlinking and relinking only rewrite handles,
//! so an entry is owned by exactly one chain at any time and never copied.

use crate::config::{
    ConfigError, TableConfig, DEFAULT_INITIAL_BUCKETS, DEFAULT_MAX_LOAD_FACTOR,
};
use crate::hash::{reduce, BucketHasher, Polynomial31};
use core::fmt;
use slotmap::{DefaultKey, SlotMap};

// Largest bucket array whose byte size still fits in `isize`.
const MAX_BUCKETS: usize = isize::MAX as usize / core::mem::size_of::<Option<DefaultKey>>();

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    // Cached so resizing never calls back into the hasher.
    hash: u64,
    next: Option<DefaultKey>,
}

/// Separate-chaining map from byte-sequence keys to values.
///
/// ```
/// use chained_hashmap::ChainedHashMap;
///
/// let mut m = ChainedHashMap::new();
/// m.set("a", 1000);
/// m.set("Q", 2);
/// m.set("b", 9999);
/// assert_eq!(m.get("Q"), Some(&2));
/// assert!(!m.has("z"));
///
/// // "a" and "Q" share bucket 1; the newer key heads the chain.
/// assert_eq!(m.keys(), vec![&"Q", &"a", &"b"]);
///
/// m.remove("a");
/// assert_eq!(m.get("a"), None);
/// assert_eq!(m.len(), 2);
/// ```
#[derive(Clone)]
pub struct ChainedHashMap<K, V, S = Polynomial31> {
    hasher: S,
    buckets: Vec<Option<DefaultKey>>,
    slots: SlotMap<DefaultKey, Entry<K, V>>, // every entry reachable from exactly one bucket
    max_load_factor: f64,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: AsRef<[u8]>,
{
    pub fn new() -> Self {
        Self::with_hasher(Polynomial31)
    }

    /// Empty map with `n` buckets (clamped to at least one).
    pub fn with_bucket_count(n: usize) -> Self {
        Self::build(Polynomial31, n.max(1), DEFAULT_MAX_LOAD_FACTOR)
    }

    pub fn with_config(config: TableConfig) -> Result<Self, ConfigError> {
        Self::with_config_and_hasher(config, Polynomial31)
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: AsRef<[u8]>,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over entries in bucket order, then chain order.
pub struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    buckets: core::slice::Iter<'a, Option<DefaultKey>>,
    cur: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(h) = self.cur {
                let slots: &'a SlotMap<DefaultKey, Entry<K, V>> = self.slots;
                let e = &slots[h];
                self.cur = e.next;
                self.remaining -= 1;
                return Some((&e.key, &e.value));
            }
            // Skip empty buckets until the next chain head.
            self.cur = *self.buckets.next()?;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

/// Iterator over mutable values. Order follows the arena, not the buckets.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]>,
    S: BucketHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::build(hasher, DEFAULT_INITIAL_BUCKETS, DEFAULT_MAX_LOAD_FACTOR)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(
            hasher,
            config.initial_buckets,
            config.max_load_factor,
        ))
    }

    fn build(hasher: S, bucket_count: usize, max_load_factor: f64) -> Self {
        debug_assert!(bucket_count > 0);
        Self {
            hasher,
            buckets: vec![None; bucket_count],
            slots: SlotMap::with_key(),
            max_load_factor,
        }
    }

    #[inline]
    fn make_hash(&self, key: &[u8]) -> u64 {
        self.hasher.hash_bytes(key)
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        reduce(hash, self.buckets.len())
    }

    fn find(&self, hash: u64, key: &[u8]) -> Option<DefaultKey> {
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(h) = cur {
            let e = &self.slots[h];
            if e.hash == hash && e.key.as_ref() == key {
                return Some(h);
            }
            cur = e.next;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.buckets.len() as f64
    }

    /// Insert or overwrite. Returns the replaced value when `key` was
    /// already present; in that case the chain is left untouched.
    ///
    /// A new key first grows the table until holding it stays under the
    /// maximum load factor.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(key.as_ref());
        if let Some(h) = self.find(hash, key.as_ref()) {
            return Some(core::mem::replace(&mut self.slots[h].value, value));
        }

        while self.reaches_load_limit(self.len() + 1) {
            if !self.resize(2.0) {
                break; // already at MAX_BUCKETS
            }
        }

        let idx = self.bucket_of(hash);
        let next = self.buckets[idx];
        let h = self.slots.insert(Entry {
            key,
            value,
            hash,
            next,
        });
        self.buckets[idx] = Some(h);
        None
    }

    #[inline]
    fn reaches_load_limit(&self, entries: usize) -> bool {
        entries as f64 >= self.max_load_factor * self.buckets.len() as f64
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let h = self.find(self.make_hash(key), key)?;
        Some(&self.slots[h].value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let h = self.find(self.make_hash(key), key)?;
        Some(&mut self.slots[h].value)
    }

    pub fn has<Q>(&self, key: &Q) -> bool
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        self.find(self.make_hash(key), key).is_some()
    }

    /// Unlink the entry for `key` and return its value. Absent keys are a
    /// no-op. Only the matching entry's chain is touched.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        Q: AsRef<[u8]> + ?Sized,
    {
        let key = key.as_ref();
        let hash = self.make_hash(key);
        let idx = self.bucket_of(hash);
        let head = self.buckets[idx]?;

        let matches = |e: &Entry<K, V>| e.hash == hash && e.key.as_ref() == key;

        if matches(&self.slots[head]) {
            self.buckets[idx] = self.slots[head].next;
            return self.slots.remove(head).map(|e| e.value);
        }

        // Find the entry whose successor matches, then splice the successor out.
        let mut prev = head;
        while let Some(cur) = self.slots[prev].next {
            if matches(&self.slots[cur]) {
                let after = self.slots[cur].next;
                self.slots[prev].next = after;
                return self.slots.remove(cur).map(|e| e.value);
            }
            prev = cur;
        }
        None
    }

    /// Drop every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        log::trace!(
            "clearing {} entries, keeping {} buckets",
            self.slots.len(),
            self.buckets.len()
        );
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.slots.clear();
    }

    /// Double the bucket array.
    pub fn expand(&mut self) {
        self.resize(2.0);
    }

    /// Halve the bucket array, never below one bucket. The next `set` of a
    /// new key grows it back if the load limit is reached.
    pub fn shrink(&mut self) {
        self.resize(0.5);
    }

    /// Rebuild the bucket array at `round(len * multiplier)` buckets,
    /// clamped to `[1, MAX_BUCKETS]`. Returns false when the count would not
    /// change.
    fn resize(&mut self, multiplier: f64) -> bool {
        let old_len = self.buckets.len();
        let new_len = target_bucket_count(old_len, multiplier);
        if new_len == old_len {
            return false;
        }
        let mut fresh: Vec<Option<DefaultKey>> = vec![None; new_len];

        // Moved entries are prepended, so entries that collide again end up
        // in reverse sweep order.
        for i in 0..old_len {
            let mut cur = self.buckets[i];
            while let Some(h) = cur {
                let e = &mut self.slots[h];
                cur = e.next;
                let idx = reduce(e.hash, new_len);
                e.next = fresh[idx];
                fresh[idx] = Some(h);
            }
        }

        self.buckets = fresh;
        log::debug!(
            "resized bucket array {} -> {} ({} entries)",
            old_len,
            new_len,
            self.slots.len()
        );
        true
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            buckets: self.buckets.iter(),
            cur: None,
            remaining: self.slots.len(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Snapshot of all entries: bucket index ascending, chain head first.
    pub fn entries(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    pub fn keys(&self) -> Vec<&K> {
        self.iter().map(|(k, _)| k).collect()
    }

    pub fn values(&self) -> Vec<&V> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Walks every chain and checks placement, uniqueness and that the
    /// arena holds nothing unreachable.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let n = self.buckets.len();
        assert!(n > 0, "bucket count must stay positive");
        let mut seen = std::collections::HashSet::new();
        let mut reachable = 0usize;
        for (i, head) in self.buckets.iter().enumerate() {
            let mut cur = *head;
            while let Some(h) = cur {
                let e = self.slots.get(h).expect("chain link points at a live entry");
                assert_eq!(e.hash, self.make_hash(e.key.as_ref()), "cached hash is stale");
                assert_eq!(reduce(e.hash, n), i, "entry sits in the wrong bucket");
                assert!(seen.insert(e.key.as_ref().to_vec()), "duplicate key in table");
                reachable += 1;
                cur = e.next;
            }
        }
        assert_eq!(reachable, self.slots.len(), "arena holds unreachable entries");
    }
}

fn target_bucket_count(len: usize, multiplier: f64) -> usize {
    let scaled = (len as f64 * multiplier).round();
    if scaled >= MAX_BUCKETS as f64 {
        MAX_BUCKETS
    } else {
        (scaled as usize).max(1)
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]>,
    S: BucketHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]>,
    S: BucketHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]>,
    S: BucketHasher,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: AsRef<[u8]> + fmt::Debug,
    V: fmt::Debug,
    S: BucketHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Clone, Default)]
    struct ConstHasher;
    impl BucketHasher for ConstHasher {
        fn hash_bytes(&self, _bytes: &[u8]) -> u64 {
            0 // every key shares one chain
        }
    }

    fn pairs<K: Clone, V: Clone>(m: &[(&K, &V)]) -> Vec<(K, V)> {
        m.iter().map(|(k, v)| ((*k).clone(), (*v).clone())).collect()
    }

    /// Invariant: a fresh map has 16 empty buckets and no entries.
    #[test]
    fn new_map_is_empty_with_sixteen_buckets() {
        let m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        assert_eq!(m.len(), 0);
        assert!(m.is_empty());
        assert_eq!(m.bucket_count(), 16);
        assert!(m.entries().is_empty());
        m.assert_invariants();
    }

    /// Invariant: re-setting a key overwrites in place; the length and the
    /// chain layout do not change.
    #[test]
    fn set_existing_key_overwrites_in_place() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        assert_eq!(m.set("y".to_string(), 1), None);
        m.set("Q".to_string(), 2);
        let before: Vec<String> = m.keys().into_iter().cloned().collect();

        assert_eq!(m.set("y".to_string(), 3), Some(1));
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("y"), Some(&3));
        let after: Vec<String> = m.keys().into_iter().cloned().collect();
        assert_eq!(before, after);
        m.assert_invariants();
    }

    /// Invariant: colliding keys are prepended, so the newest sits at the
    /// chain head and `entries` reports buckets in ascending order.
    #[test]
    fn entries_follow_bucket_then_chain_order() {
        let mut m: ChainedHashMap<&str, i32> = ChainedHashMap::new();
        m.set("a", 1000); // bucket 1
        m.set("Q", 2); // bucket 1, prepended
        m.set("b", 9999); // bucket 2
        assert_eq!(
            pairs(&m.entries()),
            vec![("Q", 2), ("a", 1000), ("b", 9999)]
        );
        assert_eq!(m.keys(), vec![&"Q", &"a", &"b"]);
        assert_eq!(m.values(), vec![&2, &1000, &9999]);
    }

    /// Invariant: removing the chain head promotes its successor.
    #[test]
    fn remove_head_of_chain() {
        let mut m: ChainedHashMap<&str, i32> = ChainedHashMap::new();
        m.set("a", 1);
        m.set("Q", 2);
        assert_eq!(m.remove("Q"), Some(2));
        assert_eq!(m.get("a"), Some(&1));
        assert!(!m.has("Q"));
        assert_eq!(m.len(), 1);
        m.assert_invariants();
    }

    /// Invariant: removing an interior entry splices exactly that entry out
    /// and keeps its neighbours in the chain.
    #[test]
    fn remove_middle_of_chain_splices_one_entry() {
        let mut m: ChainedHashMap<String, i32, ConstHasher> =
            ChainedHashMap::with_hasher(ConstHasher);
        for (i, k) in ["k1", "k2", "k3", "k4"].iter().enumerate() {
            m.set(k.to_string(), i as i32);
        }
        // Chain is k4 -> k3 -> k2 -> k1.
        assert_eq!(m.remove("k2"), Some(1));
        assert_eq!(
            pairs(&m.entries()),
            vec![
                ("k4".to_string(), 3),
                ("k3".to_string(), 2),
                ("k1".to_string(), 0)
            ]
        );
        assert_eq!(m.remove("k1"), Some(0));
        assert_eq!(m.len(), 2);
        m.assert_invariants();
    }

    /// Invariant: removing an absent key, or removing twice, is a silent
    /// no-op.
    #[test]
    fn remove_absent_is_noop() {
        let mut m: ChainedHashMap<String, i32, ConstHasher> =
            ChainedHashMap::with_hasher(ConstHasher);
        assert_eq!(m.remove("nothing"), None);
        m.set("a".to_string(), 1);
        m.set("b".to_string(), 2);
        assert_eq!(m.remove("zzz"), None);
        assert_eq!(m.remove("a"), Some(1));
        assert_eq!(m.remove("a"), None);
        assert!(!m.has("a"));
        assert_eq!(m.len(), 1);
        m.assert_invariants();
    }

    /// Invariant: a new key that would bring the load to 0.75 grows the
    /// table first, so the 12th insertion into 16 buckets doubles it.
    #[test]
    fn growth_happens_at_load_limit() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
        for i in 0..11 {
            m.set(format!("k{i}"), i);
        }
        assert_eq!(m.bucket_count(), 16);
        m.set("k11".to_string(), 11);
        assert_eq!(m.bucket_count(), 32);
        assert!(m.len() as f64 <= 0.75 * m.bucket_count() as f64);
        m.assert_invariants();
    }

    /// Invariant: overwriting an existing key never triggers a resize.
    #[test]
    fn overwrite_does_not_grow() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
        for i in 0..11 {
            m.set(format!("k{i}"), i);
        }
        for i in 0..11 {
            m.set(format!("k{i}"), i + 100);
        }
        assert_eq!(m.bucket_count(), 16);
        assert_eq!(m.get("k3"), Some(&103));
    }

    /// Invariant: manual expand/shrink keep every entry and re-establish
    /// bucket placement; shrink bottoms out at one bucket.
    #[test]
    fn expand_and_shrink_preserve_entries() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        for (i, k) in ["a", "Q", "b", "zz", ""].iter().enumerate() {
            m.set(k.to_string(), i as i32);
        }
        let before: BTreeSet<(String, i32)> = pairs(&m.entries()).into_iter().collect();

        m.expand();
        assert_eq!(m.bucket_count(), 32);
        m.assert_invariants();

        for _ in 0..10 {
            m.shrink();
            m.assert_invariants();
        }
        assert_eq!(m.bucket_count(), 1);

        let after: BTreeSet<(String, i32)> = pairs(&m.entries()).into_iter().collect();
        assert_eq!(before, after);

        // The next new key restores the load bound.
        m.set("new".to_string(), 9);
        assert!(m.len() as f64 <= 0.75 * m.bucket_count() as f64);
        m.assert_invariants();
    }

    /// Invariant: resize prepends moved entries, so two entries that share
    /// a chain before and after come out in reverse order.
    #[test]
    fn resize_reverses_surviving_collisions() {
        let mut m: ChainedHashMap<String, i32, ConstHasher> =
            ChainedHashMap::with_hasher(ConstHasher);
        m.set("first".to_string(), 1);
        m.set("second".to_string(), 2);
        assert_eq!(m.keys(), vec!["second", "first"]);
        m.expand();
        assert_eq!(m.keys(), vec!["first", "second"]);
    }

    /// Invariant: clear empties the table but keeps capacity, and the map
    /// is fully usable afterwards.
    #[test]
    fn clear_keeps_bucket_count() {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
        for i in 0..40 {
            m.set(format!("k{i}"), i);
        }
        let buckets = m.bucket_count();
        m.clear();
        assert_eq!(m.len(), 0);
        assert!(m.entries().is_empty());
        assert_eq!(m.bucket_count(), buckets);
        m.assert_invariants();

        m.set("again".to_string(), 1);
        assert_eq!(m.get("again"), Some(&1));
        assert_eq!(m.len(), 1);
        m.assert_invariants();
    }

    /// Invariant: the empty key is an ordinary key living in bucket 0.
    #[test]
    fn empty_key_is_valid() {
        let mut m: ChainedHashMap<Vec<u8>, i32> = ChainedHashMap::new();
        m.set(Vec::new(), 7);
        assert!(m.has(b""));
        assert_eq!(m.get(b""), Some(&7));
        assert_eq!(m.buckets[0].map(|h| m.slots[h].value), Some(7));
        assert_eq!(m.remove(b""), Some(7));
        assert!(m.is_empty());
    }

    /// Invariant: `get_mut` and `iter_mut` update values observed by later
    /// lookups.
    #[test]
    fn mutation_through_get_mut_and_iter_mut() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        m.set("x".to_string(), 1);
        m.set("y".to_string(), 2);
        *m.get_mut("x").unwrap() += 10;
        assert!(m.get_mut("missing").is_none());
        for (_k, v) in m.iter_mut() {
            *v *= 2;
        }
        assert_eq!(m.get("x"), Some(&22));
        assert_eq!(m.get("y"), Some(&4));
    }

    /// Invariant: lookups by `&str`, `String` and bytes agree because keys
    /// are compared as byte sequences.
    #[test]
    fn lookups_compare_bytes() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::new();
        m.set("hello".to_string(), 1);
        assert!(m.has("hello"));
        assert!(m.has(&"hello".to_string()));
        assert!(m.has(b"hello".as_slice()));
        assert!(!m.has("hell"));
    }

    #[test]
    fn with_config_respects_sizing() {
        let cfg = TableConfig::new().initial_buckets(4).max_load_factor(1.0);
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_config(cfg).unwrap();
        assert_eq!(m.bucket_count(), 4);
        for i in 0..3 {
            m.set(format!("{i}"), i);
        }
        assert_eq!(m.bucket_count(), 4);
        m.set("3".to_string(), 3);
        assert_eq!(m.bucket_count(), 8);

        let bad = TableConfig::new().initial_buckets(0);
        assert!(matches!(
            ChainedHashMap::<String, i32>::with_config(bad),
            Err(ConfigError::ZeroBuckets)
        ));
    }

    /// Invariant: the new bucket count is `round(len * multiplier)` with
    /// halves rounded up, so odd counts shrink to the larger half.
    #[test]
    fn shrink_rounds_odd_bucket_counts() {
        for (start, shrunk) in [(3usize, 2usize), (5, 3), (7, 4), (2, 1), (1, 1)] {
            let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_bucket_count(start);
            m.set("a".to_string(), 1);
            m.set("Q".to_string(), 2);
            let before = m.bucket_count();
            m.shrink();
            assert_eq!(
                m.bucket_count(),
                target_bucket_count(before, 0.5),
                "shrinking from {before}"
            );
            m.assert_invariants();
            assert_eq!(m.get("a"), Some(&1));
            assert_eq!(m.get("Q"), Some(&2));

            let mut empty: ChainedHashMap<String, i32> = ChainedHashMap::with_bucket_count(start);
            empty.shrink();
            assert_eq!(empty.bucket_count(), shrunk, "shrinking empty table from {start}");
            empty.assert_invariants();
        }
    }

    /// Invariant: target sizes never saturate past the largest allocatable
    /// array and never reach zero.
    #[test]
    fn target_bucket_count_is_clamped() {
        assert_eq!(target_bucket_count(3, 0.5), 2);
        assert_eq!(target_bucket_count(5, 0.5), 3);
        assert_eq!(target_bucket_count(16, 2.0), 32);
        assert_eq!(target_bucket_count(1, 0.5), 1);
        assert_eq!(target_bucket_count(MAX_BUCKETS, 2.0), MAX_BUCKETS);
        assert_eq!(target_bucket_count(usize::MAX, 2.0), MAX_BUCKETS);
    }

    /// Invariant: a configuration that validates never makes `set` demand
    /// an unbounded bucket array; the smallest factor grows to a modest size.
    #[test]
    fn smallest_valid_load_factor_grows_boundedly() {
        let tiny = TableConfig::new().max_load_factor(1e-30);
        assert!(matches!(
            ChainedHashMap::<String, i32>::with_config(tiny),
            Err(ConfigError::InvalidLoadFactor(_))
        ));

        let cfg = TableConfig::new().max_load_factor(crate::config::MIN_MAX_LOAD_FACTOR);
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_config(cfg).unwrap();
        m.set("a".to_string(), 1);
        assert_eq!(m.bucket_count(), 128);
        m.set("b".to_string(), 2);
        assert_eq!(m.bucket_count(), 256);
        assert_eq!(m.get("a"), Some(&1));
        m.assert_invariants();
    }

    #[test]
    fn with_bucket_count_clamps_to_one() {
        let mut m: ChainedHashMap<String, i32> = ChainedHashMap::with_bucket_count(0);
        assert_eq!(m.bucket_count(), 1);
        m.set("a".to_string(), 1);
        assert_eq!(m.bucket_count(), 2);
        m.assert_invariants();
    }

    #[test]
    fn collect_extend_and_debug() {
        let mut m: ChainedHashMap<&str, i32> = vec![("a", 1000), ("Q", 2)].into_iter().collect();
        m.extend([("b", 9999), ("a", 1)]);
        assert_eq!(m.len(), 3);
        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(format!("{:?}", m), r#"{"Q": 2, "a": 1, "b": 9999}"#);

        let seen: Vec<_> = (&m).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(seen, vec!["Q", "a", "b"]);
        assert_eq!(m.iter().len(), 3);
    }

    /// Invariant: a clone is an independent table with the same contents.
    #[test]
    fn clone_is_independent() {
        let mut a: ChainedHashMap<String, i32> = ChainedHashMap::new();
        a.set("k".to_string(), 1);
        let mut b = a.clone();
        b.set("k".to_string(), 2);
        b.set("other".to_string(), 3);
        assert_eq!(a.get("k"), Some(&1));
        assert_eq!(a.len(), 1);
        assert_eq!(b.get("k"), Some(&2));
        b.assert_invariants();
    }
}
