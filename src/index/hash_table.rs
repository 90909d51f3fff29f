//! Fixed-size separate-chaining hash map.
//!
//! ## Layout
//!
//! ```text
//! buckets[0]  -> [(k, v), (k, v)]
//! buckets[1]  -> []
//! ...
//! buckets[n-1]-> [(k, v)]
//! ```
//!
//! An entry lives in bucket `hash(key) % bucket_count`. Keys are unique
//! within a bucket, and therefore within the map. The bucket count is fixed
//! at construction and never grows; long chains degrade lookups to
//! O(chain length).
//!
//! The default hasher is [`DefaultHasher`] with fixed keys, so enumeration
//! order (bucket-major, then chain order) is the same on every run. The
//! store relies on that to rewrite its files in a stable order.

use std::borrow::Borrow;
use std::collections::hash_map::DefaultHasher;
use std::hash::{BuildHasher, BuildHasherDefault, Hash};

/// Bucket count used by [`ChainedHashMap::new`]
pub const DEFAULT_BUCKET_COUNT: usize = 100;

/// Deterministic hasher used when none is given
pub type FixedState = BuildHasherDefault<DefaultHasher>;

/// A hash map with a fixed number of chained buckets.
///
/// # Example
///
/// ```
/// use famin_store::index::ChainedHashMap;
///
/// let mut sales: ChainedHashMap<String, u32> = ChainedHashMap::new();
/// assert!(sales.is_empty());
///
/// sales.insert("03-2025".to_string(), 1500);
/// sales.insert("03-2025".to_string(), 3000);
///
/// assert_eq!(sales.find("03-2025"), Some(&3000));
/// assert_eq!(sales.len(), 1);
/// assert!(sales.remove("03-2025"));
/// assert!(sales.find("03-2025").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ChainedHashMap<K, V, S = FixedState> {
    buckets: Vec<Vec<(K, V)>>,
    len: usize,
    hash_builder: S,
}

impl<K: Hash + Eq, V> Default for ChainedHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> ChainedHashMap<K, V> {
    /// Create a map with [`DEFAULT_BUCKET_COUNT`] buckets
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT)
    }

    /// Create a map with `bucket_count` buckets (at least one)
    pub fn with_buckets(bucket_count: usize) -> Self {
        Self::with_buckets_and_hasher(bucket_count, FixedState::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ChainedHashMap<K, V, S> {
    /// Create a map with a caller-supplied hasher
    pub fn with_buckets_and_hasher(bucket_count: usize, hash_builder: S) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, Vec::new);

        Self {
            buckets,
            len: 0,
            hash_builder,
        }
    }

    // ========================================================================
    // Size
    // ========================================================================

    /// Number of entries
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the map holds no entries.
    ///
    /// This counts entries, not buckets: a freshly built map with 100
    /// buckets is empty, and stops being empty after one insert. Use
    /// [`Self::bucket_count`] for the structural size.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets, fixed for the life of the map
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Insert or overwrite.
    ///
    /// # Returns
    ///
    /// The previous value when `key` was already present
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let bucket = &mut self.buckets[index];

        if let Some((_, slot)) = bucket.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }

        bucket.push((key, value));
        self.len += 1;
        None
    }

    /// Look up a value
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// Look up a value for in-place mutation
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter_mut()
            .find(|(k, _)| k.borrow() == key)
            .map(|(_, v)| v)
    }

    /// `true` if `key` has an entry
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Remove an entry, keeping the rest of its chain in order.
    ///
    /// # Returns
    ///
    /// `true` if an entry was removed
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];

        match bucket.iter().position(|(k, _)| k.borrow() == key) {
            Some(pos) => {
                bucket.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Drop every entry. The bucket count is unchanged.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    // ========================================================================
    // Enumeration (bucket-major, then chain order)
    // ========================================================================

    /// Borrowing iterator over `(key, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    /// Keys in enumeration order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Values in enumeration order
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    #[inline]
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hash_builder.hash_one(key) % self.buckets.len() as u64) as usize
    }
}

impl<K: Hash + Eq, V> FromIterator<(K, V)> for ChainedHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ChainedHashMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_map(keys: &[&str]) -> ChainedHashMap<String, usize> {
        keys.iter()
            .enumerate()
            .map(|(i, k)| (k.to_string(), i))
            .collect()
    }

    #[test]
    fn test_new_map_is_empty() {
        let map: ChainedHashMap<String, u32> = ChainedHashMap::new();

        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert_eq!(map.values().count(), 0);
    }

    #[test]
    fn test_is_empty_after_one_insert() {
        let mut map: ChainedHashMap<String, u32> = ChainedHashMap::with_buckets(100);
        map.insert("1001".to_string(), 1);

        assert!(!map.is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_then_find() {
        let map = create_test_map(&["a", "b", "c"]);

        assert_eq!(map.find("a"), Some(&0));
        assert_eq!(map.find("c"), Some(&2));
        assert!(map.find("d").is_none());
        assert!(map.contains_key("b"));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut map = create_test_map(&["k"]);

        assert_eq!(map.insert("k".to_string(), 42), Some(0));
        assert_eq!(map.find("k"), Some(&42));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_find_mut_accumulates() {
        let mut map: ChainedHashMap<String, u64> = ChainedHashMap::new();
        map.insert("01-2025".to_string(), 100);

        if let Some(total) = map.find_mut("01-2025") {
            *total += 250;
        }

        assert_eq!(map.find("01-2025"), Some(&350));
    }

    #[test]
    fn test_remove() {
        let mut map = create_test_map(&["x", "y"]);

        assert!(map.remove("x"));
        assert!(map.find("x").is_none());
        assert!(!map.remove("x"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_single_bucket_chains() {
        // Every key collides; chain order is insertion order
        let mut map: ChainedHashMap<u32, &str> = ChainedHashMap::with_buckets(1);
        map.insert(3, "c");
        map.insert(1, "a");
        map.insert(2, "b");

        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);

        assert!(map.remove(&1));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(map.find(&2), Some(&"b"));
    }

    #[test]
    fn test_zero_buckets_clamped() {
        let mut map: ChainedHashMap<u32, u32> = ChainedHashMap::with_buckets(0);
        assert_eq!(map.bucket_count(), 1);

        map.insert(1, 1);
        assert_eq!(map.find(&1), Some(&1));
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let keys: Vec<String> = (0..50).map(|i| format!("{}", 1000 + i)).collect();
        let a: ChainedHashMap<String, usize> =
            keys.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();
        let b: ChainedHashMap<String, usize> =
            keys.iter().cloned().enumerate().map(|(i, k)| (k, i)).collect();

        let order_a: Vec<_> = a.keys().cloned().collect();
        let order_b: Vec<_> = b.keys().cloned().collect();
        assert_eq!(order_a, order_b);
        assert_eq!(order_a.len(), 50);
    }

    #[test]
    fn test_clear_keeps_buckets() {
        let mut map = create_test_map(&["a", "b"]);
        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert!(map.find("a").is_none());
    }
}
