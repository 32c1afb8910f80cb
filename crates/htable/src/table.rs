use std::borrow::Borrow;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use pcl_error::{Error, ErrorCode, Result};
use rustc_hash::FxBuildHasher;

use crate::capacity::{MIN_CAPACITY, next_prime};

pub const DEFAULT_MIN_LOAD_FACTOR: f32 = 0.20;
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 0.75;

#[derive(Clone)]
struct Entry<K, V> {
    code: u64,
    key: K,
    value: V,
}

/// A hash table that iterates in insertion order.
///
/// Entries live in an append-only vector; buckets hold indices into it. Removed
/// entries leave a hole that is compacted away on the next rehash. The bucket count
/// is always one of the primes from [`next_prime`].
#[derive(Clone)]
pub struct HashTable<K, V, S = FxBuildHasher> {
    entries: Vec<Option<Entry<K, V>>>,
    buckets: Vec<Vec<usize>>,
    len: usize,
    min_load_factor: f32,
    max_load_factor: f32,
    hash_builder: S,
}

impl<K, V> HashTable<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(FxBuildHasher)
    }

    /// Creates a table with room for `capacity` buckets, rounded up to a prime.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, FxBuildHasher)
    }
}

impl<K, V> Default for HashTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> HashTable<K, V, S> {
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            entries: Vec::new(),
            buckets: empty_buckets(MIN_CAPACITY),
            len: 0,
            min_load_factor: DEFAULT_MIN_LOAD_FACTOR,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            hash_builder,
        }
    }

    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self> {
        let mut table = Self::with_hasher(hash_builder);
        let capacity = if capacity <= MIN_CAPACITY {
            MIN_CAPACITY
        } else {
            next_prime(capacity)?
        };
        table.buckets = empty_buckets(capacity);
        Ok(table)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `(min, max)` load factors.
    pub fn load_factors(&self) -> (f32, f32) {
        (self.min_load_factor, self.max_load_factor)
    }

    /// Sets the load factors that trigger shrinking and growing.
    ///
    /// Only allowed while the table is empty; requires `0 <= min < max <= 1`.
    pub fn set_load_factors(&mut self, min: f32, max: f32) -> Result<()> {
        if !self.is_empty() {
            return Err(Error::with_msg(
                ErrorCode::Busy,
                "load factors can only be changed on an empty table",
            ));
        }
        if !(0.0..1.0).contains(&min) || !(max > min && max <= 1.0) {
            return Err(Error::with_msg(
                ErrorCode::Invalid,
                format!("invalid load factors: min={min}, max={max}"),
            ));
        }
        self.min_load_factor = min;
        self.max_load_factor = max;
        Ok(())
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&K, &V)> + '_ {
        self.entries.iter().flatten().map(|e| (&e.key, &e.value))
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = (&K, &mut V)> + '_ {
        self.entries.iter_mut().flatten().map(|e| (&e.key, &mut e.value))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Removes every entry. With `shrink`, the bucket count drops back to the minimum.
    pub fn clear(&mut self, shrink: bool) {
        self.entries.clear();
        self.len = 0;
        if shrink {
            self.buckets = empty_buckets(MIN_CAPACITY);
        } else {
            self.buckets.iter_mut().for_each(Vec::clear);
        }
    }

    fn bucket_of(&self, code: u64) -> usize {
        (code % self.buckets.len() as u64) as usize
    }

    /// Compacts the entry vector and redistributes it over `capacity` buckets. Cached
    /// hash codes are reused; keys are never hashed again.
    fn rebuild(&mut self, capacity: usize) {
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries.into_iter().flatten().map(Some).collect();
        self.buckets = empty_buckets(capacity);
        for (idx, entry) in self.entries.iter().enumerate() {
            if let Some(entry) = entry {
                let bucket = (entry.code % capacity as u64) as usize;
                self.buckets[bucket].push(idx);
            }
        }
    }

    fn rehash(&mut self, grow: bool) -> Result<()> {
        let old = self.capacity();
        let new = next_prime(if grow { old * 2 } else { old / 2 })?;
        log::debug!(
            "htable rehash: {} -> {} buckets ({} entries)",
            old,
            new,
            self.len
        );
        self.rebuild(new);
        Ok(())
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn find<Q>(&self, code: u64, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let bucket = self.bucket_of(code);
        self.buckets[bucket]
            .iter()
            .position(|&idx| match &self.entries[idx] {
                Some(e) => e.code == code && Borrow::<Q>::borrow(&e.key) == key,
                None => false,
            })
            .map(|slot| (bucket, slot))
    }

    fn entry_index<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let code = self.hash_builder.hash_one(key);
        self.find(code, key).map(|(bucket, slot)| self.buckets[bucket][slot])
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.entry_index(key)?;
        self.entries[idx].as_ref().map(|e| &e.value)
    }

    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.entry_index(key)?;
        self.entries[idx].as_mut().map(|e| &mut e.value)
    }

    /// Like [`HashTable::get`], but a missing key is an `ENOTFOUND` error.
    #[track_caller]
    pub fn lookup<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.get(key) {
            Some(v) => Ok(v),
            None => Err(Error::new(ErrorCode::NotFound)),
        }
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entry_index(key).is_some()
    }

    /// Adds or replaces an entry.
    ///
    /// When the key already exists, `unique` makes this an `EEXIST` error; otherwise
    /// the entry is replaced in place, keeping its position, and the previous key and
    /// value are returned. A new key may grow the table first, which fails with
    /// `ERANGE` once the largest prime has been reached.
    #[track_caller]
    pub fn put(&mut self, key: K, value: V, unique: bool) -> Result<Option<(K, V)>> {
        let code = self.hash_builder.hash_one(&key);

        if let Some((bucket, slot)) = self.find(code, &key) {
            if unique {
                return Err(Error::new(ErrorCode::Exist));
            }
            let idx = self.buckets[bucket][slot];
            let old = self.entries[idx].replace(Entry { code, key, value });
            return Ok(old.map(|e| (e.key, e.value)));
        }

        let threshold = (self.max_load_factor * self.capacity() as f32) as usize;
        if self.len >= threshold {
            self.rehash(true).map_err(|e| e.trace())?;
        }

        let idx = self.entries.len();
        self.entries.push(Some(Entry { code, key, value }));
        let bucket = self.bucket_of(code);
        self.buckets[bucket].push(idx);
        self.len += 1;
        Ok(None)
    }

    /// Inserts or replaces, returning the previous value.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        Ok(self.put(key, value, false)?.map(|(_, v)| v))
    }

    /// Removes a key, returning its value. Missing keys are ignored.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key, handing back ownership of both key and value.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let code = self.hash_builder.hash_one(key);
        let (bucket, slot) = self.find(code, key)?;
        let idx = self.buckets[bucket].swap_remove(slot);
        let entry = self.entries[idx].take()?;
        self.len -= 1;

        let capacity = self.capacity();
        let threshold = (self.min_load_factor * capacity as f32) as usize;
        if capacity != MIN_CAPACITY && self.len < threshold {
            // shrinking never exceeds the prime table
            if let Err(e) = self.rehash(false) {
                log::warn!("htable shrink failed: {e}");
            }
        } else if self.entries.len() - self.len > self.len + MIN_CAPACITY {
            self.rebuild(capacity);
        }

        Some((entry.key, entry.value))
    }
}

impl<K, V, S> PartialEq for HashTable<K, V, S>
where
    K: Hash + Eq,
    V: PartialEq,
    S: BuildHasher,
{
    /// Tables are equal when they hold the same key/value pairs, regardless of order.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashTable<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Box<dyn DoubleEndedIterator<Item = (&'a K, &'a V)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn empty_buckets(capacity: usize) -> Vec<Vec<usize>> {
    (0..capacity).map(|_| Vec::new()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_put_and_lookup() {
        let mut t = HashTable::new();
        t.put("alpha".to_string(), 1, true).unwrap();
        t.put("beta".to_string(), 2, true).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(*t.lookup("alpha").unwrap(), 1);
        assert_eq!(t.get("beta"), Some(&2));
        assert_eq!(t.lookup("gamma").unwrap_err().code(), ErrorCode::NotFound);
    }

    #[test]
    fn test_unique_put_rejects_existing() {
        let mut t = HashTable::new();
        t.put(1, "a", true).unwrap();
        let err = t.put(1, "b", true).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Exist);
        assert_eq!(t.get(&1), Some(&"a"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut t = HashTable::new();
        for k in ["x", "y", "z"] {
            t.put(k, 0, false).unwrap();
        }
        let old = t.put("x", 9, false).unwrap();
        assert_eq!(old, Some(("x", 0)));
        let pairs: Vec<_> = t.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(pairs, vec![("x", 9), ("y", 0), ("z", 0)]);
    }

    #[test]
    fn test_grow_follows_prime_table() {
        init_logger();
        let mut t = HashTable::new();
        for i in 0..12 {
            t.put(i, i, true).unwrap();
        }
        assert_eq!(t.capacity(), 17);
        t.put(12, 12, true).unwrap();
        assert_eq!(t.capacity(), 53);
        for i in 0..13 {
            assert_eq!(t.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_shrink_after_removals() {
        init_logger();
        let mut t = HashTable::new();
        for i in 0..13 {
            t.put(i, (), true).unwrap();
        }
        assert_eq!(t.capacity(), 53);
        // (int)(0.20 * 53) = 10: shrinking starts below 10 entries
        t.remove(&0);
        t.remove(&1);
        t.remove(&2);
        assert_eq!(t.len(), 10);
        assert_eq!(t.capacity(), 53);
        t.remove(&3);
        assert_eq!(t.len(), 9);
        assert_eq!(t.capacity(), 31);
        let keys: Vec<_> = t.keys().copied().collect();
        assert_eq!(keys, (4..13).collect::<Vec<_>>());
    }

    #[test]
    fn test_remove_missing_is_ignored() {
        let mut t: HashTable<String, i32> = HashTable::new();
        assert_eq!(t.remove("nope"), None);
        t.insert("k".into(), 5).unwrap();
        assert_eq!(t.remove_entry("k"), Some(("k".to_string(), 5)));
        assert!(t.is_empty());
    }

    #[test]
    fn test_insertion_order_survives_churn() {
        let mut t = HashTable::new();
        for i in 0..200 {
            t.put(i, i * 2, false).unwrap();
        }
        for i in (0..200).filter(|i| i % 3 == 0) {
            t.remove(&i);
        }
        let keys: Vec<_> = t.keys().copied().collect();
        let expected: Vec<_> = (0..200).filter(|i| i % 3 != 0).collect();
        assert_eq!(keys, expected);
        assert_eq!(t.len(), expected.len());
    }

    #[test]
    fn test_clear_with_shrink() {
        let mut t = HashTable::new();
        for i in 0..100 {
            t.put(i, i, false).unwrap();
        }
        let big = t.capacity();
        t.clear(false);
        assert_eq!(t.capacity(), big);
        assert!(t.is_empty());
        t.put(1, 1, false).unwrap();
        t.clear(true);
        assert_eq!(t.capacity(), MIN_CAPACITY);
    }

    #[test]
    fn test_with_capacity() {
        let t: HashTable<u32, u32> = HashTable::with_capacity(100).unwrap();
        assert_eq!(t.capacity(), 193);
        let err = HashTable::<u32, u32>::with_capacity(usize::MAX).unwrap_err();
        assert_eq!(err.code(), ErrorCode::Range);
    }

    #[test]
    fn test_load_factors_only_on_empty_table() {
        let mut t = HashTable::new();
        assert_eq!(
            t.set_load_factors(0.5, 0.4).unwrap_err().code(),
            ErrorCode::Invalid
        );
        t.set_load_factors(0.1, 0.9).unwrap();
        assert_eq!(t.load_factors(), (0.1, 0.9));
        t.put(1, 1, true).unwrap();
        assert_eq!(
            t.set_load_factors(0.2, 0.75).unwrap_err().code(),
            ErrorCode::Busy
        );
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = HashTable::new();
        let mut b = HashTable::new();
        a.put("one", 1, true).unwrap();
        a.put("two", 2, true).unwrap();
        b.put("two", 2, true).unwrap();
        b.put("one", 1, true).unwrap();
        assert_eq!(a, b);
        b.insert("one", 3).unwrap();
        assert_ne!(a, b);
    }
}
