//! ChainedHashMap: separate chaining over `Vector` buckets with
//! transactional whole-table rehashing.

use crate::alloc::{self, AllocPolicy, Global};
use crate::config::{
    load_factor, HASH_MAP_GROWTH_FACTOR, HASH_MAP_INITIAL_CAPACITY, HASH_MAP_MAX_LOAD_FACTOR,
    HASH_MAP_MIN_CAPACITY, HASH_MAP_MIN_LOAD_FACTOR,
};
use crate::error::{Error, Result};
use crate::hasher::{Hashing, KeyHasher};
use crate::pair::Pair;
use crate::vector::Vector;

type Bucket<K, V, A> = Vector<Pair<K, V>, A>;

/// Hash map with unique keys, `capacity` buckets (always a power of two) and
/// a caller-supplied hash capability.
///
/// `len` always equals the sum of the bucket lengths, and each pair lives in
/// bucket `hash(key) & (capacity - 1)`. A failed insert or erase leaves
/// `len`, `capacity` and every bucket exactly as they were.
pub struct ChainedHashMap<K, V, H = Hashing, A = Global> {
    hasher: H,
    policy: A,
    buckets: Vec<Bucket<K, V, A>>,
    len: usize,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + core::hash::Hash,
{
    pub fn new() -> Result<Self> {
        Self::with_hasher(Hashing::default())
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    H: KeyHasher<K>,
{
    pub fn with_hasher(hasher: H) -> Result<Self> {
        Self::with_hasher_and_policy(hasher, Global)
    }
}

/// Iterator over `(&K, &V)` in bucket order. No ordering is guaranteed
/// across rehashes.
pub struct Iter<'a, K, V, A> {
    buckets: core::slice::Iter<'a, Bucket<K, V, A>>,
    pairs: core::slice::Iter<'a, Pair<K, V>>,
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(p) = self.pairs.next() {
                return Some((p.key(), p.value()));
            }
            self.pairs = self.buckets.next()?.into_iter();
        }
    }
}

impl<K, V, H, A> ChainedHashMap<K, V, H, A>
where
    H: KeyHasher<K>,
    A: AllocPolicy,
{
    pub fn with_hasher_and_policy(hasher: H, policy: A) -> Result<Self> {
        let buckets = allocate_buckets(&policy, HASH_MAP_INITIAL_CAPACITY)?;
        Ok(Self {
            hasher,
            policy,
            buckets,
            len: 0,
        })
    }

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

    pub fn load_factor(&self) -> f64 {
        load_factor(self.len, self.capacity())
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn policy(&self) -> &A {
        &self.policy
    }

    pub fn iter(&self) -> Iter<'_, K, V, A> {
        Iter {
            buckets: self.buckets.iter(),
            pairs: Default::default(),
        }
    }

    #[inline]
    fn bucket_of(&self, key: &K) -> usize {
        mask(self.hasher.hash_key(key), self.capacity())
    }
}

impl<K, V, H, A> ChainedHashMap<K, V, H, A>
where
    K: Eq,
    H: KeyHasher<K>,
    A: AllocPolicy,
{
    /// Live reference to the value stored under `key`.
    pub fn at(&self, key: &K) -> Option<&V> {
        let bucket = &self.buckets[self.bucket_of(key)];
        bucket.iter().find(|p| p.has_key(key)).map(Pair::value)
    }

    pub fn at_mut(&mut self, key: &K) -> Option<&mut V> {
        let b = self.bucket_of(key);
        self.buckets[b]
            .iter_mut()
            .find(|p| p.has_key(key))
            .map(Pair::value_mut)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.at(key).is_some()
    }

    /// Mutate in place every value whose key satisfies `pred`; returns how
    /// many values were handed to `f`.
    pub fn apply_if<P, F>(&mut self, mut pred: P, mut f: F) -> usize
    where
        P: FnMut(&K) -> bool,
        F: FnMut(&mut V),
    {
        let mut changed = 0;
        for bucket in self.buckets.iter_mut() {
            for pair in bucket.iter_mut() {
                let (k, v) = pair.parts_mut();
                if pred(k) {
                    f(v);
                    changed += 1;
                }
            }
        }
        changed
    }
}

impl<K, V, H, A> ChainedHashMap<K, V, H, A>
where
    K: Eq + Clone,
    V: Clone,
    H: KeyHasher<K>,
    A: AllocPolicy,
{
    /// Insert a new key. Duplicate keys are rejected, never overwritten.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        self.insert_with(key, || value)
    }

    /// Insert an independent copy of `pair`; the table never aliases it.
    pub fn insert_pair(&mut self, pair: &Pair<K, V>) -> Result<()> {
        if self.contains_key(pair.key()) {
            return Err(Error::DuplicateKey);
        }
        let (key, value) = pair.clone().into_parts();
        self.insert(key, value)
    }

    /// Like `insert`, but `default` only runs when `key` is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> Result<()>
    where
        F: FnOnce() -> V,
    {
        let hash = self.hasher.hash_key(&key);
        let b = mask(hash, self.capacity());
        if self.buckets[b].iter().any(|p| p.has_key(&key)) {
            return Err(Error::DuplicateKey);
        }
        let pair = Pair::new(key, default());
        let len = self.len + 1;
        let capacity = self.capacity();

        if load_factor(len, capacity) > HASH_MAP_MAX_LOAD_FACTOR {
            let grown = capacity
                .checked_mul(HASH_MAP_GROWTH_FACTOR)
                .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
            let mut fresh = self.rehashed(grown, None).map_err(|e| self.rollback(e))?;
            fresh[mask(hash, grown)]
                .push_back(pair)
                .map_err(|e| self.rollback(e))?;
            self.buckets = fresh;
            log::debug!("rehash up: {} -> {} buckets, len {}", capacity, grown, len);
        } else {
            self.buckets[b].push_back(pair)?;
        }
        self.len = len;
        Ok(())
    }

    /// Remove `key`, returning its key and value.
    pub fn erase(&mut self, key: &K) -> Result<(K, V)> {
        let b = self.bucket_of(key);
        let pos = self.buckets[b]
            .position(|p| p.has_key(key))
            .ok_or(Error::NotFound)?;
        let len = self.len - 1;
        let capacity = self.capacity();

        if capacity > HASH_MAP_MIN_CAPACITY && load_factor(len, capacity) < HASH_MAP_MIN_LOAD_FACTOR
        {
            let shrunk = (capacity / HASH_MAP_GROWTH_FACTOR).max(HASH_MAP_MIN_CAPACITY);
            let fresh = self
                .rehashed(shrunk, Some((b, pos)))
                .map_err(|e| self.rollback(e))?;
            let mut old = core::mem::replace(&mut self.buckets, fresh);
            self.len = len;
            log::debug!(
                "rehash down: {} -> {} buckets, len {}",
                capacity,
                shrunk,
                len
            );
            // `pos` was found in `old[b]` above, so this always yields the pair.
            return old
                .swap_remove(b)
                .into_iter()
                .nth(pos)
                .map(Pair::into_parts)
                .ok_or(Error::NotFound);
        }

        let pair = self.buckets[b].erase(pos)?;
        self.len = len;
        Ok(pair.into_parts())
    }

    /// Build a bucket array of `capacity` buckets holding a copy of every
    /// pair except `skip` (bucket, position). `self` is not touched.
    fn rehashed(
        &self,
        capacity: usize,
        skip: Option<(usize, usize)>,
    ) -> Result<Vec<Bucket<K, V, A>>> {
        let mut fresh = allocate_buckets(&self.policy, capacity)?;
        for (b, bucket) in self.buckets.iter().enumerate() {
            for (pos, pair) in bucket.iter().enumerate() {
                if skip == Some((b, pos)) {
                    continue;
                }
                let target = mask(self.hasher.hash_key(pair.key()), capacity);
                fresh[target].push_back(pair.clone())?;
            }
        }
        Ok(fresh)
    }

    fn rollback(&self, e: Error) -> Error {
        log::warn!(
            "rehash aborted ({}); table kept at {} buckets, len {}",
            e,
            self.capacity(),
            self.len
        );
        e
    }
}

impl<'a, K, V, H, A> IntoIterator for &'a ChainedHashMap<K, V, H, A>
where
    H: KeyHasher<K>,
    A: AllocPolicy,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, H, A> core::fmt::Debug for ChainedHashMap<K, V, H, A>
where
    K: core::fmt::Debug,
    V: core::fmt::Debug,
    H: KeyHasher<K>,
    A: AllocPolicy,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[inline]
fn mask(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash & (capacity as u64 - 1)) as usize
}

/// Allocate `capacity` empty buckets. On failure, buckets built so far are
/// dropped with the partial array.
fn allocate_buckets<K, V, A: AllocPolicy>(
    policy: &A,
    capacity: usize,
) -> Result<Vec<Bucket<K, V, A>>> {
    let mut buckets = alloc::reserve_exact(policy, capacity)?;
    for _ in 0..capacity {
        buckets.push(Vector::with_policy(policy.clone())?);
    }
    Ok(buckets)
}
