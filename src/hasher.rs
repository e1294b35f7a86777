//! Hash capability for `ChainedHashMap`.
//!
//! The map only needs `hash(key) -> u64`; it never inspects how the number
//! is produced. Closures and fn pointers qualify directly, and `Hashing`
//! lifts any `BuildHasher` into the same shape.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

pub trait KeyHasher<K: ?Sized> {
    fn hash_key(&self, key: &K) -> u64;
}

impl<K: ?Sized, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Adapter from `BuildHasher` to `KeyHasher`.
#[derive(Clone, Debug, Default)]
pub struct Hashing<S = DefaultHashBuilder>(S);

impl<S> Hashing<S> {
    pub fn new(build_hasher: S) -> Self {
        Hashing(build_hasher)
    }

    pub fn build_hasher(&self) -> &S {
        &self.0
    }
}

impl<K, S> KeyHasher<K> for Hashing<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}
