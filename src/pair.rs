//! Pair: the owned (key, value) unit stored in each bucket.

/// An owned key and value.
///
/// Copy, compare and free capabilities are the `Clone`, `PartialEq` and
/// `Drop` impls of `K` and `V`. Cloning a pair deep-clones both halves, so
/// two live pairs never share a key or value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pair<K, V> {
    key: K,
    value: V,
}

impl<K, V> Pair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Pair { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Split borrow: the key stays immutable while the value is mutated.
    pub fn parts_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    #[inline]
    pub fn has_key(&self, key: &K) -> bool
    where
        K: PartialEq,
    {
        self.key == *key
    }

    pub fn value_equals(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.value == *value
    }
}

impl<K, V> From<(K, V)> for Pair<K, V> {
    fn from((key, value): (K, V)) -> Self {
        Pair::new(key, value)
    }
}
