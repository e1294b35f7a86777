//! Vector: resizable sequence with load-factor driven growth and shrink.
//!
//! Capacity is tracked logically, independent of whatever the allocator
//! hands back, and only ever changes by `VECTOR_GROWTH_FACTOR` steps:
//! - push grows when the prospective load `(len + 1) / capacity` exceeds
//!   `VECTOR_MAX_LOAD_FACTOR`, and does so *before* storing, so a failed
//!   growth leaves the vector untouched;
//! - erase shrinks when the remaining load drops below
//!   `VECTOR_MIN_LOAD_FACTOR`; the shrink is admitted before the element is
//!   removed, for the same reason.
//!
//! Consequently `len < capacity` holds after every operation.

use crate::alloc::{self, AllocPolicy, Global};
use crate::config::{
    load_factor, VECTOR_GROWTH_FACTOR, VECTOR_INITIAL_CAPACITY, VECTOR_MAX_LOAD_FACTOR,
    VECTOR_MIN_CAPACITY, VECTOR_MIN_LOAD_FACTOR,
};
use crate::error::{Error, Result};

pub struct Vector<T, A = Global> {
    data: Vec<T>,
    capacity: usize,
    policy: A,
}

impl<T> Vector<T> {
    pub fn new() -> Result<Self> {
        Self::with_policy(Global)
    }
}

impl<T, A: AllocPolicy> Vector<T, A> {
    pub fn with_policy(policy: A) -> Result<Self> {
        let data = alloc::reserve_exact(&policy, VECTOR_INITIAL_CAPACITY)?;
        Ok(Self {
            data,
            capacity: VECTOR_INITIAL_CAPACITY,
            policy,
        })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn load_factor(&self) -> f64 {
        load_factor(self.data.len(), self.capacity)
    }

    pub fn at(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn at_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    /// Index of the first element equal to `value`.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.position(|e| e == value)
    }

    /// Index of the first element matching `pred`.
    pub fn position<F>(&self, pred: F) -> Option<usize>
    where
        F: FnMut(&T) -> bool,
    {
        self.data.iter().position(pred)
    }

    /// Append `value`, growing first if the store would push the load factor
    /// past the upper threshold. On error `value` is dropped and the vector
    /// is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        let len = self.data.len() + 1;
        if load_factor(len, self.capacity) > VECTOR_MAX_LOAD_FACTOR {
            let grown = self
                .capacity
                .checked_mul(VECTOR_GROWTH_FACTOR)
                .ok_or_else(|| Error::out_of_memory(usize::MAX))?;
            self.grow_to(grown)?;
        }
        debug_assert!(len < self.capacity);
        self.data.push(value);
        Ok(())
    }

    /// Remove and return the element at `index`; later elements shift down.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        let len = self.data.len();
        if index >= len {
            return Err(Error::out_of_bounds(index, len));
        }
        let shrink = self.shrink_target(len - 1);
        if let Some(target) = shrink {
            self.policy.admit(alloc::bytes_for::<T>(target))?;
        }
        let removed = self.data.remove(index);
        if let Some(target) = shrink {
            self.data.shrink_to(target);
            self.capacity = target;
        }
        Ok(removed)
    }

    /// Erase from the front until empty. Stops at the first refused shrink,
    /// leaving the elements not yet erased in place.
    pub fn clear(&mut self) -> Result<()> {
        while !self.data.is_empty() {
            self.erase(0)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn shrink_target(&self, remaining: usize) -> Option<usize> {
        if self.capacity <= VECTOR_MIN_CAPACITY
            || load_factor(remaining, self.capacity) >= VECTOR_MIN_LOAD_FACTOR
        {
            return None;
        }
        Some((self.capacity / VECTOR_GROWTH_FACTOR).max(VECTOR_MIN_CAPACITY))
    }

    fn grow_to(&mut self, capacity: usize) -> Result<()> {
        let bytes = alloc::bytes_for::<T>(capacity);
        self.policy.admit(bytes)?;
        self.data
            .try_reserve_exact(capacity - self.data.len())
            .map_err(|_| Error::out_of_memory(bytes))?;
        self.capacity = capacity;
        Ok(())
    }
}

impl<T: core::fmt::Debug, A> core::fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.data.iter()).finish()
    }
}

impl<T, A> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T, A> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::Budget;

    fn filled(n: usize) -> Vector<i32> {
        let mut v = Vector::new().unwrap();
        for i in 0..n {
            v.push_back(i as i32).unwrap();
        }
        v
    }

    /// Invariant: a fresh vector is empty at the initial capacity.
    #[test]
    fn starts_empty_at_initial_capacity() {
        let v: Vector<u8> = Vector::new().unwrap();
        assert_eq!(v.len(), 0);
        assert!(v.is_empty());
        assert_eq!(v.capacity(), VECTOR_INITIAL_CAPACITY);
        assert_eq!(v.load_factor(), 0.0);
    }

    /// Invariant: growth fires exactly when the load would pass 0.75.
    #[test]
    fn grows_when_upper_threshold_crossed() {
        let mut v = filled(12);
        assert_eq!(v.capacity(), 16);
        v.push_back(12).unwrap();
        assert_eq!(v.capacity(), 32);
        assert_eq!(v.len(), 13);
        for i in 0..13 {
            assert_eq!(v.at(i), Some(&(i as i32)));
        }
    }

    /// Invariant: erase compacts; no gaps remain in `[0, len)`.
    #[test]
    fn erase_shifts_later_elements_down() {
        let mut v = filled(5);
        assert_eq!(v.erase(1), Ok(1));
        assert_eq!(v.as_slice(), &[0, 2, 3, 4]);
        assert_eq!(v.erase(3), Ok(4));
        assert_eq!(v.as_slice(), &[0, 2, 3]);
    }

    /// Invariant: out-of-range access is a normal miss, not a panic.
    #[test]
    fn out_of_range_is_absence() {
        let mut v = filled(2);
        assert_eq!(v.at(2), None);
        assert_eq!(v.at_mut(99), None);
        assert_eq!(v.erase(2), Err(Error::out_of_bounds(2, 2)));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn find_returns_first_match() {
        let mut v: Vector<&str> = Vector::new().unwrap();
        for s in ["a", "b", "a"] {
            v.push_back(s).unwrap();
        }
        assert_eq!(v.find(&"a"), Some(0));
        assert_eq!(v.find(&"b"), Some(1));
        assert_eq!(v.find(&"z"), None);
    }

    /// Invariant: shrink fires when the remaining load drops below 0.25 and
    /// halves the capacity once per erase.
    #[test]
    fn shrinks_below_lower_threshold() {
        let mut v = filled(4);
        assert_eq!(v.capacity(), 16);
        v.erase(0).unwrap();
        // 3/16 < 0.25
        assert_eq!(v.capacity(), 8);
        v.erase(0).unwrap();
        // 2/8 == 0.25, no shrink
        assert_eq!(v.capacity(), 8);
        v.erase(0).unwrap();
        assert_eq!(v.capacity(), 4);
        v.erase(0).unwrap();
        assert_eq!(v.capacity(), 2);
        assert!(v.is_empty());
    }

    /// Invariant: capacity bottoms out at the minimum and the vector remains usable.
    #[test]
    fn capacity_never_drops_below_minimum() {
        let mut v = filled(1);
        for _ in 0..8 {
            v.push_back(1).unwrap();
            v.clear().unwrap();
        }
        assert!(v.capacity() >= VECTOR_MIN_CAPACITY);
        v.push_back(5).unwrap();
        assert!(v.len() < v.capacity());
        assert_eq!(v.at(0), Some(&5));
    }

    #[test]
    fn clear_empties_and_keeps_invariants() {
        let mut v = filled(20);
        v.clear().unwrap();
        assert!(v.is_empty());
        assert_eq!(v.at(0), None);
        assert!(v.capacity() >= VECTOR_MIN_CAPACITY);
    }

    /// Invariant: a refused growth stores nothing.
    #[test]
    fn failed_growth_leaves_vector_unchanged() {
        let budget = Budget::unlimited();
        let mut v = Vector::with_policy(budget.clone()).unwrap();
        for i in 0..12 {
            v.push_back(i).unwrap();
        }
        budget.limit(0);
        assert!(v.push_back(12).unwrap_err().is_alloc_failure());
        assert_eq!(v.len(), 12);
        assert_eq!(v.capacity(), 16);
        assert_eq!(v.at(12), None);

        budget.lift();
        v.push_back(12).unwrap();
        assert_eq!(v.capacity(), 32);
    }

    /// Invariant: a refused shrink removes nothing.
    #[test]
    fn failed_shrink_leaves_vector_unchanged() {
        let budget = Budget::unlimited();
        let mut v = Vector::with_policy(budget.clone()).unwrap();
        for i in 0..4 {
            v.push_back(i).unwrap();
        }
        budget.limit(0);
        assert!(v.erase(0).unwrap_err().is_alloc_failure());
        assert_eq!(v.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(v.capacity(), 16);
    }

    #[test]
    fn refused_initial_allocation_fails_construction() {
        let budget = Budget::unlimited();
        budget.limit(0);
        assert!(Vector::<u32, _>::with_policy(budget).is_err());
    }

    #[test]
    fn iterators_visit_in_index_order() {
        let mut v = filled(4);
        for x in v.iter_mut() {
            *x *= 10;
        }
        let seen: Vec<i32> = (&v).into_iter().copied().collect();
        assert_eq!(seen, vec![0, 10, 20, 30]);
        let owned: Vec<i32> = v.into_iter().collect();
        assert_eq!(owned, vec![0, 10, 20, 30]);
    }
}
