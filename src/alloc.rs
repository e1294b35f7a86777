//! Allocation admission.
//!
//! Every backing-storage allocation in this crate (a vector's slot array,
//! the table's bucket array) is first submitted to an `AllocPolicy`. The
//! global policy admits everything and leaves failure detection to
//! `Vec::try_reserve_exact`; `Budget` refuses allocations once a configured
//! number has been spent, which lets tests drive every rollback path.

use crate::error::{Error, Result};
use core::cell::Cell;
use core::marker::PhantomData;
use std::rc::Rc;

/// Gatekeeper consulted before each allocation.
///
/// Policies are cloned into every bucket of a table, so clones must observe
/// the same state.
pub trait AllocPolicy: Clone {
    /// Admit or refuse an allocation of `bytes` bytes.
    fn admit(&self, bytes: usize) -> Result<()>;
}

/// Admits every allocation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Global;

impl AllocPolicy for Global {
    #[inline]
    fn admit(&self, _bytes: usize) -> Result<()> {
        Ok(())
    }
}

/// Fault-injecting policy: after `limit(n)`, the next `n` allocations are
/// admitted and every one after that fails with `Error::OutOfMemory`.
///
/// Clones share one counter. Single-threaded, like the containers it feeds.
#[derive(Clone, Debug, Default)]
pub struct Budget {
    remaining: Rc<Cell<Option<usize>>>,
    // Keep !Send + !Sync; the counter is an unsynchronized Cell.
    _nosend: PhantomData<*mut ()>,
}

impl Budget {
    /// A budget with no limit set.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Admit `allocations` more allocations, then refuse.
    pub fn limit(&self, allocations: usize) {
        self.remaining.set(Some(allocations));
    }

    /// Remove the limit.
    pub fn lift(&self) {
        self.remaining.set(None);
    }

    /// Allocations left before refusal, or `None` when unlimited.
    pub fn remaining(&self) -> Option<usize> {
        self.remaining.get()
    }
}

impl AllocPolicy for Budget {
    fn admit(&self, bytes: usize) -> Result<()> {
        match self.remaining.get() {
            None => Ok(()),
            Some(0) => Err(Error::out_of_memory(bytes)),
            Some(n) => {
                self.remaining.set(Some(n - 1));
                Ok(())
            }
        }
    }
}

/// Reserve storage for exactly `capacity` elements, after admission.
pub(crate) fn reserve_exact<T, A: AllocPolicy>(policy: &A, capacity: usize) -> Result<Vec<T>> {
    let bytes = bytes_for::<T>(capacity);
    policy.admit(bytes)?;
    let mut data = Vec::new();
    data.try_reserve_exact(capacity)
        .map_err(|_| Error::out_of_memory(bytes))?;
    Ok(data)
}

#[inline]
pub(crate) fn bytes_for<T>(capacity: usize) -> usize {
    capacity.saturating_mul(core::mem::size_of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_admits_everything() {
        assert!(Global.admit(usize::MAX).is_ok());
    }

    #[test]
    fn budget_counts_down_then_refuses() {
        let b = Budget::unlimited();
        assert!(b.admit(8).is_ok());
        assert_eq!(b.remaining(), None);

        b.limit(2);
        assert!(b.admit(8).is_ok());
        assert!(b.admit(8).is_ok());
        assert_eq!(b.remaining(), Some(0));
        assert_eq!(b.admit(24), Err(Error::out_of_memory(24)));
        // Refusals do not consume anything.
        assert_eq!(b.remaining(), Some(0));

        b.lift();
        assert!(b.admit(8).is_ok());
    }

    #[test]
    fn budget_clones_share_the_counter() {
        let a = Budget::unlimited();
        let b = a.clone();
        a.limit(1);
        assert!(b.admit(1).is_ok());
        assert!(a.admit(1).is_err());
    }

    #[test]
    fn reserve_exact_respects_policy() {
        let b = Budget::unlimited();
        let v: Vec<u64> = reserve_exact(&b, 4).unwrap();
        assert!(v.capacity() >= 4);
        b.limit(0);
        let err = reserve_exact::<u64, _>(&b, 4).unwrap_err();
        assert_eq!(err, Error::out_of_memory(32));
    }
}
