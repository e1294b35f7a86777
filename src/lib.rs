//! chained-hashmap: a single-threaded, separately-chained hash map built on
//! a load-factor driven vector, with transactional rehashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a generic key/value container whose resizing engine can be
//!   reasoned about layer by layer, and whose every failure path leaves
//!   the structure exactly as it was.
//! - Layers:
//!   - Pair<K, V>: the owned (key, value) unit. Copy/compare/free are the
//!     `Clone`/`PartialEq`/`Drop` impls of `K` and `V`.
//!   - Vector<T, A>: resizable sequence that grows by
//!     `VECTOR_GROWTH_FACTOR` when its load passes the upper threshold and
//!     shrinks when it drops below the lower one.
//!   - ChainedHashMap<K, V, H, A>: a power-of-two array of
//!     `Vector<Pair<K, V>>` buckets routed by `hash(key) & (capacity - 1)`,
//!     rehashed wholesale when the global load factor crosses a threshold.
//!
//! Constraints
//! - Single-threaded: no internal locking. Callers sharing a map across
//!   threads must serialize access to the whole table, since rehashing
//!   replaces the bucket array in one step.
//! - Unique keys; duplicate inserts fail and never overwrite.
//! - Every stored object has exactly one owner: map -> bucket array ->
//!   bucket -> pair -> key/value. `insert_pair` stores a clone, so the map
//!   never aliases caller data.
//!
//! Failure model
//! - Fallible operations return `Result<_, Error>`; nothing panics on a
//!   bad argument. `DuplicateKey`, `NotFound` and `IndexOutOfBounds` are
//!   ordinary outcomes. `OutOfMemory` means an allocation was refused and
//!   the in-progress change was rolled back.
//! - Vector push grows *before* storing and erase admits its shrink
//!   *before* removing, so neither reports failure after mutating.
//! - Table rehash is copy-and-swap: a complete fresh bucket array is built
//!   from clones of the live pairs and swapped in only once it is whole.
//!   A failure simply drops the fresh array.
//!
//! Allocation seam
//! - All backing storage goes through an `AllocPolicy`. `Global` admits
//!   everything (real exhaustion still surfaces through
//!   `Vec::try_reserve_exact`); `Budget` refuses after a set number of
//!   allocations so rollback paths can be exercised deterministically.
//!
//! Hash capability
//! - `KeyHasher<K>` is the only thing the map asks of its hasher. Any
//!   `Fn(&K) -> u64` works, and `Hashing<S>` adapts a `BuildHasher`
//!   (hashbrown's default builder unless told otherwise). The map never
//!   caches hashes; rehashing re-invokes the hasher for every pair.
//!
//! Notes and non-goals
//! - No iteration-order guarantee; order changes across rehashes.
//! - No persistence or serialization.
//! - Capacities never shrink below `HASH_MAP_MIN_CAPACITY` /
//!   `VECTOR_MIN_CAPACITY`, so the bucket mask stays valid.

pub mod alloc;
pub mod config;
mod error;
pub mod hash_map;
mod hash_map_proptest;
pub mod hasher;
mod pair;
pub mod vector;

// Public surface
pub use crate::alloc::{AllocPolicy, Budget, Global};
pub use error::{Error, Result};
pub use hash_map::ChainedHashMap;
pub use hasher::{Hashing, KeyHasher};
pub use pair::Pair;
pub use vector::Vector;
