//! Build-time sizing constants for both resizing disciplines.
//!
//! The table and the bucket vectors resize independently: the table looks
//! at its global load (`len / buckets`), each vector at its own
//! `len / capacity`.

/// Number of buckets a fresh table starts with. Must be a power of two.
pub const HASH_MAP_INITIAL_CAPACITY: usize = 16;
/// The table never shrinks below this many buckets.
pub const HASH_MAP_MIN_CAPACITY: usize = 1;
/// Multiplier applied on rehash-up, divisor on rehash-down.
pub const HASH_MAP_GROWTH_FACTOR: usize = 2;
/// A rehash-up fires when `len / capacity` exceeds this.
pub const HASH_MAP_MAX_LOAD_FACTOR: f64 = 0.75;
/// A rehash-down fires when `len / capacity` drops below this.
pub const HASH_MAP_MIN_LOAD_FACTOR: f64 = 0.25;

/// Slots a fresh vector reserves.
pub const VECTOR_INITIAL_CAPACITY: usize = 16;
/// A vector never shrinks below this many slots.
pub const VECTOR_MIN_CAPACITY: usize = 1;
pub const VECTOR_GROWTH_FACTOR: usize = 2;
pub const VECTOR_MAX_LOAD_FACTOR: f64 = 0.75;
pub const VECTOR_MIN_LOAD_FACTOR: f64 = 0.25;

// Mask-based bucket routing needs every reachable capacity to be a power of two.
const _: () = assert!(HASH_MAP_INITIAL_CAPACITY.is_power_of_two());
const _: () = assert!(HASH_MAP_MIN_CAPACITY.is_power_of_two());
const _: () = assert!(HASH_MAP_GROWTH_FACTOR.is_power_of_two() && HASH_MAP_GROWTH_FACTOR > 1);
const _: () = assert!(HASH_MAP_MIN_CAPACITY <= HASH_MAP_INITIAL_CAPACITY);
const _: () = assert!(VECTOR_GROWTH_FACTOR > 1);
const _: () = assert!(VECTOR_MIN_CAPACITY >= 1 && VECTOR_MIN_CAPACITY <= VECTOR_INITIAL_CAPACITY);

/// `len / capacity` as a real number. `capacity` is never zero for any
/// structure in this crate.
#[inline]
pub(crate) fn load_factor(len: usize, capacity: usize) -> f64 {
    debug_assert!(capacity > 0);
    len as f64 / capacity as f64
}
