#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can reach
// the sizing constants without widening the public surface.

use crate::alloc::Budget;
use crate::config::{
    HASH_MAP_GROWTH_FACTOR, HASH_MAP_MAX_LOAD_FACTOR, HASH_MAP_MIN_CAPACITY,
    HASH_MAP_MIN_LOAD_FACTOR,
};
use crate::error::Error;
use crate::hash_map::ChainedHashMap;
use crate::hasher::KeyHasher;
use proptest::prelude::*;
use std::collections::{BTreeMap, HashMap};

#[derive(Clone, Debug)]
enum Op {
    Insert(u8, i32),
    Erase(u8),
    At(u8),
    Mutate(u8, i32),
    /// Add `d` to every value whose key is divisible by the modulus.
    ApplyIf(u8, i32),
}

// Keys are drawn from a small pool so inserts collide with live keys and
// erases hit often enough to walk the table back down through rehashes.
fn arb_op(pool: u8) -> impl Strategy<Value = Op> {
    let k = 0..pool;
    prop_oneof![
        4 => (k.clone(), any::<i32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        3 => k.clone().prop_map(Op::Erase),
        1 => k.clone().prop_map(Op::At),
        1 => (k, -100i32..100).prop_map(|(k, d)| Op::Mutate(k, d)),
        1 => (1u8..5, -100i32..100).prop_map(|(m, d)| Op::ApplyIf(m, d)),
    ]
}

// Each op optionally runs with a fault budget: at most that many
// allocations are admitted before the policy starts refusing.
fn arb_scenario() -> impl Strategy<Value = Vec<(Op, Option<usize>)>> {
    proptest::collection::vec(
        (arb_op(48), proptest::option::weighted(0.15, 0usize..40)),
        1..300,
    )
}

fn snapshot<H: KeyHasher<u8>>(m: &ChainedHashMap<u8, i32, H, Budget>) -> BTreeMap<u8, i32> {
    m.iter().map(|(k, v)| (*k, *v)).collect()
}

fn run_scenario<H: KeyHasher<u8>>(
    hasher: H,
    ops: Vec<(Op, Option<usize>)>,
) -> Result<(), TestCaseError> {
    let budget = Budget::unlimited();
    let mut sut = ChainedHashMap::with_hasher_and_policy(hasher, budget.clone())
        .expect("unlimited budget");
    let mut model: HashMap<u8, i32> = HashMap::new();

    for (op, fault) in ops {
        let before = (sut.len(), sut.capacity());
        let contents = snapshot(&sut);
        match fault {
            Some(n) => budget.limit(n),
            None => budget.lift(),
        }

        match op {
            Op::Insert(k, v) => {
                let already = model.contains_key(&k);
                match sut.insert(k, v) {
                    Ok(()) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        model.insert(k, v);
                        let crossed = (before.0 + 1) as f64 / before.1 as f64
                            > HASH_MAP_MAX_LOAD_FACTOR;
                        let expected_cap = if crossed {
                            before.1 * HASH_MAP_GROWTH_FACTOR
                        } else {
                            before.1
                        };
                        prop_assert_eq!(sut.capacity(), expected_cap);
                    }
                    Err(Error::DuplicateKey) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!((sut.len(), sut.capacity()), before);
                    }
                    Err(e) => {
                        prop_assert!(e.is_alloc_failure(), "unexpected error {:?}", e);
                        prop_assert!(fault.is_some());
                        prop_assert_eq!((sut.len(), sut.capacity()), before);
                        prop_assert_eq!(snapshot(&sut), contents);
                    }
                }
            }
            Op::Erase(k) => match sut.erase(&k) {
                Ok((kk, vv)) => {
                    prop_assert_eq!(kk, k);
                    prop_assert_eq!(Some(vv), model.remove(&k));
                    let crossed = before.1 > HASH_MAP_MIN_CAPACITY
                        && ((before.0 - 1) as f64 / before.1 as f64) < HASH_MAP_MIN_LOAD_FACTOR;
                    let expected_cap = if crossed {
                        before.1 / HASH_MAP_GROWTH_FACTOR
                    } else {
                        before.1
                    };
                    prop_assert_eq!(sut.capacity(), expected_cap);
                }
                Err(Error::NotFound) => {
                    prop_assert!(!model.contains_key(&k));
                    prop_assert_eq!((sut.len(), sut.capacity()), before);
                }
                Err(e) => {
                    prop_assert!(e.is_alloc_failure(), "unexpected error {:?}", e);
                    prop_assert!(fault.is_some());
                    prop_assert_eq!((sut.len(), sut.capacity()), before);
                    prop_assert_eq!(snapshot(&sut), contents);
                }
            },
            Op::At(k) => {
                prop_assert_eq!(sut.at(&k), model.get(&k));
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
            Op::Mutate(k, d) => {
                if let Some(v) = sut.at_mut(&k) {
                    *v = v.wrapping_add(d);
                }
                if let Some(v) = model.get_mut(&k) {
                    *v = v.wrapping_add(d);
                }
            }
            Op::ApplyIf(m, d) => {
                let n = sut.apply_if(|k| k % m == 0, |v| *v = v.wrapping_add(d));
                let mut expected = 0;
                for (k, v) in model.iter_mut() {
                    if k % m == 0 {
                        *v = v.wrapping_add(d);
                        expected += 1;
                    }
                }
                prop_assert_eq!(n, expected);
                // In-place mutation never resizes.
                prop_assert_eq!((sut.len(), sut.capacity()), before);
            }
        }

        // Post-conditions after each op
        budget.lift();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert!(sut.capacity().is_power_of_two());
        prop_assert!(sut.load_factor() <= HASH_MAP_MAX_LOAD_FACTOR);
        let model_sorted: BTreeMap<u8, i32> = model.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(snapshot(&sut), model_sorted);
    }
    Ok(())
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Keys are unique; duplicates are rejected without side effects.
// - `at` round-trips every live pair; `erase` returns the stored pair.
// - Capacity doubles exactly when an insert crosses the upper load factor
//   and halves exactly when an erase crosses the lower one.
// - Refused allocations roll the table back to its pre-call state.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_scenario()) {
        run_scenario(|k: &u8| u64::from(*k).wrapping_mul(0x9E37_79B9_7F4A_7C15), ops)?;
    }
}

// Property: Same invariants as above with every key in one bucket. Stresses
// bucket vector growth/shrink and erase compaction.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions(ops in arb_scenario()) {
        run_scenario(|_: &u8| 0u64, ops)?;
    }
}
