//! Property tests for obtain/release invariants.
//!
//! After arbitrary obtain/release sequences:
//! - no two outstanding blocks share an address
//! - outstanding blocks never exceed capacity
//! - the most recently released block is the next one handed out

#![allow(unsafe_code)]

use std::collections::HashSet;
use std::ptr::NonNull;

use proptest::prelude::*;
use reuse_pool::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Obtain,
    /// Release the outstanding block at this index (modulo the count)
    Release(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Obtain), any::<usize>().prop_map(Op::Release)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pool_invariants_hold_for_any_sequence(
        capacity in 1usize..16,
        ops in proptest::collection::vec(op(), 1..64),
    ) {
        let pool = PoolAllocator::<[u32; 3]>::with_capacity(capacity).unwrap();
        let mut outstanding: Vec<NonNull<[u32; 3]>> = Vec::new();
        let mut last_released: Option<NonNull<[u32; 3]>> = None;

        for op in ops {
            match op {
                Op::Obtain => match pool.obtain(1) {
                    Ok(block) => {
                        // LIFO: the latest release comes back first
                        if let Some(expected) = last_released.take() {
                            prop_assert_eq!(block, expected);
                        }
                        prop_assert!(!outstanding.contains(&block), "block handed out twice");
                        outstanding.push(block);
                    }
                    Err(err) => {
                        prop_assert_eq!(outstanding.len(), capacity);
                        prop_assert!(err.is_retryable());
                    }
                },
                Op::Release(index) if !outstanding.is_empty() => {
                    let block = outstanding.swap_remove(index % outstanding.len());
                    // SAFETY: block came from `pool` and was still outstanding.
                    unsafe { pool.release(block, 1) };
                    last_released = Some(block);
                }
                Op::Release(_) => {}
            }

            let stats = pool.stats();
            prop_assert!(stats.outstanding() <= capacity);
            prop_assert_eq!(stats.outstanding(), outstanding.len());
            prop_assert!(stats.carved <= capacity);
        }

        let distinct: HashSet<usize> = outstanding.iter().map(|p| p.as_ptr() as usize).collect();
        prop_assert_eq!(distinct.len(), outstanding.len());
    }

    #[test]
    fn map_matches_btreemap(
        keys in proptest::collection::vec(0u16..64, 0..48),
        removals in proptest::collection::vec(0u16..64, 0..48),
    ) {
        let alloc = PoolAllocator::<(u16, u32)>::with_capacity(64).unwrap();
        let mut map = PoolMap::new_in(alloc.clone());
        let mut model = std::collections::BTreeMap::new();

        for (i, k) in keys.iter().enumerate() {
            let value = i as u32;
            prop_assert_eq!(map.insert(*k, value).unwrap(), model.insert(*k, value));
        }
        for k in &removals {
            prop_assert_eq!(map.remove(k), model.remove(k));
        }

        prop_assert_eq!(map.len(), model.len());
        let ours: Vec<(u16, u32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
        let theirs: Vec<(u16, u32)> = model.into_iter().collect();
        prop_assert_eq!(ours, theirs);
    }
}
