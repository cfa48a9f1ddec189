use std::cmp::Ordering;
use std::collections::HashSet;

use evo_cast::{rank_biased_index, PrioritizedCandidatePool};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;

fn by_residue(a: &u8, b: &u8) -> Ordering {
    (a % 4).cmp(&(b % 4))
}

fn pool_of(entries: &[(u8, i32)]) -> PrioritizedCandidatePool<u8> {
    let mut pool = PrioritizedCandidatePool::new(by_residue);
    for (item, priority) in entries {
        pool.add(*item, *priority);
    }
    pool
}

fn pool_entries() -> impl Strategy<Value = Vec<(u8, i32)>> {
    prop::collection::vec((any::<u8>(), -20i32..20), 0..40)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: PROPTEST_CASES,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sorted_list_is_stable_between_mutations(entries in pool_entries(), mask in any::<u8>()) {
        let pool = pool_of(&entries);
        let keep = |item: &u8| item & mask == *item;

        let first = pool.to_sorted_list(keep);
        let second = pool.to_sorted_list(keep);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn sorted_list_holds_exactly_the_matching_items_in_order(
        entries in pool_entries(),
        mask in any::<u8>(),
    ) {
        let pool = pool_of(&entries);
        let keep = |item: &u8| item & mask == *item;

        let sorted = pool.to_sorted_list(keep);
        prop_assert!(sorted.iter().all(keep));

        let listed: HashSet<u8> = sorted.iter().copied().collect();
        let expected: HashSet<u8> = pool.elements().copied().filter(keep).collect();
        prop_assert_eq!(listed.len(), sorted.len());
        prop_assert_eq!(listed, expected);

        let keys: Vec<(u8, i32)> = sorted
            .iter()
            .map(|item| (item % 4, pool.priority(item).unwrap_or_default()))
            .collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn re_adding_never_grows_the_pool(entries in pool_entries(), again in pool_entries()) {
        let mut pool = pool_of(&entries);
        for (item, priority) in &again {
            pool.add(*item, *priority);
        }

        let distinct: HashSet<u8> = entries.iter().chain(&again).map(|(item, _)| *item).collect();
        prop_assert_eq!(pool.len(), distinct.len());
        for (item, _) in &again {
            let last = again.iter().rev().find(|(other, _)| other == item).map(|(_, p)| *p);
            prop_assert_eq!(pool.priority(item), last);
        }
    }

    #[test]
    fn rank_biased_index_is_monotonic_in_the_sample(
        len in 1usize..50,
        bias in 1.01f64..=2.0,
        a in 0.0f64..1.0,
        b in 0.0f64..1.0,
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let low = rank_biased_index(len, bias, lo).unwrap();
        let high = rank_biased_index(len, bias, hi).unwrap();

        prop_assert!(low <= high);
        prop_assert!(high < len);
        prop_assert_eq!(rank_biased_index(len, bias, 0.0).unwrap(), 0);
        prop_assert_eq!(rank_biased_index(1, bias, hi).unwrap(), 0);
    }
}
