//! Property-based tests for PersistentTreeSet against a `BTreeSet` model.

use arbors::persistent::PersistentTreeSet;
use arbors::typeclass::{Monoid, Semigroup};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn set_with_model(
    max_size: usize,
) -> impl Strategy<Value = (PersistentTreeSet<i16>, BTreeSet<i16>)> {
    prop::collection::vec(any::<i16>(), 0..max_size)
        .prop_map(|elements| (elements.iter().copied().collect(), elements.into_iter().collect()))
}

fn small_set() -> impl Strategy<Value = PersistentTreeSet<i16>> {
    set_with_model(40).prop_map(|(set, _)| set)
}

fn to_vec(set: &PersistentTreeSet<i16>) -> Vec<i16> {
    set.iter().copied().collect()
}

proptest! {
    #[test]
    fn prop_iteration_matches_model((set, model) in set_with_model(200)) {
        prop_assert_eq!(to_vec(&set), model.iter().copied().collect::<Vec<_>>());
        prop_assert_eq!(set.len(), model.len());
        prop_assert!(set.check_invariants().is_ok());
    }

    #[test]
    fn prop_add_and_remove_match_model(
        (set, mut model) in set_with_model(100),
        additions in prop::collection::vec(any::<i16>(), 0..40),
        removals in prop::collection::vec(any::<i16>(), 0..40),
    ) {
        let mut current = set;
        for element in additions {
            prop_assert_eq!(current.add(element).is_ok(), model.insert(element));
            current = current.try_add(element);
        }
        for element in &removals {
            current = current.remove(element);
            model.remove(element);
        }
        prop_assert_eq!(to_vec(&current), model.into_iter().collect::<Vec<_>>());
        prop_assert!(current.check_invariants().is_ok());
    }

    #[test]
    fn prop_algebra_matches_model((left, left_model) in set_with_model(80), (right, right_model) in set_with_model(80)) {
        prop_assert_eq!(to_vec(&left.union(&right)), left_model.union(&right_model).copied().collect::<Vec<_>>());
        prop_assert_eq!(to_vec(&left.intersect(&right)), left_model.intersection(&right_model).copied().collect::<Vec<_>>());
        prop_assert_eq!(to_vec(&left.except(&right)), left_model.difference(&right_model).copied().collect::<Vec<_>>());
        prop_assert_eq!(
            to_vec(&left.symmetric_except(&right)),
            left_model.symmetric_difference(&right_model).copied().collect::<Vec<_>>()
        );
        prop_assert_eq!(left.is_subset_of(&right), left_model.is_subset(&right_model));
        prop_assert_eq!(left.overlaps(&right), !left_model.is_disjoint(&right_model));
    }

    #[test]
    fn prop_intersection_is_subset_of_both(left in small_set(), right in small_set()) {
        let common = left.intersect(&right);
        prop_assert!(common.is_subset_of(&left));
        prop_assert!(common.is_subset_of(&right));
        prop_assert!(left.union(&right).is_superset_of(&left));
    }

    #[test]
    fn prop_range_matches_model((set, model) in set_with_model(150), from: i16, to: i16) {
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        prop_assert_eq!(
            set.find_range(&from, &to).copied().collect::<Vec<_>>(),
            model.range(low..=high).copied().collect::<Vec<_>>()
        );
    }

    #[test]
    fn prop_equal_sets_hash_equally(set in small_set()) {
        let rebuilt = set.iter_reversed().fold(PersistentTreeSet::new(), |acc, element| acc.try_add(*element));
        prop_assert_eq!(rebuilt.hash_code(), set.hash_code());
        prop_assert_eq!(rebuilt, set);
    }

    #[test]
    fn prop_semigroup_associativity(first in small_set(), second in small_set(), third in small_set()) {
        let left = first.clone().combine(second.clone()).combine(third.clone());
        let right = first.combine(second.combine(third));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_monoid_identity(set in small_set()) {
        prop_assert_eq!(PersistentTreeSet::empty().combine(set.clone()), set.clone());
        prop_assert_eq!(set.clone().combine(PersistentTreeSet::empty()), set);
    }
}
