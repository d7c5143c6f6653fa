//! Algebraic laws of the pointer and array combinators.
use proptest::prelude::*;

use option_ptr::{OptionArray, OptionPtr};

fn pointer() -> impl Strategy<Value = OptionPtr<i64>> {
    proptest::option::of(any::<i64>()).prop_map(OptionPtr::from)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn map_composes(mut p in pointer(), a in -1000i64..1000, b in -1000i64..1000) {
        let f = |x: &mut i64| x.wrapping_mul(a);
        let g = |x: &mut i64| x.wrapping_add(b);
        let chained = p.map(f).map(g);
        let fused = p.map(|x| g(&mut f(x)));
        prop_assert_eq!(chained, fused);
    }

    #[test]
    fn take_moves_value(val in any::<i64>()) {
        let mut a = OptionPtr::some(val);
        let mut b = a.take();
        prop_assert!(a.is_none());
        prop_assert_eq!(b.take_or(!val), val);
    }

    #[test]
    fn match_picks_branch(p in pointer()) {
        let was_some = p.is_some();
        let mut p = p;
        prop_assert_eq!(p.match_with(|_| true, || false), was_some);
    }

    #[test]
    fn checked_get_in_bounds(elems in proptest::collection::vec(any::<i32>(), 0..32), i in 0usize..64) {
        let array = OptionArray::from(elems.clone());
        let mut got = array.checked_get(i);
        prop_assert_eq!(got.is_some(), i < array.size());
        if i < elems.len() {
            prop_assert_eq!(got.take_or(0), elems[i]);
        }
    }

    #[test]
    fn find_is_first_position(elems in proptest::collection::vec(0u8..8, 0..32), target in 0u8..8) {
        let array = OptionArray::from(elems.clone());
        let expected = elems.iter().position(|&x| x == target).unwrap_or(elems.len());
        prop_assert_eq!(array.find(&target), expected);
    }

    #[test]
    fn reverse_twice_is_identity(elems in proptest::collection::vec(any::<i32>(), 0..32)) {
        let mut array = OptionArray::from(elems.clone());
        array.reverse().reverse();
        prop_assert_eq!(array.as_slice(), elems.as_slice());
    }

    #[test]
    fn reduce_matches_fold(elems in proptest::collection::vec(-100i64..100, 0..32), identity in any::<i64>()) {
        let array = OptionArray::from(elems.clone());
        let expected = match elems.split_first() {
            Some((first, rest)) => rest.iter().fold(*first, |acc, x| acc - x),
            None => identity,
        };
        prop_assert_eq!(array.reduce(|acc, x| acc - x, identity), expected);
    }

    #[test]
    fn join_concatenates(
        left in proptest::collection::vec(any::<i32>(), 0..16),
        right in proptest::collection::vec(any::<i32>(), 0..16),
    ) {
        let mut a = OptionArray::from(left.clone());
        let mut b = OptionArray::from(right.clone());
        let joined = a.join(b.take());
        let expected: Vec<_> = left.into_iter().chain(right).collect();
        prop_assert_eq!(joined.is_present(), !expected.is_empty());
        prop_assert_eq!(joined.as_slice(), expected.as_slice());
        prop_assert!(!a.is_present());
        prop_assert!(!b.is_present());
    }
}
