//! End-to-end behaviour of the pointer and array types through the public API.
use pretty_assertions::assert_eq;

use option_ptr::{Absent, OptionArray, OptionPtr, SearchTree, nothing, some, some_array};

fn array_of(elems: &[i32]) -> OptionArray<i32> {
    let mut array = some_array(elems.len());
    for (i, &x) in elems.iter().enumerate() {
        assert!(array.set(i, x));
    }
    array
}

#[test]
fn find_reverse_reduce() {
    let mut array = array_of(&[5, 3, 8]);
    assert_eq!(array.find(&3), 1);
    assert_eq!(array.find(&9), 3);
    array.reverse();
    assert_eq!(array.as_slice(), &[8, 3, 5]);
    assert_eq!(array.reduce(|acc, x| acc - x, 0), 0);
}

#[test]
fn find_returns_first_match() {
    let array = array_of(&[4, 7, 4, 7]);
    assert_eq!(array.find(&7), 1);
    assert_eq!(OptionArray::<i32>::none().find(&7), 0);
}

#[test]
fn take_or_on_empty_and_present() {
    let mut empty = nothing::<i32>();
    assert_eq!(empty.take_or(42), 42);
    assert!(empty.is_none());

    let mut seven = some(7);
    assert_eq!(seven.take_or(42), 7);
    assert!(seven.is_none());
    assert_eq!(seven.into_inner(), Err(Absent));
}

#[test]
fn join_drains_both_inputs() {
    let mut left = array_of(&[1, 2]);
    let mut right = array_of(&[3, 4]);
    let joined = left.join(right.take());
    assert_eq!(joined.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(joined.size(), 4);
    assert_eq!(left.size(), 0);
    assert_eq!(right.size(), 0);
    assert!(!left.is_present());
    assert!(!right.is_present());
}

#[test]
fn join_of_nothing_is_absent() {
    let mut left = OptionArray::<i32>::none();
    let joined = left.join(OptionArray::none());
    assert!(!joined.is_present());
}

#[test]
fn move_transfer_between_arrays() {
    let mut a = array_of(&[1, 4, 9]);
    let mut b = array_of(&[0; 20]);
    assert_eq!(b.size(), 20);
    b = a.take();
    assert_eq!(b.size(), 3);
    assert!(a.checked_get(1).is_none());
    assert_eq!(b.checked_get(1), some(4));
}

#[test]
fn size_invariant_under_bulk_ops() {
    let mut array = array_of(&[1, 2, 3, 4]);
    let mut doubled = array.map_to(|x| *x * 2);
    assert_eq!(doubled.size(), 4);
    doubled.reverse().foreach(|x| *x += 1);
    assert_eq!(doubled.size(), 4);
    assert_eq!(doubled.as_slice(), &[9, 7, 5, 3]);

    let strings = doubled.map_move(|x| x.to_string());
    assert_eq!(doubled.size(), 0);
    assert_eq!(strings.to_string(), "[9, 7, 5, 3]");
}

#[test]
fn array_of_pointers() {
    let mut slots = some_array::<OptionPtr<i32>>(3);
    assert!(slots.set(1, some(55)));
    let mut found = vec![];
    slots.foreach(|slot| slot.map_do(|x| found.push(*x)));
    assert_eq!(found, vec![55]);

    let mut taken = slots.map_move(|mut slot| slot.take_or(0));
    assert_eq!(taken.reduce(|acc, x| acc + x, -1), 55);
    assert_eq!(taken.map_to(|x| *x).as_slice(), &[0, 55, 0]);
}

#[test]
fn search_tree_over_pointers() {
    let mut tree = SearchTree::new();
    for word in ["pear", "apple", "fig", "apple"] {
        tree.insert(word.to_owned());
    }
    assert_eq!(tree.len(), 3);
    assert!(tree.contains(&"fig".to_owned()));
    assert_eq!(tree.to_vec(), vec!["apple", "fig", "pear"]);
}
