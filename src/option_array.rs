use std::{any::type_name, fmt};

use itertools::Itertools;

use crate::option_ptr::OptionPtr;

/// An owned, fixed-length heap array with the same move-only discipline as `OptionPtr`, plus bulk
/// operations (`map_to`, `reduce`, `reverse`, `join`, ...).
///
/// The array has three observable states:
/// - absent: no array at all. This is what `take`, `map_move` and `join` leave behind.
/// - present with length zero.
/// - present with length `n > 0`.
///
/// `size()` is `0` in the first two states; `is_present()` tells them apart.
#[derive(Debug, PartialEq, Eq)]
pub struct OptionArray<T>(Option<Box<[T]>>);

static_assertions::assert_not_impl_any!(OptionArray<u32>: Clone, Copy);

impl<T> OptionArray<T> {
    pub const fn none() -> Self {
        Self(None)
    }

    /// Allocates `len` elements, each initialized to `T::default()`. `len == 0` gives a present
    /// array of length zero.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self(Some((0..len).map(|_| T::default()).collect()))
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
    pub fn size(&self) -> usize {
        self.as_slice().len()
    }
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn as_slice(&self) -> &[T] {
        self.0.as_deref().unwrap_or_default()
    }
    fn as_mut_slice(&mut self) -> &mut [T] {
        self.0.as_deref_mut().unwrap_or_default()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Release every element. The array is absent afterwards.
    pub fn clear(&mut self) {
        if let Some(elems) = self.0.take() {
            tracing::trace!(ty = type_name::<T>(), len = elems.len(), "released array");
        }
    }
    /// Transfer ownership to a new array. `self` is absent afterwards.
    pub fn take(&mut self) -> Self {
        Self(self.0.take())
    }

    /// Moves the elements out, leaving `self` absent.
    fn drain(&mut self) -> std::vec::IntoIter<T> {
        self.0.take().map(Vec::from).unwrap_or_default().into_iter()
    }

    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_slice().get(i)
    }
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(i)
    }

    /// A fresh pointer holding a copy of element `i`, or an empty one if `i` is out of bounds.
    pub fn checked_get(&self, i: usize) -> OptionPtr<T>
    where
        T: Clone,
    {
        self.get(i).cloned().into()
    }

    /// Element `i` without bounds checking.
    ///
    /// # Safety
    ///
    /// `i < self.size()` must hold. In particular the array must be present.
    pub unsafe fn get_unchecked_mut(&mut self, i: usize) -> &mut T {
        unsafe { self.as_mut_slice().get_unchecked_mut(i) }
    }

    /// Apply `f` to every element in index order.
    pub fn foreach(&mut self, f: impl FnMut(&mut T)) -> &mut Self {
        self.as_mut_slice().iter_mut().for_each(f);
        self
    }

    /// A new array of the same length with `f` applied to each element. Absent if `self` is.
    pub fn map_to<U>(&mut self, f: impl FnMut(&mut T) -> U) -> OptionArray<U> {
        match self.0.as_deref_mut() {
            Some(elems) => OptionArray(Some(elems.iter_mut().map(f).collect())),
            None => OptionArray::none(),
        }
    }

    /// Left fold seeded with the first element: `f(f(e0, e1), e2)...`. `identity` is returned
    /// only when there are no elements, and is never combined with them.
    pub fn reduce(&self, mut f: impl FnMut(T, &T) -> T, identity: T) -> T
    where
        T: Clone,
    {
        match self.as_slice().split_first() {
            Some((first, rest)) => rest.iter().fold(first.clone(), |acc, x| f(acc, x)),
            None => identity,
        }
    }

    /// Move every element through `f` into a new array. `self` is absent afterwards.
    pub fn map_move<U>(&mut self, f: impl FnMut(T) -> U) -> OptionArray<U> {
        if self.0.is_none() {
            return OptionArray::none();
        }
        tracing::trace!(
            from = type_name::<T>(),
            to = type_name::<U>(),
            len = self.size(),
            "map_move"
        );
        OptionArray(Some(self.drain().map(f).collect()))
    }

    pub fn reverse(&mut self) -> &mut Self {
        self.as_mut_slice().reverse();
        self
    }

    /// Swap elements `i` and `k`. Returns `false` and leaves the array untouched if either index is
    /// out of bounds.
    pub fn swap(&mut self, i: usize, k: usize) -> bool {
        let len = self.size();
        if i < len && k < len {
            self.as_mut_slice().swap(i, k);
            true
        } else {
            false
        }
    }

    /// Replace element `i` with `val`. Returns `false` if `i` is out of bounds, in which case
    /// `val` is dropped.
    pub fn set(&mut self, i: usize, val: T) -> bool {
        match self.get_mut(i) {
            Some(slot) => {
                *slot = val;
                true
            }
            None => false,
        }
    }

    /// Index of the first element equal to `target`, or `self.size()` if there is none.
    pub fn find(&self, target: &T) -> usize
    where
        T: PartialEq,
    {
        self.iter()
            .position(|x| x == target)
            .unwrap_or(self.size())
    }

    /// Concatenate `self` and `other` into a new array, moving every element. Both inputs are
    /// consumed: `self` is absent afterwards. The result is absent if there are no elements.
    ///
    /// `other` may be another array or a single `OptionPtr`.
    pub fn join(&mut self, other: impl Into<OptionArray<T>>) -> OptionArray<T> {
        let mut other = other.into();
        let (left, right) = (self.size(), other.size());
        if left + right == 0 {
            self.clear();
            return OptionArray::none();
        }
        tracing::trace!(ty = type_name::<T>(), left, right, "join");
        self.drain().chain(other.drain()).collect()
    }
}

impl<T> Default for OptionArray<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Vec<T>> for OptionArray<T> {
    fn from(elems: Vec<T>) -> Self {
        Self(Some(elems.into_boxed_slice()))
    }
}

/// A present pointer becomes a one-element array, an empty one becomes an absent array.
impl<T> From<OptionPtr<T>> for OptionArray<T> {
    fn from(ptr: OptionPtr<T>) -> Self {
        match ptr.into_inner() {
            Ok(val) => Self::from(vec![val]),
            Err(_) => Self::none(),
        }
    }
}

impl<T> FromIterator<T> for OptionArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(Some(iter.into_iter().collect()))
    }
}

impl<T> IntoIterator for OptionArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;
    fn into_iter(mut self) -> Self::IntoIter {
        self.drain()
    }
}

impl<'a, T> IntoIterator for &'a OptionArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for OptionArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_deref() {
            Some(elems) => write!(f, "[{}]", elems.iter().format(", ")),
            None => write!(f, "None"),
        }
    }
}

#[cfg(feature = "unchecked-deref")]
impl<T> std::ops::Index<usize> for OptionArray<T> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        &self.as_slice()[i]
    }
}
#[cfg(feature = "unchecked-deref")]
impl<T> std::ops::IndexMut<usize> for OptionArray<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.as_mut_slice()[i]
    }
}

#[cfg(test)]
fn squares(len: usize) -> OptionArray<i32> {
    let mut array = OptionArray::with_len(len);
    for i in 0..len {
        assert!(array.set(i, (i * i) as i32));
    }
    array
}

#[test]
fn test_with_len_defaults() {
    let array = OptionArray::<i32>::with_len(4);
    assert!(array.is_present());
    assert_eq!(array.size(), 4);
    assert_eq!(array.as_slice(), &[0, 0, 0, 0]);

    let empty = OptionArray::<i32>::with_len(0);
    assert!(empty.is_present());
    assert!(empty.is_empty());
    assert!(!OptionArray::<i32>::none().is_present());
}

#[test]
fn test_checked_get() {
    let array = squares(10);
    let mut third = array.checked_get(3);
    assert_eq!(third.take_or(-1), 9);
    assert!(array.checked_get(13).is_none());
    assert!(array.checked_get(10).is_none());
    assert!(OptionArray::<i32>::none().checked_get(0).is_none());
}

#[test]
fn test_take_leaves_absent() {
    let mut a = squares(10);
    let b = a.take();
    assert!(!a.is_present());
    assert_eq!(a.size(), 0);
    assert!(a.checked_get(4).is_none());
    assert_eq!(b.checked_get(4), OptionPtr::some(16));
}

#[test]
fn test_unchecked_index() {
    let mut array = squares(3);
    unsafe {
        *array.get_unchecked_mut(2) = 7;
    }
    assert_eq!(array.as_slice(), &[0, 1, 7]);
}

#[test]
fn test_map_to_and_reduce() {
    let mut array = squares(10);
    let mut times_ten = array.map_to(|x| *x * 10);
    assert_eq!(times_ten.size(), array.size());
    assert_eq!(times_ten.get(9), Some(&810));
    assert_eq!(array.get(9), Some(&81));

    let diff = times_ten.reverse().reduce(|acc, x| acc - x, 0);
    assert_eq!(diff, 810 - (0..9).map(|i| i * i * 10).sum::<i32>());

    assert!(!OptionArray::<i32>::none().map_to(|x| *x).is_present());
    let mut empty = OptionArray::<i32>::with_len(0);
    let mapped = empty.map_to(|x| *x);
    assert!(mapped.is_present());
    assert!(mapped.is_empty());
}

#[test]
fn test_reduce_ignores_identity() {
    let single = OptionArray::from(vec![5]);
    assert_eq!(single.reduce(|acc, x| acc + x, 100), 5);
    let pair = OptionArray::from(vec![5, 2]);
    assert_eq!(pair.reduce(|acc, x| acc + x, 100), 7);
    assert_eq!(OptionArray::<i32>::with_len(0).reduce(|acc, x| acc + x, 100), 100);
    assert_eq!(OptionArray::<i32>::none().reduce(|acc, x| acc + x, 100), 100);
}

#[test]
fn test_map_move() {
    crate::test_utils::init_test_logging();
    let mut words = OptionArray::from(vec![String::from("a"), String::from("bcd")]);
    let lens = words.map_move(|s| s.len());
    assert!(!words.is_present());
    assert_eq!(words.size(), 0);
    assert_eq!(lens.as_slice(), &[1, 3]);
}

#[test]
fn test_foreach_swap_set() {
    let mut array = OptionArray::from(vec![1, 2, 3]);
    let mut seen = vec![];
    array.foreach(|x| seen.push(*x)).foreach(|x| *x += 1);
    assert_eq!(seen, vec![1, 2, 3]);
    assert_eq!(array.as_slice(), &[2, 3, 4]);

    assert!(array.swap(0, 2));
    assert_eq!(array.as_slice(), &[4, 3, 2]);
    assert!(!array.swap(0, 3));
    assert_eq!(array.as_slice(), &[4, 3, 2]);

    assert!(!array.set(3, 9));
    assert!(array.set(1, 9));
    assert_eq!(array.as_slice(), &[4, 9, 2]);
}

#[test]
fn test_join_with_pointer() {
    crate::test_utils::init_test_logging();
    let mut array = OptionArray::from(vec![1, 2]);
    let joined = array.join(OptionPtr::some(3));
    assert_eq!(joined.as_slice(), &[1, 2, 3]);
    assert!(!array.is_present());

    let mut empty = OptionArray::<i32>::with_len(0);
    let joined = empty.join(OptionPtr::none());
    assert!(!joined.is_present());
    assert!(!empty.is_present());
}

#[test]
fn test_nested_pointers() {
    let mut slots = OptionArray::<OptionPtr<i32>>::with_len(2);
    assert!(slots.set(1, OptionPtr::some(55)));
    assert!(slots.get(0).is_some_and(OptionPtr::is_none));
    let mut second = slots.get_mut(1).map(OptionPtr::take).unwrap_or_default();
    assert_eq!(second.take_or(0), 55);
}

#[test]
fn test_display() {
    assert_eq!(OptionArray::from(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
    assert_eq!(OptionArray::<i32>::with_len(0).to_string(), "[]");
    assert_eq!(OptionArray::<i32>::none().to_string(), "None");
}

#[test]
fn test_into_iter() {
    let array = OptionArray::from(vec![String::from("a"), String::from("b"), String::from("c")]);
    let mut borrowed = vec![];
    for s in &array {
        borrowed.push(s.as_str());
    }
    assert_eq!(borrowed, vec!["a", "b", "c"]);

    let owned: Vec<String> = array.into_iter().collect();
    assert_eq!(owned, vec!["a", "b", "c"]);
    assert_eq!(OptionArray::<String>::none().into_iter().count(), 0);
}

#[cfg(feature = "unchecked-deref")]
#[test]
fn test_index() {
    let mut array = squares(4);
    array[2] += 1;
    assert_eq!(array[2], 5);
    assert_eq!(array[3], 9);
}

#[cfg(feature = "unchecked-deref")]
#[test]
#[should_panic]
fn test_index_out_of_bounds() {
    let array = squares(4);
    assert_eq!(array[4], 0);
}
