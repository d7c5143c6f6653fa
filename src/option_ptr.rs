use std::{any::type_name, fmt, mem};

use crate::error::Absent;

/// A pointer that owns at most one heap-allocated `T`. Like `Box<T>` it is move-only, but it has
/// no `Deref` impl: the pointed-to value is only reachable through combinators (`bind`, `map`,
/// `match_with`, ...), each of which handles the empty case explicitly.
///
/// Moving the value out of a slot that is still in use is done with `take`, which leaves the
/// source empty. Raw access via `*ptr` only exists under the `unchecked-deref` feature.
#[derive(Debug, PartialEq, Eq)]
pub struct OptionPtr<T>(Option<Box<T>>);

static_assertions::assert_not_impl_any!(OptionPtr<u32>: Clone, Copy);

impl<T> OptionPtr<T> {
    /// An empty pointer. Never allocates.
    pub const fn none() -> Self {
        Self(None)
    }
    /// Allocates `val` on the heap.
    pub fn some(val: T) -> Self {
        Self(Some(Box::new(val)))
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Release the held value, if any. Idempotent.
    pub fn clear(&mut self) {
        if self.0.take().is_some() {
            tracing::trace!(ty = type_name::<T>(), "released pointer value");
        }
    }

    /// Transfer ownership to a new pointer. `self` is empty afterwards.
    pub fn take(&mut self) -> Self {
        Self(self.0.take())
    }
    /// Move `other` into `self`, returning the previous content.
    pub fn replace(&mut self, other: Self) -> Self {
        mem::replace(self, other)
    }

    /// Monadic bind. The value stays in `self`; `f` only borrows it.
    pub fn bind<U>(&mut self, f: impl FnOnce(&mut T) -> OptionPtr<U>) -> OptionPtr<U> {
        self.match_with(f, OptionPtr::none)
    }

    /// `p.map(f)` is `p.bind(|x| OptionPtr::some(f(x)))`.
    pub fn map<U>(&mut self, f: impl FnOnce(&mut T) -> U) -> OptionPtr<U> {
        self.bind(|x| OptionPtr::some(f(x)))
    }

    pub fn map_do(&mut self, f: impl FnOnce(&mut T)) {
        self.match_do(f, || {})
    }

    /// Eliminate the pointer: run `some` on the value if there is one, `none` otherwise. Every
    /// other combinator can be written in terms of this one.
    ///
    /// The borrow handed to `some` lives as long as the borrow of `self`, so `some` may return a
    /// reference into the value (e.g. to walk a chain of pointers without recursing).
    pub fn match_with<'a, R>(
        &'a mut self,
        some: impl FnOnce(&'a mut T) -> R,
        none: impl FnOnce() -> R,
    ) -> R {
        match self.0.as_deref_mut() {
            Some(val) => some(val),
            None => none(),
        }
    }

    /// Like `match_with` but only needs shared access.
    pub fn match_ref<'a, R>(&'a self, some: impl FnOnce(&'a T) -> R, none: impl FnOnce() -> R) -> R {
        match self.0.as_deref() {
            Some(val) => some(val),
            None => none(),
        }
    }

    pub fn match_do(&mut self, some: impl FnOnce(&mut T), none: impl FnOnce()) {
        self.match_with(some, none)
    }

    /// The held value, or `default` if there is none.
    pub fn get_or<'a>(&'a self, default: &'a T) -> &'a T {
        self.0.as_deref().unwrap_or(default)
    }
    pub fn get_or_mut<'a>(&'a mut self, default: &'a mut T) -> &'a mut T {
        self.0.as_deref_mut().unwrap_or(default)
    }

    /// Replace the held value with `f(value)` in place. Returns `self` for chaining.
    ///
    /// The process aborts if `f` panics, since the box would otherwise be left without a value.
    pub fn mutate(&mut self, f: impl FnOnce(T) -> T) -> &mut Self {
        if let Some(val) = self.0.as_deref_mut() {
            take_mut::take(val, f);
        }
        self
    }

    /// Move the value out, leaving `self` empty. Returns `default` if there was no value.
    pub fn take_or(&mut self, default: T) -> T {
        match self.0.take() {
            Some(val) => *val,
            None => default,
        }
    }

    /// Move the value out, apply `f` and box the result. `self` is empty afterwards.
    pub fn map_move<U>(&mut self, f: impl FnOnce(T) -> U) -> OptionPtr<U> {
        match self.0.take() {
            Some(val) => {
                tracing::trace!(from = type_name::<T>(), to = type_name::<U>(), "map_move");
                OptionPtr::some(f(*val))
            }
            None => OptionPtr::none(),
        }
    }

    pub fn into_inner(self) -> Result<T, Absent> {
        self.0.map(|val| *val).ok_or(Absent)
    }

    /// Overwrite our value with a clone of `other`'s. Does nothing unless both hold a value.
    pub fn copy_from(&mut self, other: &Self)
    where
        T: Clone,
    {
        if let (Some(dst), Some(src)) = (self.0.as_deref_mut(), other.0.as_deref()) {
            dst.clone_from(src);
        }
    }
}

impl<T> Default for OptionPtr<T> {
    fn default() -> Self {
        Self::none()
    }
}

impl<T> From<Option<T>> for OptionPtr<T> {
    fn from(val: Option<T>) -> Self {
        Self(val.map(Box::new))
    }
}

impl<T> From<OptionPtr<T>> for Option<T> {
    fn from(ptr: OptionPtr<T>) -> Self {
        ptr.0.map(|val| *val)
    }
}

impl<T: fmt::Display> fmt::Display for OptionPtr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_deref() {
            Some(val) => write!(f, "Some({val})"),
            None => write!(f, "None"),
        }
    }
}

#[cfg(feature = "unchecked-deref")]
impl<T> std::ops::Deref for OptionPtr<T> {
    type Target = T;
    /// Panics if the pointer is empty.
    fn deref(&self) -> &Self::Target {
        self.0.as_deref().expect("dereferenced an empty `OptionPtr`")
    }
}
#[cfg(feature = "unchecked-deref")]
impl<T> std::ops::DerefMut for OptionPtr<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_deref_mut().expect("dereferenced an empty `OptionPtr`")
    }
}

#[cfg(test)]
fn safediv(x: f64, y: i32) -> OptionPtr<f64> {
    if y == 0 {
        OptionPtr::none()
    } else {
        OptionPtr::some(x / y as f64)
    }
}

#[test]
fn test_take_moves_ownership() {
    let mut a = OptionPtr::some(String::from("owned"));
    let mut b = a.take();
    assert!(a.is_none());
    assert_eq!(b.take_or(String::new()), "owned");
    assert!(b.is_none());

    // Taking from an empty pointer yields another empty pointer.
    assert!(a.take().is_none());
}

#[test]
fn test_replace_releases_previous() {
    let mut a = OptionPtr::some(1);
    let old = a.replace(OptionPtr::some(2));
    assert_eq!(old, OptionPtr::some(1));
    assert_eq!(a, OptionPtr::some(2));
}

#[test]
fn test_clear_is_idempotent() {
    crate::test_utils::init_test_logging();
    let mut a = OptionPtr::some(vec![1, 2, 3]);
    a.clear();
    assert!(a.is_none());
    a.clear();
    assert!(a.is_none());
}

#[test]
fn test_match_on_empty_never_calls_some() {
    let mut p = OptionPtr::<i32>::none();
    let r = p.match_with(|_| panic!("some branch on empty pointer"), || "none");
    assert_eq!(r, "none");
    let mut hit_none = false;
    p.match_do(|_| panic!("some branch on empty pointer"), || hit_none = true);
    assert!(hit_none);
}

#[test]
fn test_chain() {
    let mut number = OptionPtr::some(20);
    let out = number
        .mutate(|x| x - 5)
        .map(|x| *x - 5)
        .bind(|x| safediv(100.0, *x))
        .mutate(|x| x * x)
        .match_with(|x| Some(*x), || None);
    assert_eq!(out, Some(100.0));
    // `map` and `bind` leave the source untouched; `mutate` updated it in place.
    assert_eq!(number, OptionPtr::some(15));

    let mut zero = OptionPtr::some(10);
    let mut got_none = false;
    zero.mutate(|x| x - 5)
        .map(|x| *x - 5)
        .bind(|x| safediv(100.0, *x))
        .match_do(|_| {}, || got_none = true);
    assert!(got_none);
}

#[test]
fn test_match_with_result() {
    let mut number = OptionPtr::some(50);
    assert_eq!(number.match_with(|y| *y / 2, || 0), 25);
    assert!(!number.match_with(|y| *y % 2 == 1, || false));
    assert_eq!(OptionPtr::<i32>::none().match_with(|y| *y / 2, || 0), 0);
}

#[test]
fn test_get_or() {
    let present = OptionPtr::some(3);
    let absent = OptionPtr::<i32>::none();
    assert_eq!(*present.get_or(&0), 3);
    assert_eq!(*absent.get_or(&0), 0);

    let mut present = present;
    let mut fallback = 0;
    *present.get_or_mut(&mut fallback) += 1;
    assert_eq!(present, OptionPtr::some(4));
    assert_eq!(fallback, 0);
}

#[test]
fn test_take_or() {
    let mut absent = OptionPtr::<i32>::none();
    assert_eq!(absent.take_or(42), 42);
    assert!(absent.is_none());

    let mut present = OptionPtr::some(7);
    assert_eq!(present.take_or(42), 7);
    assert!(present.is_none());
}

#[test]
fn test_map_move() {
    crate::test_utils::init_test_logging();
    let mut p = OptionPtr::some(String::from("abc"));
    let mut len = p.map_move(|s| s.len());
    assert!(p.is_none());
    assert_eq!(len.take_or(0), 3);

    let mut empty = OptionPtr::<String>::none();
    assert!(empty.map_move(|s| s.len()).is_none());
}

#[test]
fn test_copy_from() {
    let mut dst = OptionPtr::some(1);
    dst.copy_from(&OptionPtr::some(9));
    assert_eq!(dst, OptionPtr::some(9));

    dst.copy_from(&OptionPtr::none());
    assert_eq!(dst, OptionPtr::some(9));

    let mut empty: OptionPtr<i32> = OptionPtr::none();
    empty.copy_from(&OptionPtr::some(3));
    assert!(empty.is_none());
}

#[test]
fn test_into_inner_and_display() {
    assert_eq!(OptionPtr::some(5).into_inner(), Ok(5));
    assert_eq!(OptionPtr::<i32>::none().into_inner(), Err(Absent));
    assert_eq!(OptionPtr::some(5).to_string(), "Some(5)");
    assert_eq!(OptionPtr::<i32>::none().to_string(), "None");
    assert_eq!(OptionPtr::from(None::<u8>), OptionPtr::none());
}

#[test]
fn test_option_conversions() {
    let present: Option<i32> = OptionPtr::some(4).into();
    assert_eq!(present, Some(4));
    let absent: Option<i32> = OptionPtr::<i32>::none().into();
    assert_eq!(absent, None);

    let back: OptionPtr<i32> = present.into();
    assert_eq!(back, OptionPtr::some(4));
    let back: OptionPtr<i32> = absent.into();
    assert!(back.is_none());
}

#[test]
fn test_match_with_lends_value() {
    let mut outer = OptionPtr::some(OptionPtr::some(1));
    let inner = outer.match_with(Some, || None);
    if let Some(inner) = inner {
        inner.mutate(|x| x + 1);
    }
    assert_eq!(outer, OptionPtr::some(OptionPtr::some(2)));
}

#[cfg(feature = "unchecked-deref")]
#[test]
fn test_unchecked_deref() {
    let mut p = OptionPtr::some(3);
    *p += 1;
    assert_eq!(*p, 4);
}
