pub mod error;
pub mod option_array;
pub mod option_ptr;
pub mod search_tree;

pub use error::{Absent, ParseOrderError};
pub use option_array::OptionArray;
pub use option_ptr::OptionPtr;
pub use search_tree::{Comparator, Order, SearchTree, TreeConfig};

/// Allocate `val` on the heap. Shorthand for `OptionPtr::some`.
pub fn some<T>(val: T) -> OptionPtr<T> {
    OptionPtr::some(val)
}

pub const fn nothing<T>() -> OptionPtr<T> {
    OptionPtr::none()
}

/// A present array of `len` default elements. Shorthand for `OptionArray::with_len`.
pub fn some_array<T: Default>(len: usize) -> OptionArray<T> {
    OptionArray::with_len(len)
}

#[cfg(test)]
pub mod test_utils {
    /// Route `tracing` output to the test harness. Filter with `RUST_LOG`, default `trace`.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Ignore the error if another test already installed the subscriber.
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
            )
            .with_test_writer()
            .try_init();
    }
}

#[test]
fn test_free_constructors() {
    test_utils::init_test_logging();

    let mut p = some(3);
    assert_eq!(p.take_or(0), 3);
    assert!(nothing::<u8>().is_none());

    let mut array = some_array::<u8>(2);
    assert_eq!(array.size(), 2);
    array.clear();
    assert!(!array.is_present());
}
