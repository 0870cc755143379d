//! Change-detecting properties.
//!
//! [`Property<T>`] is the backing store for host-visible state such as the
//! snapshot of the active index. `set()` reports whether the value actually
//! changed so the owner can decide whether to notify.
//!
//! ```
//! use swipedeck_core::Property;
//!
//! let shown = Property::new(0usize);
//! assert!(!shown.set(0));
//! assert!(shown.set(1));
//! assert_eq!(shown.get(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// A value cell with change detection.
///
/// Uses a `RwLock` internally and is `Send + Sync` for `T: Send + Sync`.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if it changed.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

/// A shared, read-only view of a property.
///
/// The owner keeps write access to the `Arc<Property<T>>`; readers on any
/// thread see the latest value through this view.
pub struct ReadOnlyProperty<T> {
    inner: Arc<Property<T>>,
}

impl<T: Clone> ReadOnlyProperty<T> {
    /// Create a read-only view over a shared property.
    pub fn new(property: Arc<Property<T>>) -> Self {
        Self { inner: property }
    }

    /// Get the current value.
    pub fn get(&self) -> T {
        self.inner.get()
    }

    /// Access the value through a closure.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        self.inner.with(f)
    }
}

impl<T> Clone for ReadOnlyProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for ReadOnlyProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlyProperty").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set_detects_change() {
        let prop = Property::new(10);

        assert!(!prop.set(10));
        assert!(prop.set(20));
        assert_eq!(prop.get(), 20);
    }

    #[test]
    fn test_property_with_closure() {
        let prop = Property::new(vec![1, 2, 3]);
        let sum: i32 = prop.with(|v| v.iter().sum());
        assert_eq!(sum, 6);
    }

    #[test]
    fn test_read_only_view_tracks_owner() {
        let prop = Arc::new(Property::new(0usize));
        let view = ReadOnlyProperty::new(prop.clone());

        prop.set(2);
        assert_eq!(view.get(), 2);

        let view_clone = view.clone();
        let seen = std::thread::spawn(move || view_clone.get()).join().unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_property_default() {
        let prop: Property<usize> = Property::default();
        assert_eq!(prop.get(), 0);
    }
}
