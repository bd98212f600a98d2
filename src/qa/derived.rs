//! Memoized configuration-derived components
//!
//! A `DerivedCell` caches one expensive component (model client, retrieval
//! engine) keyed on a hash of the configuration fields it was built from.
//! The cached value is reused until the key changes; a key change rebuilds
//! on the next access. This replaces per-call construction without tying
//! component lifetime to a specific config struct.

use std::sync::{Arc, Mutex};

/// One-slot cache for a config-derived component
pub struct DerivedCell<T: ?Sized> {
    slot: Mutex<Option<(u64, Arc<T>)>>,
}

impl<T: ?Sized> DerivedCell<T> {
    /// Create an empty cell
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached component for `key`, building it if the cell is
    /// empty or was built for a different key.
    pub fn get_or_build<E>(
        &self,
        key: u64,
        build: impl FnOnce() -> Result<Arc<T>, E>,
    ) -> Result<Arc<T>, E> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((cached_key, value)) = slot.as_ref() {
            if *cached_key == key {
                return Ok(Arc::clone(value));
            }
        }

        let built = build()?;
        *slot = Some((key, Arc::clone(&built)));
        Ok(built)
    }

    /// Seed the cell with an externally constructed component
    pub fn prime(&self, key: u64, value: Arc<T>) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some((key, value));
    }
}

impl<T: ?Sized> Default for DerivedCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn build_counted(counter: &AtomicUsize, value: usize) -> Result<Arc<usize>, Infallible> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(value))
    }

    #[test]
    fn test_builds_once_per_key() {
        let cell: DerivedCell<usize> = DerivedCell::new();
        let builds = AtomicUsize::new(0);

        let first = cell.get_or_build(1, || build_counted(&builds, 10)).unwrap();
        let second = cell.get_or_build(1, || build_counted(&builds, 11)).unwrap();

        assert_eq!(*first, 10);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_key_change_rebuilds() {
        let cell: DerivedCell<usize> = DerivedCell::new();
        let builds = AtomicUsize::new(0);

        cell.get_or_build(1, || build_counted(&builds, 10)).unwrap();
        let rebuilt = cell.get_or_build(2, || build_counted(&builds, 20)).unwrap();

        assert_eq!(*rebuilt, 20);
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_build_failure_leaves_cell_empty() {
        let cell: DerivedCell<usize> = DerivedCell::new();

        let failed: Result<Arc<usize>, &str> = cell.get_or_build(1, || Err("nope"));
        assert!(failed.is_err());

        let builds = AtomicUsize::new(0);
        cell.get_or_build(1, || build_counted(&builds, 10)).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prime_short_circuits_building() {
        let cell: DerivedCell<usize> = DerivedCell::new();
        cell.prime(7, Arc::new(42));

        let builds = AtomicUsize::new(0);
        let value = cell.get_or_build(7, || build_counted(&builds, 0)).unwrap();
        assert_eq!(*value, 42);
        assert_eq!(builds.load(Ordering::SeqCst), 0);
    }
}
