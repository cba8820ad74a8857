//! Fast store: a flat, synchronous string to string key space. It may hold
//! data that has nothing to do with recipes, so callers only ever touch keys
//! under their own prefix.

use crate::Result;

pub mod inmemory;
pub mod local;

pub use inmemory::InMemoryStorage;
pub use local::LocalStorage;

pub trait FastStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a key that is not there is not an error.
    fn remove(&self, key: &str) -> Result<()>;
    fn len(&self) -> Result<usize>;
    /// Key at position `index` in the store's enumeration order.
    fn key(&self, index: usize) -> Result<Option<String>>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl<T: FastStore + ?Sized> FastStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn len(&self) -> Result<usize> {
        (**self).len()
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        (**self).key(index)
    }
}

/// Enumerate the store and collect the keys that start with `prefix`.
pub fn keys_with_prefix<S: FastStore + ?Sized>(store: &S, prefix: &str) -> Result<Vec<String>> {
    let mut keys = Vec::new();
    for index in 0..store.len()? {
        if let Some(key) = store.key(index)? {
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}
