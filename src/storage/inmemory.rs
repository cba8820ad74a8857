use std::{cell::RefCell, collections::BTreeMap};

use crate::error::RCError;
use crate::storage::FastStore;
use crate::Result;

#[derive(Default)]
pub struct InMemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
    quota: Option<u64>,
    sets: RefCell<u32>,
}

impl InMemoryStorage {
    /// Writes that would take the store over `bytes` fail with
    /// `RCError::StoreWriteFailure`, like a browser's quota exceeded error.
    pub fn with_quota(mut self, bytes: u64) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Number of successful `set` calls.
    pub fn sets(&self) -> u32 {
        *self.sets.borrow()
    }

    fn usage_with(&self, key: &str, value: &str) -> u64 {
        let items = self.items.borrow();
        let current: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        (current + key.len() + value.len()) as u64
    }
}

impl FastStore for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota {
            if self.usage_with(key, value) > quota {
                return Err(RCError::StoreWriteFailure(format!(
                    "quota of {quota} bytes exceeded writing {key}"
                ))
                .into());
            }
        }
        *self.sets.borrow_mut() += 1;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.items.borrow().len())
    }

    fn key(&self, index: usize) -> Result<Option<String>> {
        Ok(self.items.borrow().keys().nth(index).cloned())
    }
}
