use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{
    cache::{CachedResponse, DurableContainer, DurableStore},
    error::RCError,
    time::now_epoch_seconds,
};

use crate::Result;

type Entries = Rc<RefCell<Vec<CachedResponse>>>;

/// Durable store kept in memory. Used in tests and when no cache location is
/// configured.
#[derive(Default)]
pub struct InMemoryCache {
    containers: RefCell<HashMap<String, Entries>>,
    fail_writes: bool,
    puts: Rc<RefCell<u32>>,
}

impl InMemoryCache {
    /// Every `put` fails with `RCError::StoreWriteFailure`.
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn puts(&self) -> u32 {
        *self.puts.borrow()
    }
}

impl DurableStore for InMemoryCache {
    type Container = InMemoryContainer;

    fn open(&self, name: &str) -> Result<Self::Container> {
        let entries = self
            .containers
            .borrow_mut()
            .entry(name.to_string())
            .or_default()
            .clone();
        Ok(InMemoryContainer {
            entries,
            fail_writes: self.fail_writes,
            puts: self.puts.clone(),
        })
    }

    fn delete(&self, name: &str) -> Result<bool> {
        Ok(self.containers.borrow_mut().remove(name).is_some())
    }
}

pub struct InMemoryContainer {
    entries: Entries,
    fail_writes: bool,
    puts: Rc<RefCell<u32>>,
}

impl DurableContainer for InMemoryContainer {
    fn lookup(&self, url: &str) -> Result<Option<CachedResponse>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .find(|entry| entry.url == url)
            .cloned())
    }

    fn put(&self, url: &str, body: &str) -> Result<()> {
        if self.fail_writes {
            return Err(RCError::StoreWriteFailure(format!("{url}: write denied")).into());
        }
        *self.puts.borrow_mut() += 1;
        let entry = CachedResponse {
            url: url.to_string(),
            stored_at: now_epoch_seconds(),
            body: body.to_string(),
        };
        let mut entries = self.entries.borrow_mut();
        match entries.iter_mut().find(|e| e.url == url) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    fn delete(&self, url: &str) -> Result<bool> {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.url != url);
        Ok(entries.len() != before)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .entries
            .borrow()
            .iter()
            .map(|entry| entry.url.clone())
            .collect())
    }
}
