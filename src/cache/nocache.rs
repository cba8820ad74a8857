use crate::cache::{CachedResponse, DurableContainer, DurableStore};
use crate::error::RCError;

use crate::Result;

/// A durable store that is not there. Every fetch falls through to the fast
/// store and the network.
pub struct NoCache;

impl DurableStore for NoCache {
    type Container = NoCache;

    fn open(&self, name: &str) -> Result<Self::Container> {
        Err(RCError::StoreUnavailable(format!("cannot open {name}: durable store disabled")).into())
    }

    fn delete(&self, name: &str) -> Result<bool> {
        Err(RCError::StoreUnavailable(format!("cannot delete {name}: durable store disabled")).into())
    }
}

impl DurableContainer for NoCache {
    fn lookup(&self, _url: &str) -> Result<Option<CachedResponse>> {
        Ok(None)
    }

    fn put(&self, _url: &str, _body: &str) -> Result<()> {
        Ok(())
    }

    fn delete(&self, _url: &str) -> Result<bool> {
        Ok(false)
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
