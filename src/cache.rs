//! Durable store: request URL keyed, persistent, organised in named
//! containers. The only container in use is `api_defaults::CACHE_NAME`.

use crate::time::Seconds;
use crate::Result;

pub mod filesystem;
pub mod inmemory;
pub mod nocache;

pub use filesystem::FileCache;
pub use inmemory::InMemoryCache;
pub use nocache::NoCache;

/// A cached response body together with the request URL it was stored under.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedResponse {
    pub url: String,
    pub stored_at: Seconds,
    pub body: String,
}

pub trait DurableStore {
    type Container: DurableContainer;

    /// Open, creating it if needed, the container `name`. Fails with
    /// `RCError::StoreUnavailable` when the store cannot be used at all.
    fn open(&self, name: &str) -> Result<Self::Container>;
    /// Delete the container `name` and everything in it. `Ok(false)` if it
    /// did not exist.
    fn delete(&self, name: &str) -> Result<bool>;
}

pub trait DurableContainer {
    fn lookup(&self, url: &str) -> Result<Option<CachedResponse>>;
    /// Store `body` under `url`, replacing any previous entry as a whole.
    fn put(&self, url: &str, body: &str) -> Result<()>;
    /// `Ok(false)` if there was no entry for `url`.
    fn delete(&self, url: &str) -> Result<bool>;
    /// Request URLs of all the entries, oldest first.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<T: DurableStore + ?Sized> DurableStore for &T {
    type Container = T::Container;

    fn open(&self, name: &str) -> Result<Self::Container> {
        (**self).open(name)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        (**self).delete(name)
    }
}
