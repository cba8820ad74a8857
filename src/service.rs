//! Read-through cache in front of the recipes API.
//!
//! Reads go durable store, fast store, network, in that order, stopping at
//! the first hit. A network hit is written back to both stores. When the
//! network fails the fast store gets one last chance before the failure is
//! handed to the caller. Store errors of any kind are logged and otherwise
//! ignored; they never fail a read.

use serde::Serialize;
use serde_json::Value;

use crate::api_defaults::{CACHE_NAME, ENVELOPE_DATA_FIELD};
use crate::api_traits::RecipeFetcher;
use crate::cache::{DurableContainer, DurableStore};
use crate::error::RCError;
use crate::keys::{self, RecipeId};
use crate::storage::FastStore;
use crate::Result;
use crate::{log_debug, log_info, log_warn};

pub mod inventory;

pub use inventory::CacheInventory;

#[derive(Clone, Copy, Debug)]
pub struct FetchOptions {
    /// Consult the stores before going to the network.
    pub use_cache: bool,
    /// Skip every cache read. The network result is still written back.
    pub force: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions {
            use_cache: true,
            force: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Durable,
    Fast,
    FastOffline,
    Network,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CacheResult {
    pub success: bool,
    pub data: Value,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
}

impl CacheResult {
    fn hit(data: Value, source: Source) -> Self {
        CacheResult {
            success: true,
            data,
            cached: true,
            source: Some(source),
        }
    }

    fn network(data: Value) -> Self {
        CacheResult {
            success: true,
            data,
            cached: false,
            source: Some(Source::Network),
        }
    }

    /// Response that did not come in the expected envelope. Handed back as
    /// is and never cached.
    fn raw(data: Value) -> Self {
        CacheResult {
            success: true,
            data,
            cached: false,
            source: None,
        }
    }
}

pub struct RecipeCache<F, D, S> {
    base_url: String,
    fetcher: F,
    durable: D,
    fast: S,
}

impl<F: RecipeFetcher, D: DurableStore, S: FastStore> RecipeCache<F, D, S> {
    pub fn new(base_url: &str, fetcher: F, durable: D, fast: S) -> Self {
        RecipeCache {
            base_url: base_url.to_string(),
            fetcher,
            durable,
            fast,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn durable(&self) -> &D {
        &self.durable
    }

    pub fn fast(&self) -> &S {
        &self.fast
    }

    pub fn fetch(&self, id: &RecipeId, options: FetchOptions) -> Result<CacheResult> {
        let url = keys::durable_key(&self.base_url, id);
        let fast_key = keys::fast_key(id);
        if options.use_cache && !options.force {
            if let Some(data) = self.read_durable(&url) {
                log_debug!("Recipe {} served from the durable store", id);
                return Ok(CacheResult::hit(data, Source::Durable));
            }
            if let Some(data) = self.read_fast(&fast_key) {
                log_debug!("Recipe {} served from the fast store", id);
                return Ok(CacheResult::hit(data, Source::Fast));
            }
        }
        match self.fetcher.fetch_recipe(id) {
            Ok(response) => {
                let data = match response.get(ENVELOPE_DATA_FIELD) {
                    Some(data) if has_payload(data) => data.clone(),
                    _ => {
                        log_warn!(
                            "Recipe {} response has no usable `{}`, returning it unchanged",
                            id,
                            ENVELOPE_DATA_FIELD
                        );
                        return Ok(CacheResult::raw(response));
                    }
                };
                let body = serde_json::to_string(&data)?;
                self.write_durable(&url, &body);
                self.write_fast(&fast_key, &body);
                Ok(CacheResult::network(data))
            }
            Err(err) => {
                log_warn!("Fetching recipe {} failed: {}", id, err);
                let network_failure = err
                    .downcast_ref::<RCError>()
                    .is_some_and(RCError::is_network_failure);
                if network_failure {
                    if let Some(data) = self.read_fast(&fast_key) {
                        log_info!("Recipe {} served from the fast store while offline", id);
                        return Ok(CacheResult::hit(data, Source::FastOffline));
                    }
                }
                Err(err)
            }
        }
    }

    fn open_durable(&self) -> Option<D::Container> {
        match self.durable.open(CACHE_NAME) {
            Ok(container) => Some(container),
            Err(err) => {
                log_warn!("Durable store unavailable: {}", err);
                None
            }
        }
    }

    fn read_durable(&self, url: &str) -> Option<Value> {
        let container = self.open_durable()?;
        let entry = match container.lookup(url) {
            Ok(entry) => entry?,
            Err(err) => {
                log_warn!("Durable store read of {} failed: {}", url, err);
                return None;
            }
        };
        match serde_json::from_str(&entry.body) {
            Ok(data) => Some(data),
            Err(err) => {
                log_warn!("Durable store entry {} is not valid JSON: {}", url, err);
                None
            }
        }
    }

    fn write_durable(&self, url: &str, body: &str) {
        if let Some(container) = self.open_durable() {
            if let Err(err) = container.put(url, body) {
                log_warn!("Durable store write of {} failed: {}", url, err);
            }
        }
    }

    /// A value that does not parse is removed so it is not tried again.
    fn read_fast(&self, key: &str) -> Option<Value> {
        let value = match self.fast.get(key) {
            Ok(value) => value?,
            Err(err) => {
                log_warn!("Fast store read of {} failed: {}", key, err);
                return None;
            }
        };
        match serde_json::from_str(&value) {
            Ok(data) => Some(data),
            Err(err) => {
                log_warn!("Fast store entry {} is corrupt, removing it: {}", key, err);
                if let Err(err) = self.fast.remove(key) {
                    log_warn!("Unable to remove corrupt fast store entry {}: {}", key, err);
                }
                None
            }
        }
    }

    fn write_fast(&self, key: &str, body: &str) {
        if let Err(err) = self.fast.set(key, body) {
            log_warn!("Fast store write of {} failed: {}", key, err);
        }
    }
}

/// Empty envelope payloads: null, false, 0 and "". Objects and arrays always
/// count, even when empty.
fn has_payload(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
