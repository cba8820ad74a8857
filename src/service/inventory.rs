use serde::Serialize;

use crate::api_defaults::{CACHE_NAME, FAST_KEY_PREFIX};
use crate::api_traits::RecipeFetcher;
use crate::cache::{DurableContainer, DurableStore};
use crate::keys::{self, RecipeId};
use crate::storage::{self, FastStore};
use crate::Result;
use crate::{log_debug, log_warn};

use super::RecipeCache;

/// Cached keys per store. Durable keys are request URLs, fast keys carry the
/// reserved prefix.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CacheInventory {
    pub durable: Vec<String>,
    pub fast: Vec<String>,
}

impl CacheInventory {
    pub fn is_empty(&self) -> bool {
        self.durable.is_empty() && self.fast.is_empty()
    }
}

impl<F: RecipeFetcher, D: DurableStore, S: FastStore> RecipeCache<F, D, S> {
    pub fn list(&self) -> CacheInventory {
        let durable = match self.durable.open(CACHE_NAME).and_then(|c| c.keys()) {
            Ok(keys) => keys,
            Err(err) => {
                log_warn!("Unable to list the durable store: {}", err);
                Vec::new()
            }
        };
        let fast = match storage::keys_with_prefix(&self.fast, FAST_KEY_PREFIX) {
            Ok(keys) => keys,
            Err(err) => {
                log_warn!("Unable to list the fast store: {}", err);
                Vec::new()
            }
        };
        CacheInventory { durable, fast }
    }

    /// Drop `id` from both stores. Missing entries are fine.
    pub fn invalidate(&self, id: &RecipeId) -> Result<bool> {
        let url = keys::durable_key(&self.base_url, id);
        match self.durable.open(CACHE_NAME).and_then(|c| c.delete(&url)) {
            Ok(true) => log_debug!("Removed {} from the durable store", url),
            Ok(false) => {}
            Err(err) => log_warn!("Unable to remove {} from the durable store: {}", url, err),
        }
        let fast_key = keys::fast_key(id);
        if let Err(err) = self.fast.remove(&fast_key) {
            log_warn!("Unable to remove {} from the fast store: {}", fast_key, err);
        }
        Ok(true)
    }

    /// Drop the whole durable container and every recipe key in the fast
    /// store. Keys are collected before any is removed, removing shifts the
    /// positions the fast store enumerates by.
    pub fn invalidate_all(&self) -> Result<bool> {
        match self.durable.delete(CACHE_NAME) {
            Ok(true) => log_debug!("Durable container {} deleted", CACHE_NAME),
            Ok(false) => {}
            Err(err) => log_warn!("Unable to delete durable container {}: {}", CACHE_NAME, err),
        }
        match storage::keys_with_prefix(&self.fast, FAST_KEY_PREFIX) {
            Ok(keys) => {
                for key in keys {
                    if let Err(err) = self.fast.remove(&key) {
                        log_warn!("Unable to remove {} from the fast store: {}", key, err);
                    }
                }
            }
            Err(err) => log_warn!("Unable to list the fast store: {}", err),
        }
        Ok(true)
    }
}
