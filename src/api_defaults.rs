// Name of the durable store container. Bump the version suffix if the on-disk
// entry format changes, old containers are then simply never opened again.
pub const CACHE_NAME: &str = "recipes-cache-v1";

// Reserved prefix in the fast store. The fast store is shared with other
// application data, only keys under this prefix belong to us.
pub const FAST_KEY_PREFIX: &str = "recipe_cache_";

// File backing the fast store, relative to the cache location.
pub const FAST_STORE_FILE: &str = "local_storage.json";

pub const RECIPES_API_PATH: &str = "/api/v1/recipes";

// Envelope field holding the recipe in API responses.
pub const ENVELOPE_DATA_FIELD: &str = "data";

pub const DEFAULT_PROBE_TIMEOUT_MILLISECONDS: u64 = 3000;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

// Browsers give local storage around 5MiB per origin. Mimic that.
pub const DEFAULT_FAST_STORE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;
