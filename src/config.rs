//! Config file parsing and validation.

use crate::api_defaults::{
    DEFAULT_FAST_STORE_QUOTA_BYTES, DEFAULT_PROBE_TIMEOUT_MILLISECONDS,
    DEFAULT_REQUEST_TIMEOUT_SECONDS,
};
use crate::error::{AddContext, RCError};
use crate::time::{Milliseconds, Seconds};
use crate::Result;
use serde::Deserialize;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

/// Environment variable that takes precedence over `base_url` in the config
/// file.
pub const BASE_URL_ENV_VAR: &str = "RCACHE_BASE_URL";

pub trait ConfigProperties {
    fn base_url(&self) -> &str;
    fn cache_location(&self) -> Option<&str>;
    fn probe_timeout(&self) -> Milliseconds {
        Milliseconds::new(DEFAULT_PROBE_TIMEOUT_MILLISECONDS)
    }
    fn request_timeout(&self) -> Seconds {
        Seconds::new(DEFAULT_REQUEST_TIMEOUT_SECONDS)
    }
    fn fast_store_quota(&self) -> u64 {
        DEFAULT_FAST_STORE_QUOTA_BYTES
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    base_url: Option<String>,
    cache_location: Option<String>,
    probe_timeout: Option<String>,
    request_timeout: Option<String>,
    fast_store_quota: Option<u64>,
}

#[derive(Clone, Debug, Default)]
pub struct Config {
    base_url: String,
    cache_location: Option<String>,
    probe_timeout: Milliseconds,
    request_timeout: Seconds,
    fast_store_quota: u64,
}

impl Config {
    pub fn new<T: Read>(mut reader: T) -> Result<Self> {
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        let file: ConfigFile = toml::from_str(&data)
            .map_err(|err| RCError::ConfigurationError(format!("Invalid TOML: {err}")))?;
        Config::from_file(file, std::env::var(BASE_URL_ENV_VAR).ok())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        match File::open(path.as_ref()) {
            Ok(f) => Config::new(f).err_context(format!(
                "Unable to read config file at {}",
                path.as_ref().display()
            )),
            // All settings have defaults except the base url. That one can
            // come from the environment.
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Config::from_file(ConfigFile::default(), std::env::var(BASE_URL_ENV_VAR).ok())
                    .err_context(format!(
                        "No config file found at {}. Run `rc init` to create one",
                        path.as_ref().display()
                    ))
            }
            Err(e) => Err(e).err_context(format!(
                "Unable to open config file at {}",
                path.as_ref().display()
            )),
        }
    }

    fn from_file(file: ConfigFile, base_url_env: Option<String>) -> Result<Self> {
        let base_url = base_url_env
            .or(file.base_url)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                RCError::ConfigurationError(format!(
                    "No base_url found in config and {BASE_URL_ENV_VAR} is not set"
                ))
            })?;
        let probe_timeout = match file.probe_timeout {
            Some(timeout) => Milliseconds::try_from(timeout.as_str())?,
            None => Milliseconds::new(DEFAULT_PROBE_TIMEOUT_MILLISECONDS),
        };
        let request_timeout = match file.request_timeout {
            Some(timeout) => Seconds::try_from(timeout.as_str())?,
            None => Seconds::new(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        };
        Ok(Config {
            base_url: base_url.trim().to_string(),
            cache_location: file.cache_location,
            probe_timeout,
            request_timeout,
            fast_store_quota: file
                .fast_store_quota
                .unwrap_or(DEFAULT_FAST_STORE_QUOTA_BYTES),
        })
    }
}

impl ConfigProperties for Config {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cache_location(&self) -> Option<&str> {
        self.cache_location.as_deref()
    }

    fn probe_timeout(&self) -> Milliseconds {
        self.probe_timeout
    }

    fn request_timeout(&self) -> Seconds {
        self.request_timeout
    }

    fn fast_store_quota(&self) -> u64 {
        self.fast_store_quota
    }
}

impl ConfigProperties for Arc<Config> {
    fn base_url(&self) -> &str {
        self.as_ref().base_url()
    }

    fn cache_location(&self) -> Option<&str> {
        self.as_ref().cache_location()
    }

    fn probe_timeout(&self) -> Milliseconds {
        self.as_ref().probe_timeout()
    }

    fn request_timeout(&self) -> Seconds {
        self.as_ref().request_timeout()
    }

    fn fast_store_quota(&self) -> u64 {
        self.as_ref().fast_store_quota()
    }
}
