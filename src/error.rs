use std::fmt::Display;

use anyhow::{anyhow, Context, Result};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RCError {
    #[error("Precondition not met error: {0}")]
    PreconditionNotMet(String),
    #[error("Time conversion error: {0}")]
    TimeConversionError(String),
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Invalid recipe id: {0}")]
    InvalidRecipeId(String),
    /// The durable store cannot be used in this environment.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    /// A cached entry could not be deserialized.
    #[error("Store corrupt: {0}")]
    StoreCorrupt(String),
    /// Quota exceeded, write denied, disk full...
    #[error("Store write failure: {0}")]
    StoreWriteFailure(String),
    #[error("Cache location does not exist: {0}")]
    CacheLocationDoesNotExist(String),
    #[error("Cache location is not a directory: {0}")]
    CacheLocationIsNotADirectory(String),
    #[error("Cache location is not writeable: {0}")]
    CacheLocationIsNotWriteable(String),
    #[error("HTTP transport error: {0}")]
    HttpTransportError(String),
    #[error("Remote server error: status {0}: {1}")]
    RemoteServerError(u16, String),
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl RCError {
    /// True for the failures that make the recipe API unreachable or
    /// unusable. These are the ones that trigger the offline fallback.
    pub fn is_network_failure(&self) -> bool {
        matches!(
            self,
            RCError::HttpTransportError(_) | RCError::RemoteServerError(_, _)
        )
    }
}

pub trait AddContext<T, E>: Context<T, E> {
    fn err_context<C: Display + Send + Sync + 'static>(self, msg: C) -> Result<T, anyhow::Error>
    where
        Self: Sized,
    {
        self.with_context(|| msg.to_string())
    }
}

impl<U, T, E> AddContext<T, E> for U where U: Context<T, E> {}

pub fn gen<T: AsRef<str>>(msg: T) -> anyhow::Error {
    anyhow!(msg.as_ref().to_string())
}
