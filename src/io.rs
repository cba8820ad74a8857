use crate::{http::Headers, http::Request, Result};
use serde::Serialize;

/// A trait for the HTTP protocol. Implementors need to conform with the HTTP
/// constraints and requirements. Implementors accept a `Request` that wraps
/// headers, payloads and HTTP methods. Clients can potentially do HTTP calls
/// against a remote server or mock the responses for testing purposes.
///
/// Any status code received from the remote is an `Ok` response. `Err` is
/// reserved for failures where no response was received at all (connection
/// refused, DNS, timeouts).
pub trait HttpRunner {
    type Response;
    fn run<T: Serialize>(&self, cmd: &mut Request<T>) -> Result<Self::Response>;
}

/// Adapts lower level I/O HTTP outputs to a common Response.
#[derive(Clone, Debug, Builder)]
pub struct HttpResponse {
    #[builder(default)]
    pub status: u16,
    #[builder(default)]
    pub body: String,
    /// Optional headers, lowercase names.
    #[builder(setter(into, strip_option), default)]
    pub headers: Option<Headers>,
}

pub type Response = HttpResponse;

impl HttpResponse {
    pub fn builder() -> HttpResponseBuilder {
        HttpResponseBuilder::default()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(key))
            .map(|s| s.as_str())
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
