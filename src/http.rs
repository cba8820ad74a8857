use crate::config::ConfigProperties;
use crate::error::RCError;
use crate::io::{HttpRunner, Response};
use crate::time::Milliseconds;
use crate::Result;
use serde::Serialize;
use std::collections::{hash_map, HashMap};
use std::time::Duration;
use ureq::{Agent, RequestBuilder as UreqRequest};

/// Blocking HTTP client backed by a ureq agent.
pub struct Client {
    agent: Agent,
}

impl Client {
    pub fn new<D: ConfigProperties>(config: &D) -> Self {
        let timeout = Duration::from_secs(*config.request_timeout());
        // Status codes >= 400 are regular responses for us. Callers decide
        // what an error is, see `HttpRunner`.
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Client { agent }
    }

    fn prepare<T, B>(&self, request: &Request<T>, ureq_req: UreqRequest<B>) -> UreqRequest<B> {
        // set incoming requests headers
        let ureq_req = request
            .headers()
            .iter()
            .fold(ureq_req, |req, (key, value)| {
                req.header(key.as_str(), value.as_str())
            });
        let ureq_req = request
            .query()
            .iter()
            .fold(ureq_req, |req, (key, value)| req.query(key, value));
        match request.timeout {
            Some(timeout) => ureq_req
                .config()
                .timeout_global(Some(timeout.into()))
                .build(),
            None => ureq_req,
        }
    }

    fn get<T>(&self, request: &Request<T>) -> Result<Response> {
        let ureq_req = self.prepare(request, self.agent.get(request.url()));
        into_response(ureq_req.call())
    }

    fn head<T>(&self, request: &Request<T>) -> Result<Response> {
        let ureq_req = self.prepare(request, self.agent.head(request.url()));
        into_response(ureq_req.call())
    }

    fn delete<T>(&self, request: &Request<T>) -> Result<Response> {
        let ureq_req = self.prepare(request, self.agent.delete(request.url()));
        into_response(ureq_req.call())
    }

    fn update_create<T: Serialize>(
        &self,
        request: &Request<T>,
        ureq_req: UreqRequest<ureq::typestate::WithBody>,
    ) -> Result<Response> {
        let ureq_req = self.prepare(request, ureq_req);
        match &request.body {
            Some(body) => into_response(ureq_req.send_json(body)),
            None => into_response(ureq_req.send_empty()),
        }
    }
}

fn into_response(
    result: std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error>,
) -> Result<Response> {
    let mut response = result.map_err(|err| RCError::HttpTransportError(err.to_string()))?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .fold(Headers::new(), |mut headers, (name, value)| {
            headers.set(
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or_default(),
            );
            headers
        });
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|err| RCError::HttpTransportError(err.to_string()))?;
    let response = Response::builder()
        .status(status)
        .body(body)
        .headers(headers)
        .build()?;
    Ok(response)
}

#[derive(Clone, Debug, Default)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Headers(HashMap::new())
    }

    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    pub fn iter(&self) -> hash_map::Iter<String, String> {
        self.0.iter()
    }
}

#[derive(Builder)]
#[builder(pattern = "owned")]
pub struct Request<T> {
    #[builder(setter(into, strip_option), default)]
    pub body: Option<T>,
    #[builder(default)]
    headers: Headers,
    #[builder(default)]
    query: Vec<(String, String)>,
    pub method: Method,
    #[builder(setter(into))]
    url: String,
    /// Overrides the client wide timeout for this request only.
    #[builder(setter(into, strip_option), default)]
    pub timeout: Option<Milliseconds>,
}

impl<T> Request<T> {
    pub fn builder() -> RequestBuilder<T> {
        RequestBuilder::default()
    }

    pub fn new(url: &str, method: Method) -> Self {
        Request {
            body: None,
            headers: Headers::new(),
            query: Vec::new(),
            method,
            url: url.to_string(),
            timeout: None,
        }
    }

    pub fn with_body(mut self, body: T) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Milliseconds) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_header(&mut self, key: &str, value: &str) {
        self.headers.set(key.to_string(), value.to_string());
    }

    pub fn add_query<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.query.push((key.into(), value.into()));
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Method {
    #[default]
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpRunner for Client {
    type Response = Response;

    fn run<T: Serialize>(&self, cmd: &mut Request<T>) -> Result<Self::Response> {
        match cmd.method {
            Method::GET => self.get(cmd),
            Method::HEAD => self.head(cmd),
            Method::DELETE => self.delete(cmd),
            Method::POST => {
                let ureq_req = self.agent.post(cmd.url());
                self.update_create(cmd, ureq_req)
            }
            Method::PUT => {
                let ureq_req = self.agent.put(cmd.url());
                self.update_create(cmd, ureq_req)
            }
            Method::PATCH => {
                let ureq_req = self.agent.patch(cmd.url());
                self.update_create(cmd, ureq_req)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_request_builder_defaults() {
        let request: Request<()> = Request::builder()
            .method(Method::GET)
            .url("http://localhost/api/v1/recipes/1")
            .build()
            .unwrap();
        assert_eq!("http://localhost/api/v1/recipes/1", request.url());
        assert!(request.body.is_none());
        assert!(request.timeout.is_none());
        assert!(request.query().is_empty());
    }

    #[test]
    fn test_request_query_keeps_insertion_order() {
        let mut request: Request<()> = Request::new("http://localhost", Method::GET);
        request.add_query("page", "2");
        request.add_query("limit", "10");
        assert_eq!(
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "10".to_string())
            ],
            request.query()
        );
    }

    #[test]
    fn test_request_with_timeout() {
        let request: Request<()> =
            Request::new("http://localhost", Method::HEAD).with_timeout(Milliseconds::new(250));
        assert_eq!(Some(Milliseconds::new(250)), request.timeout);
    }
}
