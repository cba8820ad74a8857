use std::sync::Arc;
use std::time::Duration;

use httpmock::prelude::*;
use httpmock::Method::HEAD;
use serde_json::json;

use rcache::config::ConfigProperties;
use rcache::connectivity::{ConnectivityMonitor, ProbeOptions};
use rcache::error::RCError;
use rcache::http::{self, Client, Request};
use rcache::io::HttpRunner;
use rcache::time::Milliseconds;

struct ConfigMock {
    base_url: String,
}

impl ConfigMock {
    fn new(base_url: &str) -> Self {
        ConfigMock {
            base_url: base_url.to_string(),
        }
    }
}

impl ConfigProperties for ConfigMock {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cache_location(&self) -> Option<&str> {
        None
    }
}

#[test]
fn test_http_runner() {
    let server = MockServer::start();
    let server_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/recipes/42")
            .header("accept", "application/json");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"data": {"id": "42", "name": "Soto"}}));
    });
    let runner = Client::new(&ConfigMock::new(&server.base_url()));
    let mut request: Request<()> =
        Request::new(&server.url("/api/v1/recipes/42"), http::Method::GET);
    request.set_header("Accept", "application/json");
    let response = runner.run(&mut request).unwrap();
    assert_eq!(200, response.status);
    assert_eq!(Some("application/json"), response.header("content-type"));
    assert_eq!(
        json!({"data": {"id": "42", "name": "Soto"}}),
        serde_json::from_str::<serde_json::Value>(&response.body).unwrap()
    );
    server_mock.assert();
}

#[test]
fn test_http_runner_query_parameters() {
    let server = MockServer::start();
    let server_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/recipes")
            .query_param("category", "minuman")
            .query_param("page", "2");
        then.status(200).json_body(json!({"data": []}));
    });
    let runner = Client::new(&ConfigMock::new(&server.base_url()));
    let mut request: Request<()> = Request::new(&server.url("/api/v1/recipes"), http::Method::GET);
    request.add_query("category", "minuman");
    request.add_query("page", "2");
    let response = runner.run(&mut request).unwrap();
    assert_eq!(200, response.status);
    server_mock.assert();
}

#[test]
fn test_http_runner_post_sends_json_body() {
    let server = MockServer::start();
    let server_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/recipes")
            .json_body(json!({"name": "Es Teh", "category": "minuman"}));
        then.status(201).json_body(json!({"data": {"id": "7"}}));
    });
    let runner = Client::new(&ConfigMock::new(&server.base_url()));
    let body = json!({"name": "Es Teh", "category": "minuman"});
    let mut request =
        Request::new(&server.url("/api/v1/recipes"), http::Method::POST).with_body(&body);
    let response = runner.run(&mut request).unwrap();
    assert_eq!(201, response.status);
    server_mock.assert();
}

#[test]
fn test_http_runner_error_status_is_a_response() {
    let server = MockServer::start();
    let server_mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/v1/recipes/404");
        then.status(404).body("recipe not found");
    });
    let runner = Client::new(&ConfigMock::new(&server.base_url()));
    let mut request: Request<()> =
        Request::new(&server.url("/api/v1/recipes/404"), http::Method::DELETE);
    let response = runner.run(&mut request).unwrap();
    assert_eq!(404, response.status);
    assert_eq!("recipe not found", response.body);
    assert!(!response.is_ok());
    server_mock.assert();
}

#[test]
fn test_http_runner_server_down_is_transport_error() {
    // Nothing listens on port 1.
    let runner = Client::new(&ConfigMock::new("http://127.0.0.1:1"));
    let mut request: Request<()> =
        Request::new("http://127.0.0.1:1/api/v1/recipes/1", http::Method::GET);
    let err = runner.run(&mut request).unwrap_err();
    match err.downcast_ref::<RCError>() {
        Some(RCError::HttpTransportError(_)) => {}
        _ => panic!("Expected HttpTransportError, got {err}"),
    }
}

#[test]
fn test_probe_reports_online_with_status() {
    let server = MockServer::start();
    let server_mock = server.mock(|when, then| {
        when.method(HEAD).path("/");
        then.status(204);
    });
    let runner = Arc::new(Client::new(&ConfigMock::new(&server.base_url())));
    let monitor = ConnectivityMonitor::new(&server.url("/"), runner);
    let result = monitor.probe(ProbeOptions::default());
    assert!(result.online);
    assert_eq!(Some(204), result.status);
    server_mock.assert();
}

#[test]
fn test_probe_times_out_as_offline() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(HEAD).path("/");
        then.status(200).delay(Duration::from_millis(1500));
    });
    let runner = Arc::new(Client::new(&ConfigMock::new(&server.base_url())));
    let monitor = ConnectivityMonitor::new(&server.url("/"), runner);
    let options = ProbeOptions {
        ping: true,
        timeout: Milliseconds::new(100),
    };
    let result = monitor.probe(options);
    assert!(!result.online);
    assert!(result.error.is_some());
    assert!(result.to_string().starts_with("Offline: "));
}
