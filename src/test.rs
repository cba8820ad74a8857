#[cfg(test)]
pub mod utils {
    use crate::{
        api_traits::RecipeFetcher,
        config::ConfigProperties,
        error::{self, RCError},
        http::{self, Headers, Request},
        io::{HttpResponse, HttpRunner},
        keys::RecipeId,
        time::Milliseconds,
        Result,
    };
    use lazy_static::lazy_static;
    use log::{Level, LevelFilter, Metadata, Record};
    use serde::Serialize;
    use serde_json::Value;
    use std::{
        cell::{Ref, RefCell},
        fmt::Write,
        sync::Mutex,
    };

    pub struct MockRunner<R> {
        responses: RefCell<Vec<R>>,
        headers: RefCell<Headers>,
        url: RefCell<String>,
        query: RefCell<Vec<(String, String)>>,
        pub timeout: RefCell<Option<Milliseconds>>,
        pub http_method: RefCell<Vec<http::Method>>,
        pub run_count: RefCell<u32>,
        pub request_body: RefCell<String>,
    }

    impl<R> MockRunner<R> {
        /// Responses are handed out last first.
        pub fn new(responses: Vec<R>) -> Self {
            Self {
                responses: RefCell::new(responses),
                headers: RefCell::new(Headers::new()),
                url: RefCell::new(String::new()),
                query: RefCell::new(Vec::new()),
                timeout: RefCell::new(None),
                http_method: RefCell::new(Vec::new()),
                run_count: RefCell::new(0),
                request_body: RefCell::new(String::new()),
            }
        }

        pub fn url(&self) -> Ref<String> {
            self.url.borrow()
        }

        pub fn headers(&self) -> Ref<Headers> {
            self.headers.borrow()
        }

        pub fn query(&self) -> Ref<Vec<(String, String)>> {
            self.query.borrow()
        }

        pub fn request_body(&self) -> Ref<String> {
            self.request_body.borrow()
        }
    }

    impl HttpRunner for MockRunner<HttpResponse> {
        type Response = HttpResponse;

        fn run<T: Serialize>(&self, cmd: &mut Request<T>) -> Result<Self::Response> {
            self.url.replace(cmd.url().to_string());
            self.headers.replace(cmd.headers().clone());
            self.query.replace(cmd.query().to_vec());
            self.timeout.replace(cmd.timeout);
            let body = match &cmd.body {
                Some(body) => serde_json::to_string(body).unwrap_or_default(),
                None => String::new(),
            };
            self.request_body.replace(body);
            self.http_method.borrow_mut().push(cmd.method.clone());
            *self.run_count.borrow_mut() += 1;
            let response = self.responses.borrow_mut().pop().unwrap();
            match response.status {
                // Just for testing purposes, if the test client sets a status
                // code of 0 we return a HTTP transport error.
                0 => Err(RCError::HttpTransportError(response.body).into()),
                _ => Ok(response),
            }
        }
    }

    /// Recipe fetcher with canned results, handed out last first. `Err`
    /// entries are returned as transport errors.
    pub struct MockFetcher {
        results: RefCell<Vec<std::result::Result<Value, String>>>,
        pub calls: RefCell<Vec<String>>,
    }

    impl MockFetcher {
        pub fn new(results: Vec<std::result::Result<Value, String>>) -> Self {
            Self {
                results: RefCell::new(results),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl RecipeFetcher for MockFetcher {
        fn fetch_recipe(&self, id: &RecipeId) -> Result<Value> {
            self.calls.borrow_mut().push(id.to_string());
            match self.results.borrow_mut().pop() {
                Some(Ok(value)) => Ok(value),
                Some(Err(msg)) => Err(RCError::HttpTransportError(msg).into()),
                None => Err(error::gen("MockFetcher ran out of results")),
            }
        }
    }

    pub struct ConfigMock {
        base_url: String,
    }

    impl ConfigMock {
        pub fn new(base_url: &str) -> Self {
            ConfigMock {
                base_url: base_url.to_string(),
            }
        }
    }

    impl Default for ConfigMock {
        fn default() -> Self {
            ConfigMock::new("http://localhost")
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

    struct TestLogger;

    lazy_static! {
        pub static ref LOG_BUFFER: Mutex<String> = Mutex::new(String::new());
    }

    impl log::Log for TestLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Trace
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                let mut buffer = LOG_BUFFER.lock().unwrap();
                writeln!(buffer, "{} - {}", record.level(), record.args())
                    .expect("Failed to write to log buffer");
            }
        }

        fn flush(&self) {}
    }

    pub fn init_test_logger() {
        let logger = TestLogger;
        log::set_boxed_logger(Box::new(logger)).unwrap_or(());
        log::set_max_level(LevelFilter::Trace);
    }
}
