//! Fake scanservjs for the integration tests, backed by wiremock.
//!
//! The mock server lives on its own tokio runtime so the blocking reqwest
//! client (and the binary under test) can talk to it from a plain test thread.

#![allow(dead_code)]

use serde_json::Value;
use std::net::TcpListener;
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Default)]
pub struct FakeServiceBuilder {
    mocks: Vec<Mock>,
}

impl FakeServiceBuilder {
    fn route(mut self, verb: &str, route: &str, response: ResponseTemplate) -> Self {
        self.mocks
            .push(Mock::given(method(verb)).and(path(route)).respond_with(response));
        self
    }

    pub fn json(self, verb: &str, route: &str, status: u16, body: Value) -> Self {
        self.route(verb, route, ResponseTemplate::new(status).set_body_json(body))
    }

    pub fn raw(self, verb: &str, route: &str, status: u16, body: &[u8]) -> Self {
        self.route(
            verb,
            route,
            ResponseTemplate::new(status).set_body_raw(body.to_vec(), "application/octet-stream"),
        )
    }

    /// Answer `route` only after `delay`.
    pub fn slow(self, verb: &str, route: &str, delay: Duration, body: Value) -> Self {
        self.route(
            verb,
            route,
            ResponseTemplate::new(200).set_body_json(body).set_delay(delay),
        )
    }

    pub fn devices(self, devices: &[(&str, &str)]) -> Self {
        let list: Vec<Value> = devices
            .iter()
            .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
            .collect();
        self.json(
            "GET",
            "/api/v1/context",
            200,
            serde_json::json!({ "devices": list, "version": "2.27.0" }),
        )
    }

    pub fn files(self, names: &[&str]) -> Self {
        let list: Vec<Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name, "size": 3, "sizeString": "3 B" }))
            .collect();
        self.json("GET", "/api/v1/files", 200, Value::Array(list))
    }

    pub fn start(self) -> FakeService {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .expect("tokio runtime");
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for mock in self.mocks {
                mock.mount(&server).await;
            }
            server
        });
        FakeService { server, runtime }
    }
}

/// Unmatched requests get wiremock's default 404.
pub struct FakeService {
    // dropped before the runtime it was started on
    server: MockServer,
    runtime: Runtime,
}

impl FakeService {
    pub fn builder() -> FakeServiceBuilder {
        FakeServiceBuilder::default()
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .into_iter()
            .map(|r| Recorded {
                method: r.method.to_string(),
                path: r.url.path().to_string(),
                body: r.body,
            })
            .collect()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

/// A URL on which nothing listens.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
