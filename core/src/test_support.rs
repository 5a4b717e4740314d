//! In-process transport fake shared by the unit tests.

use std::sync::Mutex;

use serde_json::Value;

use crate::client::RocketReachClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

pub const BASE_URL: &str = "http://mock";

enum Canned {
    Respond(u16, String),
    Fail(String),
}

/// Answers by endpoint path and records every request it sees.
/// Paths without a canned answer get a 404.
#[derive(Default)]
pub struct RecordingTransport {
    routes: Vec<(String, Canned)>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, path: &str, status: u16, body: Value) -> Self {
        self.routes
            .push((path.to_string(), Canned::Respond(status, body.to_string())));
        self
    }

    pub fn fail(mut self, path: &str, message: &str) -> Self {
        self.routes
            .push((path.to_string(), Canned::Fail(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Endpoint paths hit so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| r.url.trim_start_matches(BASE_URL).to_string())
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let path = request.url.trim_start_matches(BASE_URL);
        match self.routes.iter().find(|(p, _)| p == path).map(|(_, c)| c) {
            Some(Canned::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                headers: Vec::new(),
                body: body.clone(),
            }),
            Some(Canned::Fail(message)) => Err(ApiError::Transport(message.clone())),
            None => Ok(HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: "not found".to_string(),
            }),
        }
    }
}

pub fn client_with(transport: RecordingTransport) -> RocketReachClient<RecordingTransport> {
    RocketReachClient::with_transport("test-key", BASE_URL, transport).unwrap()
}
