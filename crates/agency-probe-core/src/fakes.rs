//! In-memory transport fake (testing only)
//!
//! `ScriptedTransport` answers requests from a route table keyed by
//! [`ApiRequest::route_key`] and remembers everything it was sent.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProbeError;
use crate::transport::{ApiRequest, ApiResponse, ApiTransport};
use crate::Result;

#[derive(Debug, Clone)]
enum Reply {
    Respond(ApiResponse),
    Refuse(String),
    Timeout,
}

/// Route-table transport. Unrouted requests fail like a refused connection.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Reply>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `route` (e.g. `"GET /agencies?featured=true"`) with a response.
    pub fn on(mut self, route: &str, response: ApiResponse) -> Self {
        self.routes.insert(route.to_string(), Reply::Respond(response));
        self
    }

    /// Answer `route` with a JSON body.
    pub fn on_json(self, route: &str, status: u16, body: Value) -> Self {
        self.on(route, ApiResponse::json_body(status, &body))
    }

    /// Fail `route` at the transport level.
    pub fn refuse(mut self, route: &str, reason: &str) -> Self {
        self.routes
            .insert(route.to_string(), Reply::Refuse(reason.to_string()));
        self
    }

    /// Fail `route` with a timeout.
    pub fn time_out(mut self, route: &str) -> Self {
        self.routes.insert(route.to_string(), Reply::Timeout);
        self
    }

    /// Every request received, in order.
    pub fn sent_requests(&self) -> Vec<ApiRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Route keys of every request received, in order.
    pub fn sent_routes(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(ApiRequest::route_key)
            .collect()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.sent.lock().unwrap().push(request.clone());

        let key = request.route_key();
        match self.routes.get(&key) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Refuse(reason)) => Err(ProbeError::Transport(reason.clone())),
            Some(Reply::Timeout) => Err(ProbeError::Timeout {
                url: key,
                secs: request.timeout.as_secs(),
            }),
            None => Err(ProbeError::Transport(format!(
                "connection refused: no route for {}",
                key
            ))),
        }
    }
}
