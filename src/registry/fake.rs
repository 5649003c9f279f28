//! In-memory transport serving canned registry responses

use super::Transport;
use crate::auth::RegistryAuth;
use crate::error::ResolveError;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, (u16, String)>,
    calls: Mutex<Vec<(String, RegistryAuth)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200 for `url`
    pub fn with_json(mut self, url: &str, body: serde_json::Value) -> Self {
        self.responses
            .insert(url.to_string(), (200, body.to_string()));
        self
    }

    /// Serve raw `body` text with status 200 for `url`, keeping object key order as written
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), (200, body.to_string()));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.responses
            .insert(url.to_string(), (status, String::new()));
        self
    }

    pub fn calls(&self) -> Vec<(String, RegistryAuth)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for FakeTransport {
    async fn get(&self, url: &str, auth: &RegistryAuth) -> Result<Vec<u8>, ResolveError> {
        self.calls
            .lock()
            .unwrap()
            .push((url.to_string(), auth.clone()));

        match self.responses.get(url) {
            Some((200, body)) => Ok(body.clone().into_bytes()),
            Some((status, _)) => Err(ResolveError::Http {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(ResolveError::Http {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
