//! Scripted transport for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::transport::{ApiRequest, ApiResponse, HttpTransport};
use super::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::session::Session;
use crate::storage::MemoryStore;

/// Replies from a queue and records every request it sees
#[derive(Default)]
pub struct FakeTransport {
    replies: Mutex<VecDeque<ApiResult<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with a JSON body
    pub fn reply(&self, status: u16, body: Value) {
        self.push(Ok(ApiResponse::new(status, body.to_string())));
    }

    /// Queue a response with a raw body
    pub fn reply_raw(&self, status: u16, body: &str) {
        self.push(Ok(ApiResponse::new(status, body)));
    }

    /// Queue a failure where no response arrives
    pub fn fail(&self, message: &str) {
        self.push(Err(ApiError::Transport(message.to_string())));
    }

    /// Every request executed so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was sent")
    }

    fn push(&self, reply: ApiResult<ApiResponse>) {
        self.replies.lock().unwrap().push_back(reply);
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn execute(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted reply".to_string())))
    }
}

/// An `ApiClient` over a fresh fake transport and in-memory session
pub fn client() -> (ApiClient, Arc<FakeTransport>, Session) {
    let transport = FakeTransport::new();
    let session = Session::new(Arc::new(MemoryStore::new()));
    let client = ApiClient::with_transport("http://api.test/api", session.clone(), transport.clone());
    (client, transport, session)
}
