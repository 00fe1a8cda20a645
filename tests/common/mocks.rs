use async_trait::async_trait;
use inference_hub::remote::{RemoteCall, RemoteFailure, RemoteRequest, RemoteResponse};
use serde_json::Value;
use std::sync::{Arc, Mutex};

type Reply = std::result::Result<RemoteResponse, RemoteFailure>;

/// Mock remote for testing: replays queued replies and records every request
#[derive(Debug, Clone)]
pub struct MockRemote {
    pub replies: Arc<Mutex<Vec<Reply>>>,
    pub requests: Arc<Mutex<Vec<RemoteRequest>>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_json(self, body: Value) -> Self {
        self.add_reply(Ok(RemoteResponse::Json(body)));
        self
    }

    pub fn with_binary(self, content_type: &str, data: &[u8]) -> Self {
        self.add_reply(Ok(RemoteResponse::Binary {
            content_type: Some(content_type.to_string()),
            data: data.to_vec(),
        }));
        self
    }

    pub fn with_failure(self, status: Option<u16>, detail: Option<&str>) -> Self {
        self.add_reply(Err(RemoteFailure {
            status,
            detail: detail.map(str::to_string),
        }));
        self
    }

    pub fn add_reply(&self, reply: Reply) {
        self.replies.lock().unwrap().push(reply);
    }

    pub fn get_requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteCall for MockRemote {
    async fn execute(&self, request: RemoteRequest) -> Reply {
        self.requests.lock().unwrap().push(request);

        let mut replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            return Err(RemoteFailure::transport());
        }

        replies.remove(0)
    }
}

impl Default for MockRemote {
    fn default() -> Self {
        Self::new()
    }
}
