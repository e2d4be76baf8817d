use super::{HttpRequest, HttpResponse, Transport};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted transport: replies are consumed in order and every request is recorded.
#[derive(Default)]
pub(crate) struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, status: u16, body: &str) -> Self {
        self.push(Ok(HttpResponse::new(status, body)))
    }

    pub fn reply_json(self, body: Value) -> Self {
        self.reply(200, &body.to_string())
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Err(Error::transport(message.to_string())))
    }

    fn push(self, reply: Result<HttpResponse>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::transport("no scripted reply")))
    }
}
