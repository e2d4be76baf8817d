//! The HTTP seam between the client and the network.
//!
//! The client only ever builds an [`HttpRequest`] and hands it to a
//! [`Transport`]. [`HttpTransport`] is the reqwest-backed implementation;
//! tests substitute a scripted one.

mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::{default_user_agent, HttpTransport};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    /// JSON body, sent only with `POST`.
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the body is empty or whitespace only.
    pub fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    /// Parses the body as JSON. An empty body yields `None`.
    pub fn json(&self) -> Result<Option<Value>> {
        if self.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&self.body)?))
    }
}

/// Executes one request and returns the raw response.
///
/// Implementations report connection-level failures as
/// [`Error::Transport`](crate::Error::Transport) and return every HTTP
/// status, including errors, as a normal [`HttpResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_status() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(299, "").is_success());
        assert!(!HttpResponse::new(300, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_response_json() {
        assert_eq!(HttpResponse::new(200, "").json().unwrap(), None);
        assert_eq!(HttpResponse::new(200, " \n").json().unwrap(), None);
        assert_eq!(
            HttpResponse::new(200, r#"[{"id":1}]"#).json().unwrap(),
            Some(json!([{"id": 1}]))
        );
        assert!(HttpResponse::new(200, "<html>").json().is_err());
    }

    #[test]
    fn test_request_builders() {
        let get = HttpRequest::get("http://localhost:8080/v1.0/cve/1");
        assert_eq!(get.method, Method::Get);
        assert!(get.body.is_none());

        let post = HttpRequest::post("http://localhost:8080/v2.0/package", json!([]));
        assert_eq!(post.method.to_string(), "POST");
        assert_eq!(post.body, Some(json!([])));
    }
}
