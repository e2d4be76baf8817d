use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// User agent sent when none is configured: `ossindex/<crate version>`.
pub fn default_user_agent() -> String {
    format!("ossindex/{}", env!("CARGO_PKG_VERSION"))
}

/// [`Transport`] backed by a shared `reqwest::Client`.
///
/// No timeout is applied unless one is given; reqwest's defaults hold.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };

        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> Result<HttpTransport> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(default_user_agent);

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(HttpTransport {
            client: builder.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_creation() {
        assert!(HttpTransport::new().is_ok());
    }

    #[test]
    fn test_transport_with_options() {
        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("ossindex-test")
            .build();
        assert!(transport.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let err = transport
            .execute(HttpRequest::get("http://127.0.0.1:1/v1.0/cve/1"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }
}
