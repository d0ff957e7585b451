//! Connection Context
//!
//! Endpoint, credential headers and transport, shared read-only by the client
//! and every monitor it builds.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::transport::{ApiRequest, HttpResponse, Method, Transport};
use crate::error::{Error, Result};

/// Path of the monitor collection
pub const MONITORS_PATH: &str = "/api/v1/synthetic/monitors";

/// Path of the on-demand execution batch endpoint
pub const EXECUTIONS_BATCH_PATH: &str = "/api/v2/synthetic/executions/batch";

/// Immutable connection state handed to every monitor.
///
/// Cloning is cheap: the header list and transport are reference counted.
/// Concurrent use from several monitors is safe because [`Transport`] is
/// `Send + Sync`.
#[derive(Clone)]
pub struct ConnectionContext {
    tenant: Arc<str>,
    headers: Arc<[(String, String)]>,
    transport: Arc<dyn Transport>,
}

impl ConnectionContext {
    /// Create a context for a tenant URL and API token.
    ///
    /// The tenant must start with `https://`; a single trailing slash is dropped.
    pub fn new(tenant: &str, api_token: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        let tenant = validate_tenant(tenant)?;
        let headers = vec![
            ("Authorization".to_string(), format!("Api-Token {}", api_token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        Ok(Self {
            tenant: Arc::from(tenant),
            headers: Arc::from(headers),
            transport,
        })
    }

    /// Validated tenant URL, without trailing slash
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Headers attached to every request
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.tenant, path)
    }

    /// URL of a single monitor
    pub fn monitor_url(&self, entity_id: &str) -> String {
        self.url(&format!("{}/{}", MONITORS_PATH, entity_id))
    }

    /// Send a request with the credential headers attached
    pub async fn send(
        &self,
        method: Method,
        url: String,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse> {
        tracing::debug!("{} {}", method, url);
        let response = self
            .transport
            .send(ApiRequest {
                method,
                url,
                headers: self.headers.to_vec(),
                body,
            })
            .await?;
        tracing::debug!("-> {}", response.status);
        Ok(response)
    }

    /// GET a URL
    pub async fn get(&self, url: String) -> Result<HttpResponse> {
        self.send(Method::Get, url, None).await
    }

    /// POST a JSON body
    pub async fn post<B: Serialize>(&self, url: String, body: &B) -> Result<HttpResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Post, url, Some(body)).await
    }

    /// PUT a JSON body
    pub async fn put<B: Serialize>(&self, url: String, body: &B) -> Result<HttpResponse> {
        let body = serde_json::to_value(body)?;
        self.send(Method::Put, url, Some(body)).await
    }
}

impl fmt::Debug for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Headers carry the token.
        f.debug_struct("ConnectionContext")
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}

/// Check the tenant scheme and strip one trailing slash
pub fn validate_tenant(tenant: &str) -> Result<&str> {
    if !tenant.starts_with("https://") {
        return Err(Error::InvalidEndpoint(tenant.to_string()));
    }
    Ok(tenant.strip_suffix('/').unwrap_or(tenant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::MockTransport;

    fn context() -> ConnectionContext {
        ConnectionContext::new(
            "https://abc123.live.dynatrace.com/",
            "secret",
            Arc::new(MockTransport::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_validate_tenant() {
        assert_eq!(
            validate_tenant("https://abc.live.dynatrace.com/").unwrap(),
            "https://abc.live.dynatrace.com"
        );
        assert_eq!(
            validate_tenant("https://abc.live.dynatrace.com").unwrap(),
            "https://abc.live.dynatrace.com"
        );
        assert!(matches!(
            validate_tenant("http://abc.live.dynatrace.com"),
            Err(Error::InvalidEndpoint(_))
        ));
        assert!(validate_tenant("abc.live.dynatrace.com").is_err());
    }

    #[test]
    fn test_urls() {
        let ctx = context();
        assert_eq!(
            ctx.url(MONITORS_PATH),
            "https://abc123.live.dynatrace.com/api/v1/synthetic/monitors"
        );
        assert_eq!(
            ctx.monitor_url("HTTP_CHECK-42"),
            "https://abc123.live.dynatrace.com/api/v1/synthetic/monitors/HTTP_CHECK-42"
        );
    }

    #[test]
    fn test_headers_and_debug_hide_token() {
        let ctx = context();
        assert_eq!(
            ctx.headers()[0],
            ("Authorization".to_string(), "Api-Token secret".to_string())
        );
        assert!(!format!("{:?}", ctx).contains("secret"));
    }

    #[tokio::test]
    async fn test_send_attaches_headers() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Get
                    && req.body.is_none()
                    && req
                        .headers
                        .iter()
                        .any(|(k, v)| k == "Authorization" && v == "Api-Token secret")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "{}")));

        let ctx =
            ConnectionContext::new("https://t.example.com", "secret", Arc::new(transport)).unwrap();
        let response = ctx.get(ctx.url(MONITORS_PATH)).await.unwrap();
        assert_eq!(response.status, 200);
    }
}
