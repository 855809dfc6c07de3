//! Courier HTTP client
//!
//! [`ApiClient::make_request`] is the single entry point: it attaches the
//! stored bearer token, sends exactly one request, unwraps the payload and
//! turns failures into user-facing notifications before handing the error
//! back to the caller.

pub mod config;
pub mod credentials;
pub mod descriptor;
pub mod error;
pub mod notify;
pub mod policy;

pub use config::ClientConfig;
pub use credentials::{CredentialProvider, FileTokenStore, NoCredentials, SharedToken, StaticToken};
#[cfg(target_arch = "wasm32")]
pub use credentials::LocalStorageToken;
pub use descriptor::{RequestDescriptor, ToastMessages};
pub use error::ClientError;
pub use notify::{MemoryNotifier, Notification, NotificationKind, Notifier, TracingNotifier};

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// API client with bearer authentication and notification handling
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    credentials: Arc<dyn CredentialProvider>,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        Self::builder().config(config).build()
    }

    /// Create a client configured from `COURIER_*` environment variables
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue a request and return the response payload as JSON
    ///
    /// # Errors
    ///
    /// Returns the transport or status failure after notifications were emitted
    pub async fn make_request(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<serde_json::Value, ClientError> {
        self.make_request_as(descriptor).await
    }

    /// Issue a request and decode the payload into `T`
    ///
    /// The payload is decoded before the caller's toasts are chosen, so a
    /// payload that does not match `T` counts as a failed call.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::make_request`], plus [`ClientError::Serialization`]
    /// when the payload does not match `T`
    pub async fn make_request_as<T: serde::de::DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, ClientError> {
        let toasts = descriptor.toasts.clone();

        let result = match self.dispatch(descriptor).await {
            Ok(payload) => serde_json::from_value(payload).map_err(ClientError::from),
            Err(error) => Err(error),
        };

        match &result {
            Ok(_) => {
                if let Some(message) = toasts.success_text() {
                    self.notifier.success(message);
                }
            }
            Err(_) => {
                if let Some(message) = toasts.error_text() {
                    self.notifier.error(message);
                }
            }
        }

        result
    }

    /// Send the request and apply the status policy; caller toasts are handled by `make_request_as`
    async fn dispatch(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.resolve_url(&descriptor.url);
        let request = self.build_request(&descriptor, &url)?;
        let method = descriptor.method;

        debug!(%method, %url, "Sending request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                // No status means there is nothing to map to a notification
                debug!(%method, %url, "Transport failure: {err}");
                return Err(err.into());
            }
        };

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "Received response");

        if status.is_success() {
            return read_payload(response).await;
        }

        let body = response.text().await.unwrap_or_default();
        let server_message = policy::server_message(&body);
        warn!(%method, %url, status = status.as_u16(), "Request failed");

        if let Some(notice) = policy::status_notice(status, server_message.as_deref()) {
            self.notifier.error(&notice);
        }

        let message = server_message
            .or_else(|| (!body.is_empty()).then_some(body))
            .unwrap_or_else(|| status.to_string());
        Err(ClientError::from_status(status, message))
    }

    /// Create a request builder from a descriptor, with authentication
    fn build_request(
        &self,
        descriptor: &RequestDescriptor,
        url: &str,
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &descriptor.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ClientError::InvalidRequest(format!("invalid header name {name:?}")))?;
            let value = HeaderValue::from_str(value).map_err(|_| {
                ClientError::InvalidRequest(format!("invalid value for header {name}"))
            })?;
            headers.insert(name, value);
        }

        // The stored credential always wins over a caller-supplied header
        if let Some(token) = self.credentials.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ClientError::InvalidRequest("stored token is not a valid header value".into()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut request = self
            .client
            .request(descriptor.method.clone(), url)
            .headers(headers);

        if !descriptor.params.is_empty() {
            request = request.query(&descriptor.params);
        }

        if let Some(data) = &descriptor.data {
            request = request.json(data);
        }

        Ok(request)
    }

    /// Join a request path onto the base URL; absolute URLs pass through
    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }

        let path = url.trim_start_matches('/');
        if path.is_empty() {
            self.config.base_url.clone()
        } else {
            format!("{}/{}", self.config.base_url, path)
        }
    }
}

/// Unwrap a successful response into its payload
async fn read_payload(response: Response) -> Result<serde_json::Value, ClientError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }

    Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
}

/// Builder for [`ApiClient`]
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    credentials: Option<Arc<dyn CredentialProvider>>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl ApiClientBuilder {
    /// Take base URL, timeout and user agent from a loaded configuration
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.base_url = Some(config.base_url);
        self.timeout = Some(Duration::from_millis(config.timeout_ms));
        self.user_agent = Some(config.user_agent);
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set where the bearer token is read from
    pub fn credentials(mut self, credentials: impl CredentialProvider + 'static) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Set a credential provider that is shared with other owners
    pub fn shared_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set where notifications go
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        let mut config = ClientConfig::new(base_url.trim_end_matches('/'));
        if let Some(timeout) = self.timeout {
            config.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        }
        if let Some(user_agent) = self.user_agent {
            config.user_agent = user_agent;
        }
        config.validate()?;

        let mut client_builder = ClientBuilder::new().user_agent(config.user_agent.clone());

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.timeout(config.timeout());
        }

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            config,
            credentials: self.credentials.unwrap_or_else(|| Arc::new(NoCredentials)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
        })
    }
}
