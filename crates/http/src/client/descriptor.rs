//! Per-call request description

use reqwest::Method;
use serde::Serialize;
use std::collections::BTreeMap;

/// Optional notifications to show once the call settles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastMessages {
    pub success: Option<String>,
    pub error: Option<String>,
}

impl ToastMessages {
    /// Success text, if one was supplied and is not empty
    pub fn success_text(&self) -> Option<&str> {
        self.success.as_deref().filter(|text| !text.is_empty())
    }

    /// Error text, if one was supplied and is not empty
    pub fn error_text(&self) -> Option<&str> {
        self.error.as_deref().filter(|text| !text.is_empty())
    }
}

/// Everything needed to issue one request through [`ApiClient::make_request`]
///
/// [`ApiClient::make_request`]: super::ApiClient::make_request
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: String,
    pub data: Option<serde_json::Value>,
    pub headers: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
    pub toasts: ToastMessages,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        Self {
            method: Method::GET,
            url: String::new(),
            data: None,
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            toasts: ToastMessages::default(),
        }
    }
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    /// Set the method from its name, e.g. `"post"`
    pub fn method_name(mut self, name: &str) -> Result<Self, super::ClientError> {
        self.method = Method::from_bytes(name.to_ascii_uppercase().as_bytes())
            .map_err(|_| super::ClientError::InvalidRequest(format!("invalid method {name:?}")))?;
        Ok(self)
    }

    /// Set a JSON body
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Serialize any value into the JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, super::ClientError> {
        self.data = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn success_toast(mut self, message: impl Into<String>) -> Self {
        self.toasts.success = Some(message.into());
        self
    }

    pub fn error_toast(mut self, message: impl Into<String>) -> Self {
        self.toasts.error = Some(message.into());
        self
    }
}
