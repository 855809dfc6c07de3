//! Courier HTTP client
//!
//! A thin request façade over `reqwest`: bearer-token injection from a
//! pluggable credential store, payload unwrapping, and status-to-notification
//! mapping for user-facing toasts.

pub mod client;

pub use client::{
    ApiClient, ApiClientBuilder, ClientConfig, ClientError, CredentialProvider, FileTokenStore,
    MemoryNotifier, NoCredentials, Notification, NotificationKind, Notifier, RequestDescriptor,
    SharedToken, StaticToken, ToastMessages, TracingNotifier,
};

/// Result alias for client operations
pub type Result<T, E = ClientError> = std::result::Result<T, E>;
