//! Remote preference record
//!
//! One record per authenticated identity:
//!
//! ```text
//! { "onboarding_completed": bool, "config": { ...A11yConfig... }, "updated_at": "..." }
//! ```
//!
//! # Architecture
//!
//! ```text
//! RemoteStore trait
//! ├── DisabledRemote (no endpoint configured, local-only)
//! └── HttpRemoteStore (GET/PUT {base}/preferences/{identity})
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::identity::Identity;
use crate::config::RemoteConfig;
use crate::model::A11yConfig;

/// Record stored remotely for one identity.
///
/// `config` is kept as raw JSON so a snapshot written by an older or newer
/// build can still be merged key by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteRecord {
    /// Record carrying the full current state
    pub fn from_state(config: &A11yConfig, onboarding_completed: bool) -> Self {
        Self {
            onboarding_completed: Some(onboarding_completed),
            config: serde_json::to_value(config).ok(),
            updated_at: Some(Utc::now()),
        }
    }
}

/// Errors talking to the remote store
#[derive(Debug)]
pub enum RemoteError {
    /// Remote sync is not configured
    NotConfigured,
    /// Non-success HTTP status
    Api { status: u16, message: String },
    /// Connection, timeout or transport error
    Network(String),
    /// Response body did not decode
    Decode(String),
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Remote sync not configured"),
            Self::Api { status, message } => write!(f, "API error ({}): {}", status, message),
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for RemoteError {}

/// Storage for per-identity preference records
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Whether this store talks to anything
    fn is_enabled(&self) -> bool {
        true
    }

    /// Fetch the record for `identity`; `Ok(None)` when none exists yet
    async fn fetch(&self, identity: &Identity) -> Result<Option<RemoteRecord>, RemoteError>;

    /// Create or replace the record for `identity`
    async fn store(&self, identity: &Identity, record: &RemoteRecord) -> Result<(), RemoteError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Disabled store
// ─────────────────────────────────────────────────────────────────────────────

/// Store used when no endpoint is configured
#[derive(Debug, Default)]
pub struct DisabledRemote;

#[async_trait]
impl RemoteStore for DisabledRemote {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn fetch(&self, _identity: &Identity) -> Result<Option<RemoteRecord>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn store(&self, _identity: &Identity, _record: &RemoteRecord) -> Result<(), RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTTP store
// ─────────────────────────────────────────────────────────────────────────────

/// JSON-over-HTTP preference store
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: reqwest::Url,
    token: Option<String>,
}

impl HttpRemoteStore {
    /// Create a store for `base_url`
    ///
    /// # Errors
    /// Returns an error if the URL is unusable or client creation fails
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, RemoteError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| RemoteError::Network(format!("Invalid base URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::Network(format!(
                "Base URL cannot carry a path: {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized remote preference store: {}", base_url);

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// `{base}/preferences/{identity}` with the identity percent-encoded
    fn record_url(&self, identity: &Identity) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("preferences")
                .push(identity.as_str());
        }
        url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn error_from(response: reqwest::Response) -> RemoteError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        RemoteError::Api { status, message }
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, identity: &Identity) -> Result<Option<RemoteRecord>, RemoteError> {
        let response = self
            .authorize(self.client.get(self.record_url(identity)))
            .send()
            .await
            .map_err(|e| RemoteError::Network(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<RemoteRecord>()
            .await
            .map(Some)
            .map_err(|e| RemoteError::Decode(format!("Failed to parse record: {}", e)))
    }

    async fn store(&self, identity: &Identity, record: &RemoteRecord) -> Result<(), RemoteError> {
        let response = self
            .authorize(self.client.put(self.record_url(identity)))
            .json(record)
            .send()
            .await
            .map_err(|e| RemoteError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }
        Ok(())
    }
}

/// Create a remote store from configuration. Falls back to `DisabledRemote`
/// when sync is off or the endpoint is unusable.
pub fn create_remote(config: &RemoteConfig) -> Arc<dyn RemoteStore> {
    let Some(base_url) = config.endpoint() else {
        if config.enabled {
            tracing::warn!("Remote sync enabled but no base_url configured");
        }
        return Arc::new(DisabledRemote);
    };

    match HttpRemoteStore::new(
        base_url,
        Duration::from_secs(config.timeout_secs),
        config.token.clone(),
    ) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Failed to create remote preference store: {}", e);
            Arc::new(DisabledRemote)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        routing::get,
        Json, Router,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    type Records = Arc<Mutex<HashMap<String, RemoteRecord>>>;

    async fn get_record(
        State(records): State<Records>,
        Path(id): Path<String>,
    ) -> Result<Json<RemoteRecord>, StatusCode> {
        if id == "broken" {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        records
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .map(Json)
            .ok_or(StatusCode::NOT_FOUND)
    }

    async fn put_record(
        State(records): State<Records>,
        Path(id): Path<String>,
        Json(record): Json<RemoteRecord>,
    ) -> StatusCode {
        records.lock().unwrap().insert(id, record);
        StatusCode::NO_CONTENT
    }

    async fn spawn_server(records: Records) -> String {
        let app = Router::new()
            .route("/api/preferences/:id", get(get_record).put(put_record))
            .with_state(records);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/", addr)
    }

    fn http_store(base: &str) -> HttpRemoteStore {
        HttpRemoteStore::new(base, Duration::from_secs(5), Some("t0ken".to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_http_missing_record_is_none() {
        let base = spawn_server(Records::default()).await;
        let store = http_store(&base);
        let fetched = store.fetch(&Identity::new("nobody")).await.unwrap();
        assert_eq!(fetched, None);
    }

    #[tokio::test]
    async fn test_http_store_then_fetch() {
        let records = Records::default();
        let base = spawn_server(records.clone()).await;
        let store = http_store(&base);
        let id = Identity::new("user 42");

        let record = RemoteRecord::from_state(&A11yConfig::default(), true);
        store.store(&id, &record).await.unwrap();

        assert!(records.lock().unwrap().contains_key("user 42"));
        let fetched = store.fetch(&id).await.unwrap().unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn test_http_server_error_surfaces_status() {
        let base = spawn_server(Records::default()).await;
        let store = http_store(&base);
        let err = store.fetch(&Identity::new("broken")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Api { status: 500, .. }), "{}", err);
    }

    #[tokio::test]
    async fn test_http_unreachable_is_network_error() {
        // Port 9 (discard) on localhost is not expected to accept connections
        let store = HttpRemoteStore::new("http://127.0.0.1:9/", Duration::from_secs(2), None).unwrap();
        let err = store.fetch(&Identity::new("u")).await.unwrap_err();
        assert!(matches!(err, RemoteError::Network(_)), "{}", err);
    }

    #[test]
    fn test_record_url_encodes_identity() {
        let store = http_store("https://prefs.example.org/v1");
        let url = store.record_url(&Identity::new("a/b c"));
        assert_eq!(
            url.as_str(),
            "https://prefs.example.org/v1/preferences/a%2Fb%20c"
        );
    }

    #[test]
    fn test_record_json_shape() {
        let record = RemoteRecord {
            onboarding_completed: Some(true),
            config: Some(serde_json::json!({ "fontSize": 120 })),
            updated_at: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["onboarding_completed"], true);
        assert_eq!(json["config"]["fontSize"], 120);
        assert!(json.get("updated_at").is_none());

        let bare: RemoteRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(bare, RemoteRecord::default());
    }

    #[test]
    fn test_create_remote_disabled_without_url() {
        let config = RemoteConfig {
            enabled: true,
            base_url: None,
            ..RemoteConfig::default()
        };
        assert!(!create_remote(&config).is_enabled());
        assert!(!create_remote(&RemoteConfig::default()).is_enabled());

        let blank = RemoteConfig {
            enabled: true,
            base_url: Some("  ".to_string()),
            ..RemoteConfig::default()
        };
        assert!(!create_remote(&blank).is_enabled());
    }

    #[test]
    fn test_create_remote_http_when_endpoint_set() {
        let config = RemoteConfig {
            enabled: true,
            base_url: Some("http://127.0.0.1:9/api/".to_string()),
            ..RemoteConfig::default()
        };
        let remote = create_remote(&config);
        assert!(remote.is_enabled());
        assert_eq!(remote.name(), "http");
    }
}
