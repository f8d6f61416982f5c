use std::sync::{Arc, RwLock};
use std::time::Duration;

use deviceid_core::secrets::{SecretStore, TOKEN_ACCOUNT, TOKEN_SERVICE};
use deviceid_types::{AuthRequest, DeviceProfile, IdentificationResponse, IdentifyRequest};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Client for the identification service.
///
/// Holds the immutable device snapshot and the session token written by
/// a successful [`authenticate`](Self::authenticate). Each
/// [`identify`](Self::identify) call builds a fresh request payload, so
/// overlapping calls never share mutable per-call state. Callers are
/// still expected to authenticate before identifying; an identify
/// without a session token is sent with an empty bearer credential
/// rather than rejected locally.
pub struct IdentityClient {
    client: Client,
    config: ClientConfig,
    profile: DeviceProfile,
    session_token: RwLock<String>,
    store: Option<Arc<dyn SecretStore>>,
}

impl IdentityClient {
    /// Create a client over the given configuration and a previously
    /// collected device snapshot.
    pub fn new(config: ClientConfig, profile: DeviceProfile) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            profile,
            session_token: RwLock::new(String::new()),
            store: None,
        })
    }

    /// Attach a secret store; the session token is persisted to it under
    /// the fixed token namespace after each successful authenticate.
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Exchange API credentials for a session token.
    ///
    /// POSTs `{key, secret}` to the load endpoint. The response body is
    /// the token as raw UTF-8 text; it is stored as the session token
    /// for subsequent identify calls and returned. A non-2xx status
    /// leaves the stored token untouched.
    pub async fn authenticate(&self, api_key: &str, secret: &str) -> Result<String, ClientError> {
        let body = serde_json::to_vec(&AuthRequest::new(api_key, secret))?;
        let resp = self
            .client
            .post(&self.config.auth_url)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("authenticate_failed: status {}", status);
            return Err(ClientError::HttpStatus { status: status.as_u16(), body });
        }

        let token = resp.text().await?;
        self.set_session_token(&token);
        if let Some(store) = &self.store {
            if let Err(e) = store.put(TOKEN_SERVICE, TOKEN_ACCOUNT, token.as_bytes()) {
                tracing::warn!("token_persist_failed: {}", e);
            }
        }
        tracing::info!("authenticated against {}", self.config.auth_url);
        Ok(token)
    }

    /// Submit the device profile for identification.
    ///
    /// Builds a fresh payload from the stored snapshot, the current
    /// session token, and the per-call `tag`/`request_id` (empty strings
    /// when absent), pretty-printed, and POSTs it with
    /// `Authorization: Bearer <token>`. Returns the parsed
    /// identification result; a body that does not match the schema
    /// fails with [`ClientError::Decode`].
    pub async fn identify(
        &self,
        tag: Option<&str>,
        request_id: Option<&str>,
    ) -> Result<IdentificationResponse, ClientError> {
        let token = self.session_token();
        let request = IdentifyRequest::new(self.profile.clone(), token.clone(), tag, request_id);
        let body = serde_json::to_vec_pretty(&request)?;

        let resp = self
            .client
            .post(&self.config.identify_url)
            .header(CONTENT_TYPE, "text/plain")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!("identify_failed: status {}", status);
            return Err(ClientError::HttpStatus { status: status.as_u16(), body });
        }

        let text = resp.text().await?;
        let result: IdentificationResponse = serde_json::from_str(&text)?;
        tracing::debug!("identified visit {} (threat {})", result.visit_id, result.threat);
        Ok(result)
    }

    /// The device snapshot this client submits.
    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Current session token, empty before a successful authenticate.
    pub fn session_token(&self) -> String {
        self.session_token.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn set_session_token(&self, token: &str) {
        let mut guard =
            self.session_token.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = token.to_string();
    }
}
