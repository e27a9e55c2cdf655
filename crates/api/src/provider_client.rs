//! Voice-call provider client.
//!
//! Starting an interview registers a call with the third-party voice
//! provider; the provider then drives the call and reports progress through
//! webhooks. [`VoiceCallProvider`] is the narrow seam the handlers depend
//! on. Deployments without provider credentials fall back to
//! [`PlaceholderProvider`], which mints locally-unique call ids so session
//! rows still satisfy the unique `external_call_id` constraint.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use prepcall_core::error::CoreError;
use prepcall_core::types::DbId;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::ServerConfig;

/// Provider-side timeout for call registration.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A call registered with the provider, ready for the user to join.
#[derive(Debug, Clone)]
pub struct RegisteredCall {
    /// The provider's call id; stored as the session's `external_call_id`
    /// and used to correlate webhook deliveries.
    pub call_id: String,
}

/// Seam between session creation and the voice-call provider.
#[async_trait]
pub trait VoiceCallProvider: Send + Sync {
    /// Register a new interview call for `user_id`.
    async fn register_call(&self, user_id: DbId) -> Result<RegisteredCall, CoreError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// Registers calls against the real provider over HTTP.
pub struct HttpVoiceProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpVoiceProvider {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }
}

/// Provider response body for a registration request.
#[derive(Debug, Deserialize)]
struct RegisterResponse {
    call_id: String,
}

#[async_trait]
impl VoiceCallProvider for HttpVoiceProvider {
    async fn register_call(&self, user_id: DbId) -> Result<RegisteredCall, CoreError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await
            .map_err(|e| CoreError::Upstream(format!("call registration request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(CoreError::Upstream(format!(
                "call registration returned status {}",
                response.status()
            )));
        }

        let body: RegisterResponse = response
            .json()
            .await
            .map_err(|e| CoreError::Upstream(format!("invalid call registration response: {e}")))?;

        Ok(RegisteredCall {
            call_id: body.call_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Placeholder implementation
// ---------------------------------------------------------------------------

/// Mints `pending-<uuid>` call ids without contacting any provider.
///
/// Used when provider credentials are not configured, and by integration
/// tests so they run hermetically. Sessions created this way never receive
/// webhooks; they stay in `created` status.
pub struct PlaceholderProvider;

#[async_trait]
impl VoiceCallProvider for PlaceholderProvider {
    async fn register_call(&self, _user_id: DbId) -> Result<RegisteredCall, CoreError> {
        Ok(RegisteredCall {
            call_id: format!("pending-{}", Uuid::new_v4()),
        })
    }
}

/// Pick the provider implementation the configuration calls for.
pub fn provider_from_config(config: &ServerConfig) -> Arc<dyn VoiceCallProvider> {
    match (&config.provider_api_url, &config.provider_api_key) {
        (Some(url), Some(key)) => {
            tracing::info!(endpoint = %url, "using HTTP voice-call provider");
            Arc::new(HttpVoiceProvider::new(url, key))
        }
        _ => {
            tracing::warn!(
                "PROVIDER_API_URL/PROVIDER_API_KEY not configured; \
                 sessions will get placeholder call ids"
            );
            Arc::new(PlaceholderProvider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholder_call_ids_are_unique_and_prefixed() {
        let provider = PlaceholderProvider;
        let a = provider.register_call(1).await.unwrap();
        let b = provider.register_call(1).await.unwrap();

        assert!(a.call_id.starts_with("pending-"));
        assert!(b.call_id.starts_with("pending-"));
        assert_ne!(a.call_id, b.call_id);
    }
}
