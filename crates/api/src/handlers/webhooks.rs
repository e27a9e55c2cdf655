//! HTTP entry point for provider webhook deliveries.
//!
//! Thin shim over [`WebhookGateway`]: extracts the raw body and optional
//! signature header, and maps the gateway outcome onto the wire. The body
//! must be taken raw (`Bytes`) because the signature covers the exact bytes
//! the provider sent.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use prepcall_core::error::CoreError;

use crate::error::AppResult;
use crate::gateway::GatewayOutcome;
use crate::state::AppState;

/// Header carrying the provider's HMAC-SHA256 hex signature.
const SIGNATURE_HEADER: &str = "x-provider-signature";

/// POST /api/provider/webhook (and the trailing-slash variant)
pub async fn provider_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<serde_json::Value>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.gateway.process(signature, &body).await? {
        GatewayOutcome::Accepted => Ok(Json(serde_json::json!({ "received": true }))),
        GatewayOutcome::InvalidSignature => {
            Err(CoreError::Unauthorized("Invalid webhook signature".into()).into())
        }
    }
}
