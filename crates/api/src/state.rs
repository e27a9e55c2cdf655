use std::sync::Arc;

use prepcall_evaluation::EvaluationPipeline;
use prepcall_events::EventBus;

use crate::config::ServerConfig;
use crate::gateway::WebhookGateway;
use crate::provider_client::VoiceCallProvider;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: prepcall_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus for publishing lifecycle events.
    pub event_bus: Arc<EventBus>,
    /// Webhook ingestion gateway.
    pub gateway: Arc<WebhookGateway>,
    /// Voice-call provider used when starting sessions.
    pub provider: Arc<dyn VoiceCallProvider>,
    /// Transcript evaluation pipeline.
    pub pipeline: Arc<EvaluationPipeline>,
}
