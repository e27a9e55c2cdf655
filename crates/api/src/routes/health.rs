use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// Liveness probe. A failed database ping reports `degraded` instead of
/// failing the request, so monitors can tell the two states apart.
async fn health(State(state): State<AppState>) -> Json<Health> {
    let db_healthy = prepcall_db::health_check(&state.pool).await.is_ok();

    Json(Health {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Probe routes, mounted at the root rather than under `/api` so the path
/// never moves with API versioning.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
