use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prepcall_api::background;
use prepcall_api::config::ServerConfig;
use prepcall_api::gateway::WebhookGateway;
use prepcall_api::provider_client::provider_from_config;
use prepcall_api::router::build_app_router;
use prepcall_api::state::AppState;
use prepcall_evaluation::{AnswerScorer, EvaluationPipeline, LexicalScorer, RemoteScorer};
use prepcall_events::{EventBus, EventPersistence};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prepcall_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "configuration loaded");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = prepcall_db::create_pool(&database_url)
        .await
        .expect("could not connect to database");
    tracing::info!("connected to Postgres");

    prepcall_db::health_check(&pool)
        .await
        .expect("database health check failed");

    prepcall_db::run_migrations(&pool)
        .await
        .expect("could not run database migrations");
    tracing::info!("migrations up to date");

    // --- Event bus and background workers ---
    let event_bus = Arc::new(EventBus::default());
    let persistence_handle = tokio::spawn(EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    let scorer: Arc<dyn AnswerScorer> = match config.scorer_api_url.clone() {
        Some(url) => {
            tracing::info!(endpoint = %url, "using remote answer scorer");
            Arc::new(RemoteScorer::new(url, config.scorer_api_key.clone()))
        }
        None => {
            tracing::info!("SCORER_API_URL not set; using built-in lexical scorer");
            Arc::new(LexicalScorer)
        }
    };
    let pipeline = Arc::new(EvaluationPipeline::new(pool.clone(), scorer));

    let provider = provider_from_config(&config);
    let gateway = Arc::new(WebhookGateway::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.provider_webhook_secret.clone(),
    ));

    let auto_eval_cancel = tokio_util::sync::CancellationToken::new();
    let auto_eval_handle = tokio::spawn(background::auto_eval::run(
        pool.clone(),
        Arc::clone(&pipeline),
        Arc::clone(&event_bus),
        event_bus.subscribe(),
        auto_eval_cancel.clone(),
    ));

    tracing::info!("background workers running (event persistence, auto-evaluation)");

    // --- HTTP server ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
        gateway,
        provider,
        pipeline,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("HOST is not a valid IP address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("could not bind listen address");
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // --- Teardown ---
    // Stop the auto-evaluation worker first so it releases its bus handle,
    // then drop the bus itself. Closing the broadcast channel is what tells
    // the persistence loop to exit.
    tracing::info!("listener closed, draining background workers");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    auto_eval_cancel.cancel();
    let _ = tokio::time::timeout(grace, auto_eval_handle).await;

    drop(event_bus);
    let _ = tokio::time::timeout(grace, persistence_handle).await;

    tracing::info!("shutdown complete");
}

/// Resolve once a termination signal arrives.
///
/// SIGINT covers interactive use; SIGTERM is what process managers send.
/// On non-Unix targets only Ctrl-C is wired up.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("ctrl-c handler installation failed");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation failed")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("SIGINT received, shutting down"),
        () = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
