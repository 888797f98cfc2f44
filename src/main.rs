mod analysis;
mod config;
mod db;
mod errors;
mod handlers;
mod llm_client;
mod models;
mod prompts;
mod scoring;
mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::llm_client::{ChatModel, OpenAiClient};
use crate::store::PgLeadStore;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection and schema bootstrap.
/// - OpenAI chat client (optional; analysis fails per lead without it).
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_leadgen_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    let store = Arc::new(PgLeadStore::new(db.pool.clone()));

    // Initialize the chat model used by the analysis pipeline. Absence
    // of a credential is not fatal: CRUD keeps working and each analysis
    // attempt is recorded as failed.
    let chat_model: Option<Arc<dyn ChatModel>> = match OpenAiClient::from_config(&config) {
        Some(Ok(client)) => {
            tracing::info!(
                "✓ OpenAI client initialized: {} ({})",
                config.openai_base_url,
                config.openai_model
            );
            Some(Arc::new(client))
        }
        Some(Err(e)) => {
            tracing::error!("Failed to initialize OpenAI client: {}", e);
            None
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; analysis requests will fail");
            None
        }
    };

    // Build application state
    let app_state = Arc::new(handlers::AppState { store, chat_model });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/", get(handlers::root))
        .route(
            "/api/leads",
            post(handlers::create_lead).get(handlers::list_leads),
        )
        .route("/api/leads/stats/summary", get(handlers::lead_stats))
        .route(
            "/api/leads/:id",
            get(handlers::get_lead)
                .put(handlers::update_lead)
                .delete(handlers::delete_lead),
        )
        .route("/api/leads/:id/analyze", post(handlers::trigger_analysis))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 5MB max payload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20 (prevents DDoS)
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
