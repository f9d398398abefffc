use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_match_api::analysis::analyzer::ResumeAnalyzer;
use resume_match_api::config::Config;
use resume_match_api::llm_client::{self, cache::CachedModel, LlmClient};
use resume_match_api::routes::build_router;
use resume_match_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_timeout,
        config.llm_max_retries,
    )?;
    info!(
        "LLM client initialized (model: {}, max retries: {})",
        llm_client::MODEL,
        config.llm_max_retries
    );

    // Response cache in front of the client
    let model = CachedModel::new(llm, config.llm_cache_ttl, config.llm_cache_capacity);
    if model.is_enabled() {
        info!(
            "LLM response cache enabled (ttl: {}s, capacity: {})",
            config.llm_cache_ttl.as_secs(),
            config.llm_cache_capacity
        );
    } else {
        info!("LLM response cache disabled");
    }

    let analyzer =
        ResumeAnalyzer::new(Arc::new(model)).with_concurrency(config.analysis_concurrency);
    info!(
        "Analyzer ready (concurrency: {}, weights: {:?})",
        config.analysis_concurrency,
        analyzer.weights()
    );

    // Build app state
    let state = AppState::new(analyzer, config.max_upload_bytes);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
