mod address_service;
mod cache_validator;
mod config;
mod errors;
mod handlers;
mod models;
mod pipeline;
mod request_trace;
mod viacep_client;

use moka::future::Cache;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::address_service::AddressService;
use crate::config::Config;
use crate::handlers::AppState;
use crate::viacep_client::ViaCepClient;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the response cache, the outbound
/// request pipeline and the ViaCEP client, then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_cep_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Create the ViaCEP response cache (10 minute TTL by default).
    // Successful GET responses are cached by request URL; expiry is the only
    // invalidation path.
    let response_cache = Cache::builder()
        .time_to_live(Duration::from_secs(config.cache_ttl_secs))
        .max_capacity(10_000)
        .build();
    tracing::info!(
        "ViaCEP response cache initialized ({}s TTL, 10k capacity)",
        config.cache_ttl_secs
    );

    // Assemble the outbound pipeline: cache -> logging -> retry -> transport
    let pipeline = pipeline::build_pipeline(&config, response_cache)
        .map_err(|e| anyhow::anyhow!("Failed to build outbound pipeline: {}", e))?;

    let cep_client = ViaCepClient::new(
        pipeline,
        config.viacep_base_url.clone(),
        config.viacep_token.clone(),
    );
    tracing::info!("ViaCEP client initialized: {}", config.viacep_base_url);

    let address_service = AddressService::new(cep_client);

    // Build application state
    let state = Arc::new(AppState {
        config: config.clone(),
        address_service,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    let app = handlers::router(state).layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    }));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
