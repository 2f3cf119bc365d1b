mod api;
mod app;
mod auth;
mod config;
mod cookies;
mod db;
mod guest;
mod models;
mod raw_sql;
mod repository;
mod schema;
mod state;
mod storage;
mod telemetry;

#[cfg(test)]
mod test_support;

pub use state::AppState;

use auth::PgSessionStore;
use config::ServerConfig;
use larder_core::llm::create_provider;
use larder_core::{LlmRanker, RecipeRepository, SearchEngine};
use repository::PgRecipeRepository;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use storage::PgObjectStore;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        tracing::info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        return match api::openapi().to_pretty_json() {
            Ok(spec) => {
                println!("{}", spec);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render OpenAPI spec: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    telemetry::init_telemetry();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let provider = match create_provider(&config.ranking) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!("Failed to set up ranking provider: {}", e);
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        timeout_ms = config.ranking.timeout.as_millis() as u64,
        "Ranking provider ready"
    );

    let pool = Arc::new(db::create_pool(&config.database_url));
    let recipes: Arc<dyn RecipeRepository> = Arc::new(PgRecipeRepository::new(pool.clone()));
    let ranker = Arc::new(LlmRanker::new(provider, config.ranking.timeout));

    let bind_addr = config.bind_addr.clone();
    let public_base_url = config.public_base_url.clone();

    let state = AppState {
        search: SearchEngine::new(recipes.clone(), ranker),
        recipes,
        objects: Arc::new(PgObjectStore::new(pool.clone())),
        sessions: Arc::new(PgSessionStore::new(pool.clone())),
        pool,
        config: Arc::new(config),
    };

    let app = app::router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", bind_addr, e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Server listening on {}", bind_addr);
    tracing::info!("Swagger UI available at {}/swagger-ui/", public_base_url);
    tracing::info!(
        "OpenAPI spec available at {}/api-docs/openapi.json",
        public_base_url
    );

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    tracing::info!("Server shut down");
    ExitCode::SUCCESS
}
