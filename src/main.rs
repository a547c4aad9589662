mod config;
mod error;
mod family;
mod graph;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use graph::BuildOptions;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real deployments set the environment.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env().expect("invalid configuration");

    let source = family::source::HttpFamilySource::new(&config.family_api).expect("family API client init failed");
    tracing::info!(base_url = %config.family_api.base_url, "family API client initialized");

    let state = state::AppState::new(
        Arc::new(source),
        config.default_view_mode,
        BuildOptions { empty_family: config.empty_family },
    )
    .with_view_capacity(config.view_capacity);

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "kinship listening");
    axum::serve(listener, app).await.expect("server failed");
}
