use std::sync::Arc;
use axum::{
    routing::{Router, get},
    http::{Method, HeaderValue},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::{
    cors::{CorsLayer, Any},
    compression::CompressionLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing::info;

mod routes;
mod models;
mod services;
mod config;
mod error;
mod state;

use crate::{
    config::Config,
    state::AppState,
    services::CommentService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| "discussion_threads=debug,tower_http=debug".into())
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Discussion Threads service...");

    dotenv::dotenv().ok();
    let config = Config::from_env()?;

    if !config.is_production() {
        info!("Running in {} mode", config.environment);
    }

    let comment_service = CommentService::new();

    let app_state = Arc::new(AppState {
        config: config.clone(),
        comment_service,
    });

    let cors = if config.cors_allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(Any)
    } else {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
            .allow_origin(
                config.cors_allowed_origins
                    .split(',')
                    .map(|origin| origin.parse::<HeaderValue>().unwrap())
                    .collect::<Vec<_>>(),
            )
    };

    let app = Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
        .nest("/api/articles", routes::articles::router())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    info!("Starting server on http://{}", addr);

    axum::Server::bind(&addr.parse()?)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Discussion Threads API",
        "status": "running"
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}
