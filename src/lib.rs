use anyhow::Context;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;

/// Build the full application router.
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .merge(auth_routes())
        // Protected resource API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve the API. Port resolution: explicit argument, then
/// HYDRO_API_PORT / PORT env vars, then 3000.
pub async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let port = port
        .or_else(|| std::env::var("HYDRO_API_PORT").ok().and_then(|s| s.parse().ok()))
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Hydro API listening on http://{}", bind_addr);

    axum::serve(listener, app()).await?;
    Ok(())
}

fn auth_routes() -> Router {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn api_routes() -> Router {
    use handlers::protected::{measurements, sensors, systems};

    Router::new()
        .route("/api/systems", get(systems::list).post(systems::create))
        .route(
            "/api/systems/:id",
            get(systems::retrieve).put(systems::update).delete(systems::destroy),
        )
        .route("/api/sensors", get(sensors::list).post(sensors::create))
        .route(
            "/api/sensors/:id",
            get(sensors::retrieve).put(sensors::update).delete(sensors::destroy),
        )
        .route("/api/measurements", get(measurements::list).post(measurements::create))
        .route(
            "/api/measurements/:id",
            get(measurements::retrieve)
                .put(measurements::update)
                .delete(measurements::destroy),
        )
        .layer(axum::middleware::from_fn(middleware::auth::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Hydro API",
            "version": version,
            "description": "Hydroponic systems tracking API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "systems": "/api/systems[/:id] (protected)",
                "sensors": "/api/sensors[/:id] (protected)",
                "measurements": "/api/measurements[/:id] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
