use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

mod config;
mod database;
mod error;
mod handlers;
mod middleware;
mod services;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();
    tracing::info!("Starting ProjectHub API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PROJECTHUB_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 ProjectHub API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Project resource
        .merge(project_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn project_routes() -> Router {
    use axum::middleware::from_fn;
    use axum::routing::{delete, get, post, put};

    use crate::middleware::{require_faculty, require_user};
    use handlers::projects;

    // Collection routes are faculty-only
    let collection = get(projects::project_list)
        .post(projects::project_create)
        .route_layer(from_fn(require_faculty));

    // PUT checks role here and ownership in the handler. GET only needs
    // a signed-in caller. DELETE carries no gate at all, asymmetric
    // with PUT.
    let member = put(projects::project_update)
        .route_layer(from_fn(require_faculty))
        .merge(get(projects::project_show).route_layer(from_fn(require_user)))
        .merge(delete(projects::project_delete));

    Router::new()
        .route("/api/projects", collection)
        .route("/api/projects/:id", member)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "ProjectHub API",
            "version": version,
            "description": "Project enrollment backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "projects": "/api/projects (faculty - list/create)",
                "project": "/api/projects/:id (GET authenticated, PUT faculty owner, DELETE open)",
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
