pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod sql;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::DatabaseManager;

/// Shared handles every request needs.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: DatabaseManager, config: AppConfig) -> Self {
        Self { db, config: Arc::new(config) }
    }
}

/// Build the full router: public, protected and elevated tiers plus the
/// global layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        .merge(protected_routes())
        .merge(elevated_routes())
        .layer(
            ServiceBuilder::new()
                .layer(cors)
                .layer(from_fn_with_state(state.clone(), middleware::authenticate_jwt)),
        );

    let router = if state.config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, companies, jobs};

    Router::new()
        .route("/auth/token", post(auth::token))
        .route("/auth/register", post(auth::register))
        .route("/companies", get(companies::list))
        .route("/companies/:handle", get(companies::get))
        .route("/jobs", get(jobs::list))
        .route("/jobs/:id", get(jobs::get))
}

fn protected_routes() -> Router<AppState> {
    use handlers::protected::users;

    Router::new()
        .route(
            "/users/:username",
            get(users::get).patch(users::update).delete(users::remove),
        )
        .route("/users/:username/jobs/:id", post(users::apply))
        .route_layer(from_fn(middleware::ensure_logged_in))
}

fn elevated_routes() -> Router<AppState> {
    use handlers::elevated::{companies, jobs, users};

    Router::new()
        .route("/companies", post(companies::create))
        .route("/companies/:handle", patch(companies::update).delete(companies::remove))
        .route("/jobs", post(jobs::create))
        .route("/jobs/:id", patch(jobs::update).delete(jobs::remove))
        .route("/users", post(users::create).get(users::list))
        .route_layer(from_fn(middleware::ensure_admin))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Jobly API",
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "auth": "/auth/token, /auth/register (public)",
                "companies": "/companies[/:handle] (read public, write admin)",
                "jobs": "/jobs[/:id] (read public, write admin)",
                "users": "/users[/:username[/jobs/:id]] (same user or admin)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
