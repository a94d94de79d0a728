use axum::{middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::database::DatabaseManager;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Build the full application router
pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // API routes
        .merge(user_routes())
        .merge(auth_routes())
        .merge(profile_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn user_routes() -> Router {
    use axum::routing::post;

    Router::new()
        // Registration
        .route("/users", post(public::users::register))
}

fn auth_routes() -> Router {
    use axum::routing::post;

    // Token acquisition is public; reading the authenticated user is not
    let protected_routes = Router::new()
        .route("/auth", get(protected::auth::current_user))
        .route_layer(middleware::from_fn(jwt_auth_middleware));

    Router::new()
        .route("/auth", post(public::auth::login))
        .merge(protected_routes)
}

fn profile_routes() -> Router {
    use axum::routing::{post, put};

    // Profile reads are public
    let public_routes = Router::new()
        .route("/profile", get(public::profile::list))
        .route("/profile/user/:user_id", get(public::profile::by_user));

    // Owner-scoped operations require a valid token
    let protected_routes = Router::new()
        .route("/profile/me", get(protected::profile::me))
        .route(
            "/profile",
            post(protected::profile::create_or_update).delete(protected::profile::delete),
        )
        .route("/profile/experience", post(protected::experience::add))
        .route(
            "/profile/experience/:experience_id",
            put(protected::experience::replace).delete(protected::experience::remove),
        )
        .route_layer(middleware::from_fn(jwt_auth_middleware));

    public_routes.merge(protected_routes)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Devnet API",
            "version": version,
            "description": "Social profile REST API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "users": "POST /users (public - registration)",
                "auth": "POST /auth (public - login), GET /auth (protected)",
                "profiles": "GET /profile, GET /profile/user/:user_id (public)",
                "profile": "GET /profile/me, POST /profile, DELETE /profile (protected)",
                "experience": "POST /profile/experience, PUT|DELETE /profile/experience/:id (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
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
