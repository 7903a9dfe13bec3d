//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints for the inkpost content
//! service:
//! - Auth endpoints (register, login, logout)
//! - User endpoints
//! - Blog endpoints
//! - Comment endpoints

pub mod auth;
pub mod blogs;
pub mod comments;
pub mod middleware;
pub mod users;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedSubject};

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Everything except register/login/logout sits behind token auth.
    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", delete(users::delete_user))
        .route("/blogs", get(blogs::list_blogs))
        .route("/blog/insert", post(blogs::insert_blog))
        .route("/blog/{id}", delete(blogs::delete_blog))
        .route("/comments", get(comments::list_comments))
        .route("/comments/insert/{blog_id}", post(comments::insert_comment))
        .route(
            "/comments/delete/{blog_id}/{comment_id}",
            delete(comments::delete_comment),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    Router::new()
        .route("/users/register", post(auth::register))
        .route("/users/login", post(auth::login))
        .route("/users/logout", get(auth::logout))
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin '{cors_origin}'"))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Ok(Router::new()
        .merge(build_api_router(state.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
