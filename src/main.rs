//! Inkpost - a small multi-user blog content service

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inkpost::{
    api::{self, AppState},
    config::Config,
    db::{
        repositories::{
            StoreBlogRepository, StoreCommentRepository, StoreOwnershipRepository,
            StoreUserRepository,
        },
        MemoryStore, TimeoutStore,
    },
    rpc,
    services::{BlogService, CommentService, TokenAuthenticator, UserService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkpost=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting inkpost content service...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    // Initialize the document store, with every call bounded by the
    // configured per-operation timeout.
    let store = TimeoutStore::wrap(
        MemoryStore::boxed(),
        std::time::Duration::from_millis(config.store.op_timeout_ms),
    );
    tracing::info!(timeout_ms = config.store.op_timeout_ms, "Document store initialized");

    // Create repositories
    let user_repo = StoreUserRepository::boxed(store.clone());
    let blog_repo = StoreBlogRepository::boxed(store.clone());
    let comment_repo = StoreCommentRepository::boxed(store.clone());
    let ownership_repo = StoreOwnershipRepository::boxed(store);

    // Initialize services
    let tokens = Arc::new(TokenAuthenticator::with_validity(
        config.auth.secret.as_bytes(),
        config.auth.token_ttl_secs,
    ));
    let user_service = Arc::new(UserService::new(user_repo.clone(), tokens.clone()));
    let blog_service = Arc::new(BlogService::new(
        blog_repo.clone(),
        ownership_repo,
        user_repo,
    ));
    let comment_service = Arc::new(CommentService::new(comment_repo, blog_repo));

    // Build application state, shared by both front ends
    let state = AppState {
        users: user_service,
        blogs: blog_service,
        comments: comment_service,
        tokens,
    };

    // Build routers
    let rest = api::build_router(state.clone(), &config.server.cors_origin)?;
    let rpc = rpc::build_rpc_router(state);

    // Start both listeners
    let rest_addr = format!("{}:{}", config.server.host, config.server.port);
    let rpc_addr = format!("{}:{}", config.server.host, config.server.rpc_port);
    let rest_listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    let rpc_listener = tokio::net::TcpListener::bind(&rpc_addr).await?;
    tracing::info!("REST listening on http://{}", rest_addr);
    tracing::info!("RPC listening on http://{}", rpc_addr);

    tokio::select! {
        result = axum::serve(rest_listener, rest) => result?,
        result = axum::serve(rpc_listener, rpc) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
