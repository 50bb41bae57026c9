//! HTTP bridge in front of the nerve [`Responder`](nerve_core::Responder).
//!
//! A chat gateway (Discord relay, Slack app, test harness) posts each
//! inbound message to `/api/messages` and relays the returned replies in
//! order. The bridge itself holds no chat-platform credentials.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

pub use auth::BridgeAuth;
pub use state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/messages", post(routes::messages::post_message))
        .route("/api/health", get(routes::health::health))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the bridge on a pre-bound listener until the server stops.
///
/// Taking a bound `TcpListener` lets the caller read the actual port first
/// (useful when port 0 lets the OS pick).
pub async fn serve_on(listener: tokio::net::TcpListener, state: AppState) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    tracing::info!(
        backend = %state.responder.backend(),
        "nerve bridge listening on http://localhost:{actual_port}"
    );

    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
