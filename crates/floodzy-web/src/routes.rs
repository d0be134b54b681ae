//! Router construction

use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Slack between the handler's own deadline and the transport cutoff
const TRANSPORT_GRACE: Duration = Duration::from_secs(5);

/// Create the router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chatbot = Router::new().route(
        "/chatbot",
        post(handlers::chatbot::ask).get(handlers::chatbot::status),
    );

    Router::new()
        .merge(chatbot.clone())
        .nest("/api", chatbot)
        .with_state(state.clone())
        .layer(TimeoutLayer::new(state.settings.request_timeout + TRANSPORT_GRACE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
