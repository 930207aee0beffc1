//! Hosted API: proxies the model and fronts the remote persistence backend.

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use threemeals_core::{AlternativesProvider, PlanGenerator, RemotePersistence};

use crate::api::{
    EMAILS_PATH, GENERATE_PLAN_PATH, GET_ALTERNATIVES_PATH, GET_PLAN_PATH, SAVE_EMAIL_PATH,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn PlanGenerator>,
    pub alternatives: Arc<dyn AlternativesProvider>,
    pub persistence: Arc<dyn RemotePersistence>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(GENERATE_PLAN_PATH, post(handlers::generate_plan))
        .route(GET_ALTERNATIVES_PATH, post(handlers::get_alternatives))
        .route(SAVE_EMAIL_PATH, post(handlers::save_email))
        .route(GET_PLAN_PATH, post(handlers::get_plan))
        .route(EMAILS_PATH, get(handlers::list_emails))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
