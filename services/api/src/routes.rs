//! API service routes

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub mod donations;
pub mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route(
            "/donations",
            get(donations::get_donations).post(donations::create_donation),
        )
        .route(
            "/donations/:id",
            get(donations::get_donation)
                .put(donations::update_donation)
                .delete(donations::delete_donation),
        )
        .route("/donations/:id/borrow", post(donations::borrow_donation))
        .route("/donations/:id/return", post(donations::return_donation))
        .route("/donations/:id/status", put(donations::set_donation_status))
        .route("/users", get(users::get_users).post(users::register))
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/:id/status", put(users::set_user_status));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "sports-api"
    }))
}
