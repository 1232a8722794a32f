//! HTTP service for the village sports organization
//!
//! Serves CRUD endpoints for donations and users under `/api`, backed by
//! PostgreSQL through the repositories in [`repositories`].

pub mod config;
pub mod error;
pub mod models;
pub mod password;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
