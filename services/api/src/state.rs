//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

use crate::repositories::{
    DonationRepository, PgDonationRepository, PgUserRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub donation_repository: Arc<dyn DonationRepository>,
    pub user_repository: Arc<dyn UserRepository>,
}

impl AppState {
    pub fn new(
        donation_repository: Arc<dyn DonationRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            donation_repository,
            user_repository,
        }
    }

    /// State backed by PostgreSQL repositories sharing one pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(PgDonationRepository::new(pool.clone())),
            Arc::new(PgUserRepository::new(pool)),
        )
    }
}
