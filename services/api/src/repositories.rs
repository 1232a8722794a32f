//! Repositories for database operations
//!
//! Handlers talk to storage through these traits; the PostgreSQL
//! implementations live in the submodules.

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;

use crate::models::{
    Donation, DonationPayload, DonationStatus, NewUser, UnknownVariant, UpdateUser, User,
    UserStatus,
};

pub mod donation;
pub mod user;

pub use donation::PgDonationRepository;
pub use user::PgUserRepository;

/// Failure of a repository operation
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Another user already holds this username
    #[error("Username {0} is already taken")]
    UsernameTaken(String),

    /// A stored row could not be mapped back into a model
    #[error("Invalid stored row: {0}")]
    InvalidRow(#[from] UnknownVariant),

    /// Storage failure
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(DatabaseError::Query(err))
    }
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Persistence of donation records
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// All donations, oldest first
    async fn get_all(&self) -> RepositoryResult<Vec<Donation>>;

    /// Find a donation by ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Donation>>;

    /// Insert a donation and return it with its assigned ID
    async fn create(&self, payload: &DonationPayload) -> RepositoryResult<Donation>;

    /// Replace the mutable fields of a donation. `None` when it does not exist.
    ///
    /// The holder is kept only while the new status is `BORROWED`.
    async fn update(
        &self,
        id: i64,
        payload: &DonationPayload,
    ) -> RepositoryResult<Option<Donation>>;

    /// Delete a donation. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;

    /// Lend an `IN_STOCK` donation to `holder_id` for `days` days.
    ///
    /// `None` when the donation does not exist or is not in stock.
    async fn borrow(
        &self,
        id: i64,
        holder_id: i64,
        days: i32,
    ) -> RepositoryResult<Option<Donation>>;

    /// Take back a `BORROWED` donation. `None` when it does not exist or is not lent out.
    async fn return_item(&self, id: i64) -> RepositoryResult<Option<Donation>>;

    /// Set the status directly, clearing the holder. `None` when it does not exist.
    async fn set_status(
        &self,
        id: i64,
        status: DonationStatus,
    ) -> RepositoryResult<Option<Donation>>;
}

/// Persistence of user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users, oldest first
    async fn get_all(&self) -> RepositoryResult<Vec<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;

    /// Insert a user and return it with its assigned ID.
    ///
    /// Fails with [`RepositoryError::UsernameTaken`] when the name is in use.
    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User>;

    /// Apply the present fields of `changes`. `None` when the user does not exist.
    ///
    /// Fails with [`RepositoryError::UsernameTaken`] when renaming onto a used name.
    async fn update(&self, id: i64, changes: &UpdateUser) -> RepositoryResult<Option<User>>;

    /// Set the account status. `None` when the user does not exist.
    async fn set_status(&self, id: i64, status: UserStatus) -> RepositoryResult<Option<User>>;

    /// Delete a user. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> RepositoryResult<bool>;
}

/// Whether a sqlx error is a unique-constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
