//! User repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::{RepositoryError, RepositoryResult, UserRepository, is_unique_violation};
use crate::models::{NewUser, Role, UpdateUser, User, UserProfile, UserStatus};

const USER_COLUMNS: &str = "id, username, password_hash, role, status, village, \
     sport_preference, contact_info, organization_certificate, responsible_area, created_at, \
     updated_at";

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> RepositoryResult<User> {
    let role: String = row.try_get("role")?;
    let status: String = row.try_get("status")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        role: role.parse::<Role>()?,
        status: status.parse::<UserStatus>()?,
        profile: UserProfile {
            village: row.try_get("village")?,
            sport_preference: row.try_get("sport_preference")?,
            contact_info: row.try_get("contact_info")?,
            organization_certificate: row.try_get("organization_certificate")?,
            responsible_area: row.try_get("responsible_area")?,
        },
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Maps a `users.username` unique violation to [`RepositoryError::UsernameTaken`]
fn username_error(err: sqlx::Error, username: &str) -> RepositoryError {
    if is_unique_violation(&err) {
        RepositoryError::UsernameTaken(username.to_string())
    } else {
        err.into()
    }
}

fn new_value(change: &Option<Option<String>>) -> Option<&str> {
    change.as_ref().and_then(Option::as_deref)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(user_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE username = $1",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User> {
        info!("Creating new user: {}", new_user.username);

        let profile = &new_user.profile;
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users
                (username, password_hash, role, status, village, sport_preference, contact_info,
                 organization_certificate, responsible_area)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .bind(new_user.status.as_str())
        .bind(&profile.village)
        .bind(&profile.sport_preference)
        .bind(&profile.contact_info)
        .bind(&profile.organization_certificate)
        .bind(&profile.responsible_area)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| username_error(err, &new_user.username))?;

        user_from_row(&row)
    }

    async fn update(&self, id: i64, changes: &UpdateUser) -> RepositoryResult<Option<User>> {
        info!("Updating user {}", id);

        // Each profile column takes a presence flag and a value, so null clears it
        let profile = &changes.profile;
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                village = CASE WHEN $5 THEN $6 ELSE village END,
                sport_preference = CASE WHEN $7 THEN $8 ELSE sport_preference END,
                contact_info = CASE WHEN $9 THEN $10 ELSE contact_info END,
                organization_certificate = CASE WHEN $11 THEN $12 ELSE organization_certificate END,
                responsible_area = CASE WHEN $13 THEN $14 ELSE responsible_area END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .bind(changes.role.map(|role| role.as_str()))
        .bind(profile.village.is_some())
        .bind(new_value(&profile.village))
        .bind(profile.sport_preference.is_some())
        .bind(new_value(&profile.sport_preference))
        .bind(profile.contact_info.is_some())
        .bind(new_value(&profile.contact_info))
        .bind(profile.organization_certificate.is_some())
        .bind(new_value(&profile.organization_certificate))
        .bind(profile.responsible_area.is_some())
        .bind(new_value(&profile.responsible_area))
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| username_error(err, changes.username.as_deref().unwrap_or_default()))?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn set_status(&self, id: i64, status: UserStatus) -> RepositoryResult<Option<User>> {
        info!("Setting user {} status to {}", id, status);

        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        info!("Deleting user {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
