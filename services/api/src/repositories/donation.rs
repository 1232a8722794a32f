//! Donation repository for database operations

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use super::{DonationRepository, RepositoryResult};
use crate::models::{Donation, DonationPayload, DonationStatus};

const DONATION_COLUMNS: &str = "id, item_name, category, quantity, condition_level, donor_id, \
     donor_name, description, status, holder_id, due_at, created_at, updated_at";

/// PostgreSQL-backed donation repository
#[derive(Clone)]
pub struct PgDonationRepository {
    pool: PgPool,
}

impl PgDonationRepository {
    /// Create a new donation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn donation_from_row(row: &PgRow) -> RepositoryResult<Donation> {
    let status: String = row.try_get("status")?;

    Ok(Donation {
        id: row.try_get("id")?,
        item_name: row.try_get("item_name")?,
        category: row.try_get("category")?,
        quantity: row.try_get("quantity")?,
        condition_level: row.try_get("condition_level")?,
        donor_id: row.try_get("donor_id")?,
        donor_name: row.try_get("donor_name")?,
        description: row.try_get("description")?,
        status: status.parse::<DonationStatus>()?,
        holder_id: row.try_get("holder_id")?,
        due_at: row.try_get("due_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl DonationRepository for PgDonationRepository {
    async fn get_all(&self) -> RepositoryResult<Vec<Donation>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM donations ORDER BY id",
            DONATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(donation_from_row).collect()
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Donation>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM donations WHERE id = $1",
            DONATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(donation_from_row).transpose()
    }

    async fn create(&self, payload: &DonationPayload) -> RepositoryResult<Donation> {
        info!("Recording donation: {}", payload.item_name);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO donations
                (item_name, category, quantity, condition_level, donor_id, donor_name, description, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(&payload.item_name)
        .bind(&payload.category)
        .bind(payload.quantity)
        .bind(payload.condition_level)
        .bind(payload.donor_id)
        .bind(&payload.donor_name)
        .bind(&payload.description)
        .bind(payload.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        donation_from_row(&row)
    }

    async fn update(
        &self,
        id: i64,
        payload: &DonationPayload,
    ) -> RepositoryResult<Option<Donation>> {
        info!("Updating donation {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE donations
            SET item_name = $2,
                category = $3,
                quantity = $4,
                condition_level = $5,
                donor_id = $6,
                donor_name = $7,
                description = $8,
                status = $9,
                holder_id = CASE WHEN $9 = 'BORROWED' THEN holder_id END,
                due_at = CASE WHEN $9 = 'BORROWED' THEN due_at END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(id)
        .bind(&payload.item_name)
        .bind(&payload.category)
        .bind(payload.quantity)
        .bind(payload.condition_level)
        .bind(payload.donor_id)
        .bind(&payload.donor_name)
        .bind(&payload.description)
        .bind(payload.status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(donation_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        info!("Deleting donation {}", id);

        let result = sqlx::query("DELETE FROM donations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn borrow(
        &self,
        id: i64,
        holder_id: i64,
        days: i32,
    ) -> RepositoryResult<Option<Donation>> {
        info!("Lending donation {} to user {} for {} days", id, holder_id, days);

        // The status guard makes the check and the transition one statement
        let row = sqlx::query(&format!(
            r#"
            UPDATE donations
            SET status = 'BORROWED',
                holder_id = $2,
                due_at = NOW() + make_interval(days => $3),
                updated_at = NOW()
            WHERE id = $1 AND status = 'IN_STOCK'
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(id)
        .bind(holder_id)
        .bind(days)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(donation_from_row).transpose()
    }

    async fn return_item(&self, id: i64) -> RepositoryResult<Option<Donation>> {
        info!("Returning donation {}", id);

        let row = sqlx::query(&format!(
            r#"
            UPDATE donations
            SET status = 'IN_STOCK',
                holder_id = NULL,
                due_at = NULL,
                updated_at = NOW()
            WHERE id = $1 AND status = 'BORROWED'
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(donation_from_row).transpose()
    }

    async fn set_status(
        &self,
        id: i64,
        status: DonationStatus,
    ) -> RepositoryResult<Option<Donation>> {
        info!("Setting donation {} status to {}", id, status);

        let row = sqlx::query(&format!(
            r#"
            UPDATE donations
            SET status = $2,
                holder_id = NULL,
                due_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            DONATION_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(donation_from_row).transpose()
    }
}
