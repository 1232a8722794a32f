//! Donation models for the API service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::UnknownVariant;

/// Lifecycle of a donated item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationStatus {
    /// Announced by the donor, not yet received
    #[default]
    Pending,
    /// Received and available for lending
    InStock,
    /// Currently lent out
    Borrowed,
}

impl DonationStatus {
    /// Column value stored in the `donations.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "PENDING",
            DonationStatus::InStock => "IN_STOCK",
            DonationStatus::Borrowed => "BORROWED",
        }
    }
}

impl fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DonationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(DonationStatus::Pending),
            "IN_STOCK" => Ok(DonationStatus::InStock),
            "BORROWED" => Ok(DonationStatus::Borrowed),
            other => Err(UnknownVariant {
                kind: "donation status",
                value: other.to_string(),
            }),
        }
    }
}

/// Donation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: i64,
    pub item_name: String,
    pub category: String,
    pub quantity: i32,
    pub condition_level: i16,
    pub donor_id: Option<i64>,
    pub donor_name: Option<String>,
    pub description: Option<String>,
    pub status: DonationStatus,
    /// User currently holding the item; set only while `BORROWED`
    #[serde(rename = "currentHolderId")]
    pub holder_id: Option<i64>,
    /// When a borrowed item is due back
    pub due_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a donation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationPayload {
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    #[serde(default = "default_condition_level")]
    pub condition_level: i16,
    #[serde(default)]
    pub donor_id: Option<i64>,
    #[serde(default)]
    pub donor_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: DonationStatus,
}

/// Request for lending a donated item
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub user_id: i64,
    pub days: i32,
}

/// Request for setting a donation status directly
#[derive(Debug, Clone, Deserialize)]
pub struct DonationStatusRequest {
    pub status: DonationStatus,
}

fn default_quantity() -> i32 {
    1
}

fn default_condition_level() -> i16 {
    3
}
