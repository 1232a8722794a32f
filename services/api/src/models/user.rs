//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use super::UnknownVariant;

/// Role of a person in the organization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Villager,
    Organizer,
    Admin,
}

impl Role {
    /// Column value stored in the `users.role` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Villager => "VILLAGER",
            Role::Organizer => "ORGANIZER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VILLAGER" => Ok(Role::Villager),
            "ORGANIZER" => Ok(Role::Organizer),
            "ADMIN" => Ok(Role::Admin),
            other => Err(UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Account state. Organizers wait as `PENDING` until approved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    #[default]
    Active,
    Pending,
}

impl UserStatus {
    /// Column value stored in the `users.status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Pending => "PENDING",
        }
    }

    /// Status a newly registered account starts in
    pub fn initial_for(role: Role) -> Self {
        match role {
            Role::Organizer => UserStatus::Pending,
            Role::Villager | Role::Admin => UserStatus::Active,
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(UserStatus::Active),
            "PENDING" => Ok(UserStatus::Pending),
            other => Err(UnknownVariant {
                kind: "user status",
                value: other.to_string(),
            }),
        }
    }
}

/// Free-form profile attributes of a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub village: Option<String>,
    pub sport_preference: Option<String>,
    pub contact_info: Option<String>,
    /// Certificate reference for organizers
    pub organization_certificate: Option<String>,
    /// Area an administrator is responsible for
    pub responsible_area: Option<String>,
}

/// Changes to profile attributes.
///
/// An absent field is `None` and keeps the stored value. An explicit
/// `null` is `Some(None)` and clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileChanges {
    #[serde(default, deserialize_with = "present")]
    pub village: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub sport_preference: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub contact_info: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub organization_certificate: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub responsible_area: Option<Option<String>>,
}

impl ProfileChanges {
    /// Apply the present fields onto `profile`
    pub fn apply_to(&self, profile: &mut UserProfile) {
        fn apply(change: &Option<Option<String>>, field: &mut Option<String>) {
            if let Some(value) = change {
                field.clone_from(value);
            }
        }

        apply(&self.village, &mut profile.village);
        apply(&self.sport_preference, &mut profile.sport_preference);
        apply(&self.contact_info, &mut profile.contact_info);
        apply(
            &self.organization_certificate,
            &mut profile.organization_certificate,
        );
        apply(&self.responsible_area, &mut profile.responsible_area);
    }
}

/// Marks a field as present, so `null` becomes `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// User entity, as stored
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User as returned by the API. Never carries credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(flatten)]
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            status: user.status,
            profile: user.profile,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Request for user registration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub profile: UserProfile,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub status: UserStatus,
    pub profile: UserProfile,
}

/// Request for a partial user update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    #[serde(flatten)]
    pub profile: ProfileChanges,
}

/// User update payload; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
    pub profile: ProfileChanges,
}

/// Request for approving or suspending an account
#[derive(Debug, Clone, Deserialize)]
pub struct UserStatusRequest {
    pub status: UserStatus,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
