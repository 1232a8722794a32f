//! Shared helpers for the HTTP integration tests
//!
//! The router runs against in-memory repositories so the tests need no
//! database.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::Value;
use sports_api::{
    AppState, create_router,
    models::{Donation, DonationPayload, DonationStatus, NewUser, UpdateUser, User, UserStatus},
    repositories::{DonationRepository, RepositoryError, RepositoryResult, UserRepository},
};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::RwLock;
use tower::util::ServiceExt;

#[derive(Default)]
pub struct InMemoryDonations {
    rows: RwLock<(i64, BTreeMap<i64, Donation>)>,
}

impl InMemoryDonations {
    /// Apply `change` to donation `id` when `guard` accepts its current state
    async fn transition(
        &self,
        id: i64,
        guard: impl FnOnce(&Donation) -> bool,
        change: impl FnOnce(&mut Donation),
    ) -> RepositoryResult<Option<Donation>> {
        let mut rows = self.rows.write().await;
        let Some(donation) = rows.1.get_mut(&id) else {
            return Ok(None);
        };
        if !guard(donation) {
            return Ok(None);
        }
        change(donation);
        donation.updated_at = Utc::now();
        Ok(Some(donation.clone()))
    }
}

#[async_trait]
impl DonationRepository for InMemoryDonations {
    async fn get_all(&self) -> RepositoryResult<Vec<Donation>> {
        Ok(self.rows.read().await.1.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Donation>> {
        Ok(self.rows.read().await.1.get(&id).cloned())
    }

    async fn create(&self, payload: &DonationPayload) -> RepositoryResult<Donation> {
        let mut guard = self.rows.write().await;
        guard.0 += 1;
        let now = Utc::now();
        let donation = Donation {
            id: guard.0,
            item_name: payload.item_name.clone(),
            category: payload.category.clone(),
            quantity: payload.quantity,
            condition_level: payload.condition_level,
            donor_id: payload.donor_id,
            donor_name: payload.donor_name.clone(),
            description: payload.description.clone(),
            status: payload.status,
            holder_id: None,
            due_at: None,
            created_at: now,
            updated_at: now,
        };
        guard.1.insert(donation.id, donation.clone());
        Ok(donation)
    }

    async fn update(
        &self,
        id: i64,
        payload: &DonationPayload,
    ) -> RepositoryResult<Option<Donation>> {
        self.transition(
            id,
            |_| true,
            |donation| {
                donation.item_name = payload.item_name.clone();
                donation.category = payload.category.clone();
                donation.quantity = payload.quantity;
                donation.condition_level = payload.condition_level;
                donation.donor_id = payload.donor_id;
                donation.donor_name = payload.donor_name.clone();
                donation.description = payload.description.clone();
                donation.status = payload.status;
                if payload.status != DonationStatus::Borrowed {
                    donation.holder_id = None;
                    donation.due_at = None;
                }
            },
        )
        .await
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.rows.write().await.1.remove(&id).is_some())
    }

    async fn borrow(
        &self,
        id: i64,
        holder_id: i64,
        days: i32,
    ) -> RepositoryResult<Option<Donation>> {
        self.transition(
            id,
            |donation| donation.status == DonationStatus::InStock,
            |donation| {
                donation.status = DonationStatus::Borrowed;
                donation.holder_id = Some(holder_id);
                donation.due_at = Some(Utc::now() + Duration::days(i64::from(days)));
            },
        )
        .await
    }

    async fn return_item(&self, id: i64) -> RepositoryResult<Option<Donation>> {
        self.transition(
            id,
            |donation| donation.status == DonationStatus::Borrowed,
            |donation| {
                donation.status = DonationStatus::InStock;
                donation.holder_id = None;
                donation.due_at = None;
            },
        )
        .await
    }

    async fn set_status(
        &self,
        id: i64,
        status: DonationStatus,
    ) -> RepositoryResult<Option<Donation>> {
        self.transition(
            id,
            |_| true,
            |donation| {
                donation.status = status;
                donation.holder_id = None;
                donation.due_at = None;
            },
        )
        .await
    }
}

/// Users keyed by id. Usernames are unique, checked under the write lock
/// like the `UNIQUE` constraint in storage.
#[derive(Default)]
pub struct InMemoryUsers {
    rows: RwLock<(i64, BTreeMap<i64, User>)>,
}

fn name_in_use(rows: &BTreeMap<i64, User>, username: &str, except: Option<i64>) -> bool {
    rows.values()
        .any(|user| user.username == username && Some(user.id) != except)
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn get_all(&self) -> RepositoryResult<Vec<User>> {
        Ok(self.rows.read().await.1.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.rows.read().await.1.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self
            .rows
            .read()
            .await
            .1
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create(&self, new_user: &NewUser) -> RepositoryResult<User> {
        let mut guard = self.rows.write().await;
        if name_in_use(&guard.1, &new_user.username, None) {
            return Err(RepositoryError::UsernameTaken(new_user.username.clone()));
        }
        guard.0 += 1;
        let now = Utc::now();
        let user = User {
            id: guard.0,
            username: new_user.username.clone(),
            password_hash: new_user.password_hash.clone(),
            role: new_user.role,
            status: new_user.status,
            profile: new_user.profile.clone(),
            created_at: now,
            updated_at: now,
        };
        guard.1.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: &UpdateUser) -> RepositoryResult<Option<User>> {
        let mut guard = self.rows.write().await;
        if let Some(username) = &changes.username {
            if guard.1.contains_key(&id) && name_in_use(&guard.1, username, Some(id)) {
                return Err(RepositoryError::UsernameTaken(username.clone()));
            }
        }
        let Some(user) = guard.1.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = &changes.username {
            user.username = username.clone();
        }
        if let Some(hash) = &changes.password_hash {
            user.password_hash = hash.clone();
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        changes.profile.apply_to(&mut user.profile);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn set_status(&self, id: i64, status: UserStatus) -> RepositoryResult<Option<User>> {
        let mut guard = self.rows.write().await;
        let Some(user) = guard.1.get_mut(&id) else {
            return Ok(None);
        };
        user.status = status;
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.rows.write().await.1.remove(&id).is_some())
    }
}

/// Router over fresh in-memory repositories
pub fn create_test_app() -> (Router, Arc<InMemoryUsers>) {
    let users = Arc::new(InMemoryUsers::default());
    let state = AppState::new(Arc::new(InMemoryDonations::default()), users.clone());
    (create_router(state), users)
}

/// Send a request and return the status with the JSON body (`Null` when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    // axum's own rejections answer in plain text
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, value)
}
