//! User endpoints: registration, login and profile management

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tokio::task;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    models::{
        LoginRequest, NewUser, RegisterUserRequest, UpdateUser, UpdateUserRequest,
        UserResponse, UserStatus, UserStatusRequest,
    },
    password::{hash_password, verify_password},
    state::AppState,
    validation::{validate_password, validate_username},
};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User {} not found", id))
}

fn username_taken(username: &str) -> ApiError {
    ApiError::Conflict(format!("Username {} is already taken", username))
}

/// Argon2 is CPU-bound, so it runs on the blocking pool
async fn hash(password: String) -> ApiResult<String> {
    task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            error!("Password hashing task failed: {}", e);
            ApiError::InternalServerError
        })?
        .map_err(|e| {
            error!("{}", e);
            ApiError::InternalServerError
        })
}

async fn verify(password: String, password_hash: String) -> anyhow::Result<bool> {
    task::spawn_blocking(move || verify_password(&password, &password_hash)).await?
}

/// List all users
pub async fn get_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users = state.user_repository.get_all().await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(UserResponse::from(user)))
}

/// Register a new user. Organizers start out pending approval.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_username(&payload.username).map_err(ApiError::BadRequest)?;
    validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    // Skips hashing for the common case; the storage constraint decides races
    if state
        .user_repository
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(username_taken(&payload.username));
    }

    let new_user = NewUser {
        username: payload.username,
        password_hash: hash(payload.password).await?,
        role: payload.role,
        status: UserStatus::initial_for(payload.role),
        profile: payload.profile,
    };

    let user = state.user_repository.create(&new_user).await?;

    info!(
        "Registered user {} as {} ({})",
        user.username, user.role, user.status
    );
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Check credentials and return the matching user
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    info!("Login attempt for user: {}", payload.username);

    let Some(user) = state
        .user_repository
        .find_by_username(&payload.username)
        .await?
    else {
        warn!("Login rejected, unknown user: {}", payload.username);
        return Err(ApiError::Unauthorized);
    };

    let valid = verify(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            error!("Stored hash for user {} is unusable: {}", user.id, e);
            ApiError::InternalServerError
        })?;

    if !valid {
        warn!("Login rejected, wrong password for user: {}", payload.username);
        return Err(ApiError::Unauthorized);
    }

    Ok(Json(UserResponse::from(user)))
}

/// Update the fields present in the body
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if let Some(username) = &payload.username {
        validate_username(username).map_err(ApiError::BadRequest)?;

        let taken = state
            .user_repository
            .find_by_username(username)
            .await?
            .is_some_and(|existing| existing.id != id);
        if taken {
            return Err(username_taken(username));
        }
    }

    let password_hash = match payload.password {
        Some(password) => {
            validate_password(&password).map_err(ApiError::BadRequest)?;
            Some(hash(password).await?)
        }
        None => None,
    };

    let changes = UpdateUser {
        username: payload.username,
        password_hash,
        role: payload.role,
        profile: payload.profile,
    };

    let user = state
        .user_repository
        .update(id, &changes)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(UserResponse::from(user)))
}

/// Approve or suspend an account
pub async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .set_status(id, payload.status)
        .await?
        .ok_or_else(|| not_found(id))?;

    info!("User {} is now {}", user.username, user.status);
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.user_repository.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}
