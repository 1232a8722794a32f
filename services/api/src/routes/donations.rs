//! Donation endpoints

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{BorrowRequest, Donation, DonationPayload, DonationStatus, DonationStatusRequest},
    state::AppState,
    validation::{validate_donation, validate_lending_days},
};

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Donation {} not found", id))
}

/// Explains why a guarded transition on donation `id` matched no row
async fn transition_refused(state: &AppState, id: i64, reason: &str) -> ApiResult<Donation> {
    match state.donation_repository.find_by_id(id).await? {
        Some(donation) => Err(ApiError::Conflict(format!(
            "Donation {} is {}, {}",
            id, donation.status, reason
        ))),
        None => Err(not_found(id)),
    }
}

/// List all donations
pub async fn get_donations(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let donations = state.donation_repository.get_all().await?;

    Ok(Json(donations))
}

/// Get a donation by ID
pub async fn get_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let donation = state
        .donation_repository
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(donation))
}

/// Record a new donation
pub async fn create_donation(
    State(state): State<AppState>,
    Json(payload): Json<DonationPayload>,
) -> ApiResult<impl IntoResponse> {
    validate_donation(&payload).map_err(ApiError::BadRequest)?;

    let donation = state.donation_repository.create(&payload).await?;

    Ok((StatusCode::CREATED, Json(donation)))
}

/// Replace a donation
pub async fn update_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DonationPayload>,
) -> ApiResult<impl IntoResponse> {
    validate_donation(&payload).map_err(ApiError::BadRequest)?;

    let donation = state
        .donation_repository
        .update(id, &payload)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(donation))
}

/// Delete a donation
pub async fn delete_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if state.donation_repository.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// Lend an in-stock donation to a user
pub async fn borrow_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<BorrowRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_lending_days(payload.days).map_err(ApiError::BadRequest)?;

    if state
        .user_repository
        .find_by_id(payload.user_id)
        .await?
        .is_none()
    {
        return Err(ApiError::BadRequest(format!(
            "User {} does not exist",
            payload.user_id
        )));
    }

    let donation = match state
        .donation_repository
        .borrow(id, payload.user_id, payload.days)
        .await?
    {
        Some(donation) => donation,
        None => transition_refused(&state, id, "only IN_STOCK items can be borrowed").await?,
    };

    info!(
        "Donation {} lent to user {} for {} days",
        id, payload.user_id, payload.days
    );
    Ok(Json(donation))
}

/// Take back a borrowed donation
pub async fn return_donation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let donation = match state.donation_repository.return_item(id).await? {
        Some(donation) => donation,
        None => transition_refused(&state, id, "only BORROWED items can be returned").await?,
    };

    info!("Donation {} returned", id);
    Ok(Json(donation))
}

/// Set a donation status directly, e.g. to accept a pending donation into stock
pub async fn set_donation_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<DonationStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.status == DonationStatus::Borrowed {
        return Err(ApiError::BadRequest(
            "Use the borrow endpoint to lend a donation".to_string(),
        ));
    }

    let donation = state
        .donation_repository
        .set_status(id, payload.status)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(donation))
}
