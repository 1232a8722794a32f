//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::DonationPayload;

const MAX_ITEM_NAME_LEN: usize = 100;

/// Longest lending period, in days
pub const MAX_LENDING_DAYS: i32 = 90;

/// Validate username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if username.len() < 3 {
        return Err("Username must be at least 3 characters long".to_string());
    }

    if username.len() > 32 {
        return Err("Username must be at most 32 characters long".to_string());
    }

    static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = USERNAME_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("Failed to compile username regex"));

    if !regex.is_match(username) {
        return Err("Username can only contain letters, numbers, and underscores".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    let length = password.chars().count();

    if length < 6 {
        return Err("Password must be at least 6 characters long".to_string());
    }

    if length > 128 {
        return Err("Password must be at most 128 characters long".to_string());
    }

    Ok(())
}

/// Validate a donation body before it reaches storage
pub fn validate_donation(payload: &DonationPayload) -> Result<(), String> {
    if payload.item_name.trim().is_empty() {
        return Err("Item name is required".to_string());
    }

    if payload.item_name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(format!(
            "Item name must be at most {} characters long",
            MAX_ITEM_NAME_LEN
        ));
    }

    if payload.quantity < 1 {
        return Err("Quantity must be at least 1".to_string());
    }

    if !(1..=5).contains(&payload.condition_level) {
        return Err("Condition level must be between 1 and 5".to_string());
    }

    Ok(())
}

/// Validate a lending period
pub fn validate_lending_days(days: i32) -> Result<(), String> {
    if !(1..=MAX_LENDING_DAYS).contains(&days) {
        return Err(format!(
            "Lending period must be between 1 and {} days",
            MAX_LENDING_DAYS
        ));
    }

    Ok(())
}
