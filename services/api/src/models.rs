//! API models for request and response payloads

use thiserror::Error;

pub mod donation;
pub mod user;

pub use donation::{BorrowRequest, Donation, DonationPayload, DonationStatus, DonationStatusRequest};
pub use user::{
    LoginRequest, NewUser, ProfileChanges, RegisterUserRequest, Role, UpdateUser,
    UpdateUserRequest, User, UserProfile, UserResponse, UserStatus, UserStatusRequest,
};

/// A stored enumeration column held a value this build does not know
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
