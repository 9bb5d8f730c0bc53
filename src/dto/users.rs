use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{AccountStatus, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}

/// Self-service profile edit. user_type is deliberately absent: the role is
/// fixed at registration and only account status may change after that.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminUpdateUserRequest {
    pub status: Option<AccountStatus>,
    pub is_verified: Option<bool>,
    pub commission_rate_bps: Option<i32>,
}
