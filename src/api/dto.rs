//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Records themselves (`User`, `Team`, ...) are serialized as-is.

use serde::{Deserialize, Serialize};

use crate::model::{PaymentScreenshot, ResultEntry, Team, User};
use crate::roster::{RosterSnapshot, TeamMember};

// ============================================
// USER DTOs
// ============================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    /// super_admin, admin, team_leader or team_member
    pub role: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

// ============================================
// TEAM DTOs
// ============================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    /// Existing user who registers and leads the team
    #[serde(default)]
    pub leader_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateTeamRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TeamListResponse {
    pub teams: Vec<Team>,
    pub total: usize,
}

/// Team with its roster
#[derive(Debug, Serialize, Deserialize)]
pub struct TeamDetailResponse {
    pub team: Team,
    pub members: Vec<TeamMember>,
    pub roster: RosterSnapshot,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AddMemberRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MembersResponse {
    pub members: Vec<TeamMember>,
    pub roster: RosterSnapshot,
}

// ============================================
// RESULT DTOs
// ============================================

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateResultRequest {
    pub team_id: String,
    pub round: String,
    pub score: f64,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateResultRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamFilterParams {
    #[serde(default)]
    pub team_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResultListResponse {
    pub results: Vec<ResultEntry>,
    pub total: usize,
}

// ============================================
// PAYMENT DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct PaymentListParams {
    #[serde(default)]
    pub team_id: Option<String>,
    /// pending, verified or rejected
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<PaymentScreenshot>,
    pub total: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PaymentStatusRequest {
    pub status: String,
}

// ============================================
// HEALTH DTOs
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// healthy or unhealthy
    pub status: String,
    pub database: String,
    /// Media provider name
    pub media: String,
    /// Mail outbox name
    pub mail: String,
    pub uptime_seconds: u64,
    pub version: String,
}
