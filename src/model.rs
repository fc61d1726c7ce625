//! Domain Records
//!
//! Users, teams, results and payment screenshots as persisted by the
//! [`Store`](crate::store::Store) and exchanged over the REST API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Milliseconds since the Unix epoch
pub type Timestamp = i64;

/// Current time in milliseconds
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a new record id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Account role, which also selects the dashboard a user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    TeamLeader,
    TeamMember,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "super_admin",
            UserRole::Admin => "admin",
            UserRole::TeamLeader => "team_leader",
            UserRole::TeamMember => "team_member",
        }
    }

    /// Parse a role name, accepting a few common spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "super_admin" | "superadmin" => Some(UserRole::SuperAdmin),
            "admin" => Some(UserRole::Admin),
            "team_leader" | "leader" => Some(UserRole::TeamLeader),
            "team_member" | "member" => Some(UserRole::TeamMember),
            _ => None,
        }
    }

    /// Whether this role sits on a team roster
    pub fn is_participant(&self) -> bool {
        matches!(self, UserRole::TeamLeader | UserRole::TeamMember)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub college: Option<String>,
    pub created_at: Timestamp,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            email: email.into(),
            role,
            team_id: None,
            phone: None,
            college: None,
            created_at: now_millis(),
        }
    }

    /// Builder: attach to a team
    pub fn team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Builder: set phone number
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Builder: set college
    pub fn college(mut self, college: impl Into<String>) -> Self {
        self.college = Some(college.into());
        self
    }
}

/// A participating team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub track: Option<String>,
    pub created_at: Timestamp,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            project_title: None,
            track: None,
            created_at: now_millis(),
        }
    }

    pub fn project_title(mut self, title: impl Into<String>) -> Self {
        self.project_title = Some(title.into());
        self
    }

    pub fn track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }
}

/// A judged score for one team in one round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub id: String,
    pub team_id: String,
    pub round: String,
    pub score: f64,
    #[serde(default)]
    pub remarks: Option<String>,
    pub published_at: Timestamp,
}

impl ResultEntry {
    pub fn new(team_id: impl Into<String>, round: impl Into<String>, score: f64) -> Self {
        Self {
            id: new_id(),
            team_id: team_id.into(),
            round: round.into(),
            score,
            remarks: None,
            published_at: now_millis(),
        }
    }

    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// Review state of a payment screenshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Verified,
    Rejected,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Verified => "verified",
            PaymentStatus::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "verified" => Some(PaymentStatus::Verified),
            "rejected" => Some(PaymentStatus::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Proof of registration fee payment, hosted by the media provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScreenshot {
    pub id: String,
    pub team_id: String,
    /// URL assigned by the media provider, not interpreted locally
    pub image_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    pub status: PaymentStatus,
    pub uploaded_at: Timestamp,
}
