//! Dashboard Widgets
//!
//! Map fetched records to label/value rows. Absent optional fields show a
//! placeholder instead of an empty cell.

use serde::{Deserialize, Serialize};

use crate::model::{PaymentScreenshot, ResultEntry, Team, User};
use crate::roster::{MemberRole, RosterSnapshot, TeamMember};
use crate::store::StoreStats;

/// Placeholder for missing profile details
pub const NOT_PROVIDED: &str = "Not provided";

/// Placeholder for team settings nobody has filled in yet
pub const NOT_SET: &str = "Not Set";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetRow {
    pub label: String,
    pub value: String,
}

/// A titled card of rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetView {
    pub title: String,
    pub rows: Vec<WidgetRow>,
}

impl WidgetView {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push(WidgetRow {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Row value, `placeholder` when absent or blank
    pub fn row_or(self, label: impl Into<String>, value: Option<&str>, placeholder: &str) -> Self {
        let value = present(value).unwrap_or(placeholder);
        self.row(label, value)
    }

    pub fn value(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.value.as_str())
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Profile data as it arrives, every field optional and some under
/// alternate names
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartialProfile {
    pub name: Option<String>,
    #[serde(alias = "fullName")]
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub college: Option<String>,
    pub institution: Option<String>,
    pub role: Option<String>,
    #[serde(alias = "teamName")]
    pub team_name: Option<String>,
}

impl PartialProfile {
    pub fn from_user(user: &User, team: Option<&Team>) -> Self {
        Self {
            name: Some(user.name.clone()),
            email: Some(user.email.clone()),
            phone: user.phone.clone(),
            college: user.college.clone(),
            role: Some(user.role.to_string()),
            team_name: team.map(|t| t.name.clone()),
            ..Default::default()
        }
    }
}

/// Fully resolved profile, ready to render
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub college: String,
    pub role: String,
    pub team: String,
}

impl Default for DisplayProfile {
    fn default() -> Self {
        Self {
            name: NOT_PROVIDED.to_string(),
            email: NOT_PROVIDED.to_string(),
            phone: NOT_PROVIDED.to_string(),
            college: NOT_PROVIDED.to_string(),
            role: NOT_PROVIDED.to_string(),
            team: NOT_SET.to_string(),
        }
    }
}

impl DisplayProfile {
    /// Merge a partial record over `defaults`, first present alias wins
    pub fn merge(partial: &PartialProfile, defaults: &DisplayProfile) -> Self {
        let pick = |candidates: &[&Option<String>], fallback: &str| -> String {
            candidates
                .iter()
                .find_map(|c| present(c.as_deref()))
                .unwrap_or(fallback)
                .to_string()
        };

        Self {
            name: pick(&[&partial.name, &partial.full_name], &defaults.name),
            email: pick(&[&partial.email], &defaults.email),
            phone: pick(&[&partial.phone, &partial.mobile], &defaults.phone),
            college: pick(&[&partial.college, &partial.institution], &defaults.college),
            role: pick(&[&partial.role], &defaults.role),
            team: pick(&[&partial.team_name], &defaults.team),
        }
    }
}

pub fn profile_card(profile: &DisplayProfile) -> WidgetView {
    WidgetView::new("Profile")
        .row("Name", &profile.name)
        .row("Email", &profile.email)
        .row("Phone", &profile.phone)
        .row("College", &profile.college)
        .row("Role", &profile.role)
        .row("Team", &profile.team)
}

/// Team details with roster occupancy
pub fn team_card(team: &Team, members: &[TeamMember]) -> WidgetView {
    let snapshot = RosterSnapshot::from_members(members);
    let leader = members.iter().find(|m| m.role == MemberRole::Leader);

    WidgetView::new(team.name.clone())
        .row_or("Project Title", team.project_title.as_deref(), NOT_SET)
        .row_or("Track", team.track.as_deref(), NOT_SET)
        .row_or("Team Leader", leader.map(|m| m.name.as_str()), NOT_SET)
        .row("Leaders", snapshot.leader_count.to_string())
        .row(
            "Members",
            format!("{} / {}", snapshot.member_count, snapshot.max_members),
        )
        .row("Open Slots", snapshot.slots_available.to_string())
}

/// Scoreboard rows, labelled by round and team name
pub fn results_table(results: &[ResultEntry], teams: &[Team]) -> WidgetView {
    results.iter().fold(WidgetView::new("Results"), |view, entry| {
        let team = teams
            .iter()
            .find(|t| t.id == entry.team_id)
            .map(|t| t.name.as_str())
            .unwrap_or(entry.team_id.as_str());
        let value = match present(entry.remarks.as_deref()) {
            Some(remarks) => format!("{:.1} ({})", entry.score, remarks),
            None => format!("{:.1}", entry.score),
        };
        view.row(format!("{} · {}", entry.round, team), value)
    })
}

pub fn payment_card(payment: Option<&PaymentScreenshot>) -> WidgetView {
    let view = WidgetView::new("Payment");
    match payment {
        Some(p) => view
            .row("Status", p.status.to_string())
            .row_or("Screenshot", Some(p.image_url.as_str()), NOT_PROVIDED),
        None => view.row("Status", NOT_SET).row("Screenshot", NOT_PROVIDED),
    }
}

pub fn admin_overview(stats: &StoreStats) -> WidgetView {
    WidgetView::new("Overview")
        .row("Teams", stats.teams.to_string())
        .row("Users", stats.users.to_string())
        .row("Results Published", stats.results.to_string())
        .row("Payments Pending", stats.payments_pending.to_string())
        .row("Payments Verified", stats.payments_verified.to_string())
}
