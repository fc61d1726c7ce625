//! Team Routes
//!
//! - GET /api/v1/teams - List teams
//! - POST /api/v1/teams - Register a team, optionally with its leader
//! - GET /api/v1/teams/:id - Team with members and roster
//! - PUT /api/v1/teams/:id - Update team details
//! - DELETE /api/v1/teams/:id - Delete a team and its results/payments
//! - GET /api/v1/teams/:id/members - List members
//! - POST /api/v1/teams/:id/members - Add an existing user as a Member
//! - GET /api/v1/teams/:id/roster - Occupancy snapshot

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::users::require_user;
use super::{optional, required};
use crate::api::dto::{
    AddMemberRequest, CreateTeamRequest, MembersResponse, TeamDetailResponse, TeamListResponse,
    UpdateTeamRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::mail::templates;
use crate::model::{Team, User, UserRole};
use crate::roster::{MemberRole, RosterSnapshot, TeamMember};

/// GET /api/v1/teams
pub async fn list_teams(State(state): State<Arc<AppState>>) -> ApiResult<Json<TeamListResponse>> {
    let teams = state.store.list_teams()?;
    Ok(Json(TeamListResponse {
        total: teams.len(),
        teams,
    }))
}

/// GET /api/v1/teams/:id
pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<TeamDetailResponse>> {
    let team = require_team(&state, &id)?;
    let members = roster_members(&state, &id)?;

    Ok(Json(TeamDetailResponse {
        roster: RosterSnapshot::from_members(&members),
        team,
        members,
    }))
}

/// POST /api/v1/teams
///
/// With `leader_id`, the user is attached as Leader and receives the
/// registration email.
pub async fn create_team(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTeamRequest>,
) -> ApiResult<(StatusCode, Json<TeamDetailResponse>)> {
    let mut team = Team::new(required("name", &req.name, 100)?);
    team.project_title = optional(req.project_title);
    team.track = optional(req.track);

    let leader = match optional(req.leader_id) {
        Some(leader_id) => {
            let user = require_user(&state, &leader_id)?;
            if !user.role.is_participant() {
                return Err(ApiError::Validation(format!(
                    "{} accounts cannot lead a team",
                    user.role
                )));
            }
            if user.team_id.is_some() {
                return Err(ApiError::Conflict(format!(
                    "User {} already belongs to a team",
                    user.id
                )));
            }
            Some(user)
        }
        None => None,
    };

    state.store.insert_team(&team)?;

    if let Some(mut user) = leader {
        user.team_id = Some(team.id.clone());
        user.role = UserRole::TeamLeader;
        state.store.update_user_checked(&user, |team_id, members| {
            check_slot(team_id, UserRole::TeamLeader, members)
        })?;
        state
            .mailer
            .dispatch(templates::team_registered(&user.email, &team.name));
    }

    tracing::info!(team_id = %team.id, team_name = %team.name, "Registered team");

    let members = roster_members(&state, &team.id)?;
    Ok((
        StatusCode::CREATED,
        Json(TeamDetailResponse {
            roster: RosterSnapshot::from_members(&members),
            team,
            members,
        }),
    ))
}

/// PUT /api/v1/teams/:id
///
/// Empty `project_title` / `track` clear the field.
pub async fn update_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTeamRequest>,
) -> ApiResult<Json<Team>> {
    let mut team = require_team(&state, &id)?;

    if let Some(name) = &req.name {
        team.name = required("name", name, 100)?;
    }
    if req.project_title.is_some() {
        team.project_title = optional(req.project_title);
    }
    if req.track.is_some() {
        team.track = optional(req.track);
    }

    state.store.update_team(&team)?;
    tracing::info!(team_id = %team.id, "Updated team");

    Ok(Json(team))
}

/// DELETE /api/v1/teams/:id
pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.store.delete_team(&id)? {
        return Err(ApiError::NotFound(format!("Team with id {} not found", id)));
    }
    tracing::info!(team_id = %id, "Deleted team");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/teams/:id/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MembersResponse>> {
    require_team(&state, &id)?;
    let members = roster_members(&state, &id)?;

    Ok(Json(MembersResponse {
        roster: RosterSnapshot::from_members(&members),
        members,
    }))
}

/// POST /api/v1/teams/:id/members
///
/// Rejected with 409 once the team holds its maximum number of Members.
pub async fn add_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddMemberRequest>,
) -> ApiResult<(StatusCode, Json<MembersResponse>)> {
    let mut user = require_user(&state, req.user_id.trim())?;

    match user.team_id.as_deref() {
        Some(current) if current == id => {
            return Err(ApiError::Conflict(format!(
                "User {} is already on this team",
                user.id
            )))
        }
        Some(_) => {
            return Err(ApiError::Conflict(format!(
                "User {} already belongs to another team",
                user.id
            )))
        }
        None => {}
    }

    if !user.role.is_participant() {
        return Err(ApiError::Validation(format!(
            "{} accounts cannot join a team",
            user.role
        )));
    }

    user.team_id = Some(id.clone());
    user.role = UserRole::TeamMember;
    state.store.update_user_checked(&user, |team_id, members| {
        check_slot(team_id, UserRole::TeamMember, members)
    })?;
    tracing::info!(team_id = %id, user_id = %user.id, "Added team member");

    let members = roster_members(&state, &id)?;
    Ok((
        StatusCode::CREATED,
        Json(MembersResponse {
            roster: RosterSnapshot::from_members(&members),
            members,
        }),
    ))
}

/// GET /api/v1/teams/:id/roster
pub async fn get_roster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RosterSnapshot>> {
    require_team(&state, &id)?;
    let members = roster_members(&state, &id)?;
    Ok(Json(RosterSnapshot::from_members(&members)))
}

pub(crate) fn require_team(state: &AppState, id: &str) -> ApiResult<Team> {
    state
        .store
        .get_team(id)?
        .ok_or_else(|| ApiError::NotFound(format!("Team with id {} not found", id)))
}

fn roster_members(state: &AppState, team_id: &str) -> ApiResult<Vec<TeamMember>> {
    Ok(state
        .store
        .team_members(team_id)?
        .iter()
        .filter_map(TeamMember::from_user)
        .collect())
}

/// Whether `members` leaves room for one more user in `role` on `team_id`
pub(crate) fn check_slot(team_id: &str, role: UserRole, members: &[User]) -> ApiResult<()> {
    let members: Vec<TeamMember> = members.iter().filter_map(TeamMember::from_user).collect();

    match role {
        UserRole::TeamMember => {
            let roster = RosterSnapshot::from_members(&members);
            if !roster.has_capacity() {
                return Err(ApiError::Conflict(format!(
                    "Team {} is full ({} of {} members)",
                    team_id, roster.member_count, roster.max_members
                )));
            }
        }
        UserRole::TeamLeader => {
            if members.iter().any(|m| m.role == MemberRole::Leader) {
                return Err(ApiError::Conflict(format!(
                    "Team {} already has a leader",
                    team_id
                )));
            }
        }
        other => {
            return Err(ApiError::Validation(format!(
                "{} accounts cannot join a team",
                other
            )))
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: UserRole) -> User {
        User::new("X", "x@example.com", role).team("t1")
    }

    #[test]
    fn test_check_slot() {
        let full: Vec<User> = (0..3).map(|_| user(UserRole::TeamMember)).collect();
        assert!(matches!(
            check_slot("t1", UserRole::TeamMember, &full),
            Err(ApiError::Conflict(_))
        ));
        assert!(check_slot("t1", UserRole::TeamMember, &full[..2]).is_ok());

        let led = vec![user(UserRole::TeamLeader)];
        assert!(matches!(
            check_slot("t1", UserRole::TeamLeader, &led),
            Err(ApiError::Conflict(_))
        ));
        assert!(check_slot("t1", UserRole::TeamMember, &led).is_ok());

        assert!(matches!(
            check_slot("t1", UserRole::Admin, &[]),
            Err(ApiError::Validation(_))
        ));
    }
}
