//! Roster Capacity
//!
//! Derives team occupancy (leader count, member count, open slots) from a
//! list of team-member records. The snapshot is a pure projection over its
//! input: nothing is cached and nothing is persisted, so callers recompute
//! it whenever the member list changes.
//!
//! The cap is only clamped here. Refusing a fourth member is the job of the
//! team-management flow (see `api::routes::teams::add_member`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{User, UserRole};

/// Members allowed on a team besides the leader
pub const MAX_MEMBERS: usize = 3;

/// Position of a person within a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Leader,
    Member,
}

impl MemberRole {
    fn from_role_str(s: &str) -> Option<Self> {
        match s {
            "Leader" => Some(MemberRole::Leader),
            "Member" => Some(MemberRole::Member),
            _ => None,
        }
    }
}

/// A person on a team roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: MemberRole,
}

impl TeamMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }

    /// Project a user account onto the roster; non-participants have no slot
    pub fn from_user(user: &User) -> Option<Self> {
        let role = match user.role {
            UserRole::TeamLeader => MemberRole::Leader,
            UserRole::TeamMember => MemberRole::Member,
            UserRole::SuperAdmin | UserRole::Admin => return None,
        };
        Some(Self::new(&user.id, &user.name, role))
    }
}

/// Occupancy figures for one team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    /// Always reported as 1; see `leader_present` for the observed value
    pub leader_count: u8,
    pub member_count: usize,
    pub max_members: usize,
    /// Never negative, clamped at zero when over capacity
    pub slots_available: usize,
    /// Whether the input actually contained a Leader entry
    pub leader_present: bool,
}

impl RosterSnapshot {
    /// Compute the snapshot for a typed member list
    pub fn from_members(members: &[TeamMember]) -> Self {
        let member_count = members
            .iter()
            .filter(|m| m.role == MemberRole::Member)
            .count();
        let leaders = members
            .iter()
            .filter(|m| m.role == MemberRole::Leader)
            .count();

        Self::build(member_count, leaders)
    }

    /// Compute the snapshot from loosely-typed data.
    ///
    /// Anything that is not a JSON array (including `null` while a fetch is
    /// still in flight) counts as an empty roster.
    pub fn from_value(value: &Value) -> Self {
        let Some(entries) = value.as_array() else {
            return Self::build(0, 0);
        };

        let mut member_count = 0;
        let mut leaders = 0;
        for role in entries
            .iter()
            .filter_map(|e| e.get("role").and_then(Value::as_str))
            .filter_map(MemberRole::from_role_str)
        {
            match role {
                MemberRole::Member => member_count += 1,
                MemberRole::Leader => leaders += 1,
            }
        }

        Self::build(member_count, leaders)
    }

    /// Empty roster
    pub fn empty() -> Self {
        Self::build(0, 0)
    }

    /// Whether another Member may join
    pub fn has_capacity(&self) -> bool {
        self.slots_available > 0
    }

    /// Whether the roster exceeds the cap
    pub fn over_capacity(&self) -> bool {
        self.member_count > self.max_members
    }

    fn build(member_count: usize, leaders: usize) -> Self {
        if leaders != 1 {
            tracing::warn!(
                leaders,
                member_count,
                "Roster does not contain exactly one leader; reporting leader_count = 1"
            );
        }

        Self {
            leader_count: 1,
            member_count,
            max_members: MAX_MEMBERS,
            slots_available: MAX_MEMBERS.saturating_sub(member_count),
            leader_present: leaders > 0,
        }
    }
}

impl Default for RosterSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
