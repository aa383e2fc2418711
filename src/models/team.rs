//! Team and membership models matching the frontend Team interfaces.

use serde::{Deserialize, Serialize};

use super::Role;
use crate::composition::CompositionSummary;

/// Administrative lifecycle status of a team, independent of its composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    Pending,
    Approved,
    FinalApproved,
    Rejected,
}

impl TeamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamStatus::Pending => "pending",
            TeamStatus::Approved => "approved",
            TeamStatus::FinalApproved => "final_approved",
            TeamStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TeamStatus::Pending),
            "approved" => Some(TeamStatus::Approved),
            "final_approved" => Some(TeamStatus::FinalApproved),
            "rejected" => Some(TeamStatus::Rejected),
            _ => None,
        }
    }
}

/// A competition team.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub leader_id: String,
    pub status: TeamStatus,
    pub created_at: String,
    pub member_count: i64,
    /// Roster version; bumped on every membership mutation
    #[serde(default)]
    pub version: i64,
}

/// One membership row. Created at team formation (the leader) or when a join
/// request is accepted; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub team_id: String,
    pub user_id: String,
    pub role: Role,
    pub joined_at: String,
}

/// The slice of a membership row the composition rules care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub user_id: String,
    pub role: Role,
}

/// Request body for creating a new team. The acting user becomes the leader.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    pub name: String,
    /// Catalog role tag the leader takes for themselves
    pub role: String,
}

/// Request body for the administrative status update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamStatusRequest {
    pub status: String,
}

/// Team row plus its members and the validator-derived composition view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    pub team: Team,
    pub members: Vec<TeamMember>,
    pub composition: CompositionSummary,
}
