//! Team API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::ActingUser;
use crate::composition::{self, CompositionSummary};
use crate::errors::AppError;
use crate::models::{CreateTeamRequest, Team, TeamDetail, TeamStatus, UpdateTeamStatusRequest};
use crate::AppState;

/// GET /api/teams - List all teams with member counts.
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Vec<Team>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_teams().await {
        Ok(teams) => success(teams, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/teams - Create a new team with the acting user as leader.
pub async fn create_team(
    State(state): State<AppState>,
    ActingUser(leader_id): ActingUser,
    Json(request): Json<CreateTeamRequest>,
) -> ApiResult<Team> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.name.trim().is_empty() {
        return error(
            AppError::Validation("Team name is required".to_string()),
            revision_id,
        );
    }

    match state.repo.create_team(&leader_id, &request).await {
        Ok(team) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(team, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/teams/:id - Team detail: row, members, and composition summary.
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TeamDetail> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let team = match state.repo.get_team(&id).await {
        Ok(Some(team)) => team,
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Team {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    };

    let members = match state.repo.list_team_members(&id).await {
        Ok(members) => members,
        Err(e) => return error(e, revision_id),
    };
    let roster = match state.repo.read_roster(&id).await {
        Ok(roster) => roster,
        Err(e) => return error(e, revision_id),
    };

    success(
        TeamDetail {
            team,
            members,
            composition: composition::summarize(&roster),
        },
        revision_id,
    )
}

/// GET /api/teams/:id/composition - The validator-derived summary alone.
pub async fn get_composition(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CompositionSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_team(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return error(
                AppError::NotFound(format!("Team {} not found", id)),
                revision_id,
            )
        }
        Err(e) => return error(e, revision_id),
    }

    match state.repo.read_roster(&id).await {
        Ok(roster) => success(composition::summarize(&roster), revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// Request body for adding a member directly, bypassing the request inbox.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberRequest {
    pub user_id: String,
    /// Catalog role tag for the new member
    pub role: String,
}

/// POST /api/teams/:id/members - Add a member directly (leader/admin action).
///
/// Runs the same composition re-validation as accepting a join request.
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(acting_user): ActingUser,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<crate::models::TeamMember> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.user_id.trim().is_empty() {
        return error(
            AppError::Validation("User id is required".to_string()),
            revision_id,
        );
    }
    let role = match composition::validate_role_tag(&request.role) {
        Ok(role) => role,
        Err(e) => return error(e.into(), revision_id),
    };

    match state.repo.add_member(&id, &request.user_id, role).await {
        Ok(member) => {
            state.notifier.notify(&id, crate::notify::EventKind::MemberAdded);

            tracing::info!(
                team_id = %id,
                user_id = %member.user_id,
                role = %member.role.as_str(),
                acting_user = %acting_user,
                "Member added directly"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/teams/:id/status - Administrative lifecycle status update.
pub async fn update_team_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(acting_user): ActingUser,
    Json(request): Json<UpdateTeamStatusRequest>,
) -> ApiResult<Team> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let Some(status) = TeamStatus::from_str(&request.status) else {
        return error(
            AppError::Validation(format!("Unknown team status: {}", request.status)),
            revision_id,
        );
    };

    match state.repo.update_team_status(&id, status).await {
        Ok(team) => {
            tracing::info!(team_id = %id, status = status.as_str(), acting_user = %acting_user, "Team status updated");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(team, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/teams/:id - Administrative delete, cascading the team's
/// memberships, requests, and attendance.
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(acting_user): ActingUser,
) -> ApiResult<()> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.delete_team(&id).await {
        Ok(()) => {
            tracing::info!(team_id = %id, acting_user = %acting_user, "Team deleted");
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success((), new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
