//! Join request API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::auth::ActingUser;
use crate::errors::AppError;
use crate::models::{JoinRequest, RequestStatus, SubmitJoinRequest, TeamMember};
use crate::notify::EventKind;
use crate::AppState;

/// POST /api/teams/:id/requests - Submit a join request as the acting user.
pub async fn submit_request(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    ActingUser(user_id): ActingUser,
    Json(request): Json<SubmitJoinRequest>,
) -> ApiResult<JoinRequest> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.submit_request(&team_id, &user_id, &request).await {
        Ok(join_request) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(join_request, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// Query parameters for the request inbox.
#[derive(Debug, Deserialize)]
pub struct RequestsQuery {
    /// Optional status filter (pending, approved, rejected).
    #[serde(default)]
    pub status: Option<String>,
}

/// GET /api/teams/:id/requests - The leader's request inbox.
pub async fn list_team_requests(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    Query(params): Query<RequestsQuery>,
) -> ApiResult<Vec<JoinRequest>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let status = match params.status.as_deref() {
        None => None,
        Some(tag) => match RequestStatus::from_str(tag) {
            Some(status) => Some(status),
            None => {
                return error(
                    AppError::Validation(format!("Unknown request status: {}", tag)),
                    revision_id,
                )
            }
        },
    };

    match state.repo.list_team_requests(&team_id, status).await {
        Ok(requests) => success(requests, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/requests/:id/accept - Accept a pending request.
///
/// Composition is re-validated against the persisted roster inside the
/// repository transaction; a failed re-check leaves the request pending.
pub async fn accept_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(acting_user): ActingUser,
) -> ApiResult<TeamMember> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.accept_request(&id, &acting_user).await {
        Ok(member) => {
            state.notifier.notify(&member.team_id, EventKind::MemberAdded);

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(member, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/requests/:id/reject - Reject a pending request.
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ActingUser(acting_user): ActingUser,
) -> ApiResult<JoinRequest> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.reject_request(&id, &acting_user).await {
        Ok(request) => {
            state
                .notifier
                .notify(&request.team_id, EventKind::RequestRejected);

            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(request, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
