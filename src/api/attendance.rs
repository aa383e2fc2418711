//! Attendance API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::auth::ActingUser;
use crate::errors::AppError;
use crate::models::{AbsenceSummary, AttendanceRecord, AttendanceViolation, SetAttendanceRequest};
use crate::AppState;

/// PUT /api/teams/:id/attendance - Upsert one attendance record.
pub async fn set_attendance(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
    ActingUser(acting_user): ActingUser,
    Json(request): Json<SetAttendanceRequest>,
) -> ApiResult<AttendanceRecord> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.member_id.trim().is_empty() {
        return error(
            AppError::Validation("Member id is required".to_string()),
            revision_id,
        );
    }
    if request.day < 1 {
        return error(
            AppError::Validation("Day index must be 1 or greater".to_string()),
            revision_id,
        );
    }

    match state.repo.set_attendance(&team_id, &request).await {
        Ok(record) => {
            tracing::debug!(
                team_id = %team_id,
                member_id = %record.member_id,
                day = record.day,
                present = record.present,
                acting_user = %acting_user,
                "Attendance recorded"
            );
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(record, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/teams/:id/attendance - List a team's attendance records.
pub async fn list_attendance(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<Vec<AttendanceRecord>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_attendance(&team_id).await {
        Ok(records) => success(records, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/teams/:id/attendance/:member - One member's absence tally.
pub async fn get_absences(
    State(state): State<AppState>,
    Path((team_id, member_id)): Path<(String, String)>,
) -> ApiResult<AbsenceSummary> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.absence_count(&team_id, &member_id).await {
        Ok(absences) => success(
            AbsenceSummary {
                member_id,
                absences,
                violation: absences > 1,
            },
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/teams/:id/attendance/violations - Members over the absence limit.
pub async fn list_violations(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<Vec<AttendanceViolation>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.attendance_violations(&team_id).await {
        Ok(violations) => success(violations, revision_id),
        Err(e) => error(e, revision_id),
    }
}
