//! Attendance models matching the frontend attendance grid.

use serde::{Deserialize, Serialize};

/// One presence record per (team, member, day). Upserted, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub team_id: String,
    pub member_id: String,
    /// 1-based event day index
    pub day: i64,
    pub present: bool,
    pub recorded_at: String,
}

/// Request body for recording attendance for one member on one day.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAttendanceRequest {
    pub member_id: String,
    pub day: i64,
    pub present: bool,
}

/// Absence tally for a single member. `violation` is true once the member
/// crosses the one-absence warning threshold.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceSummary {
    pub member_id: String,
    pub absences: i64,
    pub violation: bool,
}

/// A member over the absence limit. One absence is a warning; more than one
/// is a violation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceViolation {
    pub member_id: String,
    pub absences: i64,
}
