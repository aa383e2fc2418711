//! Datastore model matching the frontend Datastore interface.

use serde::Serialize;

use super::{JoinRequest, Team, TeamMember};

/// The root datastore containing all application data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub teams: Vec<Team>,
    pub members: Vec<TeamMember>,
    pub requests: Vec<JoinRequest>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
