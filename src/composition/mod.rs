//! Composition validator: pure admission rules over a roster snapshot.
//!
//! Every function here is side-effect-free and deterministic given the roster,
//! which is what lets the repository re-run the same checks against freshly
//! read state at acceptance time.

use serde::Serialize;

use crate::models::{
    Role, RosterEntry, CATALOG, MAX_REPEATABLE, MAX_TEAM_SIZE, MIN_TEAM_SIZE, REPEATABLE_ROLE,
    UNIQUE_ROLES,
};

/// Why a candidate role cannot join the roster right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// The roster is already at the maximum team size
    CapacityExceeded,
    /// A unique role is already held by an existing member
    RoleAlreadyTaken(Role),
    /// The repeatable role already has its maximum number of holders
    RepeatableRoleFull,
    /// The roster is at minimum size but the four-role core is not yet filled
    CoreIncomplete,
    /// The tag is not one of the four catalog roles
    InvalidRole(String),
}

impl CompositionError {
    /// The role tag the error is about, if any; carried in the error details.
    pub fn role_tag(&self) -> Option<String> {
        match self {
            CompositionError::RoleAlreadyTaken(role) => Some(role.as_str().to_string()),
            CompositionError::InvalidRole(tag) => Some(tag.clone()),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompositionError::CapacityExceeded => {
                write!(f, "Team already has {} members", MAX_TEAM_SIZE)
            }
            CompositionError::RoleAlreadyTaken(role) => {
                write!(f, "Role {} is already taken on this team", role.as_str())
            }
            CompositionError::RepeatableRoleFull => write!(
                f,
                "Role {} already has {} members",
                REPEATABLE_ROLE.as_str(),
                MAX_REPEATABLE
            ),
            CompositionError::CoreIncomplete => write!(
                f,
                "A fifth member requires all four core roles to be filled first"
            ),
            CompositionError::InvalidRole(tag) => write!(f, "Unknown role tag: {}", tag),
        }
    }
}

impl std::error::Error for CompositionError {}

fn repeatable_count(roster: &[RosterEntry]) -> usize {
    roster.iter().filter(|m| m.role == REPEATABLE_ROLE).count()
}

fn holds_role(roster: &[RosterEntry], role: Role) -> bool {
    roster.iter().any(|m| m.role == role)
}

/// Decide whether `candidate` may join the roster.
///
/// Checks run in a fixed order: capacity, uniqueness, repeatable cap, core
/// completeness. The error surfaced is always the first triggered condition,
/// and the ordering means a fifth seat can only ever go to the repeatable
/// role.
pub fn can_add_role(roster: &[RosterEntry], candidate: Role) -> Result<(), CompositionError> {
    if roster.len() >= MAX_TEAM_SIZE {
        return Err(CompositionError::CapacityExceeded);
    }
    if candidate.is_unique() && holds_role(roster, candidate) {
        return Err(CompositionError::RoleAlreadyTaken(candidate));
    }
    if candidate == REPEATABLE_ROLE && repeatable_count(roster) >= MAX_REPEATABLE {
        return Err(CompositionError::RepeatableRoleFull);
    }
    if roster.len() >= MIN_TEAM_SIZE && !is_core_complete(roster) {
        return Err(CompositionError::CoreIncomplete);
    }
    Ok(())
}

/// Parse a role tag against the catalog.
///
/// This is the whole check for a founding leader (an empty roster admits any
/// catalog role) and the input guard for join-request submission.
pub fn validate_role_tag(tag: &str) -> Result<Role, CompositionError> {
    Role::from_str(tag).ok_or_else(|| CompositionError::InvalidRole(tag.to_string()))
}

/// True once the roster has all three unique roles plus at least one
/// repeatable member.
pub fn is_core_complete(roster: &[RosterEntry]) -> bool {
    roster.len() >= MIN_TEAM_SIZE
        && UNIQUE_ROLES.iter().all(|role| holds_role(roster, *role))
        && repeatable_count(roster) >= 1
}

/// Roles `can_add_role` admits right now, in catalog order.
pub fn available_roles(roster: &[RosterEntry]) -> Vec<Role> {
    CATALOG
        .iter()
        .copied()
        .filter(|role| can_add_role(roster, *role).is_ok())
        .collect()
}

/// Unique roles still absent, in catalog order, then the repeatable role if
/// no member holds it yet.
pub fn missing_roles(roster: &[RosterEntry]) -> Vec<Role> {
    let mut missing: Vec<Role> = UNIQUE_ROLES
        .iter()
        .copied()
        .filter(|role| !holds_role(roster, *role))
        .collect();
    if repeatable_count(roster) == 0 {
        missing.push(REPEATABLE_ROLE);
    }
    missing
}

/// Display hint for "this team is still recruiting".
///
/// Literal rule: false at max size, true while the core is incomplete,
/// otherwise true only while the repeatable role has an open slot.
pub fn can_accept_new_members(roster: &[RosterEntry]) -> bool {
    if roster.len() >= MAX_TEAM_SIZE {
        return false;
    }
    if !is_core_complete(roster) {
        return true;
    }
    repeatable_count(roster) < MAX_REPEATABLE
}

/// Validator-derived view of a roster, served alongside the team detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionSummary {
    pub member_count: usize,
    pub core_complete: bool,
    pub accepting_members: bool,
    pub available_roles: Vec<Role>,
    pub missing_roles: Vec<Role>,
}

/// Compute the full derived view in one pass over the roster.
pub fn summarize(roster: &[RosterEntry]) -> CompositionSummary {
    CompositionSummary {
        member_count: roster.len(),
        core_complete: is_core_complete(roster),
        accepting_members: can_accept_new_members(roster),
        available_roles: available_roles(roster),
        missing_roles: missing_roles(roster),
    }
}
