//! Database repository for all stateful operations.
//!
//! Membership mutations serialize on the team row: the first statement of
//! every roster-changing transaction bumps `teams.version`, which takes the
//! write lock before the roster is read. Validation therefore always sees
//! committed, current state; a stale snapshot can never authorize a write.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::composition;
use crate::errors::AppError;
use crate::models::{
    AttendanceRecord, AttendanceViolation, CreateTeamRequest, Datastore, JoinRequest,
    RequestStatus, RevisionInfo, Role, RosterEntry, SetAttendanceRequest, SubmitJoinRequest, Team,
    TeamMember, TeamStatus,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full datastore snapshot.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let teams = self.list_teams().await?;
        let members = self.list_all_members().await?;
        let requests = self.list_all_requests().await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            teams,
            members,
            requests,
        })
    }

    // ==================== TEAM OPERATIONS ====================

    /// List all teams with their member counts.
    pub async fn list_teams(&self) -> Result<Vec<Team>, AppError> {
        let rows = sqlx::query(
            r#"SELECT t.id, t.name, t.leader_id, t.status, t.created_at, t.version,
                      COUNT(m.user_id) AS member_count
               FROM teams t
               LEFT JOIN team_members m ON m.team_id = t.id
               GROUP BY t.id
               ORDER BY t.created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(team_from_row).collect()
    }

    /// Get a team by ID.
    pub async fn get_team(&self, id: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(
            r#"SELECT t.id, t.name, t.leader_id, t.status, t.created_at, t.version,
                      COUNT(m.user_id) AS member_count
               FROM teams t
               LEFT JOIN team_members m ON m.team_id = t.id
               WHERE t.id = ?
               GROUP BY t.id"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(team_from_row).transpose()
    }

    /// List a team's members in join order.
    pub async fn list_team_members(&self, team_id: &str) -> Result<Vec<TeamMember>, AppError> {
        let rows = sqlx::query(
            "SELECT team_id, user_id, role, joined_at FROM team_members WHERE team_id = ? ORDER BY joined_at",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(team_member_from_row).collect()
    }

    /// List every membership row across all teams.
    pub async fn list_all_members(&self) -> Result<Vec<TeamMember>, AppError> {
        let rows = sqlx::query(
            "SELECT team_id, user_id, role, joined_at FROM team_members ORDER BY joined_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(team_member_from_row).collect()
    }

    /// Read a team's roster as the slice the composition rules consume.
    pub async fn read_roster(&self, team_id: &str) -> Result<Vec<RosterEntry>, AppError> {
        let rows = sqlx::query(
            "SELECT user_id, role FROM team_members WHERE team_id = ? ORDER BY joined_at",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(roster_entry_from_row).collect()
    }

    /// The team a user belongs to, if any.
    pub async fn team_of_user(&self, user_id: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT team_id FROM team_members WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get("team_id")))
    }

    /// Create a team with the acting user as leader.
    ///
    /// The only path that creates a roster from empty; an empty roster admits
    /// any catalog role, so catalog membership is the whole role check.
    pub async fn create_team(
        &self,
        leader_id: &str,
        request: &CreateTeamRequest,
    ) -> Result<Team, AppError> {
        let role = composition::validate_role_tag(&request.role)?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        let leads = sqlx::query("SELECT id FROM teams WHERE leader_id = ?")
            .bind(leader_id)
            .fetch_optional(&mut *tx)
            .await?;
        if leads.is_some() {
            return Err(AppError::DuplicateLeadership(format!(
                "User {} already leads a team",
                leader_id
            )));
        }

        let member_of = sqlx::query("SELECT team_id FROM team_members WHERE user_id = ?")
            .bind(leader_id)
            .fetch_optional(&mut *tx)
            .await?;
        if member_of.is_some() {
            return Err(AppError::AlreadyOnATeam(format!(
                "User {} already belongs to a team",
                leader_id
            )));
        }

        let insert = sqlx::query(
            "INSERT INTO teams (id, name, leader_id, status, created_at, version) VALUES (?, ?, ?, 'pending', ?, 1)",
        )
        .bind(&id)
        .bind(&request.name)
        .bind(leader_id)
        .bind(&now)
        .execute(&mut *tx)
        .await;
        if let Err(err) = insert {
            // Unique leader index catches two creations racing past the check.
            if err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                return Err(AppError::DuplicateLeadership(format!(
                    "User {} already leads a team",
                    leader_id
                )));
            }
            return Err(err.into());
        }

        let insert = sqlx::query(
            "INSERT INTO team_members (team_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(leader_id)
        .bind(role.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await;
        if let Err(err) = insert {
            if err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                return Err(AppError::AlreadyOnATeam(format!(
                    "User {} already belongs to a team",
                    leader_id
                )));
            }
            return Err(err.into());
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(Team {
            id,
            name: request.name.clone(),
            leader_id: leader_id.to_string(),
            status: TeamStatus::Pending,
            created_at: now,
            member_count: 1,
            version: 1,
        })
    }

    /// Add a member to a team after re-validating against the current roster.
    ///
    /// The only path that grows an existing roster.
    pub async fn add_member(
        &self,
        team_id: &str,
        user_id: &str,
        role: Role,
    ) -> Result<TeamMember, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let member = admit_member(&mut tx, team_id, user_id, role, &now).await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(member)
    }

    /// Set a team's administrative lifecycle status.
    pub async fn update_team_status(
        &self,
        id: &str,
        status: TeamStatus,
    ) -> Result<Team, AppError> {
        let result = sqlx::query("UPDATE teams SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }

        self.increment_revision().await?;

        self.get_team(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    /// Administrative delete: removes the team and cascades its memberships,
    /// join requests, and attendance records.
    pub async fn delete_team(&self, id: &str) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }

        sqlx::query("DELETE FROM team_members WHERE team_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM join_requests WHERE team_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM attendance WHERE team_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        Ok(())
    }

    // ==================== JOIN REQUEST OPERATIONS ====================

    /// Get a join request by ID.
    pub async fn get_request(&self, id: &str) -> Result<Option<JoinRequest>, AppError> {
        let row = sqlx::query(
            "SELECT id, team_id, user_id, role, message, status, created_at, decided_at, decided_by FROM join_requests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(request_from_row).transpose()
    }

    /// List a team's join requests, optionally filtered by status.
    pub async fn list_team_requests(
        &self,
        team_id: &str,
        status: Option<RequestStatus>,
    ) -> Result<Vec<JoinRequest>, AppError> {
        let rows = match status {
            Some(status) => {
                sqlx::query(
                    "SELECT id, team_id, user_id, role, message, status, created_at, decided_at, decided_by FROM join_requests WHERE team_id = ? AND status = ? ORDER BY created_at",
                )
                .bind(team_id)
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    "SELECT id, team_id, user_id, role, message, status, created_at, decided_at, decided_by FROM join_requests WHERE team_id = ? ORDER BY created_at",
                )
                .bind(team_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(request_from_row).collect()
    }

    /// List every join request across all teams.
    pub async fn list_all_requests(&self) -> Result<Vec<JoinRequest>, AppError> {
        let rows = sqlx::query(
            "SELECT id, team_id, user_id, role, message, status, created_at, decided_at, decided_by FROM join_requests ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(request_from_row).collect()
    }

    /// Submit a join request for a team.
    ///
    /// Role admissibility against the roster is deliberately not checked
    /// here; composition may change before the leader acts, so that check
    /// runs at acceptance.
    pub async fn submit_request(
        &self,
        team_id: &str,
        user_id: &str,
        request: &SubmitJoinRequest,
    ) -> Result<JoinRequest, AppError> {
        let role = composition::validate_role_tag(&request.role)?;

        if self.get_team(team_id).await?.is_none() {
            return Err(AppError::NotFound(format!("Team {} not found", team_id)));
        }

        // One request ever per (team, user) pair: a pending request blocks a
        // duplicate, and a decided one blocks resubmission. Checked before the
        // membership rule so an approved requester sees ALREADY_APPROVED
        // rather than the generic membership error.
        let existing = sqlx::query(
            "SELECT status FROM join_requests WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        if let Some(row) = existing {
            let status: String = row.get("status");
            return Err(match RequestStatus::from_str(&status) {
                Some(RequestStatus::Pending) => AppError::DuplicatePending(format!(
                    "User {} already has a pending request for team {}",
                    user_id, team_id
                )),
                Some(RequestStatus::Approved) => AppError::AlreadyApproved(format!(
                    "User {} was already approved for team {}",
                    user_id, team_id
                )),
                Some(RequestStatus::Rejected) => AppError::AlreadyRejected(format!(
                    "User {} was already rejected by team {}",
                    user_id, team_id
                )),
                None => AppError::Internal(format!("Unknown request status: {}", status)),
            });
        }

        if self.team_of_user(user_id).await?.is_some() {
            return Err(AppError::AlreadyOnATeam(format!(
                "User {} already belongs to a team",
                user_id
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let insert = sqlx::query(
            "INSERT INTO join_requests (id, team_id, user_id, role, message, status, created_at) VALUES (?, ?, ?, ?, ?, 'pending', ?)",
        )
        .bind(&id)
        .bind(team_id)
        .bind(user_id)
        .bind(role.as_str())
        .bind(&request.message)
        .bind(&now)
        .execute(&self.pool)
        .await;

        if let Err(err) = insert {
            // Unique (team_id, user_id) index catches the racing duplicate.
            if err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                return Err(AppError::DuplicatePending(format!(
                    "User {} already has a request for team {}",
                    user_id, team_id
                )));
            }
            return Err(err.into());
        }

        self.increment_revision().await?;

        Ok(JoinRequest {
            id,
            team_id: team_id.to_string(),
            user_id: user_id.to_string(),
            role,
            message: request.message.clone(),
            status: RequestStatus::Pending,
            created_at: now,
            decided_at: None,
            decided_by: None,
        })
    }

    /// Accept a pending join request, re-validating composition against the
    /// roster as currently persisted.
    ///
    /// Everything happens in one transaction that locks the team row first,
    /// so two accepts racing for the same scarce role slot serialize and the
    /// loser fails with the composition error from re-validation. On any
    /// failure the transaction rolls back and the request stays pending; the
    /// leader decides what to do with it.
    pub async fn accept_request(
        &self,
        request_id: &str,
        acting_user: &str,
    ) -> Result<TeamMember, AppError> {
        let request = self
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", request_id)))?;
        if request.status != RequestStatus::Pending {
            return Err(AppError::NotPending(format!(
                "Request {} is already {}",
                request_id,
                request.status.as_str()
            )));
        }

        let now = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        // Locks the team row and re-validates under that lock.
        let member = admit_member(
            &mut tx,
            &request.team_id,
            &request.user_id,
            request.role,
            &now,
        )
        .await?;

        // Conditional flip guards against a decision that landed between the
        // snapshot above and the lock.
        let result = sqlx::query(
            "UPDATE join_requests SET status = 'approved', decided_at = ?, decided_by = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(acting_user)
        .bind(request_id)
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotPending(format!(
                "Request {} was decided concurrently",
                request_id
            )));
        }

        bump_revision(&mut tx, &now).await?;
        tx.commit().await?;

        tracing::info!(
            request_id = %request_id,
            team_id = %member.team_id,
            user_id = %member.user_id,
            role = %member.role.as_str(),
            acting_user = %acting_user,
            "Join request accepted"
        );

        Ok(member)
    }

    /// Reject a pending join request. A second call finds the request
    /// already decided and fails with NotPending; the terminal state never
    /// changes after the first call.
    pub async fn reject_request(
        &self,
        request_id: &str,
        acting_user: &str,
    ) -> Result<JoinRequest, AppError> {
        let request = self
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Request {} not found", request_id)))?;

        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(
            "UPDATE join_requests SET status = 'rejected', decided_at = ?, decided_by = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(&now)
        .bind(acting_user)
        .bind(request_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // The read above may predate a concurrent decision, so re-read
            // the status instead of reporting the stale one.
            let status = self
                .get_request(request_id)
                .await?
                .map(|r| r.status)
                .unwrap_or(request.status);
            return Err(AppError::NotPending(format!(
                "Request {} is already {}",
                request_id,
                status.as_str()
            )));
        }

        self.increment_revision().await?;

        tracing::info!(
            request_id = %request_id,
            team_id = %request.team_id,
            acting_user = %acting_user,
            "Join request rejected"
        );

        Ok(JoinRequest {
            status: RequestStatus::Rejected,
            decided_at: Some(now),
            decided_by: Some(acting_user.to_string()),
            ..request
        })
    }

    // ==================== ATTENDANCE OPERATIONS ====================

    /// Upsert the one attendance record for (team, member, day).
    pub async fn set_attendance(
        &self,
        team_id: &str,
        request: &SetAttendanceRequest,
    ) -> Result<AttendanceRecord, AppError> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"INSERT INTO attendance (team_id, member_id, day, present, recorded_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (team_id, member_id, day)
               DO UPDATE SET present = excluded.present, recorded_at = excluded.recorded_at"#,
        )
        .bind(team_id)
        .bind(&request.member_id)
        .bind(request.day)
        .bind(request.present as i32)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(AttendanceRecord {
            team_id: team_id.to_string(),
            member_id: request.member_id.clone(),
            day: request.day,
            present: request.present,
            recorded_at: now,
        })
    }

    /// List a team's attendance records.
    pub async fn list_attendance(&self, team_id: &str) -> Result<Vec<AttendanceRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT team_id, member_id, day, present, recorded_at FROM attendance WHERE team_id = ? ORDER BY member_id, day",
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(attendance_from_row).collect())
    }

    /// Count a member's absences across all tracked days.
    pub async fn absence_count(&self, team_id: &str, member_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS absences FROM attendance WHERE team_id = ? AND member_id = ? AND present = 0",
        )
        .bind(team_id)
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("absences"))
    }

    /// Members over the absence limit. Exactly one absence is a warning, not
    /// a violation.
    pub async fn attendance_violations(
        &self,
        team_id: &str,
    ) -> Result<Vec<AttendanceViolation>, AppError> {
        let rows = sqlx::query(
            r#"SELECT member_id, COUNT(*) AS absences
               FROM attendance
               WHERE team_id = ? AND present = 0
               GROUP BY member_id
               HAVING COUNT(*) > 1
               ORDER BY member_id"#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| AttendanceViolation {
                member_id: row.get("member_id"),
                absences: row.get("absences"),
            })
            .collect())
    }
}

/// Admit a member inside an open transaction.
///
/// Bumps the team's version as the first statement, which takes SQLite's
/// write lock; the roster read, the composition check, and the global
/// one-team-per-user check all run under that lock. Errors leave the
/// transaction to roll back, undoing the bump.
async fn admit_member(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    team_id: &str,
    user_id: &str,
    role: Role,
    now: &str,
) -> Result<TeamMember, AppError> {
    let result = sqlx::query("UPDATE teams SET version = version + 1 WHERE id = ?")
        .bind(team_id)
        .execute(&mut **tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Team {} not found", team_id)));
    }

    let rows = sqlx::query(
        "SELECT user_id, role FROM team_members WHERE team_id = ? ORDER BY joined_at",
    )
    .bind(team_id)
    .fetch_all(&mut **tx)
    .await?;
    let roster: Vec<RosterEntry> = rows
        .iter()
        .map(roster_entry_from_row)
        .collect::<Result<_, _>>()?;

    composition::can_add_role(&roster, role)?;

    let member_of = sqlx::query("SELECT team_id FROM team_members WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;
    if member_of.is_some() {
        return Err(AppError::AlreadyOnATeam(format!(
            "User {} already belongs to a team",
            user_id
        )));
    }

    let insert =
        sqlx::query("INSERT INTO team_members (team_id, user_id, role, joined_at) VALUES (?, ?, ?, ?)")
            .bind(team_id)
            .bind(user_id)
            .bind(role.as_str())
            .bind(now)
            .execute(&mut **tx)
            .await;
    if let Err(err) = insert {
        // Unique user index catches an acceptance on another team racing
        // past the membership check above.
        if err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation())
        {
            return Err(AppError::AlreadyOnATeam(format!(
                "User {} already belongs to a team",
                user_id
            )));
        }
        return Err(err.into());
    }

    Ok(TeamMember {
        team_id: team_id.to_string(),
        user_id: user_id.to_string(),
        role,
        joined_at: now.to_string(),
    })
}

/// Increment the revision counter inside an open transaction.
async fn bump_revision(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    now: &str,
) -> Result<(), AppError> {
    sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
        .bind(now)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

// Helper functions for row conversion

fn team_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Team, AppError> {
    let status: String = row.get("status");
    Ok(Team {
        id: row.get("id"),
        name: row.get("name"),
        leader_id: row.get("leader_id"),
        status: TeamStatus::from_str(&status)
            .ok_or_else(|| AppError::Internal(format!("Unknown team status: {}", status)))?,
        created_at: row.get("created_at"),
        member_count: row.get("member_count"),
        version: row.get("version"),
    })
}

fn team_member_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<TeamMember, AppError> {
    let role: String = row.get("role");
    Ok(TeamMember {
        team_id: row.get("team_id"),
        user_id: row.get("user_id"),
        role: Role::from_str(&role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role tag: {}", role)))?,
        joined_at: row.get("joined_at"),
    })
}

fn roster_entry_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<RosterEntry, AppError> {
    let role: String = row.get("role");
    Ok(RosterEntry {
        user_id: row.get("user_id"),
        role: Role::from_str(&role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role tag: {}", role)))?,
    })
}

fn request_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<JoinRequest, AppError> {
    let role: String = row.get("role");
    let status: String = row.get("status");
    Ok(JoinRequest {
        id: row.get("id"),
        team_id: row.get("team_id"),
        user_id: row.get("user_id"),
        role: Role::from_str(&role)
            .ok_or_else(|| AppError::Internal(format!("Unknown role tag: {}", role)))?,
        message: row.get("message"),
        status: RequestStatus::from_str(&status)
            .ok_or_else(|| AppError::Internal(format!("Unknown request status: {}", status)))?,
        created_at: row.get("created_at"),
        decided_at: row.get("decided_at"),
        decided_by: row.get("decided_by"),
    })
}

fn attendance_from_row(row: &sqlx::sqlite::SqliteRow) -> AttendanceRecord {
    let present: i32 = row.get("present");
    AttendanceRecord {
        team_id: row.get("team_id"),
        member_id: row.get("member_id"),
        day: row.get("day"),
        present: present != 0,
        recorded_at: row.get("recorded_at"),
    }
}
