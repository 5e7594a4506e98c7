//! Database repository for all roster, registry, and lifecycle operations.
//!
//! Business-rule checks (duplicates, referential lookups, transition gating)
//! live here; handlers stay thin. Every write is a single-entity mutation,
//! so a failure between read and write leaves state unchanged, never torn.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    CreateEquipmentRequest, CreateTeamRequest, Equipment, EquipmentDetail, EquipmentStatus,
    EquipmentSummary, IssueType, Maintenance, MaintenanceDetail, MemberSummary, RegisterRequest,
    ReporterSummary, Role, Team, TeamSummary, TeamWithMembers, TechnicianSummary, TicketStatus,
    User,
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

    // ==================== USER OPERATIONS ====================

    /// Find a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, team_dept, team_id, created_at FROM users WHERE email = ?"
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, email, password_hash, role, team_dept, team_id, created_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Register a new user. The password hash is computed by the caller.
    pub async fn create_user(
        &self,
        request: &RegisterRequest,
        password_hash: &str,
    ) -> Result<User, AppError> {
        if self.find_user_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, team_dept, team_id, created_at) VALUES (?, ?, ?, ?, ?, ?, NULL, ?)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(password_hash)
        .bind(request.role.as_str())
        .bind(&request.team_dept)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(User {
            id,
            name: request.name.clone(),
            email: request.email.clone(),
            password_hash: password_hash.to_string(),
            role: request.role,
            team_dept: request.team_dept.clone(),
            team_id: None,
            created_at: now,
        })
    }

    /// List technicians not yet assigned to any team.
    pub async fn list_available_technicians(&self) -> Result<Vec<TechnicianSummary>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, email FROM users WHERE role = ? AND team_id IS NULL ORDER BY name",
        )
        .bind(Role::Technician.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| TechnicianSummary {
                id: row.get("id"),
                name: row.get("name"),
                email: row.get("email"),
            })
            .collect())
    }

    /// Assign a technician to a team. Leaves the user untouched on any failure.
    pub async fn assign_technician(&self, user_id: &str, team_id: &str) -> Result<User, AppError> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if user.role != Role::Technician {
            return Err(AppError::Validation(
                "Only technicians can be assigned to a team".to_string(),
            ));
        }

        if user.team_id.is_some() {
            return Err(AppError::Conflict(
                "Technician is already assigned to a team".to_string(),
            ));
        }

        let team = self
            .get_team(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", team_id)))?;

        sqlx::query("UPDATE users SET team_id = ? WHERE id = ?")
            .bind(&team.id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(User {
            team_id: Some(team.id),
            ..user
        })
    }

    /// Remove a technician from their team. Tickets already assigned to the
    /// former team are untouched; detachment is retroactively inert.
    pub async fn remove_technician(&self, user_id: &str) -> Result<(), AppError> {
        let user = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

        if user.team_id.is_none() {
            return Err(AppError::Validation(
                "User is not assigned to any team".to_string(),
            ));
        }

        sqlx::query("UPDATE users SET team_id = NULL WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // ==================== TEAM OPERATIONS ====================

    /// Get a team by id.
    pub async fn get_team(&self, id: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query("SELECT id, name, description, created_at FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(team_from_row))
    }

    /// Create a new team.
    pub async fn create_team(&self, request: &CreateTeamRequest) -> Result<Team, AppError> {
        let existing = sqlx::query("SELECT id FROM teams WHERE name = ?")
            .bind(&request.name)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict("Team already exists".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO teams (id, name, description, created_at) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&request.name)
            .bind(&request.description)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(Team {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
        })
    }

    /// List all teams, each populated with its technician members.
    pub async fn list_teams(&self) -> Result<Vec<TeamWithMembers>, AppError> {
        let team_rows =
            sqlx::query("SELECT id, name, description, created_at FROM teams ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        let mut teams = Vec::with_capacity(team_rows.len());
        for row in &team_rows {
            let team = team_from_row(row);
            let member_rows =
                sqlx::query("SELECT name, email FROM users WHERE team_id = ? ORDER BY name")
                    .bind(&team.id)
                    .fetch_all(&self.pool)
                    .await?;

            teams.push(TeamWithMembers {
                id: team.id,
                name: team.name,
                description: team.description,
                created_at: team.created_at,
                members: member_rows
                    .into_iter()
                    .map(|m| MemberSummary {
                        name: m.get("name"),
                        email: m.get("email"),
                    })
                    .collect(),
            });
        }

        Ok(teams)
    }

    // ==================== EQUIPMENT OPERATIONS ====================

    /// Register a new piece of equipment. Status initializes to ACTIVE.
    pub async fn create_equipment(
        &self,
        request: &CreateEquipmentRequest,
    ) -> Result<Equipment, AppError> {
        self.get_team(&request.team_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;

        let existing = sqlx::query("SELECT id FROM equipment WHERE serial_number = ?")
            .bind(&request.serial_number)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(
                "Equipment with this serial number already exists".to_string(),
            ));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO equipment (id, name, serial_number, location, description, team_id, status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.serial_number)
        .bind(&request.location)
        .bind(&request.description)
        .bind(&request.team_id)
        .bind(EquipmentStatus::Active.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Equipment {
            id,
            name: request.name.clone(),
            serial_number: request.serial_number.clone(),
            location: request.location.clone(),
            description: request.description.clone(),
            team_id: request.team_id.clone(),
            status: EquipmentStatus::Active,
            created_at: now,
        })
    }

    /// Get a bare equipment record by id.
    pub async fn get_equipment_record(&self, id: &str) -> Result<Option<Equipment>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, serial_number, location, description, team_id, status, created_at FROM equipment WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(equipment_from_row).transpose()
    }

    /// Get equipment by id, populated with its owning team.
    pub async fn get_equipment(&self, id: &str) -> Result<Option<EquipmentDetail>, AppError> {
        let row = sqlx::query(
            r#"SELECT e.id, e.name, e.serial_number, e.location, e.description, e.status, e.created_at,
                      t.id AS team_id, t.name AS team_name
               FROM equipment e
               JOIN teams t ON t.id = e.team_id
               WHERE e.id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(equipment_detail_from_row).transpose()
    }

    /// List all equipment, populated with team names.
    pub async fn list_equipment(&self) -> Result<Vec<EquipmentDetail>, AppError> {
        let rows = sqlx::query(
            r#"SELECT e.id, e.name, e.serial_number, e.location, e.description, e.status, e.created_at,
                      t.id AS team_id, t.name AS team_name
               FROM equipment e
               JOIN teams t ON t.id = e.team_id
               ORDER BY e.name"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(equipment_detail_from_row).collect()
    }

    // ==================== MAINTENANCE OPERATIONS ====================

    /// Get a ticket by id.
    pub async fn get_maintenance(&self, id: &str) -> Result<Option<Maintenance>, AppError> {
        let row = sqlx::query(
            "SELECT id, equipment_id, reported_by, assigned_team, issue_type, description, status, scheduled_date, completed_at, created_at FROM maintenance WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(maintenance_from_row).transpose()
    }

    /// Open a new ticket. The assigned team is snapshotted from the
    /// equipment's team at this moment and never recomputed.
    pub async fn create_maintenance(
        &self,
        reporter_id: &str,
        equipment_id: &str,
        issue_type: IssueType,
        description: Option<&str>,
    ) -> Result<Maintenance, AppError> {
        let equipment = self
            .get_equipment_record(equipment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Equipment not found".to_string()))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO maintenance (id, equipment_id, reported_by, assigned_team, issue_type, description, status, scheduled_date, completed_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, NULL, ?)"
        )
        .bind(&id)
        .bind(&equipment.id)
        .bind(reporter_id)
        .bind(&equipment.team_id)
        .bind(issue_type.as_str())
        .bind(description)
        .bind(TicketStatus::Open.as_str())
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Maintenance {
            id,
            equipment_id: equipment.id,
            reported_by: reporter_id.to_string(),
            assigned_team: equipment.team_id,
            issue_type,
            description: description.map(|s| s.to_string()),
            status: TicketStatus::Open,
            scheduled_date: None,
            completed_at: None,
            created_at: now,
        })
    }

    /// OPEN -> SCHEDULED. Sets the scheduled date exactly once.
    pub async fn schedule_maintenance(
        &self,
        id: &str,
        scheduled_date: &str,
    ) -> Result<Maintenance, AppError> {
        let ticket = self
            .get_maintenance(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance request not found".to_string()))?;

        if ticket.status.next() != Some(TicketStatus::Scheduled) {
            return Err(AppError::InvalidTransition {
                from: ticket.status,
                to: TicketStatus::Scheduled,
            });
        }

        sqlx::query("UPDATE maintenance SET status = ?, scheduled_date = ? WHERE id = ?")
            .bind(TicketStatus::Scheduled.as_str())
            .bind(scheduled_date)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Maintenance {
            status: TicketStatus::Scheduled,
            scheduled_date: Some(scheduled_date.to_string()),
            ..ticket
        })
    }

    /// SCHEDULED -> IN_PROGRESS. Only a technician in the ticket's
    /// assigned team may start it.
    pub async fn start_maintenance(
        &self,
        id: &str,
        technician_id: &str,
    ) -> Result<Maintenance, AppError> {
        let ticket = self
            .get_maintenance(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance request not found".to_string()))?;

        let technician = self
            .get_user(technician_id)
            .await?
            .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))?;

        if technician.team_id.as_deref() != Some(ticket.assigned_team.as_str()) {
            return Err(AppError::Forbidden(
                "Ticket is assigned to a different team".to_string(),
            ));
        }

        if ticket.status.next() != Some(TicketStatus::InProgress) {
            return Err(AppError::InvalidTransition {
                from: ticket.status,
                to: TicketStatus::InProgress,
            });
        }

        sqlx::query("UPDATE maintenance SET status = ? WHERE id = ?")
            .bind(TicketStatus::InProgress.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Maintenance {
            status: TicketStatus::InProgress,
            ..ticket
        })
    }

    /// IN_PROGRESS -> COMPLETED (terminal). Sets completed_at exactly once.
    pub async fn complete_maintenance(&self, id: &str) -> Result<Maintenance, AppError> {
        let ticket = self
            .get_maintenance(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Maintenance request not found".to_string()))?;

        if ticket.status.next() != Some(TicketStatus::Completed) {
            return Err(AppError::InvalidTransition {
                from: ticket.status,
                to: TicketStatus::Completed,
            });
        }

        let now = Utc::now().to_rfc3339();

        sqlx::query("UPDATE maintenance SET status = ?, completed_at = ? WHERE id = ?")
            .bind(TicketStatus::Completed.as_str())
            .bind(&now)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Maintenance {
            status: TicketStatus::Completed,
            completed_at: Some(now),
            ..ticket
        })
    }

    /// List all tickets, fully populated.
    pub async fn list_all_maintenance(&self) -> Result<Vec<MaintenanceDetail>, AppError> {
        let rows = sqlx::query(&detail_query("ORDER BY m.created_at DESC"))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(maintenance_detail_from_row).collect()
    }

    /// List a team's unfinished tickets (OPEN, SCHEDULED, IN_PROGRESS).
    pub async fn list_team_maintenance(
        &self,
        team_id: &str,
    ) -> Result<Vec<MaintenanceDetail>, AppError> {
        let rows = sqlx::query(&detail_query(
            "WHERE m.assigned_team = ? AND m.status IN ('OPEN', 'SCHEDULED', 'IN_PROGRESS') ORDER BY m.created_at DESC",
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(maintenance_detail_from_row).collect()
    }

    /// List all tickets a user has reported, regardless of status.
    pub async fn list_reported_maintenance(
        &self,
        user_id: &str,
    ) -> Result<Vec<MaintenanceDetail>, AppError> {
        let rows = sqlx::query(&detail_query(
            "WHERE m.reported_by = ? ORDER BY m.created_at DESC",
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(maintenance_detail_from_row).collect()
    }
}

/// Populated ticket query with a caller-supplied tail clause.
fn detail_query(tail: &str) -> String {
    format!(
        r#"SELECT m.id, m.issue_type, m.description, m.status, m.scheduled_date, m.completed_at, m.created_at,
                  e.id AS equipment_id, e.name AS equipment_name, e.location AS equipment_location,
                  t.id AS team_id, t.name AS team_name,
                  u.name AS reporter_name, u.email AS reporter_email
           FROM maintenance m
           JOIN equipment e ON e.id = m.equipment_id
           JOIN teams t ON t.id = m.assigned_team
           JOIN users u ON u.id = m.reported_by
           {}"#,
        tail
    )
}

// Helper functions for row conversion

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, AppError> {
    let role_str: String = row.get("role");
    let role = Role::from_str(&role_str)
        .ok_or_else(|| AppError::Internal(format!("Invalid role value: {}", role_str)))?;

    Ok(User {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        team_dept: row.get("team_dept"),
        team_id: row.get("team_id"),
        created_at: row.get("created_at"),
    })
}

fn team_from_row(row: &sqlx::sqlite::SqliteRow) -> Team {
    Team {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    }
}

fn equipment_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Equipment, AppError> {
    let status_str: String = row.get("status");
    let status = EquipmentStatus::from_str(&status_str).ok_or_else(|| {
        AppError::Internal(format!("Invalid equipment status value: {}", status_str))
    })?;

    Ok(Equipment {
        id: row.get("id"),
        name: row.get("name"),
        serial_number: row.get("serial_number"),
        location: row.get("location"),
        description: row.get("description"),
        team_id: row.get("team_id"),
        status,
        created_at: row.get("created_at"),
    })
}

fn equipment_detail_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<EquipmentDetail, AppError> {
    let status_str: String = row.get("status");
    let status = EquipmentStatus::from_str(&status_str).ok_or_else(|| {
        AppError::Internal(format!("Invalid equipment status value: {}", status_str))
    })?;

    Ok(EquipmentDetail {
        id: row.get("id"),
        name: row.get("name"),
        serial_number: row.get("serial_number"),
        location: row.get("location"),
        description: row.get("description"),
        status,
        created_at: row.get("created_at"),
        team: TeamSummary {
            id: row.get("team_id"),
            name: row.get("team_name"),
        },
    })
}

fn maintenance_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Maintenance, AppError> {
    let issue_type_str: String = row.get("issue_type");
    let issue_type = IssueType::from_str(&issue_type_str)
        .ok_or_else(|| AppError::Internal(format!("Invalid issue type value: {}", issue_type_str)))?;

    let status_str: String = row.get("status");
    let status = TicketStatus::from_str(&status_str)
        .ok_or_else(|| AppError::Internal(format!("Invalid ticket status value: {}", status_str)))?;

    Ok(Maintenance {
        id: row.get("id"),
        equipment_id: row.get("equipment_id"),
        reported_by: row.get("reported_by"),
        assigned_team: row.get("assigned_team"),
        issue_type,
        description: row.get("description"),
        status,
        scheduled_date: row.get("scheduled_date"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
    })
}

fn maintenance_detail_from_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<MaintenanceDetail, AppError> {
    let issue_type_str: String = row.get("issue_type");
    let issue_type = IssueType::from_str(&issue_type_str)
        .ok_or_else(|| AppError::Internal(format!("Invalid issue type value: {}", issue_type_str)))?;

    let status_str: String = row.get("status");
    let status = TicketStatus::from_str(&status_str)
        .ok_or_else(|| AppError::Internal(format!("Invalid ticket status value: {}", status_str)))?;

    Ok(MaintenanceDetail {
        id: row.get("id"),
        issue_type,
        description: row.get("description"),
        status,
        scheduled_date: row.get("scheduled_date"),
        completed_at: row.get("completed_at"),
        created_at: row.get("created_at"),
        equipment: EquipmentSummary {
            id: row.get("equipment_id"),
            name: row.get("equipment_name"),
            location: row.get("equipment_location"),
        },
        assigned_team: TeamSummary {
            id: row.get("team_id"),
            name: row.get("team_name"),
        },
        reported_by: ReporterSummary {
            name: row.get("reporter_name"),
            email: row.get("reporter_email"),
        },
    })
}
