//! Team roster endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResponse, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    AssignTechnicianRequest, CreateTeamRequest, Role, Team, TeamWithMembers, TechnicianSummary,
    User,
};
use crate::AppState;

/// POST /api/team - Create a new team (admin only).
pub async fn create_team(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateTeamRequest>,
) -> ApiResult<Team> {
    user.require_role(&[Role::Admin])?;

    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Team name is required".to_string()));
    }

    let team = state.repo.create_team(&request).await?;
    Ok(ApiResponse::created(team).with_message("Team created successfully"))
}

/// GET /api/team - List all teams with their members.
pub async fn list_teams(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Vec<TeamWithMembers>> {
    let teams = state.repo.list_teams().await?;
    Ok(ApiResponse::ok(teams))
}

/// GET /api/team/available - List unassigned technicians (admin only).
pub async fn list_available_technicians(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<TechnicianSummary>> {
    user.require_role(&[Role::Admin])?;

    let technicians = state.repo.list_available_technicians().await?;
    Ok(ApiResponse::ok(technicians))
}

/// POST /api/team/assign - Assign a technician to a team (admin only).
pub async fn assign_technician(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<AssignTechnicianRequest>,
) -> ApiResult<User> {
    user.require_role(&[Role::Admin])?;

    let assigned = state
        .repo
        .assign_technician(&request.user_id, &request.team_id)
        .await?;

    tracing::info!(user_id = %assigned.id, team_id = ?assigned.team_id, "Technician assigned");

    Ok(ApiResponse::ok(assigned).with_message("Technician assigned successfully"))
}

/// PUT /api/team/remove/{user_id} - Remove a technician from their team (admin only).
pub async fn remove_technician(
    State(state): State<AppState>,
    user: AuthUser,
    Path(user_id): Path<String>,
) -> ApiResult<()> {
    user.require_role(&[Role::Admin])?;

    state.repo.remove_technician(&user_id).await?;
    Ok(ApiResponse::ok(()).with_message("Technician removed from team"))
}
