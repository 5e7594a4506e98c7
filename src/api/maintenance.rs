//! Maintenance lifecycle endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};

use super::{ApiResponse, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{
    CreateMaintenanceRequest, Maintenance, MaintenanceDetail, Role, ScheduleMaintenanceRequest,
};
use crate::AppState;

/// POST /api/maintenance - Report a new issue (any authenticated user).
pub async fn create_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateMaintenanceRequest>,
) -> ApiResult<Maintenance> {
    let (Some(equipment_id), Some(issue_type)) = (request.equipment_id, request.issue_type) else {
        return Err(AppError::Validation("Missing required fields".to_string()));
    };

    let ticket = state
        .repo
        .create_maintenance(
            &user.id,
            &equipment_id,
            issue_type,
            request.description.as_deref(),
        )
        .await?;

    tracing::info!(ticket_id = %ticket.id, team_id = %ticket.assigned_team, "Maintenance request created");

    Ok(ApiResponse::created(ticket).with_message("Maintenance request created"))
}

/// GET /api/maintenance - List all tickets, fully populated (admin only).
pub async fn get_all_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<MaintenanceDetail>> {
    user.require_role(&[Role::Admin])?;

    let tickets = state.repo.list_all_maintenance().await?;
    Ok(ApiResponse::ok(tickets))
}

/// PUT /api/maintenance/schedule - Schedule an open ticket (admin only).
pub async fn schedule_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ScheduleMaintenanceRequest>,
) -> ApiResult<Maintenance> {
    user.require_role(&[Role::Admin])?;

    let scheduled_date = DateTime::parse_from_rfc3339(&request.scheduled_date)
        .map_err(|_| {
            AppError::Validation("scheduledDate must be an RFC 3339 timestamp".to_string())
        })?
        .with_timezone(&Utc)
        .to_rfc3339();

    let ticket = state
        .repo
        .schedule_maintenance(&request.maintenance_id, &scheduled_date)
        .await?;

    Ok(ApiResponse::ok(ticket).with_message("Maintenance scheduled successfully"))
}

/// PUT /api/maintenance/start/{id} - Start a scheduled ticket.
///
/// Restricted to technicians in the ticket's assigned team.
pub async fn start_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(maintenance_id): Path<String>,
) -> ApiResult<Maintenance> {
    user.require_role(&[Role::Technician])?;

    let ticket = state
        .repo
        .start_maintenance(&maintenance_id, &user.id)
        .await?;

    Ok(ApiResponse::ok(ticket).with_message("Maintenance started"))
}

/// PUT /api/maintenance/complete/{id} - Complete an in-progress ticket.
pub async fn complete_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(maintenance_id): Path<String>,
) -> ApiResult<Maintenance> {
    user.require_role(&[Role::Technician])?;

    let ticket = state.repo.complete_maintenance(&maintenance_id).await?;

    Ok(ApiResponse::ok(ticket).with_message("Maintenance completed successfully"))
}

/// GET /api/maintenance/my - Unfinished tickets for the caller's team (technician only).
pub async fn get_my_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<MaintenanceDetail>> {
    user.require_role(&[Role::Technician])?;

    let caller = state
        .repo
        .get_user(&user.id)
        .await?
        .ok_or_else(|| AppError::Unauthenticated("Unknown user".to_string()))?;

    let team_id = caller.team_id.ok_or_else(|| {
        AppError::NotFound("Technician is not assigned to any team".to_string())
    })?;

    let tickets = state.repo.list_team_maintenance(&team_id).await?;
    Ok(ApiResponse::ok(tickets))
}

/// GET /api/maintenance/reported - Tickets the caller has reported.
pub async fn get_reported_maintenance(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Vec<MaintenanceDetail>> {
    let tickets = state.repo.list_reported_maintenance(&user.id).await?;
    Ok(ApiResponse::ok(tickets))
}
