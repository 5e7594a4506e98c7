//! Equipment registry endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{ApiResponse, ApiResult};
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::{CreateEquipmentRequest, Equipment, EquipmentDetail, Role};
use crate::AppState;

/// POST /api/equipment - Register new equipment (admin only).
pub async fn create_equipment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateEquipmentRequest>,
) -> ApiResult<Equipment> {
    user.require_role(&[Role::Admin])?;

    if request.name.trim().is_empty()
        || request.serial_number.trim().is_empty()
        || request.location.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Name, serial number and location are required".to_string(),
        ));
    }

    let equipment = state.repo.create_equipment(&request).await?;
    Ok(ApiResponse::created(equipment).with_message("Equipment created successfully"))
}

/// GET /api/equipment - List all equipment with team names.
pub async fn list_equipment(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Vec<EquipmentDetail>> {
    let equipment = state.repo.list_equipment().await?;
    Ok(ApiResponse::ok(equipment))
}

/// GET /api/equipment/{id} - Get one piece of equipment with its team.
pub async fn get_equipment(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<EquipmentDetail> {
    match state.repo.get_equipment(&id).await? {
        Some(equipment) => Ok(ApiResponse::ok(equipment)),
        None => Err(AppError::NotFound("Equipment not found".to_string())),
    }
}
