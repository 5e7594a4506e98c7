//! Equipment model for the asset registry.

use serde::{Deserialize, Serialize};

use super::TeamSummary;

/// Operational status of a physical asset.
///
/// Informational only: ticket transitions do not flip it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Active,
    UnderMaintenance,
    Scrapped,
}

impl EquipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentStatus::Active => "ACTIVE",
            EquipmentStatus::UnderMaintenance => "UNDER_MAINTENANCE",
            EquipmentStatus::Scrapped => "SCRAPPED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(EquipmentStatus::Active),
            "UNDER_MAINTENANCE" => Some(EquipmentStatus::UnderMaintenance),
            "SCRAPPED" => Some(EquipmentStatus::Scrapped),
            _ => None,
        }
    }
}

/// A physical asset owned by exactly one team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    pub serial_number: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub team_id: String,
    pub status: EquipmentStatus,
    pub created_at: String,
}

/// Equipment populated with its owning team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDetail {
    pub id: String,
    pub name: String,
    pub serial_number: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: EquipmentStatus,
    pub created_at: String,
    pub team: TeamSummary,
}

/// Request body for registering new equipment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentRequest {
    pub name: String,
    pub serial_number: String,
    pub location: String,
    pub team_id: String,
    #[serde(default)]
    pub description: Option<String>,
}
