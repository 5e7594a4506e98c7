//! Maintenance ticket model and lifecycle states.

use serde::{Deserialize, Serialize};

use super::TeamSummary;

/// Why a ticket was opened.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    Preventive,
    Corrective,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Preventive => "PREVENTIVE",
            IssueType::Corrective => "CORRECTIVE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PREVENTIVE" => Some(IssueType::Preventive),
            "CORRECTIVE" => Some(IssueType::Corrective),
            _ => None,
        }
    }
}

/// Lifecycle state of a ticket. Transitions run strictly forward:
/// OPEN -> SCHEDULED -> IN_PROGRESS -> COMPLETED, no skips, no reopen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    Scheduled,
    InProgress,
    Completed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "OPEN",
            TicketStatus::Scheduled => "SCHEDULED",
            TicketStatus::InProgress => "IN_PROGRESS",
            TicketStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "OPEN" => Some(TicketStatus::Open),
            "SCHEDULED" => Some(TicketStatus::Scheduled),
            "IN_PROGRESS" => Some(TicketStatus::InProgress),
            "COMPLETED" => Some(TicketStatus::Completed),
            _ => None,
        }
    }

    /// The single state this one may advance to, if any.
    pub fn next(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Open => Some(TicketStatus::Scheduled),
            TicketStatus::Scheduled => Some(TicketStatus::InProgress),
            TicketStatus::InProgress => Some(TicketStatus::Completed),
            TicketStatus::Completed => None,
        }
    }
}

/// A maintenance ticket tracking one equipment issue through its lifecycle.
///
/// `assigned_team` is snapshotted from the equipment's team at creation and
/// never recomputed, so re-assigning equipment does not re-route open tickets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: String,
    pub equipment_id: String,
    pub reported_by: String,
    pub assigned_team: String,
    pub issue_type: IssueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub created_at: String,
}

/// Equipment view embedded in populated ticket listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentSummary {
    pub id: String,
    pub name: String,
    pub location: String,
}

/// Reporter view embedded in populated ticket listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReporterSummary {
    pub name: String,
    pub email: String,
}

/// Ticket populated with equipment, assigned team, and reporter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDetail {
    pub id: String,
    pub issue_type: IssueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TicketStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    pub created_at: String,
    pub equipment: EquipmentSummary,
    pub assigned_team: TeamSummary,
    pub reported_by: ReporterSummary,
}

/// Request body for reporting a new issue.
///
/// Fields are optional so that absence surfaces as a structured
/// validation error rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    #[serde(default)]
    pub equipment_id: Option<String>,
    #[serde(default)]
    pub issue_type: Option<IssueType>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for scheduling an open ticket.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMaintenanceRequest {
    pub maintenance_id: String,
    pub scheduled_date: String,
}
