//! API response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::audit::{Appliance, EnergyTotals};
use crate::project::{DashboardStats, ProjectData, ProjectId, ProjectStatus};
use crate::state::Notice;

#[derive(Debug, Serialize)]
pub struct AppliancesResponse {
    pub appliances: Vec<Appliance>,
    pub totals: EnergyTotals,
}

/// Body returned by mutating endpoints.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub notice: Notice,
    pub totals: EnergyTotals,
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub status: ProjectStatus,
    /// Daily energy of the saved audit (kWh).
    pub total_raw_energy: f64,
    pub appliance_count: usize,
}

impl From<&ProjectData> for ProjectSummary {
    fn from(p: &ProjectData) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            created_at: p.created_at,
            status: p.status(),
            total_raw_energy: p.energy_data.totals().total_raw_energy,
            appliance_count: p.energy_data.appliances().len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub dashboard: DashboardStats,
    pub current_project: Option<ProjectId>,
    pub projects: Vec<ProjectSummary>,
}
