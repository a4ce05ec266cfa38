//! Saved design snapshots and dashboard statistics.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::EnergyAuditData;
use crate::sizing::{BatteryDesignInputs, PvDesignInputs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectError {
    #[error("Please enter a project name")]
    EmptyName,
    #[error("project {0} not found")]
    NotFound(ProjectId),
}

/// Named snapshot of a full design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    pub id: ProjectId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub energy_data: EnergyAuditData,
    pub battery_inputs: BatteryDesignInputs,
    pub pv_inputs: PvDesignInputs,
}

impl ProjectData {
    pub fn status(&self) -> ProjectStatus {
        ProjectStatus::of(&self.energy_data)
    }
}

/// Progress of a saved project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// No appliances recorded.
    NotStarted,
    /// Appliances recorded but no daily energy to size against.
    Incomplete,
    /// Energy recorded; the calculators produce results.
    Sized,
}

impl ProjectStatus {
    pub fn of(energy: &EnergyAuditData) -> Self {
        if energy.is_empty() {
            Self::NotStarted
        } else if energy.totals().has_no_energy() {
            Self::Incomplete
        } else {
            Self::Sized
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::NotStarted => "Not Started",
            Self::Incomplete => "Incomplete",
            Self::Sized => "Sized",
        })
    }
}

/// Next project identity after the counter `last_issued`.
///
/// Existing ids are also considered so a store edited by hand cannot cause
/// a collision.
pub fn next_project_id(last_issued: u64, projects: &[ProjectData]) -> ProjectId {
    let max = projects.iter().map(|p| p.id.0).max().unwrap_or(0);
    ProjectId(last_issued.max(max) + 1)
}

/// Aggregates shown above the project list.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardStats {
    pub total_projects: usize,
    /// Projects whose audit has non-zero daily energy.
    pub sized_projects: usize,
    /// Sum of daily energy across all projects (kWh).
    pub total_energy_kwh: f64,
}

impl DashboardStats {
    pub fn from_projects(projects: &[ProjectData]) -> Self {
        projects.iter().fold(
            Self {
                total_projects: projects.len(),
                ..Self::default()
            },
            |mut acc, p| {
                let kwh = p.energy_data.totals().total_raw_energy;
                if kwh > 0.0 {
                    acc.sized_projects += 1;
                }
                acc.total_energy_kwh += kwh;
                acc
            },
        )
    }
}

impl fmt::Display for DashboardStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} projects, {} sized, {:.2} kWh/day designed",
            self.total_projects, self.sized_projects, self.total_energy_kwh
        )
    }
}
