//! Application state and its pure reducer.
//!
//! Every user operation is an [`Action`]. [`AppState::reduce`] consumes the
//! current state and returns the next one plus a [`Notice`] for the user.
//! Rejected actions return the state unchanged.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::audit::{ApplianceForm, ApplianceId, EnergyAuditData};
use crate::project::{
    DashboardStats, ProjectData, ProjectError, ProjectId, next_project_id,
};
use crate::sizing::{
    BatteryDesignInputs, OptimizationAdvice, PvDesignInputs, Sizing, SizingReport,
};
use crate::store::PersistedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short user-facing message produced by every reduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title: title.to_string(),
            description: description.into(),
        }
    }

    fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.description.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.description)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddAppliance(ApplianceForm),
    RemoveAppliance(ApplianceId),
    SetBatteryInputs(BatteryDesignInputs),
    SetPvInputs(PvDesignInputs),
    /// Snapshot the current design under a name. `at` becomes the creation time.
    SaveProject {
        name: String,
        notes: Option<String>,
        at: DateTime<Utc>,
    },
    LoadProject(ProjectId),
    DeleteProject(ProjectId),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AppState {
    pub energy_data: EnergyAuditData,
    pub battery_inputs: BatteryDesignInputs,
    pub pv_inputs: PvDesignInputs,
    pub projects: Vec<ProjectData>,
    pub current_project: Option<ProjectId>,
    pub last_project_id: u64,
}

impl AppState {
    /// Restores a session from persisted data. The audit starts empty.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            energy_data: EnergyAuditData::new(),
            battery_inputs: persisted.battery_inputs,
            pv_inputs: persisted.pv_inputs,
            projects: persisted.projects,
            current_project: None,
            last_project_id: persisted.last_project_id,
        }
    }

    /// The subset of state written to the store.
    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            projects: self.projects.clone(),
            last_project_id: self.last_project_id,
            battery_inputs: self.battery_inputs.clone(),
            pv_inputs: self.pv_inputs.clone(),
        }
    }

    pub fn report(&self) -> SizingReport {
        SizingReport::new(&self.energy_data, &self.battery_inputs, &self.pv_inputs)
    }

    pub fn advice(&self) -> Sizing<OptimizationAdvice> {
        OptimizationAdvice::from_design(
            &self.energy_data,
            &self.battery_inputs,
            &self.pv_inputs,
            &self.report(),
        )
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::from_projects(&self.projects)
    }

    pub fn project(&self, id: ProjectId) -> Option<&ProjectData> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn reduce(mut self, action: Action) -> (Self, Notice) {
        let notice = match action {
            Action::AddAppliance(form) => match self.energy_data.add_form(&form) {
                Ok(appliance) => Notice::info(
                    "Appliance Added",
                    format!("{} has been added to your energy audit", appliance.name()),
                ),
                Err(e) => {
                    warn!(error = %e, "appliance rejected");
                    Notice::error(
                        "Invalid Input",
                        "Please provide a valid appliance name and power rating",
                    )
                }
            },
            Action::RemoveAppliance(id) => match self.energy_data.remove(id) {
                Some(_) => Notice::info(
                    "Appliance Removed",
                    "Appliance has been removed from your energy audit",
                ),
                None => Notice::error("Appliance Not Found", format!("no appliance with id {id}")),
            },
            Action::SetBatteryInputs(inputs) => {
                self.battery_inputs = inputs;
                Notice::info("Battery Design Updated", "")
            }
            Action::SetPvInputs(inputs) => {
                self.pv_inputs = inputs;
                Notice::info("PV Design Updated", "")
            }
            Action::SaveProject { name, notes, at } => self.save_project(&name, notes, at),
            Action::LoadProject(id) => match self.project(id).cloned() {
                Some(project) => {
                    info!(id = %id, name = %project.name, "project loaded");
                    self.energy_data = project.energy_data;
                    self.battery_inputs = project.battery_inputs;
                    self.pv_inputs = project.pv_inputs;
                    self.current_project = Some(id);
                    Notice::info(
                        "Project Loaded",
                        format!("{} is now the active design", project.name),
                    )
                }
                None => Notice::error("Project Not Loaded", ProjectError::NotFound(id).to_string()),
            },
            Action::DeleteProject(id) => {
                let before = self.projects.len();
                self.projects.retain(|p| p.id != id);
                if self.projects.len() == before {
                    Notice::error("Project Not Deleted", ProjectError::NotFound(id).to_string())
                } else {
                    if self.current_project == Some(id) {
                        self.current_project = None;
                    }
                    info!(id = %id, "project deleted");
                    Notice::info("Project Deleted", "")
                }
            }
        };
        (self, notice)
    }

    fn save_project(&mut self, name: &str, notes: Option<String>, at: DateTime<Utc>) -> Notice {
        let name = name.trim();
        if name.is_empty() {
            warn!("project save rejected: empty name");
            return Notice::error("Project Not Saved", ProjectError::EmptyName.to_string());
        }
        let id = next_project_id(self.last_project_id, &self.projects);
        self.last_project_id = id.0;
        self.projects.push(ProjectData {
            id,
            name: name.to_string(),
            created_at: at,
            notes: notes.filter(|n| !n.trim().is_empty()),
            energy_data: self.energy_data.clone(),
            battery_inputs: self.battery_inputs.clone(),
            pv_inputs: self.pv_inputs.clone(),
        });
        self.current_project = Some(id);
        info!(id = %id, name, "project saved");
        Notice::info("Project saved successfully!", "")
    }
}
