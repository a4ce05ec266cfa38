//! JSON-file persistence for projects and design parameters.
//!
//! The file holds a JSON object; this crate owns the value under
//! [`STORAGE_KEY`] and leaves every other key as it found it.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::project::ProjectData;
use crate::sizing::{BatteryDesignInputs, PvDesignInputs};

pub const STORAGE_KEY: &str = "solar-app-storage";

/// State that survives between sessions. The working audit is not stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub projects: Vec<ProjectData>,
    /// Highest project id ever issued; deleted ids are not reused.
    pub last_project_id: u64,
    pub battery_inputs: BatteryDesignInputs,
    pub pv_inputs: PvDesignInputs,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot access \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed store \"{}\": {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store \"{}\" does not contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the persisted state.
    ///
    /// A missing file or missing key yields the default state.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the file cannot be read or the stored value
    /// does not parse.
    pub fn load(&self) -> Result<PersistedState, StoreError> {
        let mut root = self.read_root()?;
        match root.remove(STORAGE_KEY) {
            Some(value) => {
                let state: PersistedState =
                    serde_json::from_value(value).map_err(|source| StoreError::Json {
                        path: self.path.clone(),
                        source,
                    })?;
                debug!(path = %self.path.display(), projects = state.projects.len(), "store loaded");
                Ok(state)
            }
            None => Ok(PersistedState::default()),
        }
    }

    /// Writes the persisted state, keeping unrelated keys in the file.
    ///
    /// The new contents go to a sibling temp file that is renamed over the
    /// store, so an interrupted write leaves the previous file intact.
    ///
    /// # Errors
    ///
    /// Returns a `StoreError` if the existing file is malformed or the write fails.
    pub fn save(&self, state: &PersistedState) -> Result<(), StoreError> {
        let mut root = self.read_root()?;
        let value = serde_json::to_value(state).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        root.insert(STORAGE_KEY.to_string(), value);

        let text = serde_json::to_string_pretty(&Value::Object(root)).map_err(|source| {
            StoreError::Json {
                path: self.path.clone(),
                source,
            }
        })?;
        let tmp = self.temp_path();
        write_synced(&tmp, text.as_bytes())
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                StoreError::Io {
                    path: self.path.clone(),
                    source,
                }
            })?;
        info!(path = %self.path.display(), projects = state.projects.len(), "store saved");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from(STORAGE_KEY));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_root(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::NotAnObject {
                path: self.path.clone(),
            }),
            Err(source) => Err(StoreError::Json {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let path = env::temp_dir().join(format!(
            "solar-sizer-store-{}-{name}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn missing_file_loads_default() {
        let store = Store::new(scratch("missing"));
        assert_eq!(store.load().unwrap(), PersistedState::default());
    }

    #[test]
    fn save_keeps_other_keys() {
        let path = scratch("other-keys");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();
        let store = Store::new(&path);

        let mut state = PersistedState::default();
        state.pv_inputs.pv_wattage = 250.0;
        store.save(&state).unwrap();

        let root: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(root["theme"], "dark");
        assert_eq!(root[STORAGE_KEY]["pv_inputs"]["pv_wattage"], 250.0);
        assert_eq!(store.load().unwrap(), state);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_replaces_file_through_temp_sibling() {
        let path = scratch("replace");
        let store = Store::new(&path);
        let tmp = store.temp_path();
        assert_eq!(tmp.parent(), path.parent());

        // Leftover from an interrupted save.
        fs::write(&tmp, "partial").unwrap();
        fs::write(&path, r#"{"solar-app-storage": {"last_project_id": 2}}"#).unwrap();

        let mut state = store.load().unwrap();
        assert_eq!(state.last_project_id, 2);
        state.last_project_id = 3;
        store.save(&state).unwrap();

        assert!(!tmp.exists());
        assert_eq!(store.load().unwrap().last_project_id, 3);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let path = scratch("kept");
        fs::write(&path, r#"{"theme": "light"}"#).unwrap();
        let store = Store::new(&path);
        // A directory in the temp file's place makes the write fail.
        let tmp = store.temp_path();
        let _ = fs::remove_file(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        assert!(matches!(
            store.save(&PersistedState::default()),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), r#"{"theme": "light"}"#);

        fs::remove_dir(&tmp).unwrap();
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_object_root_is_rejected() {
        let path = scratch("array");
        fs::write(&path, "[1, 2]").unwrap();
        let err = Store::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::NotAnObject { .. }));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn malformed_value_is_reported() {
        let path = scratch("bad-value");
        fs::write(&path, r#"{"solar-app-storage": {"projects": 3}}"#).unwrap();
        let err = Store::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
        assert!(err.to_string().contains("malformed store"));
        fs::remove_file(&path).unwrap();
    }
}
