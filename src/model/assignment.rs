use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::monitor::Monitor;
use crate::error::{Result, WallpaperError};

/// What to put on a monitor that has no image selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnassignedPolicy {
    /// Leave the monitor's region filled with the configured fill color.
    #[default]
    Blank,
    /// Reuse the selected images, cycling in monitor order.
    Repeat,
    /// Refuse to compose.
    Abort,
}

/// Monitor name -> selected image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    images: BTreeMap<String, PathBuf>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, monitor: impl Into<String>, image: impl Into<PathBuf>) {
        self.images.insert(monitor.into(), image.into());
    }

    pub fn get(&self, monitor: &str) -> Option<&Path> {
        self.images.get(monitor).map(PathBuf::as_path)
    }

    pub fn remove(&mut self, monitor: &str) -> Option<PathBuf> {
        self.images.remove(monitor)
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Names with an image that do not match any of `monitors`.
    pub fn stale_names<'a>(&'a self, monitors: &[Monitor]) -> Vec<&'a str> {
        self.images
            .keys()
            .filter(|name| !monitors.iter().any(|m| &m.name == *name))
            .map(String::as_str)
            .collect()
    }

    /// Pairs every monitor with the image it should show, in monitor order.
    pub fn resolve(
        &self,
        monitors: &[Monitor],
        policy: UnassignedPolicy,
    ) -> Result<Vec<Option<PathBuf>>> {
        let direct: Vec<Option<PathBuf>> = monitors
            .iter()
            .map(|m| self.images.get(&m.name).cloned())
            .collect();

        let assigned: Vec<&PathBuf> = direct.iter().flatten().collect();
        if assigned.is_empty() {
            return Err(WallpaperError::NothingAssigned);
        }

        match policy {
            UnassignedPolicy::Blank => Ok(direct),
            UnassignedPolicy::Abort => {
                if let Some(idx) = direct.iter().position(Option::is_none) {
                    return Err(WallpaperError::MissingAssignment(monitors[idx].name.clone()));
                }
                Ok(direct)
            }
            UnassignedPolicy::Repeat => {
                let mut next = 0;
                Ok(direct
                    .iter()
                    .map(|slot| match slot {
                        Some(path) => Some(path.clone()),
                        None => {
                            let path = assigned[next % assigned.len()].clone();
                            next += 1;
                            Some(path)
                        }
                    })
                    .collect())
            }
        }
    }
}
