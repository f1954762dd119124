use crossterm::event::KeyEvent;
use std::path::PathBuf;

use crate::model::assignment::Assignment;
use crate::model::monitor::Monitor;
use crate::pipeline::apply::ApplyReport;

#[derive(Clone, Debug)]
pub enum AppMsg {
    Tick,
    Key(KeyEvent),
    Quit,

    // Monitors
    MonitorsDetected(Vec<Monitor>),
    MonitorSelected(usize),
    RescanRequested,

    // Selection
    BrowseRequested,
    ImageChosen(PathBuf),
    ClearMonitor(usize),
    AssignmentChanged(Assignment),
    CancelRequested,

    // Apply
    ApplyRequested,
    ApplyStarted,
    ApplyCompleted(ApplyReport),
    ApplyFailed { kind: String, message: String },

    // General
    ErrorOccurred(String),
    LogMessage(String),
}
