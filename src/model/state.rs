use std::path::PathBuf;

use super::assignment::Assignment;
use super::monitor::{CanvasBounds, Monitor};

/// Everything the UI loop knows about the session. Owned by `App`.
#[derive(Default)]
pub struct AppState {
    pub monitors: Vec<Monitor>,
    pub assignment: Assignment,
    pub selected: usize,
    pub focus: Focus,
    pub apply_status: ApplyStatus,
    pub popup: Option<Popup>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Monitors,
    FileBrowser,
    Logs,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Monitors => Focus::FileBrowser,
            Focus::FileBrowser => Focus::Logs,
            Focus::Logs => Focus::Monitors,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Monitors => Focus::Logs,
            Focus::FileBrowser => Focus::Monitors,
            Focus::Logs => Focus::FileBrowser,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ApplyStatus {
    #[default]
    Idle,
    Running,
    Applied(PathBuf),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Popup {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

impl AppState {
    pub fn selected_monitor(&self) -> Option<&Monitor> {
        self.monitors.get(self.selected)
    }

    pub fn selected_image(&self) -> Option<PathBuf> {
        self.selected_monitor()
            .and_then(|m| self.assignment.get(&m.name))
            .map(PathBuf::from)
    }

    pub fn set_monitors(&mut self, monitors: Vec<Monitor>) {
        self.monitors = monitors;
        if self.selected >= self.monitors.len() {
            self.selected = self.monitors.len().saturating_sub(1);
        }
    }

    /// Assigns `image` to the selected monitor, returning its name.
    pub fn assign_selected(&mut self, image: PathBuf) -> Option<String> {
        let name = self.selected_monitor()?.name.clone();
        self.assignment.set(name.clone(), image);
        Some(name)
    }

    pub fn canvas_bounds(&self) -> Option<CanvasBounds> {
        CanvasBounds::of(&self.monitors).ok()
    }

    pub fn is_applying(&self) -> bool {
        self.apply_status == ApplyStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_selected_uses_current_monitor() {
        let mut state = AppState::default();
        state.set_monitors(vec![
            Monitor::new("DP-1", 0, 0, 1920, 1080),
            Monitor::new("DP-2", 1920, 0, 1920, 1080),
        ]);
        state.selected = 1;

        let name = state.assign_selected(PathBuf::from("/tmp/b.png"));
        assert_eq!(name.as_deref(), Some("DP-2"));
        assert_eq!(state.selected_image(), Some(PathBuf::from("/tmp/b.png")));
        assert!(state.assignment.get("DP-1").is_none());
    }

    #[test]
    fn test_set_monitors_clamps_selection() {
        let mut state = AppState::default();
        state.selected = 3;
        state.set_monitors(vec![Monitor::new("DP-1", 0, 0, 1920, 1080)]);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_assign_without_monitors_is_noop() {
        let mut state = AppState::default();
        assert!(state.assign_selected(PathBuf::from("/tmp/a.png")).is_none());
        assert!(state.assignment.is_empty());
    }

    #[test]
    fn test_focus_cycle() {
        assert_eq!(Focus::Monitors.next().next().next(), Focus::Monitors);
        assert_eq!(Focus::Monitors.prev(), Focus::Logs);
    }
}
