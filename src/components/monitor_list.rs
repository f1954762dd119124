use super::Component;
use crate::event::AppMsg;
use crate::model::assignment::Assignment;
use crate::model::monitor::Monitor;
use crate::widgets::common::{file_label, focused_block};
use crate::widgets::theme::get_theme;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, StatefulWidget, Widget},
};

/// One row per detected monitor with the image picked for it.
#[derive(Default)]
pub struct MonitorListState {
    pub monitors: Vec<Monitor>,
    pub assignment: Assignment,
    pub list_state: ListState,
}

impl MonitorListState {
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    fn select(&mut self, idx: usize) -> Option<AppMsg> {
        self.list_state.select(Some(idx));
        Some(AppMsg::MonitorSelected(idx))
    }
}

impl Component for MonitorListState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::MonitorsDetected(monitors) => {
                self.monitors = monitors.clone();
                let selected = match self.list_state.selected() {
                    _ if self.monitors.is_empty() => None,
                    Some(i) => Some(i.min(self.monitors.len() - 1)),
                    None => Some(0),
                };
                self.list_state.select(selected);
            }
            AppMsg::AssignmentChanged(assignment) => {
                self.assignment = assignment.clone();
            }
            AppMsg::Key(key) => {
                if self.monitors.is_empty() {
                    return None;
                }
                let last = self.monitors.len() - 1;
                let current = self.list_state.selected().unwrap_or(0);
                match key.code {
                    KeyCode::Down | KeyCode::Char('j') => {
                        let next = if current >= last { 0 } else { current + 1 };
                        return self.select(next);
                    }
                    KeyCode::Up | KeyCode::Char('k') => {
                        let prev = if current == 0 { last } else { current - 1 };
                        return self.select(prev);
                    }
                    KeyCode::Enter | KeyCode::Char('l') => return Some(AppMsg::BrowseRequested),
                    KeyCode::Delete | KeyCode::Char('x') => {
                        return Some(AppMsg::ClearMonitor(current));
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let block = focused_block("Monitors", is_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.monitors.is_empty() {
            Line::from(Span::styled(
                "No monitors detected (press r to rescan)",
                Style::default().fg(theme.status_failed),
            ))
            .render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .monitors
            .iter()
            .map(|monitor| {
                let image = match self.assignment.get(&monitor.name) {
                    Some(path) => Span::styled(
                        file_label(path),
                        Style::default().fg(theme.status_completed),
                    ),
                    None => Span::styled("<none>", Style::default().fg(theme.text_secondary)),
                };
                let mut header = vec![Span::styled(
                    monitor.name.clone(),
                    Style::default().fg(theme.text_primary).add_modifier(Modifier::BOLD),
                )];
                if monitor.primary {
                    header.push(Span::styled(" ★", Style::default().fg(theme.text_highlight)));
                }
                header.push(Span::styled(
                    format!("  {}", monitor.geometry_string()),
                    Style::default().fg(theme.text_secondary),
                ));

                ListItem::new(vec![
                    Line::from(header),
                    Line::from(vec![Span::raw("   "), image]),
                ])
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().fg(theme.text_highlight).add_modifier(Modifier::BOLD))
            .highlight_symbol(">> ");

        StatefulWidget::render(list, inner, buf, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> AppMsg {
        AppMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_monitors() -> MonitorListState {
        let mut list = MonitorListState::default();
        list.update(&AppMsg::MonitorsDetected(vec![
            Monitor::new("DP-1", 0, 0, 1920, 1080),
            Monitor::new("DP-2", 1920, 0, 1920, 1080),
        ]));
        list
    }

    #[test]
    fn test_detection_selects_first_monitor() {
        let list = with_monitors();
        assert_eq!(list.selected(), Some(0));
    }

    #[test]
    fn test_navigation_wraps() {
        let mut list = with_monitors();
        assert!(matches!(list.update(&key(KeyCode::Up)), Some(AppMsg::MonitorSelected(1))));
        assert!(matches!(list.update(&key(KeyCode::Down)), Some(AppMsg::MonitorSelected(0))));
    }

    #[test]
    fn test_enter_and_clear_emit_messages() {
        let mut list = with_monitors();
        list.update(&key(KeyCode::Down));
        assert!(matches!(list.update(&key(KeyCode::Enter)), Some(AppMsg::BrowseRequested)));
        assert!(matches!(list.update(&key(KeyCode::Char('x'))), Some(AppMsg::ClearMonitor(1))));
    }

    #[test]
    fn test_keys_ignored_without_monitors() {
        let mut list = MonitorListState::default();
        assert!(list.update(&key(KeyCode::Enter)).is_none());
    }

    #[test]
    fn test_render_shows_assignment() {
        let mut list = with_monitors();
        let mut assignment = Assignment::new();
        assignment.set("DP-2", "/walls/forest.jpg");
        list.update(&AppMsg::AssignmentChanged(assignment));

        let area = Rect::new(0, 0, 50, 8);
        let mut buf = Buffer::empty(area);
        list.render(area, &mut buf, true);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("forest.jpg"));
        assert!(text.contains("<none>"));
    }
}
