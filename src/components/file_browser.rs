use super::Component;
use crate::event::AppMsg;
use crate::pipeline::fs_ops::is_image_file;
use crate::widgets::common::focused_block;
use crate::widgets::theme::get_theme;
use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{
        List, ListItem, ListState, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub struct FileBrowserState {
    pub current_dir: PathBuf,
    pub entries: Vec<PathBuf>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub last_refresh: Instant,
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl FileBrowserState {
    pub fn new(start_dir: PathBuf) -> Self {
        let mut state = Self {
            current_dir: start_dir,
            entries: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            last_refresh: Instant::now(),
        };
        state.refresh_entries();
        if !state.entries.is_empty() {
            state.list_state.select(Some(0));
        }
        state
    }

    fn refresh_entries(&mut self) {
        self.entries.clear();

        if self.current_dir.parent().is_some() {
            self.entries.push(PathBuf::from(".."));
        }

        if let Ok(entries) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in entries.flatten() {
                let path = entry.path();
                let hidden = path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'));
                if hidden {
                    continue;
                }
                if path.is_dir() {
                    dirs.push(path);
                } else if is_image_file(&path) {
                    files.push(path);
                }
            }

            dirs.sort();
            files.sort();

            self.entries.extend(dirs);
            self.entries.extend(files);
        }
    }

    fn change_dir(&mut self, dir: PathBuf) {
        self.current_dir = dir;
        self.refresh_entries();
        self.list_state.select(if self.entries.is_empty() { None } else { Some(0) });
        self.scroll_state = self.scroll_state.position(0);
    }

    fn go_up(&mut self) {
        if let Some(parent) = self.current_dir.parent() {
            let parent = parent.to_path_buf();
            self.change_dir(parent);
        }
    }

    /// Enters directories; returns the path when an image is selected.
    fn enter_selected(&mut self) -> Option<PathBuf> {
        let path = self.entries.get(self.list_state.selected()?)?.clone();
        if path == Path::new("..") {
            self.go_up();
            None
        } else if path.is_dir() {
            self.change_dir(path);
            None
        } else {
            Some(path)
        }
    }

    fn move_selection(&mut self, forward: bool) {
        if self.entries.is_empty() {
            return;
        }
        let last = self.entries.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) if forward => if i >= last { 0 } else { i + 1 },
            Some(i) => if i == 0 { last } else { i - 1 },
            None => 0,
        };
        self.list_state.select(Some(i));
        self.scroll_state = self.scroll_state.position(i);
    }
}

impl Component for FileBrowserState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::Tick => {
                if self.last_refresh.elapsed() >= Duration::from_secs(1) {
                    self.refresh_entries();
                    self.last_refresh = Instant::now();

                    if let Some(selected) = self.list_state.selected()
                        && selected >= self.entries.len()
                    {
                        let new_selected = self.entries.len().saturating_sub(1);
                        self.list_state.select(Some(new_selected));
                    }
                }
            }
            AppMsg::Key(key) => match key.code {
                KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
                KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
                KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Left => self.go_up(),
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                    return self.enter_selected().map(AppMsg::ImageChosen);
                }
                _ => {}
            },
            _ => {}
        }
        None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|entry| {
                let icon = if entry.is_dir() || entry == Path::new("..") { "📁" } else { "🖼" };
                let name = entry
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| entry.display().to_string());
                ListItem::new(format!("{} {}", icon, name))
                    .style(Style::default().fg(theme.text_primary))
            })
            .collect();

        let title = format!("Images: {}", self.current_dir.display());
        let block = focused_block(&title, is_focused);
        let inner_area = block.inner(area);
        block.render(area, buf);

        let list = List::new(items)
            .highlight_style(
                Style::default()
                    .fg(theme.text_highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        StatefulWidget::render(list, inner_area, buf, &mut self.list_state);

        self.scroll_state = self.scroll_state.content_length(self.entries.len());

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));

        scrollbar.render(inner_area, buf, &mut self.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tempfile::tempdir;

    fn key(code: KeyCode) -> AppMsg {
        AppMsg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_lists_dirs_then_images_only() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        std::fs::write(dir.path().join("a.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(dir.path().join(".hidden.png"), b"").unwrap();

        let browser = FileBrowserState::new(dir.path().to_path_buf());
        let names: Vec<String> = browser
            .entries
            .iter()
            .map(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "..".into())
            })
            .collect();
        assert_eq!(names, vec!["..", "sub", "a.jpg", "b.png"]);
    }

    #[test]
    fn test_enter_descends_and_picks_image() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("wall.png"), b"").unwrap();

        let mut browser = FileBrowserState::new(dir.path().to_path_buf());
        browser.update(&key(KeyCode::Down));
        assert!(browser.update(&key(KeyCode::Enter)).is_none());
        assert_eq!(browser.current_dir, sub);

        browser.update(&key(KeyCode::Down));
        match browser.update(&key(KeyCode::Enter)) {
            Some(AppMsg::ImageChosen(path)) => assert_eq!(path, sub.join("wall.png")),
            other => panic!("expected an image, got {:?}", other),
        }

        browser.update(&key(KeyCode::Backspace));
        assert_eq!(browser.current_dir, dir.path());
    }
}
