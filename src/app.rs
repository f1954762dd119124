use anyhow::Result;
use crossbeam_channel::{Receiver, Sender};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::Paragraph,
};
use ratatui_image::picker::Picker;
use std::collections::VecDeque;
use std::{io, time::Duration};

use crate::components::{
    Component, file_browser::FileBrowserState, layout_view::LayoutViewState, logs::LogsState,
    monitor_list::MonitorListState, preview::PreviewState,
    status::{render_popup, render_status_bar},
};
use crate::config::Config;
use crate::event::AppMsg;
use crate::model::state::{AppState, ApplyStatus, Focus, Popup};
use crate::pipeline::apply::ApplyRequest;
use crate::pipeline::desktop::DesktopKind;
use crate::pipeline::xrandr::{MonitorProvider, Xrandr};
use crate::pipeline_worker::ApplyWorker;
use crate::widgets::common::file_label;
use crate::widgets::theme::get_theme;

pub struct App {
    pub config: Config,
    pub state: AppState,
    desktop: DesktopKind,
    monitor_list: MonitorListState,
    layout_view: LayoutViewState,
    file_browser: FileBrowserState,
    preview: PreviewState,
    logs: LogsState,
    tx: Sender<AppMsg>,
    rx: Receiver<AppMsg>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, picker: Option<Picker>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let desktop = config.desktop.resolve();
        let file_browser = FileBrowserState::new(config.resolved_start_dir());

        Self {
            config,
            state: AppState::default(),
            desktop,
            monitor_list: MonitorListState::default(),
            layout_view: LayoutViewState::default(),
            file_browser,
            preview: PreviewState::new(picker),
            logs: LogsState::default(),
            tx,
            rx,
            should_quit: false,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let res = self.event_loop(&mut terminal);

        if let Err(e) = restore_terminal(&mut terminal) {
            tracing::error!("failed to restore terminal: {}", e);
            return res.and(Err(e));
        }
        res
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        self.log(format!("Desktop: {}", self.desktop.name()));
        self.log(format!("Output: {}", self.config.output_path.display()));
        self.dispatch(AppMsg::RescanRequested);

        while !self.should_quit {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.dispatch(AppMsg::Key(key));
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            } else {
                self.dispatch(AppMsg::Tick);
            }

            while let Ok(msg) = self.rx.try_recv() {
                self.dispatch(msg);
            }
        }
        Ok(())
    }

    fn draw(&mut self, f: &mut Frame) {
        let theme = get_theme();
        let area = f.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(1),
            ])
            .split(area);

        let canvas = self
            .state
            .canvas_bounds()
            .map(|b| format!(" · canvas {}x{}", b.width, b.height))
            .unwrap_or_default();
        let header = Paragraph::new(format!(
            "multiwall · {} monitor(s){} · {}",
            self.state.monitors.len(),
            canvas,
            self.desktop.name()
        ))
        .style(Style::default().fg(theme.text_highlight).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
        f.render_widget(header, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(35),
                Constraint::Percentage(35),
                Constraint::Percentage(30),
            ])
            .split(rows[1]);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[0]);

        let focus = self.state.focus;
        let buf = f.buffer_mut();
        self.monitor_list.render(left[0], buf, focus == Focus::Monitors);
        self.layout_view.render(left[1], buf, false);
        self.file_browser.render(columns[1], buf, focus == Focus::FileBrowser);
        self.preview.render(columns[2], buf, false);
        self.logs.render(rows[2], buf, focus == Focus::Logs);
        render_status_bar(&self.state.apply_status, rows[3], buf);

        if let Some(popup) = &self.state.popup {
            render_popup(popup, area, buf);
        }
    }

    /// Runs `msg` and every follow-up message it produces.
    pub fn dispatch(&mut self, msg: AppMsg) {
        let mut pending = VecDeque::from([msg]);
        while let Some(msg) = pending.pop_front() {
            if let Some(next) = self.handle(msg) {
                pending.push_back(next);
            }
        }
    }

    fn handle(&mut self, msg: AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::Tick => self.file_browser.update(&AppMsg::Tick),
            AppMsg::Key(key) => self.handle_key(key),
            AppMsg::Quit => {
                self.should_quit = true;
                None
            }
            AppMsg::RescanRequested => match Xrandr::new().query() {
                Ok(layout) => Some(AppMsg::MonitorsDetected(layout.monitors)),
                Err(e) => {
                    tracing::warn!("monitor scan failed: {}", e);
                    self.show_popup(e.kind(), e.to_string(), true);
                    Some(AppMsg::ErrorOccurred(e.to_string()))
                }
            },
            AppMsg::MonitorsDetected(monitors) => {
                self.log(format!("Detected {} monitor(s)", monitors.len()));
                for monitor in &monitors {
                    self.log(format!("  {}", monitor));
                }
                let msg = AppMsg::MonitorsDetected(monitors.clone());
                self.state.set_monitors(monitors);
                self.monitor_list.update(&msg);
                self.layout_view.update(&msg);
                self.sync_selection();
                None
            }
            AppMsg::MonitorSelected(idx) => {
                self.state.selected = idx;
                self.layout_view.update(&AppMsg::MonitorSelected(idx));
                self.preview.show(self.state.selected_image());
                None
            }
            AppMsg::BrowseRequested => {
                self.state.focus = Focus::FileBrowser;
                None
            }
            AppMsg::ImageChosen(path) => {
                let label = file_label(&path);
                let assigned = self.state.assign_selected(path)?;
                self.log(format!("{} <- {}", assigned, label));
                self.state.focus = Focus::Monitors;
                Some(AppMsg::AssignmentChanged(self.state.assignment.clone()))
            }
            AppMsg::ClearMonitor(idx) => {
                let name = self.state.monitors.get(idx)?.name.clone();
                self.state.assignment.remove(&name)?;
                self.log(format!("{} cleared", name));
                Some(AppMsg::AssignmentChanged(self.state.assignment.clone()))
            }
            AppMsg::CancelRequested => {
                self.state.assignment.clear();
                self.preview.update(&AppMsg::CancelRequested);
                self.log("Selection cleared".to_string());
                Some(AppMsg::AssignmentChanged(self.state.assignment.clone()))
            }
            msg @ AppMsg::AssignmentChanged(_) => {
                self.monitor_list.update(&msg);
                self.layout_view.update(&msg);
                self.preview.show(self.state.selected_image());
                None
            }
            AppMsg::ApplyRequested => {
                self.start_apply();
                None
            }
            AppMsg::ApplyStarted => {
                self.log("Applying background...".to_string());
                None
            }
            AppMsg::ApplyCompleted(report) => {
                self.state.apply_status = ApplyStatus::Applied(report.output_path.clone());
                self.show_popup(
                    "Background applied",
                    format!(
                        "{}x{} across {} monitor(s) saved to {}. It may take a moment to show up.",
                        report.width,
                        report.height,
                        report.monitors,
                        report.output_path.display()
                    ),
                    false,
                );
                None
            }
            AppMsg::ApplyFailed { kind, message } => {
                self.state.apply_status = ApplyStatus::Failed(message.clone());
                self.show_popup(&kind, message.clone(), true);
                self.logs.update(&AppMsg::ApplyFailed { kind, message });
                None
            }
            msg @ (AppMsg::ErrorOccurred(_) | AppMsg::LogMessage(_)) => {
                self.logs.update(&msg);
                None
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppMsg> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppMsg::Quit);
        }

        if self.state.popup.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.state.popup = None;
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => Some(AppMsg::Quit),
            KeyCode::Char('a') => Some(AppMsg::ApplyRequested),
            KeyCode::Char('c') => Some(AppMsg::CancelRequested),
            KeyCode::Char('r') => Some(AppMsg::RescanRequested),
            KeyCode::Tab => {
                self.state.focus = self.state.focus.next();
                None
            }
            KeyCode::BackTab => {
                self.state.focus = self.state.focus.prev();
                None
            }
            KeyCode::Esc if self.state.focus == Focus::FileBrowser => {
                self.state.focus = Focus::Monitors;
                None
            }
            _ => {
                let msg = AppMsg::Key(key);
                match self.state.focus {
                    Focus::Monitors => self.monitor_list.update(&msg),
                    Focus::FileBrowser => self.file_browser.update(&msg),
                    Focus::Logs => self.logs.update(&msg),
                }
            }
        }
    }

    fn start_apply(&mut self) {
        if self.state.is_applying() {
            self.log("Apply already in progress".to_string());
            return;
        }

        let request = ApplyRequest {
            assignment: self.state.assignment.clone(),
            options: self.config.compose_options(),
            output_path: self.config.output_path.clone(),
        };

        self.state.apply_status = ApplyStatus::Running;
        tracing::info!(images = request.assignment.len(), "apply requested");
        ApplyWorker::new(self.tx.clone()).start(request, self.desktop);
    }

    fn sync_selection(&mut self) {
        if let Some(idx) = self.monitor_list.selected() {
            self.state.selected = idx;
            self.layout_view.update(&AppMsg::MonitorSelected(idx));
        }
        self.preview.show(self.state.selected_image());
    }

    fn show_popup(&mut self, title: &str, message: String, is_error: bool) {
        self.state.popup = Some(Popup {
            title: title.to_string(),
            message,
            is_error,
        });
    }

    fn log(&mut self, message: String) {
        self.logs.add_log(message);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> anyhow::Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().ok();
    // LeaveAlternateScreen must be executed on the same stdout the backend uses
    let mut out = io::stdout();
    execute!(out, LeaveAlternateScreen)?;
    Ok(())
}
