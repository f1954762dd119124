use super::Component;
use crate::event::AppMsg;
use crate::model::assignment::Assignment;
use crate::model::monitor::{CanvasBounds, Monitor};
use crate::widgets::common::focused_block;
use crate::widgets::theme::get_theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{
        Widget,
        canvas::{Canvas, Rectangle},
    },
};

/// Scaled sketch of the virtual desktop.
#[derive(Default)]
pub struct LayoutViewState {
    pub monitors: Vec<Monitor>,
    pub assignment: Assignment,
    pub selected: usize,
}

impl Component for LayoutViewState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        match msg {
            AppMsg::MonitorsDetected(monitors) => {
                self.monitors = monitors.clone();
                self.selected = self.selected.min(self.monitors.len().saturating_sub(1));
            }
            AppMsg::AssignmentChanged(assignment) => self.assignment = assignment.clone(),
            AppMsg::MonitorSelected(idx) => self.selected = *idx,
            _ => {}
        }
        None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let Ok(bounds) = CanvasBounds::of(&self.monitors) else {
            let block = focused_block("Layout", is_focused);
            let inner = block.inner(area);
            block.render(area, buf);
            Line::from("No layout").render(inner, buf);
            return;
        };

        let title = format!("Layout {}x{}", bounds.width, bounds.height);
        let block = focused_block(&title, is_focused);

        let width = bounds.width as f64;
        let height = bounds.height as f64;

        let canvas = Canvas::default()
            .block(block)
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                for (idx, monitor) in self.monitors.iter().enumerate() {
                    let (x, y) = bounds.local_origin(monitor);
                    let color = if idx == self.selected {
                        theme.monitor_selected
                    } else {
                        theme.monitor_fill
                    };
                    // canvas y grows upwards
                    let bottom = height - (y as f64 + monitor.height as f64);
                    ctx.draw(&Rectangle {
                        x: x as f64,
                        y: bottom,
                        width: monitor.width as f64,
                        height: monitor.height as f64,
                        color,
                    });

                    let marker = if self.assignment.get(&monitor.name).is_some() {
                        "■"
                    } else {
                        "□"
                    };
                    ctx.print(
                        x as f64 + monitor.width as f64 * 0.1,
                        bottom + monitor.height as f64 * 0.5,
                        Line::from(vec![
                            Span::styled(marker, Style::default().fg(color)),
                            Span::styled(
                                format!(" {}", monitor.name),
                                Style::default().fg(theme.text_primary),
                            ),
                        ]),
                    );
                }
            });

        canvas.render(area, buf);
    }
}
