use super::Component;
use crate::event::AppMsg;
use crate::pipeline::compositor::decode;
use crate::widgets::common::{file_label, focused_block};
use crate::widgets::theme::get_theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, StatefulWidget, Widget, Wrap},
};
use ratatui_image::{StatefulImage, picker::Picker, protocol::StatefulProtocol};
use std::path::PathBuf;

/// Largest edge handed to the terminal graphics encoder.
const PREVIEW_MAX_EDGE: u32 = 1024;

pub struct PreviewState {
    picker: Option<Picker>,
    protocol: Option<StatefulProtocol>,
    pub current: Option<PathBuf>,
    pub dimensions: Option<(u32, u32)>,
    pub error: Option<String>,
}

impl PreviewState {
    pub fn new(picker: Option<Picker>) -> Self {
        Self {
            picker,
            protocol: None,
            current: None,
            dimensions: None,
            error: None,
        }
    }

    /// Switches the preview to `path`, decoding it only when it changed.
    pub fn show(&mut self, path: Option<PathBuf>) {
        if path == self.current {
            return;
        }
        self.current = path;
        self.protocol = None;
        self.dimensions = None;
        self.error = None;

        let Some(path) = self.current.as_deref() else {
            return;
        };

        match decode(path) {
            Ok(image) => {
                self.dimensions = Some((image.width(), image.height()));
                if let Some(picker) = self.picker.as_mut() {
                    let thumb = image.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE);
                    self.protocol = Some(picker.new_resize_protocol(thumb));
                }
            }
            Err(e) => {
                tracing::warn!("preview failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }
}

impl Component for PreviewState {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg> {
        if let AppMsg::CancelRequested = msg {
            self.show(None);
        }
        None
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool) {
        let theme = get_theme();
        let block = focused_block("Preview", is_focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let [info_area, image_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

        let Some(path) = self.current.as_deref() else {
            Paragraph::new("No image selected for this monitor")
                .style(Style::default().fg(theme.text_secondary))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        };

        if let Some(err) = &self.error {
            Paragraph::new(vec![
                Line::from(file_label(path)),
                Line::from(Span::styled(err.clone(), Style::default().fg(theme.status_failed))),
            ])
            .wrap(Wrap { trim: true })
            .render(inner, buf);
            return;
        }

        let size = self
            .dimensions
            .map(|(w, h)| format!("  {}x{}", w, h))
            .unwrap_or_default();
        Line::from(vec![
            Span::styled(file_label(path), Style::default().fg(theme.text_primary)),
            Span::styled(size, Style::default().fg(theme.text_secondary)),
        ])
        .render(info_area, buf);

        if let Some(protocol) = self.protocol.as_mut() {
            StatefulWidget::render(StatefulImage::default(), image_area, buf, protocol);
        }
    }
}
