use crate::model::state::{ApplyStatus, Popup};
use crate::widgets::common::{centered_rect, file_label};
use crate::widgets::theme::get_theme;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget, Wrap},
};

const KEY_HINTS: &str =
    "Tab focus  Enter browse/pick  x clear  a apply  c cancel  r rescan  q quit";

pub fn render_status_bar(status: &ApplyStatus, area: Rect, buf: &mut Buffer) {
    let theme = get_theme();
    let (label, color) = match status {
        ApplyStatus::Idle => ("Idle".to_string(), theme.status_idle),
        ApplyStatus::Running => ("Applying...".to_string(), theme.status_running),
        ApplyStatus::Applied(path) => {
            (format!("Applied {}", file_label(path)), theme.status_completed)
        }
        ApplyStatus::Failed(_) => ("Failed".to_string(), theme.status_failed),
    };

    Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" {} ", label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.border_unfocused)),
        Span::styled(KEY_HINTS, Style::default().fg(theme.text_secondary)),
    ]))
    .render(area, buf);
}

/// Modal notification drawn over everything else.
pub fn render_popup(popup: &Popup, area: Rect, buf: &mut Buffer) {
    let theme = get_theme();
    let color = if popup.is_error {
        theme.status_failed
    } else {
        theme.status_completed
    };

    let width = area.width.saturating_sub(4).min(70);
    let text_width = width.saturating_sub(4).max(1) as usize;
    let body_lines = textwrap::wrap(&popup.message, text_width).len() as u16;
    let rect = centered_rect(area, width, body_lines + 4);

    Clear.render(rect, buf);

    let block = Block::default()
        .title(popup.title.as_str())
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(color));

    Paragraph::new(vec![
        Line::from(popup.message.as_str()),
        Line::from(""),
        Line::from(Span::styled(
            "Enter/Esc to dismiss",
            Style::default().fg(theme.text_secondary),
        )),
    ])
    .wrap(Wrap { trim: true })
    .alignment(Alignment::Center)
    .block(block)
    .render(rect, buf);
}
