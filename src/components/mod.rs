use crate::event::AppMsg;
use ratatui::{buffer::Buffer, layout::Rect};

pub mod file_browser;
pub mod layout_view;
pub mod logs;
pub mod monitor_list;
pub mod preview;
pub mod status;

pub trait Component {
    fn update(&mut self, msg: &AppMsg) -> Option<AppMsg>;

    fn render(&mut self, area: Rect, buf: &mut Buffer, is_focused: bool);
}
