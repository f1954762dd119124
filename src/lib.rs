// Library exports for multiwall

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod pipeline_worker;
pub mod widgets;

pub use error::WallpaperError;
pub use model::{assignment::Assignment, monitor::Monitor};
pub use pipeline::{
    apply::{ApplyReport, ApplyRequest, apply_wallpaper},
    compositor::{ComposeOptions, compose, write_canvas},
};
