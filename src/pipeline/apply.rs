// Query -> compose -> write -> apply, as one unit of work

use std::path::PathBuf;

use super::compositor::{ComposeOptions, compose, write_canvas};
use super::desktop::WallpaperApplier;
use super::fs_ops::find_on_path;
use super::xrandr::MonitorProvider;
use crate::error::{Result, WallpaperError};
use crate::model::assignment::Assignment;

#[derive(Debug, Clone)]
pub struct ApplyRequest {
    pub assignment: Assignment,
    pub options: ComposeOptions,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub monitors: usize,
}

/// Fails early if either external program is missing.
pub fn preflight(provider: &dyn MonitorProvider, applier: &dyn WallpaperApplier) -> Result<()> {
    let tool = provider.required_tool();
    if find_on_path(tool).is_none() {
        return Err(WallpaperError::DisplayQuery(format!("'{}' not found on PATH", tool)));
    }

    let tool = applier.required_tool();
    if find_on_path(tool).is_none() {
        return Err(WallpaperError::Apply(format!("'{}' not found on PATH", tool)));
    }
    Ok(())
}

pub fn apply_wallpaper<F>(
    provider: &dyn MonitorProvider,
    applier: &dyn WallpaperApplier,
    request: &ApplyRequest,
    mut log: F,
) -> Result<ApplyReport>
where
    F: FnMut(String),
{
    preflight(provider, applier)?;

    let layout = provider.query()?;
    log(format!("Detected {} monitor(s)", layout.monitors.len()));
    for monitor in &layout.monitors {
        log(format!("  {}", monitor));
    }

    for name in request.assignment.stale_names(&layout.monitors) {
        tracing::warn!(monitor = name, "ignoring image for disconnected monitor");
        log(format!("Warning: {} is no longer connected, its image is ignored", name));
    }

    let canvas = compose(&layout.monitors, &request.assignment, &request.options)?;
    let (width, height) = canvas.dimensions();
    log(format!("Composed {}x{} canvas", width, height));

    if let Some((sw, sh)) = layout.screen_size
        && (sw, sh) != (width, height)
    {
        tracing::warn!(sw, sh, width, height, "screen size differs from monitor bounds");
        log(format!(
            "Warning: X screen is {}x{} but monitors span {}x{}",
            sw, sh, width, height
        ));
    }

    write_canvas(&canvas, &request.output_path, request.options.jpeg_quality)?;
    log(format!("Saved {}", request.output_path.display()));

    applier.apply(&request.output_path)?;
    log("Background applied successfully".to_string());

    Ok(ApplyReport {
        output_path: request.output_path.clone(),
        width,
        height,
        monitors: layout.monitors.len(),
    })
}
