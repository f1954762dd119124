use crate::error::{Result, WallpaperError};
use std::fmt;

/// One output as reported by the display server, in virtual desktop pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monitor {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub primary: bool,
}

impl Monitor {
    pub fn new(name: impl Into<String>, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            width,
            height,
            primary: false,
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// `WxH+X+Y`, the way xrandr prints it.
    pub fn geometry_string(&self) -> String {
        format!(
            "{}x{}{:+}{:+}",
            self.width, self.height, self.x, self.y
        )
    }
}

impl fmt::Display for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.geometry_string())?;
        if self.primary {
            write!(f, " primary")?;
        }
        Ok(())
    }
}

/// Smallest rectangle containing every monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanvasBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub width: u32,
    pub height: u32,
}

impl CanvasBounds {
    pub fn of(monitors: &[Monitor]) -> Result<Self> {
        if monitors.is_empty() {
            return Err(WallpaperError::Geometry("no monitors to compose".to_string()));
        }

        if let Some(bad) = monitors.iter().find(|m| m.width == 0 || m.height == 0) {
            return Err(WallpaperError::Geometry(format!(
                "monitor {} has non-positive size {}x{}",
                bad.name, bad.width, bad.height
            )));
        }

        let min_x = monitors.iter().map(|m| m.x).min().unwrap_or(0);
        let min_y = monitors.iter().map(|m| m.y).min().unwrap_or(0);
        let max_x = monitors.iter().map(Monitor::right).max().unwrap_or(0);
        let max_y = monitors.iter().map(Monitor::bottom).max().unwrap_or(0);

        let width = u32::try_from(max_x - min_x as i64)
            .map_err(|_| WallpaperError::Geometry("virtual desktop is too wide".to_string()))?;
        let height = u32::try_from(max_y - min_y as i64)
            .map_err(|_| WallpaperError::Geometry("virtual desktop is too tall".to_string()))?;

        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    /// Canvas-local offset of a monitor's top-left corner.
    pub fn local_origin(&self, monitor: &Monitor) -> (u32, u32) {
        (
            (monitor.x as i64 - self.min_x as i64) as u32,
            (monitor.y as i64 - self.min_y as i64) as u32,
        )
    }
}
