// Monitor geometry from `xrandr --query`

use std::process::Command;

use crate::error::{Result, WallpaperError};
use crate::model::monitor::Monitor;

/// Current arrangement of outputs plus the X screen size, when reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DisplayLayout {
    pub monitors: Vec<Monitor>,
    pub screen_size: Option<(u32, u32)>,
}

pub trait MonitorProvider {
    /// Program that must be on `PATH` for `query` to work.
    fn required_tool(&self) -> &str;

    fn query(&self) -> Result<DisplayLayout>;
}

pub struct Xrandr {
    program: String,
    args: Vec<String>,
}

impl Default for Xrandr {
    fn default() -> Self {
        Self {
            program: "xrandr".to_string(),
            args: vec!["--query".to_string()],
        }
    }
}

impl Xrandr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, program: impl Into<String>, args: &[&str]) -> Self {
        self.program = program.into();
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }
}

impl MonitorProvider for Xrandr {
    fn required_tool(&self) -> &str {
        &self.program
    }

    fn query(&self) -> Result<DisplayLayout> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| {
                WallpaperError::DisplayQuery(format!("failed to run {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(WallpaperError::DisplayQuery(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let layout = parse_layout(&stdout);
        if layout.monitors.is_empty() {
            return Err(WallpaperError::DisplayQuery(
                "no connected monitors reported".to_string(),
            ));
        }

        tracing::debug!(count = layout.monitors.len(), "parsed xrandr output");
        Ok(layout)
    }
}

pub fn parse_layout(output: &str) -> DisplayLayout {
    DisplayLayout {
        monitors: parse_monitors(output),
        screen_size: output.lines().find_map(parse_screen_size),
    }
}

/// Connected, enabled outputs sorted left to right, then top to bottom.
pub fn parse_monitors(output: &str) -> Vec<Monitor> {
    let mut monitors: Vec<Monitor> = output.lines().filter_map(parse_output_line).collect();
    monitors.sort_by_key(|m| (m.x, m.y));
    monitors
}

fn parse_output_line(line: &str) -> Option<Monitor> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?;
    if parts.next()? != "connected" {
        return None;
    }

    let mut token = parts.next()?;
    let primary = token == "primary";
    if primary {
        token = parts.next()?;
    }

    let (width, height, x, y) = parse_geometry(token)?;
    Some(Monitor::new(name, x, y, width, height).with_primary(primary))
}

/// Parses `WxH+X+Y`; either offset may carry a `-` sign.
pub fn parse_geometry(token: &str) -> Option<(u32, u32, i32, i32)> {
    let (width, rest) = token.split_once('x')?;
    let (height, offsets) = rest.split_at(rest.find(['+', '-'])?);
    let (x, y) = offsets.split_at(offsets[1..].find(['+', '-'])? + 1);

    Some((
        width.parse().ok()?,
        height.parse().ok()?,
        x.parse().ok()?,
        y.parse().ok()?,
    ))
}

/// `Screen 0: minimum 8 x 8, current 3000 x 1920, maximum ...`
fn parse_screen_size(line: &str) -> Option<(u32, u32)> {
    if !line.starts_with("Screen ") {
        return None;
    }
    let current = line.split("current ").nth(1)?.split(',').next()?;
    let mut parts = current.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    if parts.next()? != "x" {
        return None;
    }
    let height = parts.next()?.parse().ok()?;
    Some((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Screen 0: minimum 8 x 8, current 3000 x 1920, maximum 32767 x 32767
DP-2 connected 1080x1920+1920+0 left (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+  74.97
DP-1 connected primary 1920x1080+0+0 (normal left inverted right x axis y axis) 527mm x 296mm
   1920x1080     60.00*+
HDMI-1 disconnected (normal left inverted right x axis y axis)
DP-3 connected (normal left inverted right x axis y axis)
   2560x1440     59.95 +
";

    #[test]
    fn test_parse_sample_output() {
        let layout = parse_layout(SAMPLE);
        assert_eq!(layout.screen_size, Some((3000, 1920)));
        assert_eq!(
            layout.monitors,
            vec![
                Monitor::new("DP-1", 0, 0, 1920, 1080).with_primary(true),
                Monitor::new("DP-2", 1920, 0, 1080, 1920),
            ]
        );
    }

    #[test]
    fn test_parse_geometry_variants() {
        assert_eq!(parse_geometry("1920x1080+0+0"), Some((1920, 1080, 0, 0)));
        assert_eq!(parse_geometry("1920x1080-1920+0"), Some((1920, 1080, -1920, 0)));
        assert_eq!(parse_geometry("2560x1440+1920-200"), Some((2560, 1440, 1920, -200)));
        assert_eq!(parse_geometry("(normal"), None);
        assert_eq!(parse_geometry("1920x1080"), None);
        assert_eq!(parse_geometry("axb+0+0"), None);
    }

    #[test]
    fn test_disconnected_is_not_connected() {
        assert!(parse_output_line("HDMI-1 disconnected 1920x1080+0+0").is_none());
        assert!(parse_output_line("   1920x1080     60.00*+").is_none());
    }

    #[test]
    fn test_empty_output_yields_nothing() {
        let layout = parse_layout("");
        assert!(layout.monitors.is_empty());
        assert_eq!(layout.screen_size, None);
    }

    #[test]
    fn test_query_runs_command() {
        let script = format!("printf '%s' \"{}\"", SAMPLE.replace('"', "\\\""));
        let xrandr = Xrandr::new().with_command("sh", &["-c", &script]);
        let layout = xrandr.query().unwrap();
        assert_eq!(layout.monitors.len(), 2);
        assert_eq!(layout.monitors[1].name, "DP-2");
    }

    #[test]
    fn test_query_reports_failures() {
        let failing = Xrandr::new()
            .with_command("sh", &["-c", "echo 'Can'\\''t open display' >&2; exit 1"]);
        let err = failing.query().unwrap_err();
        assert!(matches!(
            err,
            WallpaperError::DisplayQuery(ref msg) if msg.contains("open display")
        ));

        let empty = Xrandr::new().with_command("sh", &["-c", "true"]);
        assert!(matches!(empty.query(), Err(WallpaperError::DisplayQuery(_))));

        let missing = Xrandr::new().with_command("multiwall-no-such-xrandr", &[]);
        assert!(matches!(missing.query(), Err(WallpaperError::DisplayQuery(_))));
    }
}
