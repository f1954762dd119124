// Desktop background setters driven through `gsettings`

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

use crate::error::{Result, WallpaperError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DesktopKind {
    Cinnamon,
    Gnome,
    Unknown,
}

impl DesktopKind {
    pub fn detect() -> Self {
        let desktop = std::env::var("XDG_CURRENT_DESKTOP").unwrap_or_default();
        Self::from_xdg(&desktop)
    }

    pub fn from_xdg(value: &str) -> Self {
        let value = value.to_lowercase();
        if value.contains("cinnamon") {
            DesktopKind::Cinnamon
        } else if value.contains("gnome") || value.contains("ubuntu") {
            DesktopKind::Gnome
        } else {
            DesktopKind::Unknown
        }
    }

    pub fn schema(self) -> &'static str {
        match self {
            DesktopKind::Gnome => "org.gnome.desktop.background",
            DesktopKind::Cinnamon | DesktopKind::Unknown => "org.cinnamon.desktop.background",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DesktopKind::Cinnamon => "Cinnamon",
            DesktopKind::Gnome => "GNOME",
            DesktopKind::Unknown => "unknown (Cinnamon schema)",
        }
    }
}

/// Desktop selection from the config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesktopChoice {
    #[default]
    Auto,
    Cinnamon,
    Gnome,
}

impl DesktopChoice {
    pub fn resolve(self) -> DesktopKind {
        match self {
            DesktopChoice::Auto => DesktopKind::detect(),
            DesktopChoice::Cinnamon => DesktopKind::Cinnamon,
            DesktopChoice::Gnome => DesktopKind::Gnome,
        }
    }
}

pub trait WallpaperApplier {
    fn required_tool(&self) -> &str;

    fn apply(&self, image: &Path) -> Result<()>;
}

pub struct Gsettings {
    program: String,
    args: Vec<String>,
    desktop: DesktopKind,
}

impl Gsettings {
    pub fn new(desktop: DesktopKind) -> Self {
        Self {
            program: "gsettings".to_string(),
            args: Vec::new(),
            desktop,
        }
    }

    /// Runs `program args.. set <schema> <key> <value>` for every write.
    pub fn with_command(mut self, program: impl Into<String>, args: &[&str]) -> Self {
        self.program = program.into();
        self.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let schema = self.desktop.schema();
        let status = Command::new(&self.program)
            .args(&self.args)
            .args(["set", schema, key, value])
            .status()
            .map_err(|e| WallpaperError::Apply(format!("failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            return Err(WallpaperError::Apply(format!(
                "{} set {} {} exited with {}",
                self.program, schema, key, status
            )));
        }
        Ok(())
    }
}

impl WallpaperApplier for Gsettings {
    fn required_tool(&self) -> &str {
        &self.program
    }

    fn apply(&self, image: &Path) -> Result<()> {
        let uri = file_uri(image)?;

        self.set("picture-uri", &uri)?;
        self.set("picture-options", "spanned")?;

        match self.desktop {
            DesktopKind::Gnome => {
                // Only exists on GNOME 42+.
                if let Err(e) = self.set("picture-uri-dark", &uri) {
                    tracing::debug!("skipping picture-uri-dark: {}", e);
                }
            }
            DesktopKind::Cinnamon => {
                // Cinnamon ignores a write of the same URI; bounce it.
                self.set("picture-uri", "''")?;
                self.set("picture-uri", &uri)?;
            }
            DesktopKind::Unknown => {}
        }

        tracing::info!(desktop = self.desktop.name(), %uri, "wallpaper applied");
        Ok(())
    }
}

pub fn file_uri(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)
        .map_err(|e| WallpaperError::Apply(format!("cannot resolve {}: {}", path.display(), e)))?;
    let s = absolute
        .to_str()
        .ok_or_else(|| WallpaperError::Apply("path is not valid UTF-8".to_string()))?;
    Ok(format!("file://{s}"))
}

/// Asks GNOME settings whether the user prefers a dark color scheme.
pub fn prefers_dark_scheme() -> bool {
    Command::new("gsettings")
        .args(["get", "org.gnome.desktop.interface", "color-scheme"])
        .output()
        .map(|out| String::from_utf8_lossy(&out.stdout).to_lowercase().contains("dark"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Applies through `sh`, recording each `set` call one per line. Writes
    /// of `fail_key` exit 1 without being recorded.
    fn recorded_calls(desktop: DesktopKind, fail_key: &str) -> (Result<()>, Vec<String>) {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.txt");
        let script = format!(
            "[ \"$3\" = '{}' ] && exit 1; echo \"$*\" >> '{}'",
            fail_key,
            log.display()
        );
        let gsettings = Gsettings::new(desktop).with_command("sh", &["-c", &script, "gsettings"]);

        let result = gsettings.apply(Path::new("/tmp/bg.jpg"));
        let calls = std::fs::read_to_string(&log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect();
        (result, calls)
    }

    #[test]
    fn test_detect_from_xdg_value() {
        assert_eq!(DesktopKind::from_xdg("X-Cinnamon"), DesktopKind::Cinnamon);
        assert_eq!(DesktopKind::from_xdg("ubuntu:GNOME"), DesktopKind::Gnome);
        assert_eq!(DesktopKind::from_xdg("GNOME"), DesktopKind::Gnome);
        assert_eq!(DesktopKind::from_xdg("KDE"), DesktopKind::Unknown);
        assert_eq!(DesktopKind::from_xdg(""), DesktopKind::Unknown);
    }

    #[test]
    fn test_unknown_desktop_uses_cinnamon_schema() {
        assert_eq!(DesktopKind::Unknown.schema(), DesktopKind::Cinnamon.schema());
        assert_eq!(DesktopKind::Gnome.schema(), "org.gnome.desktop.background");
    }

    #[test]
    fn test_file_uri_is_absolute() {
        let uri = file_uri(Path::new("/home/user/bg.jpg")).unwrap();
        assert_eq!(uri, "file:///home/user/bg.jpg");

        let relative = file_uri(Path::new("bg.jpg")).unwrap();
        assert!(relative.starts_with("file:///"));
        assert!(relative.ends_with("/bg.jpg"));
    }

    #[test]
    fn test_apply_checks_exit_status() {
        let ok = Gsettings::new(DesktopKind::Cinnamon).with_command("true", &[]);
        assert!(ok.apply(Path::new("/tmp/bg.jpg")).is_ok());

        let failing = Gsettings::new(DesktopKind::Gnome).with_command("false", &[]);
        let err = failing.apply(Path::new("/tmp/bg.jpg")).unwrap_err();
        assert!(matches!(err, WallpaperError::Apply(ref msg) if msg.contains("picture-uri")));

        let missing =
            Gsettings::new(DesktopKind::Gnome).with_command("multiwall-no-such-gsettings", &[]);
        assert!(matches!(
            missing.apply(Path::new("/tmp/bg.jpg")),
            Err(WallpaperError::Apply(_))
        ));
    }

    #[test]
    fn test_cinnamon_spans_and_refreshes_uri() {
        let (result, calls) = recorded_calls(DesktopKind::Cinnamon, "");
        assert!(result.is_ok());
        let schema = "org.cinnamon.desktop.background";
        assert_eq!(
            calls,
            vec![
                format!("set {schema} picture-uri file:///tmp/bg.jpg"),
                format!("set {schema} picture-options spanned"),
                format!("set {schema} picture-uri ''"),
                format!("set {schema} picture-uri file:///tmp/bg.jpg"),
            ]
        );
    }

    #[test]
    fn test_gnome_sets_dark_uri_too() {
        let (result, calls) = recorded_calls(DesktopKind::Gnome, "");
        assert!(result.is_ok());
        let schema = "org.gnome.desktop.background";
        assert_eq!(
            calls,
            vec![
                format!("set {schema} picture-uri file:///tmp/bg.jpg"),
                format!("set {schema} picture-options spanned"),
                format!("set {schema} picture-uri-dark file:///tmp/bg.jpg"),
            ]
        );
    }

    #[test]
    fn test_gnome_without_dark_key_still_succeeds() {
        let (result, calls) = recorded_calls(DesktopKind::Gnome, "picture-uri-dark");
        assert!(result.is_ok());
        assert_eq!(calls.len(), 2);
        assert!(calls[1].ends_with("picture-options spanned"));
    }

    #[test]
    fn test_unknown_desktop_uses_cinnamon_schema_without_refresh() {
        let (result, calls) = recorded_calls(DesktopKind::Unknown, "");
        assert!(result.is_ok());
        assert_eq!(
            calls,
            vec![
                "set org.cinnamon.desktop.background picture-uri file:///tmp/bg.jpg".to_string(),
                "set org.cinnamon.desktop.background picture-options spanned".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_picture_options_stops_apply() {
        let (result, calls) = recorded_calls(DesktopKind::Cinnamon, "picture-options");
        assert!(matches!(
            result,
            Err(WallpaperError::Apply(ref msg)) if msg.contains("picture-options")
        ));
        assert_eq!(calls.len(), 1);
    }
}
