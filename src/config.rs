use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::assignment::UnassignedPolicy;
use crate::pipeline::compositor::{ComposeOptions, ResizeFilter, ScalingMode};
use crate::pipeline::desktop::DesktopChoice;
use crate::widgets::theme::ThemeChoice;

const APP_DIR: &str = "multiwall";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_path: PathBuf,
    pub scaling: ScalingMode,
    pub unassigned: UnassignedPolicy,
    pub filter: ResizeFilter,
    pub gap_color: [u8; 3],
    pub fill_color: [u8; 3],
    pub jpeg_quality: u8,
    pub desktop: DesktopChoice,
    pub theme: ThemeChoice,
    pub thread_count: usize,
    pub start_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            scaling: ScalingMode::Stretch,
            unassigned: UnassignedPolicy::Blank,
            filter: ResizeFilter::Lanczos3,
            gap_color: [0, 0, 0],
            fill_color: [0, 0, 0],
            jpeg_quality: 95,
            desktop: DesktopChoice::Auto,
            theme: ThemeChoice::Auto,
            thread_count: 0,
            start_dir: None,
            log_dir: None,
        }
    }
}

fn default_output_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cinnamon/backgrounds/multiMonitorBackground.jpg")
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Reads the user's config file; a missing file means defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(s)?;
        config.jpeg_quality = config.jpeg_quality.clamp(1, 100);
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn compose_options(&self) -> ComposeOptions {
        ComposeOptions::new()
            .with_scaling(self.scaling)
            .with_unassigned(self.unassigned)
            .with_filter(self.filter)
            .with_colors(self.gap_color, self.fill_color)
            .with_jpeg_quality(self.jpeg_quality)
            .with_threads(self.thread_count)
    }

    pub fn resolved_log_dir(&self) -> Option<PathBuf> {
        self.log_dir.clone().or_else(|| {
            dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .map(|dir| dir.join(APP_DIR))
        })
    }

    pub fn resolved_start_dir(&self) -> PathBuf {
        self.start_dir
            .clone()
            .or_else(dirs::picture_dir)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.output_path.ends_with("multiMonitorBackground.jpg"));
    }

    #[test]
    fn test_partial_file_overrides_fields() {
        let config = Config::from_toml_str(
            r#"
output_path = "/tmp/wall.png"
scaling = "fill"
unassigned = "repeat"
filter = "catmull-rom"
desktop = "gnome"
theme = "light"
jpeg_quality = 250
fill_color = [10, 20, 30]
"#,
        )
        .unwrap();

        assert_eq!(config.output_path, PathBuf::from("/tmp/wall.png"));
        assert_eq!(config.scaling, ScalingMode::Fill);
        assert_eq!(config.unassigned, UnassignedPolicy::Repeat);
        assert_eq!(config.filter, ResizeFilter::CatmullRom);
        assert_eq!(config.desktop, DesktopChoice::Gnome);
        assert_eq!(config.theme, ThemeChoice::Light);
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.compose_options().fill_color, [10, 20, 30]);
        assert_eq!(config.thread_count, 0);
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        assert!(Config::from_toml_str(r#"scaling = "tile""#).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            unassigned: UnassignedPolicy::Abort,
            start_dir: Some(PathBuf::from("/srv/walls")),
            ..Config::default()
        };

        fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(Config::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = Config::load_from_file("/nonexistent/multiwall.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("failed to read config"));
    }
}
