use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between pressing Apply and the desktop
/// picking up the new background.
#[derive(Error, Debug)]
pub enum WallpaperError {
    #[error("Monitor query failed: {0}")]
    DisplayQuery(String),

    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid monitor geometry: {0}")]
    Geometry(String),

    #[error("No image selected for any monitor")]
    NothingAssigned,

    #[error("No image selected for monitor {0}")]
    MissingAssignment(String),

    #[error("Failed to write '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to apply wallpaper: {0}")]
    Apply(String),
}

impl WallpaperError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WallpaperError::Io {
            path: path.into(),
            source,
        }
    }

    /// Short category label shown as the popup title.
    pub fn kind(&self) -> &'static str {
        match self {
            WallpaperError::DisplayQuery(_) => "Display query error",
            WallpaperError::ImageDecode { .. } => "Image decode error",
            WallpaperError::Geometry(_) => "Geometry error",
            WallpaperError::NothingAssigned | WallpaperError::MissingAssignment(_) => {
                "Selection error"
            }
            WallpaperError::Io { .. } => "I/O error",
            WallpaperError::Apply(_) => "Apply error",
        }
    }
}

pub type Result<T> = std::result::Result<T, WallpaperError>;
