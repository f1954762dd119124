// Per-monitor images -> one virtual desktop sized canvas

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::fs_ops::ensure_dir;
use crate::error::{Result, WallpaperError};
use crate::model::assignment::{Assignment, UnassignedPolicy};
use crate::model::monitor::{CanvasBounds, Monitor};

/// How a source image is fitted into its monitor rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScalingMode {
    /// Exact resize to the monitor size; aspect ratio is not kept.
    #[default]
    Stretch,
    /// Whole image visible, centered, remaining area in the fill color.
    Fit,
    /// Monitor fully covered, overflow cropped from the center.
    Fill,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComposeOptions {
    pub scaling: ScalingMode,
    pub unassigned: UnassignedPolicy,
    pub filter: ResizeFilter,
    /// Canvas area not covered by any monitor.
    pub gap_color: [u8; 3],
    /// Unassigned monitors and letterbox bars.
    pub fill_color: [u8; 3],
    pub jpeg_quality: u8,
    /// 0 lets rayon decide.
    pub thread_count: usize,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            scaling: ScalingMode::Stretch,
            unassigned: UnassignedPolicy::Blank,
            filter: ResizeFilter::Lanczos3,
            gap_color: [0, 0, 0],
            fill_color: [0, 0, 0],
            jpeg_quality: 95,
            thread_count: 0,
        }
    }
}

impl ComposeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scaling(mut self, scaling: ScalingMode) -> Self {
        self.scaling = scaling;
        self
    }

    pub fn with_unassigned(mut self, policy: UnassignedPolicy) -> Self {
        self.unassigned = policy;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_colors(mut self, gap: [u8; 3], fill: [u8; 3]) -> Self {
        self.gap_color = gap;
        self.fill_color = fill;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_threads(mut self, count: usize) -> Self {
        self.thread_count = count;
        self
    }
}

/// Builds the full canvas in memory. Nothing touches the disk here, so a bad
/// input never clobbers a previously written background.
pub fn compose(
    monitors: &[Monitor],
    assignment: &Assignment,
    options: &ComposeOptions,
) -> Result<RgbImage> {
    let bounds = CanvasBounds::of(monitors)?;
    let sources = assignment.resolve(monitors, options.unassigned)?;
    let tiles = render_tiles(monitors, &sources, options)?;

    let mut canvas = RgbImage::from_pixel(bounds.width, bounds.height, Rgb(options.gap_color));
    for (monitor, tile) in monitors.iter().zip(tiles) {
        let (x, y) = bounds.local_origin(monitor);
        match tile {
            Some(tile) => imageops::replace(&mut canvas, &tile, x as i64, y as i64),
            None => draw_filled_rect_mut(
                &mut canvas,
                Rect::at(x as i32, y as i32).of_size(monitor.width, monitor.height),
                Rgb(options.fill_color),
            ),
        }
    }

    Ok(canvas)
}

fn render_tiles(
    monitors: &[Monitor],
    sources: &[Option<PathBuf>],
    options: &ComposeOptions,
) -> Result<Vec<Option<RgbImage>>> {
    let work = || {
        monitors
            .par_iter()
            .zip(sources.par_iter())
            .map(|(monitor, source)| {
                source
                    .as_deref()
                    .map(|path| -> Result<RgbImage> {
                        let image = decode(path)?;
                        tracing::debug!(
                            monitor = %monitor.name,
                            source = %path.display(),
                            "resizing {}x{} -> {}x{}",
                            image.width(),
                            image.height(),
                            monitor.width,
                            monitor.height
                        );
                        Ok(render_tile(&image, monitor.width, monitor.height, options))
                    })
                    .transpose()
            })
            .collect::<Result<Vec<_>>>()
    };

    match rayon::ThreadPoolBuilder::new()
        .num_threads(options.thread_count)
        .build()
    {
        Ok(pool) => pool.install(work),
        Err(e) => {
            tracing::warn!("falling back to the global thread pool: {}", e);
            work()
        }
    }
}

pub fn decode(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.decode())
        .map_err(|source| WallpaperError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })
}

/// Produces an image of exactly `width` x `height`.
pub fn render_tile(
    image: &DynamicImage,
    width: u32,
    height: u32,
    options: &ComposeOptions,
) -> RgbImage {
    let filter = FilterType::from(options.filter);
    match options.scaling {
        ScalingMode::Stretch => image.resize_exact(width, height, filter).into_rgb8(),
        ScalingMode::Fill => image.resize_to_fill(width, height, filter).into_rgb8(),
        ScalingMode::Fit => {
            let scaled = image.resize(width, height, filter).into_rgb8();
            let mut tile = RgbImage::from_pixel(width, height, Rgb(options.fill_color));
            let x = width.saturating_sub(scaled.width()) / 2;
            let y = height.saturating_sub(scaled.height()) / 2;
            imageops::replace(&mut tile, &scaled, x as i64, y as i64);
            tile
        }
    }
}

/// Encodes `canvas` next to `path` and renames it into place.
pub fn write_canvas(canvas: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    ensure_dir(dir).map_err(|e| WallpaperError::io(dir, e))?;

    let format = ImageFormat::from_path(path).map_err(|e| {
        WallpaperError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| WallpaperError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let encoded = match format {
            ImageFormat::Jpeg => {
                canvas.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, jpeg_quality))
            }
            other => canvas.write_to(&mut writer, other),
        };
        encoded.map_err(|e| WallpaperError::io(path, std::io::Error::other(e)))?;
        writer.flush().map_err(|e| WallpaperError::io(path, e))?;
    }

    keep_permissions(tmp.as_file(), path).map_err(|e| WallpaperError::io(path, e))?;
    tmp.persist(path).map_err(|e| WallpaperError::io(path, e.error))?;
    Ok(())
}

/// Temp files are created 0600. The replacement takes the target's mode, or
/// 0644 when the target is new.
#[cfg(unix)]
fn keep_permissions(tmp: &std::fs::File, target: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = match std::fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(_) => std::fs::Permissions::from_mode(0o644),
    };
    tmp.set_permissions(permissions)
}

#[cfg(not(unix))]
fn keep_permissions(_tmp: &std::fs::File, _target: &Path) -> std::io::Result<()> {
    Ok(())
}
