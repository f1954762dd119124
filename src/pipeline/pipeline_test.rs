// Integration test for the query -> compose -> write -> apply pipeline

#[cfg(test)]
mod tests {
    use crate::error::{Result, WallpaperError};
    use crate::model::assignment::{Assignment, UnassignedPolicy};
    use crate::model::monitor::Monitor;
    use crate::pipeline::apply::{ApplyRequest, apply_wallpaper};
    use crate::pipeline::compositor::{ComposeOptions, ResizeFilter};
    use crate::pipeline::desktop::WallpaperApplier;
    use crate::pipeline::xrandr::{DisplayLayout, MonitorProvider};
    use image::{Rgb, RgbImage};
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct FixedLayout(DisplayLayout);

    impl MonitorProvider for FixedLayout {
        fn required_tool(&self) -> &str {
            "sh"
        }

        fn query(&self) -> Result<DisplayLayout> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingApplier {
        applied: RefCell<Vec<PathBuf>>,
        fail: bool,
    }

    impl WallpaperApplier for RecordingApplier {
        fn required_tool(&self) -> &str {
            "sh"
        }

        fn apply(&self, image: &Path) -> Result<()> {
            if self.fail {
                return Err(WallpaperError::Apply("gsettings exited with 1".to_string()));
            }
            self.applied.borrow_mut().push(image.to_path_buf());
            Ok(())
        }
    }

    fn two_monitors() -> DisplayLayout {
        DisplayLayout {
            monitors: vec![
                Monitor::new("DP-1", 0, 0, 320, 180).with_primary(true),
                Monitor::new("DP-2", 320, 0, 180, 320),
            ],
            screen_size: Some((500, 320)),
        }
    }

    fn solid(dir: &Path, name: &str, color: [u8; 3]) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(32, 24, Rgb(color)).save(&path).unwrap();
        path
    }

    fn request(dir: &Path, output: &str) -> ApplyRequest {
        let mut assignment = Assignment::new();
        assignment.set("DP-1", solid(dir, "red.png", [255, 0, 0]));
        assignment.set("DP-2", solid(dir, "blue.png", [0, 0, 255]));
        ApplyRequest {
            assignment,
            options: ComposeOptions::new().with_filter(ResizeFilter::Nearest),
            output_path: dir.join(output),
        }
    }

    #[test]
    fn test_full_pipeline_writes_and_applies() {
        let dir = tempdir().unwrap();
        let request = request(dir.path(), "out/background.png");
        let applier = RecordingApplier::default();
        let mut lines = Vec::new();

        let report = apply_wallpaper(&FixedLayout(two_monitors()), &applier, &request, |l| {
            lines.push(l)
        })
        .unwrap();

        assert_eq!((report.width, report.height), (500, 320));
        assert_eq!(report.monitors, 2);
        assert_eq!(applier.applied.borrow().as_slice(), &[request.output_path.clone()]);

        let written = image::open(&request.output_path).unwrap().into_rgb8();
        assert_eq!(written.dimensions(), (500, 320));
        assert_eq!(written.get_pixel(319, 179).0, [255, 0, 0]);
        assert_eq!(written.get_pixel(320, 319).0, [0, 0, 255]);

        assert!(lines.iter().any(|l| l.contains("Detected 2 monitor")));
        assert!(!lines.iter().any(|l| l.starts_with("Warning")));
    }

    #[test]
    fn test_apply_twice_is_byte_identical() {
        let dir = tempdir().unwrap();
        let request = request(dir.path(), "background.jpg");
        let applier = RecordingApplier::default();
        let provider = FixedLayout(two_monitors());

        apply_wallpaper(&provider, &applier, &request, |_| {}).unwrap();
        let first = std::fs::read(&request.output_path).unwrap();
        apply_wallpaper(&provider, &applier, &request, |_| {}).unwrap();
        let second = std::fs::read(&request.output_path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_bad_image_leaves_previous_output_untouched() {
        let dir = tempdir().unwrap();
        let mut request = request(dir.path(), "background.png");
        std::fs::write(&request.output_path, b"previous background").unwrap();

        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"\xff\xd8 truncated").unwrap();
        request.assignment.set("DP-2", &broken);

        let applier = RecordingApplier::default();
        let err = apply_wallpaper(&FixedLayout(two_monitors()), &applier, &request, |_| {})
            .unwrap_err();

        assert!(matches!(err, WallpaperError::ImageDecode { .. }));
        assert_eq!(std::fs::read(&request.output_path).unwrap(), b"previous background");
        assert!(applier.applied.borrow().is_empty());
    }

    #[test]
    fn test_empty_layout_writes_nothing() {
        let dir = tempdir().unwrap();
        let request = request(dir.path(), "background.png");
        let provider = FixedLayout(DisplayLayout::default());

        let err = apply_wallpaper(&provider, &RecordingApplier::default(), &request, |_| {})
            .unwrap_err();

        assert!(matches!(err, WallpaperError::Geometry(_)));
        assert!(!request.output_path.exists());
    }

    #[test]
    fn test_applier_failure_is_reported() {
        let dir = tempdir().unwrap();
        let request = request(dir.path(), "background.png");
        let applier = RecordingApplier {
            fail: true,
            ..Default::default()
        };

        let err = apply_wallpaper(&FixedLayout(two_monitors()), &applier, &request, |_| {})
            .unwrap_err();
        assert!(matches!(err, WallpaperError::Apply(_)));
    }

    #[test]
    fn test_stale_assignment_and_screen_mismatch_are_warnings() {
        let dir = tempdir().unwrap();
        let mut request = request(dir.path(), "background.png");
        request.assignment.set("HDMI-1", dir.path().join("red.png"));
        request.options = request.options.clone().with_unassigned(UnassignedPolicy::Abort);

        let mut layout = two_monitors();
        layout.screen_size = Some((1920, 1080));

        let mut lines = Vec::new();
        apply_wallpaper(&FixedLayout(layout), &RecordingApplier::default(), &request, |l| {
            lines.push(l)
        })
        .unwrap();

        assert!(lines.iter().any(|l| l.contains("HDMI-1 is no longer connected")));
        assert!(lines.iter().any(|l| l.contains("X screen is 1920x1080")));
    }

    #[test]
    fn test_missing_tool_fails_before_query() {
        struct MissingTool;

        impl MonitorProvider for MissingTool {
            fn required_tool(&self) -> &str {
                "multiwall-no-such-xrandr"
            }

            fn query(&self) -> Result<DisplayLayout> {
                panic!("query must not run when the tool is missing");
            }
        }

        let dir = tempdir().unwrap();
        let request = request(dir.path(), "background.png");
        let err = apply_wallpaper(&MissingTool, &RecordingApplier::default(), &request, |_| {})
            .unwrap_err();
        assert!(matches!(err, WallpaperError::DisplayQuery(ref msg) if msg.contains("not found")));
    }
}
