use std::sync::{Arc, RwLock};
use std::time::Duration;

use ar_pointcloud_color::camera_model::CameraProjection;
use ar_pointcloud_color::config::{CaptureConfig, ColorizerConfig, PrefabConfig};
use ar_pointcloud_color::frame_source::{
    FrameEvent, FrameHandler, FrameSource, ImageFormat, ReplaySource,
};
use ar_pointcloud_color::io::{SnapshotWriter, StorageLocation};
use ar_pointcloud_color::types::{Rgba, ScreenOrientation};
use ar_pointcloud_color::{ColorizerError, PointCloudColorizer};
use glam::Vec3;
use tempfile::tempdir;

struct FlatCamera {
    width: u32,
    height: u32,
}

impl CameraProjection for FlatCamera {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        world
    }
    fn pixel_width(&self) -> u32 {
        self.width
    }
    fn pixel_height(&self) -> u32 {
        self.height
    }
}

fn config(pool_size: usize, downscale: u32) -> ColorizerConfig {
    ColorizerConfig {
        pool_size,
        downscale,
        ..Default::default()
    }
}

fn red_frame(buffer: &[u8]) -> FrameEvent<'_> {
    FrameEvent {
        format: ImageFormat::Color,
        width: 4,
        height: 2,
        buffer,
    }
}

#[test]
fn test_prefab_without_renderer_fails_at_init() {
    let prefab = PrefabConfig {
        name: "bare".to_string(),
        renderer: None,
    };
    let result =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 2, 4);
    assert!(matches!(result, Err(ColorizerError::MissingRenderer(name)) if name == "bare"));
}

#[test]
fn test_invalid_config_fails_at_init() {
    let prefab = PrefabConfig::default();
    let result =
        PointCloudColorizer::new(config(0, 1), &prefab, ScreenOrientation::Portrait, 2, 4);
    assert!(matches!(result, Err(ColorizerError::InvalidConfig(_))));
}

#[test]
fn test_portrait_red_single_point() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 4, 2)
            .unwrap();
    let raw: Vec<u8> = [255, 0, 0, 255].repeat(8);
    let points = vec![Vec3::new(0.0, 0.0, 1.0)];
    let cam = FlatCamera { width: 4, height: 2 };

    let in_view = colorizer.process_frame(&red_frame(&raw), &points, &cam);
    assert_eq!(in_view, Some(1));
    let snapshot = colorizer.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].color, Rgba::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(snapshot[0].position, points[0]);
}

/// 4x2 capture where pixel `i` in raster order has red `10 * i`.
fn indexed_frame() -> Vec<u8> {
    (0..8u8).flat_map(|i| [i * 10, 0, 0, 255]).collect()
}

fn red(v: u8) -> Rgba {
    Rgba::from_rgba8([v, 0, 0, 255])
}

#[test]
fn test_portrait_samples_transformed_index() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 2, 4)
            .unwrap();
    let raw = indexed_frame();
    // screen (0, 0) <- capture (3, 1); screen (1, 2) <- capture (1, 0)
    let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.5, 2.5, 1.0)];
    let cam = FlatCamera { width: 2, height: 4 };

    assert_eq!(colorizer.process_frame(&red_frame(&raw), &points, &cam), Some(2));
    let colors: Vec<Rgba> = colorizer.snapshot().iter().map(|r| r.color).collect();
    assert_eq!(colors, vec![red(70), red(10)]);
}

#[test]
fn test_landscape_right_samples_transformed_index() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::LandscapeRight, 4, 2)
            .unwrap();
    let raw = indexed_frame();
    // screen (0, 0) <- capture (3, 0); screen (2, 1) <- capture (1, 1)
    let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(2.5, 1.2, 1.0)];
    let cam = FlatCamera { width: 4, height: 2 };

    assert_eq!(colorizer.process_frame(&red_frame(&raw), &points, &cam), Some(2));
    let colors: Vec<Rgba> = colorizer.snapshot().iter().map(|r| r.color).collect();
    assert_eq!(colors, vec![red(30), red(50)]);
}

#[test]
fn test_rotation_applies_to_next_frame() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 2, 4)
            .unwrap();
    let raw = indexed_frame();
    let origin = vec![Vec3::new(0.0, 0.0, 1.0)];
    let portrait_cam = FlatCamera { width: 2, height: 4 };
    colorizer.process_frame(&red_frame(&raw), &origin, &portrait_cam);
    assert_eq!(colorizer.snapshot()[0].color, red(70));

    colorizer.set_orientation(ScreenOrientation::LandscapeLeft, 4);
    let landscape_cam = FlatCamera { width: 4, height: 2 };
    // screen (0, 0) <- capture (0, 1); screen (3, 0) <- capture (3, 1)
    let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(3.0, 0.0, 1.0)];
    assert_eq!(
        colorizer.process_frame(&red_frame(&raw), &points, &landscape_cam),
        Some(2)
    );
    let colors: Vec<Rgba> = colorizer.snapshot().iter().map(|r| r.color).collect();
    assert_eq!(colors, vec![red(40), red(70)]);
    assert!(colorizer.with_grid(|g| g.columns() == 4 && g.rows() == 2));
}

#[test]
fn test_zero_size_frame_binds_nothing() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 4, 2)
            .unwrap();
    let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0)];
    let cam = FlatCamera { width: 4, height: 2 };

    let raw: Vec<u8> = [255, 0, 0, 255].repeat(8);
    assert_eq!(colorizer.process_frame(&red_frame(&raw), &points, &cam), Some(2));

    let empty = FrameEvent {
        format: ImageFormat::Color,
        width: 0,
        height: 0,
        buffer: &[],
    };
    assert_eq!(colorizer.process_frame(&empty, &points, &cam), Some(0));
    assert_eq!(colorizer.points_in_view(), 0);
    assert!(colorizer.snapshot().is_empty());
    colorizer.with_slots(|slots| assert!(slots.iter().all(|s| !s.active)));
}

#[test]
fn test_pool_of_two_takes_first_two() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(2, 1), &prefab, ScreenOrientation::LandscapeLeft, 4, 2)
            .unwrap();
    let raw: Vec<u8> = [0, 0, 255, 255].repeat(8);
    let points: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32 * 0.5, 1.0, 1.0)).collect();
    let cam = FlatCamera { width: 4, height: 2 };

    assert_eq!(colorizer.process_frame(&red_frame(&raw), &points, &cam), Some(2));
    let positions: Vec<Vec3> = colorizer.snapshot().iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![points[0], points[1]]);
    colorizer.with_slots(|slots| assert!(slots.iter().all(|s| s.active)));
}

#[test]
fn test_non_color_frames_are_ignored() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 4, 2)
            .unwrap();
    let raw: Vec<u8> = vec![0; 32];
    let event = FrameEvent {
        format: ImageFormat::Grayscale,
        ..red_frame(&raw)
    };
    let points = vec![Vec3::ZERO];
    let cam = FlatCamera { width: 4, height: 2 };
    assert_eq!(colorizer.process_frame(&event, &points, &cam), None);
    assert!(colorizer.with_grid(|g| g.is_empty()));
    assert_eq!(colorizer.points_in_view(), 0);
}

#[test]
fn test_degenerate_inputs_bind_nothing() {
    let prefab = PrefabConfig::default();
    let colorizer =
        PointCloudColorizer::new(config(4, 1), &prefab, ScreenOrientation::Portrait, 4, 2)
            .unwrap();
    let raw: Vec<u8> = [255, 255, 255, 255].repeat(8);
    let cam = FlatCamera { width: 4, height: 2 };
    let none: Vec<Vec3> = Vec::new();
    assert_eq!(colorizer.process_frame(&red_frame(&raw), &none, &cam), Some(0));
    assert!(colorizer.snapshot().is_empty());
}

#[test]
fn test_attach_routes_frames_and_configures_capture() {
    let prefab = PrefabConfig::default();
    let colorizer = Arc::new(
        PointCloudColorizer::new(config(8, 2), &prefab, ScreenOrientation::Portrait, 8, 4)
            .unwrap(),
    );
    let tracker = Arc::new(RwLock::new(vec![Vec3::new(1.0, 1.0, 1.0)]));
    let camera = Arc::new(FlatCamera { width: 8, height: 4 });
    let mut source = ReplaySource::new();
    colorizer.attach(&mut source, tracker.clone(), camera);

    let (capture, format) = source.capture().unwrap();
    assert_eq!(capture, CaptureConfig { width: 2, height: 4 });
    assert_eq!(format, ImageFormat::Color);

    let raw: Vec<u8> = [0, 255, 0, 255].repeat(8);
    source.emit(&FrameEvent {
        format: ImageFormat::Color,
        width: 2,
        height: 4,
        buffer: &raw,
    });
    assert_eq!(colorizer.points_in_view(), 1);

    tracker.write().unwrap().clear();
    source.emit(&FrameEvent {
        format: ImageFormat::Color,
        width: 2,
        height: 4,
        buffer: &raw,
    });
    assert_eq!(colorizer.points_in_view(), 0);
}

#[test]
fn test_periodic_snapshots_append() {
    let dir = tempdir().unwrap();
    let prefab = PrefabConfig::default();
    let cfg = ColorizerConfig {
        pool_size: 4,
        downscale: 1,
        snapshot_interval_secs: 0.02,
        ..Default::default()
    };
    let colorizer = Arc::new(
        PointCloudColorizer::new(cfg, &prefab, ScreenOrientation::Portrait, 4, 2).unwrap(),
    );
    let raw: Vec<u8> = [255, 0, 0, 255].repeat(8);
    let points = vec![Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0)];
    let cam = FlatCamera { width: 4, height: 2 };
    colorizer.process_frame(&red_frame(&raw), &points, &cam);

    let writer = SnapshotWriter::new(
        StorageLocation {
            preferred: None,
            fallback: dir.path().to_path_buf(),
        },
        "pointcloud",
    );
    let mut ticker = colorizer.spawn_snapshots(writer.clone());
    std::thread::sleep(Duration::from_millis(150));
    ticker.stop();
    assert!(!ticker.is_running());

    let files: Vec<_> = std::fs::read_dir(writer.directory()).unwrap().collect();
    assert_eq!(files.len(), 1);
    let path = files[0].as_ref().unwrap().path();
    let lines = std::fs::read_to_string(path).unwrap().lines().count();
    assert!(lines >= 2);
    assert_eq!(lines % 2, 0);
}

#[test]
fn test_configure_is_observable_on_custom_sources() {
    struct Recorder(Vec<CaptureConfig>);
    impl FrameSource for Recorder {
        fn configure(&mut self, capture: CaptureConfig, _format: ImageFormat) {
            self.0.push(capture);
        }
        fn on_image_available(&mut self, _handler: FrameHandler) {}
    }
    let prefab = PrefabConfig::default();
    let colorizer = Arc::new(
        PointCloudColorizer::new(config(1, 2), &prefab, ScreenOrientation::LandscapeRight, 8, 4)
            .unwrap(),
    );
    let mut rec = Recorder(Vec::new());
    colorizer.attach(
        &mut rec,
        Arc::new(Vec::<Vec3>::new()),
        Arc::new(FlatCamera { width: 8, height: 4 }),
    );
    assert_eq!(rec.0, vec![CaptureConfig { width: 4, height: 2 }]);
}
