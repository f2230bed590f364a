use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use ar_pointcloud_color::PointCloudColorizer;
use ar_pointcloud_color::camera_model::PinholeCamera;
use ar_pointcloud_color::config::{ColorizerConfig, PrefabConfig};
use ar_pointcloud_color::data_loader::{Session, find_sessions, load_session};
use ar_pointcloud_color::frame_source::{FrameEvent, ImageFormat, ReplaySource};
use ar_pointcloud_color::io::{SnapshotWriter, object_from_json};
use ar_pointcloud_color::timer::Interval;
use ar_pointcloud_color::visualization::{log_color_grid, log_slots, set_frame_time};
use clap::Parser;
use glam::Vec3;

#[derive(Parser)]
#[command(version, about, author)]
struct PcColorCli {
    /// folder holding one or more recorded sessions
    path: String,

    /// colorizer config json
    #[arg(short, long)]
    config: Option<String>,

    /// snapshot root, replaces both the shared and the private location
    #[arg(short, long)]
    output: Option<String>,

    /// save a rerun recording to this .rrd file
    #[arg(long)]
    rerun: Option<String>,
}

fn replay(
    session: &Session,
    config: &ColorizerConfig,
    writer: &SnapshotWriter,
    recording: Option<&rerun::RecordingStream>,
) -> Result<usize, Box<dyn std::error::Error>> {
    let prefab = PrefabConfig::default();
    let colorizer = Arc::new(PointCloudColorizer::new(
        config.clone(),
        &prefab,
        session.orientation,
        session.screen_width,
        session.screen_height,
    )?);
    let tracker = Arc::new(RwLock::new(Vec::<Vec3>::new()));
    let camera: Arc<RwLock<PinholeCamera>> = Arc::new(RwLock::new(session.camera.clone()));

    let mut source = ReplaySource::new();
    colorizer.attach(&mut source, tracker.clone(), camera.clone());

    let mut interval = Interval::new(config.snapshot_interval_secs);
    let mut last_time_ns = session.frames.first().map(|f| f.time_ns).unwrap_or(0);
    let mut snapshots = 0;
    for frame in &session.frames {
        if let Ok(mut points) = tracker.write() {
            points.clone_from(&frame.points);
        }
        if let Ok(mut cam) = camera.write() {
            cam.set_pose(frame.pose);
        }
        source.emit(&FrameEvent {
            format: ImageFormat::Color,
            width: frame.width,
            height: frame.height,
            buffer: &frame.rgba,
        });

        if let Some(recording) = recording {
            set_frame_time(recording, frame.time_ns);
            colorizer.with_slots(|slots| log_slots(recording, "/session", slots))?;
            colorizer.with_grid(|grid| log_color_grid(recording, "/session", grid))?;
        }

        let dt = (frame.time_ns - last_time_ns) as f32 * 1e-9;
        last_time_ns = frame.time_ns;
        if interval.tick(dt) && colorizer.write_snapshot(writer).is_ok() {
            snapshots += 1;
        }
    }
    Ok(snapshots)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = PcColorCli::parse();

    let mut config: ColorizerConfig = match &cli.config {
        Some(path) => object_from_json(path)?,
        None => ColorizerConfig::default(),
    };
    if let Some(output) = &cli.output {
        config.preferred_dir = Some(PathBuf::from(output));
        config.fallback_dir = PathBuf::from(output);
    }
    config.validate()?;
    let writer = SnapshotWriter::from_config(&config);

    let recording = match &cli.rerun {
        Some(path) => Some(rerun::RecordingStreamBuilder::new("pointcloud_color").save(path)?),
        None => None,
    };

    let sessions = find_sessions(Path::new(&cli.path));
    if sessions.is_empty() {
        log::warn!("no sessions found under {}", cli.path);
    }
    for dir in sessions {
        let session = load_session(&dir)?;
        let snapshots = replay(&session, &config, &writer, recording.as_ref())?;
        log::info!(
            "{}: {} frames, {} snapshots written to {}",
            dir.display(),
            session.frames.len(),
            snapshots,
            writer.directory().display()
        );
    }
    Ok(())
}
