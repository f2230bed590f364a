use std::path::Path;

use ar_pointcloud_color::camera_model::{CameraProjection, PinholeCamera};
use ar_pointcloud_color::config::CaptureConfig;
use ar_pointcloud_color::data_loader::{FrameRecord, MANIFEST_NAME, SessionManifest};
use ar_pointcloud_color::io::object_to_json;
use ar_pointcloud_color::types::ScreenOrientation;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use nalgebra as na;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    LandscapeRight,
    Portrait,
    LandscapeLeft,
    PortraitUpsideDown,
}

impl From<OrientationArg> for ScreenOrientation {
    fn from(o: OrientationArg) -> Self {
        match o {
            OrientationArg::LandscapeRight => ScreenOrientation::LandscapeRight,
            OrientationArg::Portrait => ScreenOrientation::Portrait,
            OrientationArg::LandscapeLeft => ScreenOrientation::LandscapeLeft,
            OrientationArg::PortraitUpsideDown => ScreenOrientation::PortraitUpsideDown,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic AR session
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of frames to generate
        #[arg(short, long, default_value = "60")]
        num_frames: usize,

        /// Number of feature points in the scene
        #[arg(short, long, default_value = "2000")]
        points: usize,

        /// Screen width
        #[arg(long, default_value = "1080")]
        width: u32,

        /// Screen height
        #[arg(long, default_value = "1920")]
        height: u32,

        #[arg(long, value_enum, default_value = "portrait")]
        orientation: OrientationArg,

        /// Capture downscale factor
        #[arg(long, default_value = "2")]
        downscale: u32,

        /// Frames per second
        #[arg(long, default_value = "30")]
        fps: u32,

        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

struct GenerateArgs {
    num_frames: usize,
    points: usize,
    width: u32,
    height: u32,
    orientation: ScreenOrientation,
    downscale: u32,
    fps: u32,
    seed: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_frames,
            points,
            width,
            height,
            orientation,
            downscale,
            fps,
            seed,
        } => {
            let gen_args = GenerateArgs {
                num_frames,
                points,
                width,
                height,
                orientation: orientation.into(),
                downscale: downscale.max(1),
                fps: fps.max(1),
                seed,
            };
            generate_session(Path::new(&output), &gen_args)?;
        }
    }

    Ok(())
}

/// Gradient frame in capture raster order; blue tracks session time.
fn render_frame(
    capture: CaptureConfig,
    orientation: ScreenOrientation,
    tint: f32,
) -> image::RgbaImage {
    image::RgbaImage::from_fn(capture.width, capture.height, |x, y| {
        let u = x as f32 / capture.width.max(1) as f32;
        let v = y as f32 / capture.height.max(1) as f32;
        let (u, v) = if orientation.is_landscape() { (u, v) } else { (v, u) };
        image::Rgba([
            (u * 255.0) as u8,
            (v * 255.0) as u8,
            (tint * 255.0) as u8,
            255,
        ])
    })
}

fn generate_session(
    output_dir: &Path,
    args: &GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir.join("frames"))?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    // Scene: points scattered in a slab in front of the starting pose
    let scene: Vec<Vec3> = (0..args.points)
        .map(|_| {
            Vec3::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-1.5..1.5),
                rng.random_range(1.0..4.0),
            )
        })
        .collect();

    let camera = PinholeCamera::from_fov(1.0, args.width, args.height);
    let capture =
        CaptureConfig::for_screen(args.width, args.height, args.orientation, args.downscale);
    let frame_ns = 1_000_000_000i64 / args.fps as i64;

    let mut frames = Vec::with_capacity(args.num_frames);
    for frame_idx in 0..args.num_frames {
        let t = frame_idx as f32 / args.num_frames.max(1) as f32;
        let yaw = (t * std::f32::consts::TAU).sin() * 0.2;
        let pose = na::Isometry3::new(
            na::Vector3::new(t * 0.5, 0.0, 0.0),
            na::Vector3::new(0.0, yaw, 0.0),
        );
        let posed = camera.clone().with_pose(pose);

        // Trackers only report a shuffled subset near the view
        let mut points: Vec<Vec3> = scene
            .iter()
            .filter(|p| posed.world_to_screen(**p).z > 0.0)
            .filter(|_| rng.random_bool(0.7))
            .copied()
            .collect();
        points.shuffle(&mut rng);

        let image_name = format!("frames/{:06}.png", frame_idx);
        render_frame(capture, args.orientation, t).save(output_dir.join(&image_name))?;
        frames.push(FrameRecord {
            time_ns: frame_idx as i64 * frame_ns,
            image: image_name,
            pose,
            points,
        });
    }

    let manifest = SessionManifest {
        screen_width: args.width,
        screen_height: args.height,
        orientation: args.orientation,
        camera,
        frames,
    };
    object_to_json(output_dir.join(MANIFEST_NAME), &manifest)?;

    println!("Generated {} frames in {}", args.num_frames, output_dir.display());
    Ok(())
}
