use std::path::{Path, PathBuf};

use glam::Vec3;
use glob::glob;
use image::ImageReader;
use indicatif::ParallelProgressIterator;
use nalgebra as na;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::camera_model::PinholeCamera;
use crate::error::{ColorizerError, ColorizerResult};
use crate::io::object_from_json;
use crate::types::ScreenOrientation;

pub const MANIFEST_NAME: &str = "session.json";

/// Recorded AR session: device state plus one entry per captured frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionManifest {
    pub screen_width: u32,
    pub screen_height: u32,
    pub orientation: ScreenOrientation,
    pub camera: PinholeCamera,
    pub frames: Vec<FrameRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameRecord {
    pub time_ns: i64,
    /// Image path relative to the manifest.
    pub image: String,
    pub pose: na::Isometry3<f32>,
    pub points: Vec<Vec3>,
}

/// A decoded frame ready to be replayed.
#[derive(Debug, Clone)]
pub struct SessionFrame {
    pub time_ns: i64,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub pose: na::Isometry3<f32>,
    pub points: Vec<Vec3>,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub root: PathBuf,
    pub screen_width: u32,
    pub screen_height: u32,
    pub orientation: ScreenOrientation,
    pub camera: PinholeCamera,
    pub frames: Vec<SessionFrame>,
}

/// Finds every directory below `root_folder` holding a session manifest.
pub fn find_sessions(root_folder: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/{}", root_folder.display(), MANIFEST_NAME);
    let Ok(paths) = glob(&pattern) else {
        log::warn!("bad session pattern {}", pattern);
        return Vec::new();
    };
    let mut sessions: Vec<PathBuf> = paths
        .filter_map(Result::ok)
        .filter_map(|p| p.parent().map(Path::to_path_buf))
        .collect();
    sessions.sort();
    sessions
}

fn load_frame(root: &Path, record: &FrameRecord) -> ColorizerResult<SessionFrame> {
    let path = root.join(&record.image);
    let img = ImageReader::open(&path)
        .map_err(|e| ColorizerError::io(&path, e))?
        .decode()?
        .to_rgba8();
    Ok(SessionFrame {
        time_ns: record.time_ns,
        width: img.width(),
        height: img.height(),
        rgba: img.into_raw(),
        pose: record.pose,
        points: record.points.clone(),
    })
}

/// Loads a session directory, decoding its frames in parallel.
///
/// Frames are returned in timestamp order.
pub fn load_session(root_folder: &Path) -> ColorizerResult<Session> {
    let manifest: SessionManifest = object_from_json(root_folder.join(MANIFEST_NAME))?;
    log::trace!(
        "loading {} frames from {}",
        manifest.frames.len(),
        root_folder.display()
    );
    let mut frames = manifest
        .frames
        .par_iter()
        .progress_count(manifest.frames.len() as u64)
        .map(|record| load_frame(root_folder, record))
        .collect::<ColorizerResult<Vec<_>>>()?;
    frames.sort_by_key(|f| f.time_ns);

    Ok(Session {
        root: root_folder.to_path_buf(),
        screen_width: manifest.screen_width,
        screen_height: manifest.screen_height,
        orientation: manifest.orientation,
        camera: manifest.camera,
        frames,
    })
}
