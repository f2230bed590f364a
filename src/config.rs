use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ColorizerError, ColorizerResult};
use crate::types::ScreenOrientation;

pub const EXTERNAL_STORAGE_ENV: &str = "EXTERNAL_STORAGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorizerConfig {
    /// Number of visual slots allocated once at startup.
    pub pool_size: usize,
    /// Integer factor between the screen and the captured colour frame.
    pub downscale: u32,
    pub snapshot_interval_secs: f32,
    pub output_subdir: String,
    /// Shared storage root. Falls back to `EXTERNAL_STORAGE` when unset.
    pub preferred_dir: Option<PathBuf>,
    pub fallback_dir: PathBuf,
}

impl Default for ColorizerConfig {
    fn default() -> Self {
        Self {
            pool_size: 512,
            downscale: 2,
            snapshot_interval_secs: 1.0,
            output_subdir: "pointcloud".to_string(),
            preferred_dir: None,
            fallback_dir: PathBuf::from("data"),
        }
    }
}

impl ColorizerConfig {
    pub fn validate(&self) -> ColorizerResult<()> {
        if self.pool_size == 0 {
            return Err(ColorizerError::invalid_config("pool_size must be positive"));
        }
        if self.downscale == 0 {
            return Err(ColorizerError::invalid_config("downscale must be positive"));
        }
        let interval = self.snapshot_interval_secs;
        if !(interval > 0.0) || Duration::try_from_secs_f32(interval).is_err() {
            return Err(ColorizerError::invalid_config(format!(
                "snapshot_interval_secs must be a positive duration, got {}",
                self.snapshot_interval_secs
            )));
        }
        Ok(())
    }

    pub fn preferred_dir(&self) -> Option<PathBuf> {
        self.preferred_dir
            .clone()
            .or_else(|| std::env::var_os(EXTERNAL_STORAGE_ENV).map(PathBuf::from))
    }
}

/// Capture size requested from the frame source, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub width: u32,
    pub height: u32,
}

impl CaptureConfig {
    /// The capture raster is always landscape, so portrait screens swap
    /// the scaled dimensions.
    pub fn for_screen(
        screen_width: u32,
        screen_height: u32,
        orientation: ScreenOrientation,
        downscale: u32,
    ) -> CaptureConfig {
        let scaled_w = screen_width / downscale;
        let scaled_h = screen_height / downscale;
        if orientation.is_landscape() {
            CaptureConfig {
                width: scaled_w,
                height: scaled_h,
            }
        } else {
            CaptureConfig {
                width: scaled_h,
                height: scaled_w,
            }
        }
    }
}

/// Template the rendering layer instantiates for every pool slot.
pub trait Prefab {
    fn name(&self) -> &str;
    fn has_renderer(&self) -> bool;
}

/// Plain prefab description, as read from a scene file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefabConfig {
    pub name: String,
    pub renderer: Option<String>,
}

impl Default for PrefabConfig {
    fn default() -> Self {
        Self {
            name: "point_cube".to_string(),
            renderer: Some("unlit_color".to_string()),
        }
    }
}

impl Prefab for PrefabConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}
