use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::camera_model::CameraProjection;
use crate::color_grid::ColorGrid;
use crate::config::{CaptureConfig, ColorizerConfig, Prefab};
use crate::detected_points::PointCloudSource;
use crate::error::{ColorizerError, ColorizerResult};
use crate::frame_source::{FrameEvent, FrameSource, ImageFormat};
use crate::io::SnapshotWriter;
use crate::pool::{SlotPool, SlotRecord, VisualSlot};
use crate::projector::project;
use crate::timer::SnapshotTicker;
use crate::types::ScreenOrientation;

struct ColorizerState {
    grid: ColorGrid,
    pool: SlotPool,
    orientation: ScreenOrientation,
    screen_width: u32,
}

/// Joins camera frames with tracked feature points into a pool of coloured
/// visual slots.
///
/// Grid and pool sit behind one lock: a frame is indexed, projected and
/// bound as a unit, and snapshots read the pool under the same lock.
pub struct PointCloudColorizer {
    config: ColorizerConfig,
    capture: CaptureConfig,
    state: Mutex<ColorizerState>,
}

impl PointCloudColorizer {
    pub fn new(
        config: ColorizerConfig,
        prefab: &dyn Prefab,
        orientation: ScreenOrientation,
        screen_width: u32,
        screen_height: u32,
    ) -> ColorizerResult<PointCloudColorizer> {
        if !prefab.has_renderer() {
            log::error!("No renderer on pixel prefab `{}`!", prefab.name());
            return Err(ColorizerError::MissingRenderer(prefab.name().to_string()));
        }
        config.validate()?;

        let capture =
            CaptureConfig::for_screen(screen_width, screen_height, orientation, config.downscale);
        log::info!(
            "colorizer ready: pool of {}, capture {}x{}, {:?}",
            config.pool_size,
            capture.width,
            capture.height,
            orientation
        );
        let state = ColorizerState {
            grid: ColorGrid::new(),
            pool: SlotPool::new(config.pool_size),
            orientation,
            screen_width,
        };
        Ok(PointCloudColorizer {
            config,
            capture,
            state: Mutex::new(state),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ColorizerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Updates orientation and screen width after a device rotation. Takes
    /// effect from the next frame.
    pub fn set_orientation(&self, orientation: ScreenOrientation, screen_width: u32) {
        let mut state = self.lock();
        state.orientation = orientation;
        state.screen_width = screen_width;
    }

    /// Rebuilds the colour grid from `event` and rebinds the slot pool.
    ///
    /// Returns the number of slots in view, or `None` when the frame was
    /// filtered out.
    pub fn process_frame<S, C>(
        &self,
        event: &FrameEvent<'_>,
        tracker: &S,
        camera: &C,
    ) -> Option<usize>
    where
        S: PointCloudSource + ?Sized,
        C: CameraProjection + ?Sized,
    {
        if event.format != ImageFormat::Color {
            log::trace!("ignoring {:?} frame", event.format);
            return None;
        }
        let mut guard = self.lock();
        let state = &mut *guard;
        if !state.grid.rebuild(
            event.buffer,
            event.width as usize,
            event.height as usize,
            state.orientation,
        ) {
            return None;
        }
        if state.grid.is_empty() {
            state.pool.deactivate_all();
            log::trace!("empty frame, nothing in view");
            return Some(0);
        }
        let visible = project(tracker, camera, state.pool.capacity());
        let in_view = state.pool.bind(
            visible,
            &state.grid,
            self.config.downscale,
            state.screen_width,
        );
        log::trace!("{} points in view", in_view);
        Some(in_view)
    }

    /// Configures `source` for colour capture and routes its frames here.
    pub fn attach<F, S, C>(self: &Arc<Self>, source: &mut F, tracker: Arc<S>, camera: Arc<C>)
    where
        F: FrameSource + ?Sized,
        S: PointCloudSource + Send + Sync + ?Sized + 'static,
        C: CameraProjection + Send + Sync + ?Sized + 'static,
    {
        source.configure(self.capture, ImageFormat::Color);
        let colorizer = Arc::clone(self);
        source.on_image_available(Box::new(move |event: &FrameEvent<'_>| {
            colorizer.process_frame(event, &*tracker, &*camera);
        }));
    }

    pub fn points_in_view(&self) -> usize {
        self.lock().pool.points_in_view()
    }

    /// Active slots from the latest bind, copied under the lock.
    pub fn snapshot(&self) -> Vec<SlotRecord> {
        let state = self.lock();
        state.pool.records(state.pool.points_in_view())
    }

    pub fn with_slots<R>(&self, f: impl FnOnce(&[VisualSlot]) -> R) -> R {
        f(self.lock().pool.slots())
    }

    pub fn with_grid<R>(&self, f: impl FnOnce(&ColorGrid) -> R) -> R {
        f(&self.lock().grid)
    }

    /// Appends the current snapshot through `writer`, logging failures.
    pub fn write_snapshot(&self, writer: &SnapshotWriter) -> ColorizerResult<PathBuf> {
        let records = self.snapshot();
        writer.fire(&records).inspect_err(|e| {
            log::error!("failed to save point cloud snapshot: {}", e);
        })
    }

    /// Writes a snapshot every configured interval on a background thread.
    pub fn spawn_snapshots(self: &Arc<Self>, writer: SnapshotWriter) -> SnapshotTicker {
        let period = Duration::try_from_secs_f32(self.config.snapshot_interval_secs)
            .unwrap_or(Duration::from_secs(1));
        let colorizer = Arc::clone(self);
        SnapshotTicker::spawn(period, move || {
            // failures are logged; the next tick retries
            let _ = colorizer.write_snapshot(&writer);
        })
    }
}
