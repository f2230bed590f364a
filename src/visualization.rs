use rerun::RecordingStream;

use crate::color_grid::ColorGrid;
use crate::pool::VisualSlot;

/// Logs the active slots as coloured 3D points.
pub fn log_slots(
    recording: &RecordingStream,
    topic: &str,
    slots: &[VisualSlot],
) -> Result<(), rerun::RecordingStreamError> {
    let (positions, colors): (Vec<_>, Vec<_>) = slots
        .iter()
        .filter(|s| s.active)
        .map(|s| {
            let [r, g, b, a] = s.color.to_rgba8();
            (s.position.to_array(), (r, g, b, a))
        })
        .unzip();
    recording.log(
        format!("{}/points", topic),
        &rerun::Points3D::new(positions)
            .with_colors(colors)
            .with_radii([rerun::Radius::new_ui_points(3.0)]),
    )
}

pub fn log_color_grid(
    recording: &RecordingStream,
    topic: &str,
    grid: &ColorGrid,
) -> Result<(), rerun::RecordingStreamError> {
    if grid.is_empty() {
        return Ok(());
    }
    let img = grid.to_rgba_image();
    let (w, h) = img.dimensions();
    recording.log(
        format!("{}/color_grid", topic),
        &rerun::Image::from_rgba32(img.into_raw(), [w, h]),
    )
}

pub fn set_frame_time(recording: &RecordingStream, time_ns: i64) {
    recording.set_time(
        "stable",
        rerun::TimeCell::from_timestamp_nanos_since_epoch(time_ns),
    );
}
