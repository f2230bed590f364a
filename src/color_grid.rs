use image::RgbaImage;

use crate::types::{Rgba, ScreenOrientation};

/// Maps a capture-raster pixel `(x, y)` of a `width x height` frame to its
/// slot in the screen-oriented grid.
pub type IndexFn = fn(x: usize, y: usize, width: usize, height: usize) -> usize;

fn landscape_right(x: usize, y: usize, width: usize, _height: usize) -> usize {
    y * width + (width - 1 - x)
}

fn portrait(x: usize, y: usize, width: usize, height: usize) -> usize {
    (width - 1 - x) * height + (height - 1 - y)
}

fn landscape_left(x: usize, y: usize, width: usize, height: usize) -> usize {
    (height - 1 - y) * width + x
}

fn portrait_upside_down(x: usize, y: usize, _width: usize, height: usize) -> usize {
    x * height + y
}

/// Index transform for each orientation.
///
/// `Unknown` reuses the portrait transform because capture is configured
/// with portrait dimensions for every non-landscape orientation.
pub fn index_fn(orientation: ScreenOrientation) -> IndexFn {
    match orientation {
        ScreenOrientation::LandscapeRight => landscape_right,
        ScreenOrientation::Portrait | ScreenOrientation::Unknown => portrait,
        ScreenOrientation::LandscapeLeft => landscape_left,
        ScreenOrientation::PortraitUpsideDown => portrait_upside_down,
    }
}

/// Orientation-corrected colours of the latest camera frame.
///
/// The grid is row-major in screen space with the origin in the bottom-left
/// corner, so a screen pixel `(sx, sy)` lives at `sy * columns + sx`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorGrid {
    width: usize,
    height: usize,
    orientation: ScreenOrientation,
    buffer_size: usize,
    colors: Vec<Rgba>,
}

impl ColorGrid {
    pub fn new() -> ColorGrid {
        ColorGrid::default()
    }

    /// Rebuilds the grid from a tightly packed RGBA8 buffer.
    ///
    /// Returns `false` and leaves the grid untouched when the buffer length
    /// does not match `width * height * 4`.
    pub fn rebuild(
        &mut self,
        raw: &[u8],
        width: usize,
        height: usize,
        orientation: ScreenOrientation,
    ) -> bool {
        if raw.len() != width * height * 4 {
            log::warn!(
                "frame buffer of {} bytes does not match {}x{} rgba",
                raw.len(),
                width,
                height
            );
            return false;
        }
        if raw.len() != self.buffer_size || self.colors.is_empty() {
            log::debug!("reallocating color grid for {}x{}", width, height);
            self.buffer_size = raw.len();
            self.colors = vec![Rgba::TRANSPARENT; width * height];
        }
        self.width = width;
        self.height = height;
        self.orientation = orientation;

        let index_of = index_fn(orientation);
        for (i, px) in raw.chunks_exact(4).enumerate() {
            let x = i % width;
            let y = i / width;
            self.colors[index_of(x, y, width, height)] =
                Rgba::from_rgba8([px[0], px[1], px[2], px[3]]);
        }
        true
    }

    pub fn get(&self, index: usize) -> Option<Rgba> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn capture_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Width of the grid in screen space.
    pub fn columns(&self) -> usize {
        if self.orientation.is_landscape() {
            self.width
        } else {
            self.height
        }
    }

    pub fn rows(&self) -> usize {
        if self.orientation.is_landscape() {
            self.height
        } else {
            self.width
        }
    }

    /// Screen-oriented image with the usual top-left origin.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let (cols, rows) = (self.columns(), self.rows());
        RgbaImage::from_fn(cols as u32, rows as u32, |c, r| {
            let idx = (rows - 1 - r as usize) * cols + c as usize;
            image::Rgba(self.get(idx).unwrap_or_default().to_rgba8())
        })
    }
}
