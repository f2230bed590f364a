use serde::{Deserialize, Serialize};

use crate::config::CaptureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Color,
    Grayscale,
}

/// A captured frame, borrowed from the source for the duration of the
/// callback only.
#[derive(Debug, Clone, Copy)]
pub struct FrameEvent<'a> {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub buffer: &'a [u8],
}

pub type FrameHandler = Box<dyn FnMut(&FrameEvent<'_>) + Send>;

/// Camera image producer that calls back whenever a capture completes.
pub trait FrameSource {
    fn configure(&mut self, capture: CaptureConfig, format: ImageFormat);
    fn on_image_available(&mut self, handler: FrameHandler);
}

/// Frame source fed by hand, used to replay recorded sessions.
#[derive(Default)]
pub struct ReplaySource {
    capture: Option<(CaptureConfig, ImageFormat)>,
    handlers: Vec<FrameHandler>,
}

impl ReplaySource {
    pub fn new() -> ReplaySource {
        ReplaySource::default()
    }

    pub fn capture(&self) -> Option<(CaptureConfig, ImageFormat)> {
        self.capture
    }

    pub fn emit(&mut self, event: &FrameEvent<'_>) {
        for handler in &mut self.handlers {
            handler(event);
        }
    }
}

impl FrameSource for ReplaySource {
    fn configure(&mut self, capture: CaptureConfig, format: ImageFormat) {
        log::debug!(
            "capture configured as {}x{} {:?}",
            capture.width,
            capture.height,
            format
        );
        self.capture = Some((capture, format));
    }

    fn on_image_available(&mut self, handler: FrameHandler) {
        self.handlers.push(handler);
    }
}
