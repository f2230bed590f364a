use serde::{Deserialize, Serialize};

/// Linear RGBA colour with each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        Rgba { r, g, b, a }
    }

    /// Maps 8-bit channels onto `[0, 1]`.
    pub fn from_rgba8(px: [u8; 4]) -> Rgba {
        Rgba {
            r: px[0] as f32 / 255.0,
            g: px[1] as f32 / 255.0,
            b: px[2] as f32 / 255.0,
            a: px[3] as f32 / 255.0,
        }
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

/// Device screen orientation as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenOrientation {
    LandscapeRight,
    #[default]
    Portrait,
    LandscapeLeft,
    PortraitUpsideDown,
    Unknown,
}

impl ScreenOrientation {
    pub const ALL: [ScreenOrientation; 5] = [
        ScreenOrientation::LandscapeRight,
        ScreenOrientation::Portrait,
        ScreenOrientation::LandscapeLeft,
        ScreenOrientation::PortraitUpsideDown,
        ScreenOrientation::Unknown,
    ];

    pub fn is_landscape(self) -> bool {
        matches!(
            self,
            ScreenOrientation::LandscapeLeft | ScreenOrientation::LandscapeRight
        )
    }
}
