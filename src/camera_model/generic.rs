use std::sync::RwLock;

use glam::Vec3;

/// Projects world-space points onto the camera's pixel viewport.
///
/// Screen coordinates have their origin in the bottom-left corner with
/// `y` pointing up; the third component is the depth along the view axis.
pub trait CameraProjection {
    fn world_to_screen(&self, world: Vec3) -> Vec3;
    fn pixel_width(&self) -> u32;
    fn pixel_height(&self) -> u32;

    fn in_viewport(&self, screen: Vec3) -> bool {
        screen.x >= 0.0
            && screen.x < self.pixel_width() as f32
            && screen.y >= 0.0
            && screen.y < self.pixel_height() as f32
    }
}

impl<T: CameraProjection + ?Sized> CameraProjection for &T {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        (**self).world_to_screen(world)
    }

    fn pixel_width(&self) -> u32 {
        (**self).pixel_width()
    }

    fn pixel_height(&self) -> u32 {
        (**self).pixel_height()
    }
}

impl<T: CameraProjection + ?Sized> CameraProjection for RwLock<T> {
    fn world_to_screen(&self, world: Vec3) -> Vec3 {
        self.read()
            .map(|c| c.world_to_screen(world))
            .unwrap_or(Vec3::NAN)
    }

    fn pixel_width(&self) -> u32 {
        self.read().map(|c| c.pixel_width()).unwrap_or(0)
    }

    fn pixel_height(&self) -> u32 {
        self.read().map(|c| c.pixel_height()).unwrap_or(0)
    }
}
