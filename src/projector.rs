use glam::Vec2;

use crate::camera_model::CameraProjection;
use crate::detected_points::{PointCloudSource, VisiblePoint};

/// Lazily walks the tracker in its native order and yields the points that
/// land inside the viewport, stopping after `cap` of them.
pub struct VisiblePoints<'a, S: ?Sized, C: ?Sized> {
    source: &'a S,
    camera: &'a C,
    index: usize,
    count: usize,
    found: usize,
    cap: usize,
}

pub fn project<'a, S, C>(source: &'a S, camera: &'a C, cap: usize) -> VisiblePoints<'a, S, C>
where
    S: PointCloudSource + ?Sized,
    C: CameraProjection + ?Sized,
{
    VisiblePoints {
        source,
        camera,
        index: 0,
        count: source.point_count(),
        found: 0,
        cap,
    }
}

impl<S, C> Iterator for VisiblePoints<'_, S, C>
where
    S: PointCloudSource + ?Sized,
    C: CameraProjection + ?Sized,
{
    type Item = VisiblePoint;

    fn next(&mut self) -> Option<VisiblePoint> {
        while self.found < self.cap && self.index < self.count {
            let world = self.source.point(self.index)?;
            self.index += 1;
            let screen = self.camera.world_to_screen(world);
            if self.camera.in_viewport(screen) {
                self.found += 1;
                return Some(VisiblePoint {
                    world,
                    screen: Vec2::new(screen.x, screen.y),
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.cap - self.found).min(self.count - self.index);
        (0, Some(left))
    }
}
