use std::sync::RwLock;

use glam::{Vec2, Vec3};

/// Transient feature points from the tracker.
///
/// Indices are only meaningful within one snapshot of the source; there is
/// no identity across frames. `point` returns `None` once the index runs
/// past the points the source can still provide.
pub trait PointCloudSource {
    fn point_count(&self) -> usize;
    fn point(&self, index: usize) -> Option<Vec3>;
}

impl PointCloudSource for [Vec3] {
    fn point_count(&self) -> usize {
        self.len()
    }

    fn point(&self, index: usize) -> Option<Vec3> {
        self.get(index).copied()
    }
}

impl PointCloudSource for Vec<Vec3> {
    fn point_count(&self) -> usize {
        self.len()
    }

    fn point(&self, index: usize) -> Option<Vec3> {
        self.get(index).copied()
    }
}

impl<T: PointCloudSource + ?Sized> PointCloudSource for RwLock<T> {
    fn point_count(&self) -> usize {
        self.read().map(|s| s.point_count()).unwrap_or(0)
    }

    fn point(&self, index: usize) -> Option<Vec3> {
        self.read().ok().and_then(|s| s.point(index))
    }
}

/// A tracked point that landed inside the camera viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePoint {
    pub world: Vec3,
    pub screen: Vec2,
}
