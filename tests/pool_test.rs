use ar_pointcloud_color::color_grid::ColorGrid;
use ar_pointcloud_color::detected_points::VisiblePoint;
use ar_pointcloud_color::pool::SlotPool;
use ar_pointcloud_color::types::{Rgba, ScreenOrientation};
use glam::{Vec2, Vec3};

fn visible(n: usize) -> Vec<VisiblePoint> {
    (0..n)
        .map(|i| VisiblePoint {
            world: Vec3::new(i as f32, 0.0, 1.0),
            screen: Vec2::new(0.0, 0.0),
        })
        .collect()
}

fn solid_grid(w: usize, h: usize, px: [u8; 4]) -> ColorGrid {
    let mut grid = ColorGrid::new();
    grid.rebuild(&px.repeat(w * h), w, h, ScreenOrientation::LandscapeLeft);
    grid
}

#[test]
fn test_more_points_than_slots() {
    let grid = solid_grid(2, 2, [0, 255, 0, 255]);
    let mut pool = SlotPool::new(2);
    let bound = pool.bind(visible(5), &grid, 1, 2);
    assert_eq!(bound, 2);
    assert_eq!(pool.active_count(), 2);
    assert_eq!(pool.slots()[0].position.x, 0.0);
    assert_eq!(pool.slots()[1].position.x, 1.0);
}

#[test]
fn test_fewer_points_than_slots() {
    let grid = solid_grid(2, 2, [0, 255, 0, 255]);
    let mut pool = SlotPool::new(8);
    assert_eq!(pool.bind(visible(3), &grid, 1, 2), 3);
    assert_eq!(pool.points_in_view(), 3);
    assert!(pool.slots()[3..].iter().all(|s| !s.active));
    assert!(pool.slots()[..3].iter().all(|s| s.color == Rgba::new(0.0, 1.0, 0.0, 1.0)));
}

#[test]
fn test_rebind_deactivates_previous_slots() {
    let grid = solid_grid(2, 2, [0, 0, 255, 255]);
    let mut pool = SlotPool::new(4);
    pool.bind(visible(4), &grid, 1, 2);
    pool.bind(visible(1), &grid, 1, 2);
    assert_eq!(pool.active_count(), 1);
    assert_eq!(pool.records(pool.points_in_view()).len(), 1);
}

#[test]
fn test_sampling_uses_downscaled_position() {
    // LandscapeLeft on a 2x2 capture: screen (sx, sy) sits at sy * 2 + sx
    // and the capture rows are flipped.
    let raw = [
        10, 0, 0, 255, 20, 0, 0, 255, // capture row 0 -> screen row 1
        30, 0, 0, 255, 40, 0, 0, 255, // capture row 1 -> screen row 0
    ];
    let mut grid = ColorGrid::new();
    grid.rebuild(&raw, 2, 2, ScreenOrientation::LandscapeLeft);

    let mut pool = SlotPool::new(1);
    let point = VisiblePoint {
        world: Vec3::ONE,
        screen: Vec2::new(3.5, 1.0),
    };
    pool.bind([point], &grid, 2, 4);
    // scaled (1, 0) -> index 1 -> capture (1, 1)
    assert_eq!(pool.slots()[0].color.r, 40.0 / 255.0);
}

#[test]
fn test_outside_grid_gets_transparent() {
    let grid = ColorGrid::new();
    let mut pool = SlotPool::new(1);
    pool.bind(visible(1), &grid, 1, 4);
    assert!(pool.slots()[0].active);
    assert_eq!(pool.slots()[0].color, Rgba::TRANSPARENT);
}
