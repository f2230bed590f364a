use glam::Vec3;
use serde::Serialize;

use crate::color_grid::ColorGrid;
use crate::detected_points::VisiblePoint;
use crate::types::Rgba;

/// One pre-allocated visual object handed to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualSlot {
    pub active: bool,
    pub position: Vec3,
    pub color: Rgba,
}

/// A slot as captured for a snapshot record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotRecord {
    pub index: usize,
    pub position: Vec3,
    pub color: Rgba,
}

/// Fixed-size pool of visual slots, refilled from scratch on every bind.
#[derive(Debug, Clone)]
pub struct SlotPool {
    slots: Vec<VisualSlot>,
    points_in_view: usize,
}

impl SlotPool {
    pub fn new(pool_size: usize) -> SlotPool {
        SlotPool {
            slots: vec![VisualSlot::default(); pool_size],
            points_in_view: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[VisualSlot] {
        &self.slots
    }

    pub fn points_in_view(&self) -> usize {
        self.points_in_view
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn deactivate_all(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
        self.points_in_view = 0;
    }

    /// Assigns visible points to slots `0, 1, 2, ...` in arrival order.
    ///
    /// Colours are sampled at the downscaled screen position of each point.
    /// Points past the pool capacity are dropped. Returns the number of
    /// activated slots.
    pub fn bind<I>(
        &mut self,
        visible: I,
        grid: &ColorGrid,
        downscale: u32,
        screen_width: u32,
    ) -> usize
    where
        I: IntoIterator<Item = VisiblePoint>,
    {
        self.deactivate_all();
        let scale = downscale.max(1) as usize;
        let scaled_width = screen_width as usize / scale;

        for (slot, point) in self.slots.iter_mut().zip(visible) {
            let scaled_x = point.screen.x as usize / scale;
            let scaled_y = point.screen.y as usize / scale;
            let color = grid
                .get(scaled_y * scaled_width + scaled_x)
                .unwrap_or_else(|| {
                    log::trace!("no grid color at ({}, {})", scaled_x, scaled_y);
                    Rgba::TRANSPARENT
                });
            slot.active = true;
            slot.position = point.world;
            slot.color = color;
            self.points_in_view += 1;
        }
        self.points_in_view
    }

    /// Records for the first `count` slots, clamped to the pool size.
    pub fn records(&self, count: usize) -> Vec<SlotRecord> {
        self.slots
            .iter()
            .take(count)
            .enumerate()
            .map(|(index, slot)| SlotRecord {
                index,
                position: slot.position,
                color: slot.color,
            })
            .collect()
    }
}
