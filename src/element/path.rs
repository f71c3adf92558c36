use egui::{Pos2, Vec2};

use crate::element::common;

/// Freehand stroke captured by the renderer's brush.
///
/// Points are stored relative to the owning element's position so moving the
/// element never touches them.
#[derive(Debug, Clone, PartialEq)]
pub struct PathContent {
    points: Vec<Pos2>,
}

impl PathContent {
    /// Splits absolute brush points into an origin and relative points.
    /// Returns `None` for strokes with fewer than two points.
    pub(crate) fn from_absolute(points: &[Pos2]) -> Option<(Pos2, Vec2, Self)> {
        if points.len() < 2 {
            return None;
        }
        let bounds = common::calculate_bounds(points, 0.0);
        let origin = bounds.min;
        let relative = points.iter().map(|p| Pos2::ZERO + (*p - origin)).collect();
        Some((origin, bounds.size(), Self { points: relative }))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    /// Absolute points for an element positioned at `origin`
    pub fn absolute_points(&self, origin: Pos2) -> Vec<Pos2> {
        self.points.iter().map(|p| origin + p.to_vec2()).collect()
    }

    /// Rescales the relative points from `old_size` to `new_size`
    pub(crate) fn rescale(&mut self, old_size: Vec2, new_size: Vec2) {
        let sx = if old_size.x > 0.0 { new_size.x / old_size.x } else { 1.0 };
        let sy = if old_size.y > 0.0 { new_size.y / old_size.y } else { 1.0 };
        for point in &mut self.points {
            point.x *= sx;
            point.y *= sy;
        }
    }

    pub(crate) fn hit_test(&self, origin: Pos2, pos: Pos2, thickness: f32) -> bool {
        let reach = (thickness / 2.0).max(common::HIT_TOLERANCE);
        self.points.windows(2).any(|window| {
            let a = origin + window[0].to_vec2();
            let b = origin + window[1].to_vec2();
            common::distance_to_line_segment(pos, a, b) <= reach
        })
    }
}
