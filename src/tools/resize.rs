use egui::{Pos2, Rect, Vec2};

/// Pick radius around the corners of the active element
pub const RESIZE_HANDLE_RADIUS: f32 = 8.0;
/// Smallest size a corner drag can shrink an element to
pub const MIN_RESIZE: f32 = 10.0;

/// Represents a corner of a selection box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn position(self, rect: Rect) -> Pos2 {
        match self {
            Corner::TopLeft => rect.left_top(),
            Corner::TopRight => rect.right_top(),
            Corner::BottomLeft => rect.left_bottom(),
            Corner::BottomRight => rect.right_bottom(),
        }
    }
}

/// The corner handle of `rect` under `pos`, if any
pub fn corner_at(rect: Rect, pos: Pos2) -> Option<Corner> {
    Corner::ALL
        .into_iter()
        .find(|corner| pos.distance(corner.position(rect)) <= RESIZE_HANDLE_RADIUS)
}

/// New rectangle after dragging `corner` of `original` by `delta`; the
/// opposite corner stays fixed.
pub fn resized_rect(original: Rect, corner: Corner, delta: Vec2) -> Rect {
    let mut rect = original;

    match corner {
        Corner::TopLeft => {
            rect.min.x = (original.min.x + delta.x).min(original.max.x - MIN_RESIZE);
            rect.min.y = (original.min.y + delta.y).min(original.max.y - MIN_RESIZE);
        }
        Corner::TopRight => {
            rect.max.x = (original.max.x + delta.x).max(original.min.x + MIN_RESIZE);
            rect.min.y = (original.min.y + delta.y).min(original.max.y - MIN_RESIZE);
        }
        Corner::BottomLeft => {
            rect.min.x = (original.min.x + delta.x).min(original.max.x - MIN_RESIZE);
            rect.max.y = (original.max.y + delta.y).max(original.min.y + MIN_RESIZE);
        }
        Corner::BottomRight => {
            rect.max.x = (original.max.x + delta.x).max(original.min.x + MIN_RESIZE);
            rect.max.y = (original.max.y + delta.y).max(original.min.y + MIN_RESIZE);
        }
    }

    rect
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_hit() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(50.0));
        assert_eq!(corner_at(rect, Pos2::new(49.0, 52.0)), Some(Corner::BottomRight));
        assert_eq!(corner_at(rect, Pos2::new(25.0, 25.0)), None);
    }

    #[test]
    fn test_resize_keeps_opposite_corner() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(50.0));
        let resized = resized_rect(rect, Corner::TopLeft, Vec2::new(10.0, -10.0));
        assert_eq!(resized, Rect::from_min_max(Pos2::new(10.0, -10.0), Pos2::new(50.0, 50.0)));

        let shrunk = resized_rect(rect, Corner::BottomRight, Vec2::new(-100.0, -100.0));
        assert_eq!(shrunk.size(), Vec2::splat(MIN_RESIZE));
    }
}
