use egui::{Pos2, Rect, Vec2};

// Common constants for all element kinds
pub const MIN_ELEMENT_SIZE: f32 = 2.0;
/// Extra slack around thin shapes (lines, strokes) when picking
pub const HIT_TOLERANCE: f32 = 4.0;

/// Validates that a rectangle has minimum dimensions
pub(crate) fn validate_rect(rect: &Rect) -> Result<(), String> {
    if rect.width() < MIN_ELEMENT_SIZE || rect.height() < MIN_ELEMENT_SIZE {
        Err(format!(
            "Element dimensions too small (min: {}). Width: {}, Height: {}",
            MIN_ELEMENT_SIZE,
            rect.width(),
            rect.height()
        ))
    } else {
        Ok(())
    }
}

/// Calculate distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Bounds of an origin + size pair where the size may be negative
/// (drag-created rectangles keep the raw signed size).
pub(crate) fn signed_rect(origin: Pos2, size: Vec2) -> Rect {
    Rect::from_two_pos(origin, origin + size)
}

/// Vertices of the isosceles triangle inscribed in `rect`: apex at top centre.
pub(crate) fn triangle_vertices(rect: Rect) -> [Pos2; 3] {
    [
        Pos2::new(rect.center().x, rect.min.y),
        rect.right_bottom(),
        rect.left_bottom(),
    ]
}

pub(crate) fn point_in_triangle(p: Pos2, [a, b, c]: [Pos2; 3]) -> bool {
    let sign = |p1: Pos2, p2: Pos2, p3: Pos2| (p1.x - p3.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p3.y);

    let d1 = sign(p, a, b);
    let d2 = sign(p, b, c);
    let d3 = sign(p, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_rect_normalizes() {
        let rect = signed_rect(Pos2::new(10.0, 10.0), Vec2::new(-5.0, 20.0));
        assert_eq!(rect.min, Pos2::new(5.0, 10.0));
        assert_eq!(rect.max, Pos2::new(10.0, 30.0));
    }

    #[test]
    fn test_point_in_triangle() {
        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(50.0));
        let tri = triangle_vertices(rect);
        assert!(point_in_triangle(Pos2::new(25.0, 40.0), tri));
        assert!(!point_in_triangle(Pos2::new(2.0, 2.0), tri));
    }

    #[test]
    fn test_distance_to_segment() {
        let d = distance_to_line_segment(Pos2::new(5.0, 3.0), Pos2::ZERO, Pos2::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 0.001);
    }
}
