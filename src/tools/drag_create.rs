use egui::{Pos2, Vec2};

use crate::element::{factory, Element, ElementId};
use crate::panel::PropertyPanelState;

/// An outline rectangle being sized by a pointer drag.
///
/// The size is the raw pointer delta, so dragging up or left yields negative
/// width/height which is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragCreate {
    id: ElementId,
    start: Pos2,
}

impl DragCreate {
    /// Builds the zero-sized element for a drag starting at `start`
    pub fn start(start: Pos2, panel: &PropertyPanelState) -> (Self, Element) {
        let element = factory::create_outline_rectangle(start, Vec2::ZERO, panel.color, panel.width as f32);
        let state = Self {
            id: element.id(),
            start,
        };
        (state, element)
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn size_at(&self, current: Pos2) -> Vec2 {
        current - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_sizes_are_kept() {
        let panel = PropertyPanelState::default();
        let (drag, element) = DragCreate::start(Pos2::new(100.0, 100.0), &panel);
        assert_eq!(element.size(), Vec2::ZERO);
        assert_eq!(drag.size_at(Pos2::new(80.0, 130.0)), Vec2::new(-20.0, 30.0));
    }
}
