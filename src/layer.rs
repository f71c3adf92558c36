use std::fmt;

use crate::event::EditorEvent;
use crate::scene::Scene;

/// Z-order command relative to the active element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerOrder {
    /// Frontmost
    ToFront,
    /// Backmost
    ToBack,
    /// One step towards the front
    StepForward,
    /// One step towards the back
    StepBackward,
}

impl LayerOrder {
    pub const ALL: [LayerOrder; 4] = [
        LayerOrder::StepForward,
        LayerOrder::ToFront,
        LayerOrder::StepBackward,
        LayerOrder::ToBack,
    ];

    /// Destination index for an element at `index` in a scene of `len` elements.
    /// `None` when the element is already at the relevant boundary.
    pub fn target_index(self, index: usize, len: usize) -> Option<usize> {
        let last = len.checked_sub(1)?;
        let target = match self {
            LayerOrder::ToFront => last,
            LayerOrder::ToBack => 0,
            LayerOrder::StepForward => (index + 1).min(last),
            LayerOrder::StepBackward => index.saturating_sub(1),
        };
        (target != index).then_some(target)
    }
}

impl fmt::Display for LayerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LayerOrder::ToFront => "Bring to front",
            LayerOrder::ToBack => "Send to back",
            LayerOrder::StepForward => "Bring forward",
            LayerOrder::StepBackward => "Send backward",
        };
        f.write_str(label)
    }
}

/// Moves the single active element within the scene's z-sequence.
///
/// Returns `false` (and leaves the scene untouched) when nothing or a group is
/// active, or when the element already sits at the requested boundary. The
/// selection is left as it was.
pub fn reorder(scene: &mut Scene, order: LayerOrder) -> bool {
    let Some(id) = scene.active().and_then(|active| active.single()) else {
        log::debug!("Ignoring {:?}: no single active element", order);
        return false;
    };
    let Some(index) = scene.index_of(id) else {
        return false;
    };
    let Some(target) = order.target_index(index, scene.len()) else {
        log::debug!("Ignoring {:?}: element {} already at boundary", order, id);
        return false;
    };

    if !scene.move_index(index, target) {
        return false;
    }
    log::info!("{}: element {} moved from {} to {}", order, id, index, target);
    scene.push_event(EditorEvent::Reordered {
        id,
        order,
        old_index: index,
        new_index: target,
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{Color32, Pos2, Vec2};

    fn abc() -> (Scene, [crate::element::ElementId; 3]) {
        let mut scene = Scene::new(Color32::WHITE);
        let mk = || factory::create_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::RED);
        let a = scene.add(mk());
        let b = scene.add(mk());
        let c = scene.add(mk());
        (scene, [a, b, c])
    }

    #[test]
    fn test_to_front_and_back() {
        let (mut scene, [a, b, c]) = abc();
        scene.set_active(b);
        assert!(reorder(&mut scene, LayerOrder::ToFront));
        assert_eq!(scene.ids(), vec![a, c, b]);

        let (mut scene, [a, b, c]) = abc();
        scene.set_active(b);
        assert!(reorder(&mut scene, LayerOrder::ToBack));
        assert_eq!(scene.ids(), vec![b, a, c]);
        assert!(scene.is_active(b));
    }

    #[test]
    fn test_steps() {
        let (mut scene, [a, b, c]) = abc();
        scene.set_active(b);
        assert!(reorder(&mut scene, LayerOrder::StepForward));
        assert_eq!(scene.ids(), vec![a, c, b]);

        let (mut scene, [a, b, c]) = abc();
        scene.set_active(c);
        assert!(reorder(&mut scene, LayerOrder::StepBackward));
        assert_eq!(scene.ids(), vec![a, c, b]);
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let (mut scene, [a, b, c]) = abc();
        scene.set_active(c);
        assert!(!reorder(&mut scene, LayerOrder::StepForward));
        assert!(!reorder(&mut scene, LayerOrder::ToFront));
        scene.set_active(a);
        assert!(!reorder(&mut scene, LayerOrder::StepBackward));
        assert_eq!(scene.ids(), vec![a, b, c]);
    }

    #[test]
    fn test_requires_single_active() {
        let (mut scene, [a, b, c]) = abc();
        assert!(!reorder(&mut scene, LayerOrder::ToFront));
        scene.set_active_group(&[a, b]);
        assert!(!reorder(&mut scene, LayerOrder::ToFront));
        assert_eq!(scene.ids(), vec![a, b, c]);
    }
}
