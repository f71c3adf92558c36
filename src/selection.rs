use egui::Color32;

use crate::event::EditorEvent;
use crate::panel::{clamp_opacity, clamp_width, fraction_to_opacity, opacity_to_fraction, PropertyPanelState};
use crate::scene::{ActiveSelection, Scene};

/// Keeps the property panel and the active element in step.
///
/// Selecting an element pulls its fill and opacity into the panel; editing the
/// panel pushes color and opacity onto the active element. Width only affects
/// elements created afterwards and the freehand brush.
#[derive(Debug, Clone)]
pub struct SelectionBinding {
    panel: PropertyPanelState,
}

impl SelectionBinding {
    pub fn new(panel: PropertyPanelState) -> Self {
        Self { panel }
    }

    pub fn panel(&self) -> &PropertyPanelState {
        &self.panel
    }

    /// React to a scene notification. Returns true if the panel changed.
    pub fn on_event(&mut self, event: &EditorEvent, scene: &Scene) -> bool {
        let EditorEvent::SelectionChanged {
            selection: Some(ActiveSelection::Object(id)),
        } = event
        else {
            return false;
        };
        let Some(element) = scene.get(*id) else {
            return false;
        };

        let next = PropertyPanelState {
            color: element.style().fill,
            opacity: fraction_to_opacity(element.style().opacity),
            ..self.panel
        };
        self.replace(next)
    }

    /// Set the panel color and fill the single active element with it
    pub fn set_color(&mut self, color: Color32, scene: Option<&mut Scene>) -> bool {
        if let Some(scene) = scene {
            if let Some(id) = scene.active().and_then(ActiveSelection::single) {
                scene.update(id, |element| element.set_fill(color));
            }
        }
        self.replace(PropertyPanelState { color, ..self.panel })
    }

    /// Set the panel width; existing elements keep theirs
    pub fn set_width(&mut self, raw: i64) -> bool {
        let width = clamp_width(raw);
        self.replace(PropertyPanelState { width, ..self.panel })
    }

    /// Set the panel opacity step and apply it to the active element when
    /// that element is a rectangle
    pub fn set_opacity(&mut self, raw: i64, scene: Option<&mut Scene>) -> bool {
        let opacity = clamp_opacity(raw);
        if let Some(scene) = scene {
            let target = scene
                .active_element()
                .filter(|element| element.is_rectangle())
                .map(|element| element.id());
            if let Some(id) = target {
                scene.update(id, |element| element.set_opacity(opacity_to_fraction(opacity)));
            }
        }
        self.replace(PropertyPanelState { opacity, ..self.panel })
    }

    fn replace(&mut self, next: PropertyPanelState) -> bool {
        if self.panel == next {
            return false;
        }
        log::debug!("Panel {:?} -> {:?}", self.panel, next);
        self.panel = next;
        true
    }
}
