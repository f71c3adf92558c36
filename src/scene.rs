use egui::{Color32, Pos2};
use std::mem;

use crate::element::{Element, ElementId};
use crate::event::EditorEvent;

/// What is currently selected on the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveSelection {
    Object(ElementId),
    /// Explicit multi-object selection
    Group(Vec<ElementId>),
}

impl ActiveSelection {
    pub fn contains(&self, id: ElementId) -> bool {
        match self {
            Self::Object(active) => *active == id,
            Self::Group(ids) => ids.contains(&id),
        }
    }

    pub fn single(&self) -> Option<ElementId> {
        match self {
            Self::Object(id) => Some(*id),
            Self::Group(_) => None,
        }
    }
}

/// Ordered collection of elements. Index 0 is the back, the last element is
/// frontmost; render order and z-order are the same thing.
#[derive(Debug)]
pub struct Scene {
    elements: Vec<Element>,
    background: Color32,
    active: Option<ActiveSelection>,
    pending: Vec<EditorEvent>,
}

impl Scene {
    pub fn new(background: Color32) -> Self {
        Self {
            elements: Vec::new(),
            background,
            active: None,
            pending: Vec::new(),
        }
    }

    pub fn background(&self) -> Color32 {
        self.background
    }

    /// Elements back to front
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn ids(&self) -> Vec<ElementId> {
        self.elements.iter().map(Element::id).collect()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    fn notify(&mut self, event: EditorEvent) {
        self.pending.push(event);
    }

    /// Drain the notifications queued since the last call
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        mem::take(&mut self.pending)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|element| element.id() == id)
    }

    pub fn index_of(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|element| element.id() == id)
    }

    /// Mutate an element in place; the change is reported as `ObjectMutated`
    pub fn update<R>(&mut self, id: ElementId, f: impl FnOnce(&mut Element) -> R) -> Option<R> {
        let index = self.index_of(id)?;
        let result = f(&mut self.elements[index]);
        self.notify(EditorEvent::ObjectMutated { id });
        Some(result)
    }

    /// Append as the frontmost element
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = element.id();
        log::debug!("Adding {} {} at index {}", element.element_type(), id, self.elements.len());
        self.elements.push(element);
        self.notify(EditorEvent::ObjectAdded { id });
        id
    }

    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let index = self.index_of(id)?;
        let element = self.elements.remove(index);

        let was_active = self.active.as_ref().is_some_and(|active| active.contains(id));
        if was_active {
            self.active = match self.active.take() {
                Some(ActiveSelection::Group(mut ids)) => {
                    ids.retain(|other| *other != id);
                    (!ids.is_empty()).then_some(ActiveSelection::Group(ids))
                }
                _ => None,
            };
        }

        self.notify(EditorEvent::ObjectRemoved { id });
        if was_active {
            let selection = self.active.clone();
            self.notify(EditorEvent::SelectionChanged { selection });
        }
        Some(element)
    }

    /// Remove every element; the background stays
    pub fn clear(&mut self) {
        self.elements.clear();
        let had_selection = self.active.take().is_some();
        self.notify(EditorEvent::SceneCleared);
        if had_selection {
            self.notify(EditorEvent::SelectionChanged { selection: None });
        }
    }

    pub fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    /// The single active element, if the selection is not a group
    pub fn active_element(&self) -> Option<&Element> {
        let id = self.active.as_ref()?.single()?;
        self.get(id)
    }

    pub fn is_active(&self, id: ElementId) -> bool {
        self.active.as_ref().is_some_and(|active| active.contains(id))
    }

    /// Make `id` the one active element. Unknown ids are ignored.
    pub fn set_active(&mut self, id: ElementId) -> bool {
        if self.index_of(id).is_none() {
            return false;
        }
        let selection = ActiveSelection::Object(id);
        if self.active.as_ref() == Some(&selection) {
            return true;
        }
        self.active = Some(selection.clone());
        self.notify(EditorEvent::SelectionChanged { selection: Some(selection) });
        true
    }

    /// Select several elements at once. One id collapses to a plain selection.
    pub fn set_active_group(&mut self, ids: &[ElementId]) -> bool {
        let mut members: Vec<ElementId> = Vec::new();
        for id in ids {
            if self.index_of(*id).is_some() && !members.contains(id) {
                members.push(*id);
            }
        }
        match members.len() {
            0 => {
                self.discard_active();
                false
            }
            1 => self.set_active(members[0]),
            _ => {
                let selection = ActiveSelection::Group(members);
                self.active = Some(selection.clone());
                self.notify(EditorEvent::SelectionChanged { selection: Some(selection) });
                true
            }
        }
    }

    pub fn discard_active(&mut self) {
        if self.active.take().is_some() {
            self.notify(EditorEvent::SelectionChanged { selection: None });
        }
    }

    /// Topmost element under `pos`
    pub fn hit_test(&self, pos: Pos2) -> Option<ElementId> {
        self.elements
            .iter()
            .rev()
            .find(|element| element.hit_test(pos))
            .map(Element::id)
    }

    /// Move the element at `from` to `to`, shifting the ones in between
    pub(crate) fn move_index(&mut self, from: usize, to: usize) -> bool {
        if from >= self.elements.len() || to >= self.elements.len() || from == to {
            return false;
        }
        let element = self.elements.remove(from);
        self.elements.insert(to, element);
        true
    }

    pub(crate) fn push_event(&mut self, event: EditorEvent) {
        self.notify(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use egui::{Pos2, Vec2};

    fn rect_at(x: f32) -> Element {
        factory::create_rectangle(Pos2::new(x, 0.0), Vec2::splat(10.0), Color32::RED)
    }

    #[test]
    fn test_add_appends_frontmost() {
        let mut scene = Scene::new(Color32::WHITE);
        let a = scene.add(rect_at(0.0));
        let b = scene.add(rect_at(5.0));
        assert_eq!(scene.ids(), vec![a, b]);
        // Overlap at x=7: b is in front
        assert_eq!(scene.hit_test(Pos2::new(7.0, 5.0)), Some(b));
        assert_eq!(scene.hit_test(Pos2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_single_active_selection() {
        let mut scene = Scene::new(Color32::WHITE);
        let a = scene.add(rect_at(0.0));
        let b = scene.add(rect_at(20.0));
        scene.take_events();

        assert!(scene.set_active(a));
        assert!(scene.set_active(b));
        assert!(!scene.is_active(a));
        assert!(scene.is_active(b));

        let events = scene.take_events();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_group_selection_and_removal() {
        let mut scene = Scene::new(Color32::WHITE);
        let a = scene.add(rect_at(0.0));
        let b = scene.add(rect_at(20.0));
        let c = scene.add(rect_at(40.0));

        assert!(scene.set_active_group(&[a, c]));
        assert_eq!(scene.active(), Some(&ActiveSelection::Group(vec![a, c])));
        assert!(scene.active_element().is_none());

        scene.remove(a);
        assert_eq!(scene.active(), Some(&ActiveSelection::Group(vec![c])));
        assert_eq!(scene.ids(), vec![b, c]);
    }

    #[test]
    fn test_clear_keeps_background() {
        let mut scene = Scene::new(Color32::LIGHT_BLUE);
        let a = scene.add(rect_at(0.0));
        scene.set_active(a);
        scene.take_events();

        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.active().is_none());
        assert_eq!(scene.background(), Color32::LIGHT_BLUE);
        assert_eq!(
            scene.take_events(),
            vec![EditorEvent::SceneCleared, EditorEvent::SelectionChanged { selection: None }]
        );
    }
}
