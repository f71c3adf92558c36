use egui::{Context, PointerButton, Pos2, Rect};

use crate::layer::LayerOrder;
use crate::tools::{PendingShapeKind, ToolMode};

mod router;
pub use router::{route_event, route_widget};

/// Pointer input in canvas coordinates (origin at the canvas' top-left)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { location: Pos2 },
    PointerMove { location: Pos2 },
    PointerUp { location: Pos2 },
    DoubleClick { location: Pos2 },
}

/// Changes coming from the toolbar controls
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    Mode(ToolMode),
    PendingShape(Option<PendingShapeKind>),
    DragCreate(bool),
    /// Raw text of the color input
    Color(String),
    Width(i64),
    Opacity(i64),
    Layer(LayerOrder),
    CropBegin,
    CropConfirm,
    CropCancel,
    RemoveSelected,
    Clear,
}

/// Turns raw egui pointer state into canvas `InputEvent`s.
///
/// Presses only count when they start inside the canvas; once a press is
/// captured, moves and the release are reported even outside it so drags
/// never get stuck.
#[derive(Debug, Default)]
pub struct InputHandler {
    canvas_rect: Option<Rect>,
    last_pointer_pos: Option<Pos2>,
    captured: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screen rectangle the canvas was painted into this frame
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = Some(rect);
    }

    /// Last pointer position, if it was over the canvas
    pub fn last_canvas_pos(&self) -> Option<Pos2> {
        self.last_pointer_pos
            .filter(|pos| self.inside(*pos))
            .map(|pos| self.to_canvas(pos))
    }

    fn to_canvas(&self, pos: Pos2) -> Pos2 {
        match self.canvas_rect {
            Some(rect) => Pos2::ZERO + (pos - rect.min),
            None => pos,
        }
    }

    fn inside(&self, pos: Pos2) -> bool {
        self.canvas_rect.is_some_and(|rect| rect.contains(pos))
    }

    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let mut events = Vec::new();

        ctx.input(|input| {
            let pointer = &input.pointer;
            let Some(pos) = pointer.interact_pos() else {
                self.last_pointer_pos = None;
                return;
            };

            if pointer.button_pressed(PointerButton::Primary) && self.inside(pos) {
                self.captured = true;
                events.push(InputEvent::PointerDown {
                    location: self.to_canvas(pos),
                });
            }

            if self.captured && Some(pos) != self.last_pointer_pos && pointer.button_down(PointerButton::Primary) {
                events.push(InputEvent::PointerMove {
                    location: self.to_canvas(pos),
                });
            }

            if self.captured && pointer.button_released(PointerButton::Primary) {
                self.captured = false;
                events.push(InputEvent::PointerUp {
                    location: self.to_canvas(pos),
                });
            }

            // egui reports double clicks on the release, after the gesture ends
            if pointer.button_double_clicked(PointerButton::Primary) && self.inside(pos) {
                events.push(InputEvent::DoubleClick {
                    location: self.to_canvas(pos),
                });
            }

            self.last_pointer_pos = Some(pos);
        });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Vec2;

    #[test]
    fn test_canvas_coordinates() {
        let mut handler = InputHandler::new();
        handler.set_canvas_rect(Rect::from_min_size(Pos2::new(200.0, 40.0), Vec2::splat(500.0)));
        assert_eq!(handler.to_canvas(Pos2::new(250.0, 90.0)), Pos2::new(50.0, 50.0));
        assert!(handler.inside(Pos2::new(250.0, 90.0)));
        assert!(!handler.inside(Pos2::new(10.0, 10.0)));
    }
}
