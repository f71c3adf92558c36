use egui::Color32;

use crate::panel::PropertyPanelState;

/// Freehand brush settings pushed to the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Color32,
    pub width: f32,
}

impl Brush {
    pub fn from_panel(panel: &PropertyPanelState) -> Self {
        Self {
            color: panel.color,
            width: panel.width as f32,
        }
    }

    /// Copy the panel's color and width; returns true if anything changed
    pub fn sync(&mut self, panel: &PropertyPanelState) -> bool {
        let next = Self::from_panel(panel);
        let changed = *self != next;
        *self = next;
        changed
    }
}

/// Pointer input forwarded to the renderer's brush in free-draw mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrushInput {
    Down(egui::Pos2),
    Move(egui::Pos2),
    Up(egui::Pos2),
}

/// Accumulates brush points between pointer down and up.
///
/// Renderers that implement their own brush can use this to hand the finished
/// stroke back to the session.
#[derive(Debug, Default, Clone)]
pub struct StrokeCapture {
    points: Vec<egui::Pos2>,
    active: bool,
}

impl StrokeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one input; returns the finished stroke on `Up`
    pub fn feed(&mut self, input: BrushInput) -> Option<Vec<egui::Pos2>> {
        match input {
            BrushInput::Down(pos) => {
                self.points.clear();
                self.points.push(pos);
                self.active = true;
                None
            }
            BrushInput::Move(pos) => {
                if self.active {
                    self.points.push(pos);
                }
                None
            }
            BrushInput::Up(pos) => {
                if !self.active {
                    return None;
                }
                self.active = false;
                self.points.push(pos);
                Some(std::mem::take(&mut self.points))
            }
        }
    }

    /// Points of the stroke in progress, for previews
    pub fn points(&self) -> &[egui::Pos2] {
        &self.points
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.points.clear();
        self.active = false;
    }
}
