use egui::Pos2;

use crate::brush::{Brush, BrushInput};
use crate::element::ElementId;
use crate::error::RenderError;
use crate::scene::Scene;

mod egui_painter;
mod mount;
pub mod raster;

pub use egui_painter::EguiRenderer;
pub use mount::{MountKind, validate_mount};

/// Capabilities the editor session needs from the drawing engine.
///
/// The session owns exactly one renderer between `acquire` and `release`.
/// Rendering, picking and rasterizing are the renderer's job; the session
/// only decides *what* changes.
pub trait SceneRenderer {
    /// Toggle the engine's freehand drawing flag
    fn set_drawing_mode(&mut self, enabled: bool);

    /// Overwrite the freehand brush color and width
    fn configure_brush(&mut self, brush: &Brush);

    /// Forward pointer input to the freehand brush. Returns the finished
    /// stroke (absolute points) when the input completes one.
    fn brush_input(&mut self, input: BrushInput) -> Option<Vec<Pos2>>;

    /// Topmost element under `pos`
    fn pick(&self, scene: &Scene, pos: Pos2) -> Option<ElementId> {
        scene.hit_test(pos)
    }

    /// Ask for the scene to be redrawn at the next opportunity
    fn request_render(&mut self);

    /// Rasterize the full scene as it is right now and encode it as PNG
    fn encode_png(&mut self, scene: &Scene) -> Result<Vec<u8>, RenderError>;

    /// Called once when the session is torn down
    fn release(&mut self) {}
}
