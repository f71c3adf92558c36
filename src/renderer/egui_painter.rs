use egui::{Align2, Color32, Context, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2};

use crate::brush::{Brush, BrushInput, StrokeCapture};
use crate::element::common::triangle_vertices;
use crate::element::{Element, ElementKind};
use crate::error::RenderError;
use crate::scene::Scene;
use crate::texture_manager::TextureManager;
use crate::tools::{Corner, RESIZE_HANDLE_RADIUS};

use super::{raster, SceneRenderer};

const SELECTION_COLOR: Color32 = Color32::from_rgb(0, 120, 215);
const TEXTURE_CACHE_SIZE: usize = 64;

/// Paints a scene with egui's painter and exports through the software
/// rasterizer.
pub struct EguiRenderer {
    ctx: Context,
    canvas_size: Vec2,
    drawing: bool,
    brush: Brush,
    capture: StrokeCapture,
    textures: TextureManager,
}

impl std::fmt::Debug for EguiRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EguiRenderer")
            .field("canvas_size", &self.canvas_size)
            .field("drawing", &self.drawing)
            .field("brush", &self.brush)
            .field("textures", &self.textures)
            .finish()
    }
}

impl EguiRenderer {
    pub fn new(ctx: Context, canvas_size: Vec2) -> Self {
        Self {
            ctx,
            canvas_size,
            drawing: false,
            brush: Brush {
                color: Color32::BLACK,
                width: 1.0,
            },
            capture: StrokeCapture::new(),
            textures: TextureManager::new(TEXTURE_CACHE_SIZE),
        }
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    /// Paint `scene` with its top-left corner at `origin`
    pub fn paint(&mut self, scene: &Scene, painter: &Painter, origin: Pos2) {
        self.textures.begin_frame();
        self.textures.retain(|id| scene.get(id).is_some());

        let offset = origin.to_vec2();
        let canvas = Rect::from_min_size(origin, self.canvas_size);
        painter.rect_filled(canvas, 0.0, scene.background());

        let painter = painter.with_clip_rect(canvas);
        for element in scene.elements() {
            self.paint_element(element, &painter, offset);
        }

        // Selection chrome
        for element in scene.elements().iter().filter(|element| scene.is_active(element.id())) {
            let rect = element.rect().translate(offset);
            painter.rect_stroke(rect.expand(1.0), 0.0, Stroke::new(1.0, SELECTION_COLOR));
            if scene.active_element().is_some() && element.is_selectable() {
                for corner in Corner::ALL {
                    painter.circle_filled(corner.position(rect), RESIZE_HANDLE_RADIUS / 2.0, SELECTION_COLOR);
                }
            }
        }

        // Stroke in progress
        let preview = self.capture.points();
        if preview.len() > 1 {
            let points = preview.iter().map(|p| *p + offset).collect();
            painter.add(Shape::line(points, Stroke::new(self.brush.width, self.brush.color)));
        }
    }

    fn paint_element(&mut self, element: &Element, painter: &Painter, offset: Vec2) {
        let style = element.style();
        let rect = element.rect().translate(offset);
        let fill = style.fill.gamma_multiply(style.opacity);
        let stroke = style
            .stroke
            .map(|color| Stroke::new(style.stroke_width, color.gamma_multiply(style.opacity)))
            .unwrap_or(Stroke::NONE);

        match element.kind() {
            ElementKind::Rectangle => {
                painter.rect_filled(rect, 0.0, fill);
                if stroke != Stroke::NONE {
                    painter.rect_stroke(rect, 0.0, stroke);
                }
            }
            ElementKind::Triangle => {
                let vertices = triangle_vertices(rect).to_vec();
                painter.add(Shape::convex_polygon(vertices, fill, stroke));
            }
            ElementKind::Line { end } => {
                let start = element.position() + offset;
                let color = style.stroke.unwrap_or(style.fill).gamma_multiply(style.opacity);
                painter.line_segment([start, start + *end], Stroke::new(style.stroke_width, color));
            }
            ElementKind::TextBox { text, font_size } => {
                painter.text(rect.min, Align2::LEFT_TOP, text, FontId::proportional(*font_size), fill);
            }
            ElementKind::Image(content) => match self.textures.texture_for(element.id(), content, &self.ctx) {
                Ok(texture) => {
                    painter.image(texture, rect, content.uv(), Color32::WHITE.gamma_multiply(style.opacity));
                }
                Err(err) => {
                    log::error!("Failed to upload image {}: {}", content.name(), err);
                    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::RED));
                }
            },
            ElementKind::Path(path) => {
                let points = path.absolute_points(element.position() + offset);
                let color = style.stroke.unwrap_or(style.fill).gamma_multiply(style.opacity);
                painter.add(Shape::line(points, Stroke::new(style.stroke_width, color)));
            }
        }
    }
}

impl SceneRenderer for EguiRenderer {
    fn set_drawing_mode(&mut self, enabled: bool) {
        if !enabled {
            self.capture.cancel();
        }
        self.drawing = enabled;
    }

    fn configure_brush(&mut self, brush: &Brush) {
        self.brush = *brush;
    }

    fn brush_input(&mut self, input: BrushInput) -> Option<Vec<Pos2>> {
        if !self.drawing {
            return None;
        }
        let finished = self.capture.feed(input);
        self.ctx.request_repaint();
        finished
    }

    fn request_render(&mut self) {
        // egui repaints the whole canvas every frame it runs
        self.ctx.request_repaint();
    }

    fn encode_png(&mut self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        raster::encode_png(scene, self.canvas_size)
    }

    fn release(&mut self) {
        self.capture.cancel();
        self.textures.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brush_ignored_outside_drawing_mode() {
        let mut renderer = EguiRenderer::new(Context::default(), Vec2::splat(100.0));
        assert_eq!(renderer.brush_input(BrushInput::Down(Pos2::ZERO)), None);

        renderer.set_drawing_mode(true);
        renderer.brush_input(BrushInput::Down(Pos2::ZERO));
        renderer.brush_input(BrushInput::Move(Pos2::new(5.0, 5.0)));
        let stroke = renderer.brush_input(BrushInput::Up(Pos2::new(10.0, 0.0))).unwrap();
        assert_eq!(stroke.len(), 3);
    }

    #[test]
    fn test_paint_scene() {
        let ctx = Context::default();
        let mut renderer = EguiRenderer::new(ctx.clone(), Vec2::splat(100.0));
        let mut scene = Scene::new(Color32::WHITE);
        let id = scene.add(crate::element::factory::create_triangle(
            Pos2::new(10.0, 10.0),
            Vec2::splat(30.0),
            Color32::RED,
        ));
        scene.set_active(id);

        let rect = Rect::from_min_size(Pos2::ZERO, Vec2::splat(100.0));
        let painter = Painter::new(ctx, egui::LayerId::background(), rect);
        renderer.paint(&scene, &painter, Pos2::ZERO);
    }
}
