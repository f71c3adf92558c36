use egui::{Color32, Pos2, Rect, Vec2};
use std::fmt;
use uuid::Uuid;

pub(crate) mod common;
pub(crate) mod image;
pub(crate) mod path;

pub use common::{HIT_TOLERANCE, MIN_ELEMENT_SIZE};
pub use image::ImageContent;
pub use path::PathContent;

/// Stable identity of an element, independent of its position in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Paint attributes shared by every element kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Color32,
    pub stroke: Option<Color32>,
    pub stroke_width: f32,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Color32::BLACK,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

/// Kind-specific payload of an element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Filled or outline rectangle
    Rectangle,
    Triangle,
    /// Segment from the element position to `position + end`
    Line { end: Vec2 },
    TextBox { text: String, font_size: f32 },
    Image(ImageContent),
    Path(PathContent),
}

/// One placed shape, text, image or stroke on the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    kind: ElementKind,
    /// Left/top anchor
    position: Pos2,
    /// May be negative while a shape is being drag-created
    size: Vec2,
    style: Style,
    selectable: bool,
}

impl Element {
    pub fn new(kind: ElementKind, position: Pos2, size: Vec2, style: Style) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            position,
            size,
            style,
            selectable: true,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut ElementKind {
        &mut self.kind
    }

    /// Short type tag used in logs and by hosts
    pub fn element_type(&self) -> &'static str {
        match self.kind {
            ElementKind::Rectangle => "rect",
            ElementKind::Triangle => "triangle",
            ElementKind::Line { .. } => "line",
            ElementKind::TextBox { .. } => "textbox",
            ElementKind::Image(_) => "image",
            ElementKind::Path(_) => "path",
        }
    }

    pub fn is_rectangle(&self) -> bool {
        matches!(self.kind, ElementKind::Rectangle)
    }

    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image(_))
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn set_selectable(&mut self, selectable: bool) {
        self.selectable = selectable;
    }

    /// Normalized bounding rectangle
    pub fn rect(&self) -> Rect {
        common::signed_rect(self.position, self.size)
    }

    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Sets the raw signed size, used while drag-creating
    pub fn set_size(&mut self, size: Vec2) {
        if let ElementKind::Line { end } = &mut self.kind {
            *end = size;
        }
        self.size = size;
    }

    /// Moves and resizes the element to `new_rect`
    pub fn resize(&mut self, new_rect: Rect) -> Result<(), String> {
        match &mut self.kind {
            ElementKind::Line { end } => {
                // A horizontal line legitimately has zero height
                *end = new_rect.size();
            }
            ElementKind::Path(path) => {
                common::validate_rect(&new_rect)?;
                path.rescale(self.size.abs(), new_rect.size());
            }
            _ => common::validate_rect(&new_rect)?,
        }

        self.position = new_rect.min;
        self.size = new_rect.size();
        Ok(())
    }

    pub fn set_fill(&mut self, fill: Color32) {
        self.style.fill = fill;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.style.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn set_stroke(&mut self, stroke: Option<Color32>, width: f32) {
        self.style.stroke = stroke;
        self.style.stroke_width = width;
    }

    /// Test if the element covers the given position
    pub fn hit_test(&self, pos: Pos2) -> bool {
        let rect = self.rect();
        match &self.kind {
            ElementKind::Rectangle | ElementKind::TextBox { .. } | ElementKind::Image(_) => {
                rect.expand(self.style.stroke_width / 2.0).contains(pos)
            }
            ElementKind::Triangle => common::point_in_triangle(pos, common::triangle_vertices(rect)),
            ElementKind::Line { end } => {
                let reach = (self.style.stroke_width / 2.0).max(common::HIT_TOLERANCE);
                common::distance_to_line_segment(pos, self.position, self.position + *end) <= reach
            }
            ElementKind::Path(path) => path.hit_test(self.position, pos, self.style.stroke_width),
        }
    }
}

/// Factory functions for creating elements
pub mod factory {
    use super::*;

    pub fn create_rectangle(position: Pos2, size: Vec2, fill: Color32) -> Element {
        let style = Style { fill, ..Style::default() };
        Element::new(ElementKind::Rectangle, position, size, style)
    }

    /// Rectangle with a transparent body and a colored outline
    pub fn create_outline_rectangle(position: Pos2, size: Vec2, stroke: Color32, width: f32) -> Element {
        let style = Style {
            fill: Color32::TRANSPARENT,
            stroke: Some(stroke),
            stroke_width: width,
            opacity: 1.0,
        };
        Element::new(ElementKind::Rectangle, position, size, style)
    }

    pub fn create_triangle(position: Pos2, size: Vec2, fill: Color32) -> Element {
        let style = Style { fill, ..Style::default() };
        Element::new(ElementKind::Triangle, position, size, style)
    }

    pub fn create_line(start: Pos2, end: Vec2, color: Color32, width: f32) -> Element {
        let style = Style {
            fill: color,
            stroke: Some(color),
            stroke_width: width,
            opacity: 1.0,
        };
        Element::new(ElementKind::Line { end }, start, end, style)
    }

    pub fn create_text(position: Pos2, text: impl Into<String>, font_size: f32, color: Color32) -> Element {
        let text = text.into();
        // Rough box: fonts are the renderer's business, picking only needs an estimate
        let chars = text.chars().count().max(1) as f32;
        let size = Vec2::new(chars * font_size * 0.6, font_size * 1.2);
        let style = Style { fill: color, ..Style::default() };
        Element::new(ElementKind::TextBox { text, font_size }, position, size, style)
    }

    pub fn create_image(position: Pos2, size: Vec2, content: ImageContent) -> Element {
        Element::new(ElementKind::Image(content), position, size, Style::default())
    }

    /// Freehand stroke from absolute brush points; `None` for fewer than two points
    pub fn create_path(points: &[Pos2], color: Color32, width: f32) -> Option<Element> {
        let (origin, size, content) = PathContent::from_absolute(points)?;
        let style = Style {
            fill: Color32::TRANSPARENT,
            stroke: Some(color),
            stroke_width: width,
            opacity: 1.0,
        };
        Some(Element::new(ElementKind::Path(content), origin, size, style))
    }
}
