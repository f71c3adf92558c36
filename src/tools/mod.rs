use egui::{Pos2, Rect, Vec2};
use std::fmt;

use crate::brush::{Brush, BrushInput};
use crate::clip::ClipSession;
use crate::config::EditorConfig;
use crate::element::{factory, Element, ElementId};
use crate::panel::PropertyPanelState;
use crate::renderer::SceneRenderer;
use crate::scene::Scene;

mod drag_create;
mod resize;

pub use drag_create::DragCreate;
pub use resize::{corner_at, resized_rect, Corner, RESIZE_HANDLE_RADIUS};

/// Pointer interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolMode {
    /// Pick, move and resize objects; create shapes
    #[default]
    Select,
    /// Pointer drags go to the renderer's freehand brush
    FreeDraw,
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolMode::Select => f.write_str("select"),
            ToolMode::FreeDraw => f.write_str("draw"),
        }
    }
}

/// Shape the next double-click on empty canvas creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PendingShapeKind {
    Rectangle,
    OutlineRectangle,
    Triangle,
    Line,
    TextBox,
}

impl PendingShapeKind {
    pub const ALL: [PendingShapeKind; 5] = [
        PendingShapeKind::Rectangle,
        PendingShapeKind::OutlineRectangle,
        PendingShapeKind::Line,
        PendingShapeKind::Triangle,
        PendingShapeKind::TextBox,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PendingShapeKind::Rectangle => "Rectangle",
            PendingShapeKind::OutlineRectangle => "Outline",
            PendingShapeKind::Triangle => "Triangle",
            PendingShapeKind::Line => "Line",
            PendingShapeKind::TextBox => "Text",
        }
    }

    /// Build the element for a double-click at `point`.
    ///
    /// Box shapes are centered on the point, lines start at it and text boxes
    /// sit at the point minus the configured anchor offset.
    pub fn instantiate(self, point: Pos2, panel: &PropertyPanelState, config: &EditorConfig) -> Element {
        let size = Vec2::splat(config.shape_size);
        let corner = point - size / 2.0;
        let color = panel.color;
        let width = panel.width as f32;

        let mut element = match self {
            PendingShapeKind::Rectangle => factory::create_rectangle(corner, size, color),
            PendingShapeKind::OutlineRectangle => factory::create_outline_rectangle(corner, size, color, width),
            PendingShapeKind::Triangle => factory::create_triangle(corner, size, color),
            PendingShapeKind::Line => {
                factory::create_line(point, Vec2::new(config.line_length, 0.0), color, width)
            }
            PendingShapeKind::TextBox => factory::create_text(
                point - Vec2::splat(config.text_anchor_offset),
                config.default_text.clone(),
                config.font_size,
                color,
            ),
        };
        element.set_opacity(panel.opacity_fraction());
        element
    }
}

/// Pointer gesture in flight between down and up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    Moving {
        id: ElementId,
        grab_offset: Vec2,
    },
    Resizing {
        id: ElementId,
        corner: Corner,
        original: Rect,
        start: Pos2,
    },
    DragCreating(DragCreate),
    Brushing,
}

/// Everything a pointer handler may touch, borrowed from the live session
pub struct ToolContext<'a, R: SceneRenderer + ?Sized> {
    pub scene: &'a mut Scene,
    pub renderer: &'a mut R,
    pub clip: Option<&'a ClipSession>,
    pub panel: &'a PropertyPanelState,
    pub brush: &'a Brush,
    pub config: &'a EditorConfig,
}

/// Owns the tool mode and pending shape, and turns pointer input into scene
/// mutations according to them.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    mode: ToolMode,
    pending: Option<PendingShapeKind>,
    drag_create: bool,
    gesture: Gesture,
}

impl ToolController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn pending_shape(&self) -> Option<PendingShapeKind> {
        self.pending
    }

    pub fn drag_create_enabled(&self) -> bool {
        self.drag_create
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, Gesture::Idle)
    }

    /// Switch modes. Free drawing drops the pending shape and the drag-create
    /// sub-tool. Returns the previous mode if it changed.
    pub fn set_mode(&mut self, mode: ToolMode) -> Option<ToolMode> {
        if mode == ToolMode::FreeDraw {
            self.pending = None;
            self.drag_create = false;
        }
        if self.mode == mode {
            return None;
        }
        let old = self.mode;
        self.mode = mode;
        self.gesture = Gesture::Idle;
        log::info!("Tool mode {} -> {}", old, mode);
        Some(old)
    }

    /// Arm (or disarm) a shape for double-click creation. Forces select mode;
    /// returns the previous mode if that changed it.
    pub fn set_pending_shape(&mut self, kind: Option<PendingShapeKind>) -> Option<ToolMode> {
        self.pending = kind;
        log::debug!("Pending shape: {:?}", kind);
        self.set_mode(ToolMode::Select)
    }

    /// Toggle the drag-to-create rectangle sub-tool. Enabling it forces select mode.
    pub fn set_drag_create(&mut self, enabled: bool) -> Option<ToolMode> {
        self.drag_create = enabled;
        if enabled {
            self.set_mode(ToolMode::Select)
        } else {
            None
        }
    }

    /// Forget any gesture in flight (session teardown, scene cleared)
    pub fn reset_gesture(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Create the pending shape at `point` unless something is already there
    pub fn on_double_click<R: SceneRenderer + ?Sized>(
        &mut self,
        ctx: &mut ToolContext<'_, R>,
        point: Pos2,
    ) -> Option<ElementId> {
        // The press of the second click may have started a drag-create
        if let Gesture::DragCreating(drag) = self.gesture {
            self.gesture = Gesture::Idle;
            ctx.scene.remove(drag.id());
        }
        if let Some(hit) = ctx.renderer.pick(ctx.scene, point) {
            log::debug!("Double-click on element {}, not creating", hit);
            return None;
        }
        let kind = self.pending?;
        let element = kind.instantiate(point, ctx.panel, ctx.config);
        log::info!("🟦 Creating {} at {:?}", element.element_type(), point);
        Some(ctx.scene.add(element))
    }

    /// The host resized `id` to `rect` on its own (handles drawn outside the
    /// canvas, keyboard nudges). A crop mask stays inside its image.
    pub fn on_object_scaled<R: SceneRenderer + ?Sized>(
        &mut self,
        ctx: &mut ToolContext<'_, R>,
        id: ElementId,
        rect: Rect,
    ) {
        if let Some(clip) = ctx.clip.filter(|clip| clip.mask() == id) {
            clip.on_mask_scaled(ctx.scene, rect);
            return;
        }
        ctx.scene.update(id, |element| {
            if let Err(err) = element.resize(rect) {
                log::debug!("Resize of {} rejected: {}", id, err);
            }
        });
    }

    pub fn on_pointer_down<R: SceneRenderer + ?Sized>(&mut self, ctx: &mut ToolContext<'_, R>, point: Pos2) {
        if self.mode == ToolMode::FreeDraw {
            ctx.renderer.brush_input(BrushInput::Down(point));
            self.gesture = Gesture::Brushing;
            return;
        }

        // Corner handles of the active element win over everything else
        if let Some(active) = ctx.scene.active_element().filter(|element| element.is_selectable()) {
            let rect = active.rect();
            if let Some(corner) = corner_at(rect, point) {
                self.gesture = Gesture::Resizing {
                    id: active.id(),
                    corner,
                    original: rect,
                    start: point,
                };
                return;
            }
        }

        match ctx.renderer.pick(ctx.scene, point) {
            Some(id) => {
                let Some(element) = ctx.scene.get(id) else {
                    return;
                };
                if !element.is_selectable() {
                    log::debug!("Element {} is locked", id);
                    return;
                }
                let grab_offset = point - element.position();
                ctx.scene.set_active(id);
                self.gesture = Gesture::Moving { id, grab_offset };
            }
            None if self.drag_create => {
                let (drag, element) = DragCreate::start(point, ctx.panel);
                ctx.scene.add(element);
                self.gesture = Gesture::DragCreating(drag);
            }
            None => ctx.scene.discard_active(),
        }
    }

    pub fn on_pointer_move<R: SceneRenderer + ?Sized>(&mut self, ctx: &mut ToolContext<'_, R>, point: Pos2) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Brushing => {
                ctx.renderer.brush_input(BrushInput::Move(point));
            }
            Gesture::Moving { id, grab_offset } => {
                let position = point - grab_offset;
                match ctx.clip.filter(|clip| clip.mask() == id) {
                    Some(clip) => clip.on_mask_moved(ctx.scene, position),
                    None => {
                        ctx.scene.update(id, |element| element.set_position(position));
                    }
                }
            }
            Gesture::Resizing { id, corner, original, start } => {
                let rect = resized_rect(original, corner, point - start);
                self.on_object_scaled(ctx, id, rect);
            }
            Gesture::DragCreating(drag) => {
                let size = drag.size_at(point);
                ctx.scene.update(drag.id(), |element| element.set_size(size));
            }
        }
    }

    pub fn on_pointer_up<R: SceneRenderer + ?Sized>(&mut self, ctx: &mut ToolContext<'_, R>, point: Pos2) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Brushing => {
                let Some(points) = ctx.renderer.brush_input(BrushInput::Up(point)) else {
                    return;
                };
                match factory::create_path(&points, ctx.brush.color, ctx.brush.width) {
                    Some(path) => {
                        log::info!("🖌️ Freehand stroke with {} points", points.len());
                        ctx.scene.add(path);
                    }
                    None => log::debug!("Discarding stroke with {} points", points.len()),
                }
            }
            Gesture::DragCreating(drag) => {
                let size = drag.size_at(point);
                if size == Vec2::ZERO {
                    // A click without movement is not a rectangle
                    ctx.scene.remove(drag.id());
                    return;
                }
                ctx.scene.update(drag.id(), |element| element.set_size(size));
                log::info!("🟦 Drag-created rectangle {} with size {:?}", drag.id(), size);
            }
            gesture @ (Gesture::Moving { .. } | Gesture::Resizing { .. }) => {
                // Land on the final pointer position before ending
                self.gesture = gesture;
                self.on_pointer_move(ctx, point);
                self.gesture = Gesture::Idle;
            }
            Gesture::Idle => {}
        }
    }
}
