use egui::{Color32, Pos2, Rect};
use raw_window_handle::RawWindowHandle;
use std::mem;

use crate::brush::Brush;
use crate::clip::ClipSession;
use crate::color::{parse_color, ColorParseError};
use crate::config::EditorConfig;
use crate::element::ElementId;
use crate::error::EditorError;
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::export::{self, DownloadSink, ExportOutcome};
use crate::import::{self, DecodedImage, ImportTicket, PendingImport};
use crate::layer::{self, LayerOrder};
use crate::panel::PropertyPanelState;
use crate::renderer::{validate_mount, MountKind, SceneRenderer};
use crate::scene::{ActiveSelection, Scene};
use crate::selection::SelectionBinding;
use crate::tools::{PendingShapeKind, ToolContext, ToolController, ToolMode};

/// Where the session is in its life
enum Lifecycle<R> {
    /// No renderer yet; canvas operations are ignored
    Uninitialized,
    Live { renderer: R, scene: Scene },
    Released,
}

/// One canvas editing session.
///
/// Owns the renderer from `acquire` until `release` together with the scene
/// it draws, and every piece of interaction state around it (tool mode,
/// property panel, brush, crop). All operations run to completion on the
/// caller's thread. Operations that arrive before `acquire` or after
/// `release` are ignored.
pub struct EditorSession<R: SceneRenderer> {
    config: EditorConfig,
    lifecycle: Lifecycle<R>,
    mount: Option<MountKind>,
    tools: ToolController,
    binding: SelectionBinding,
    brush: Brush,
    clip: Option<ClipSession>,
    imports: Vec<PendingImport>,
    /// Session-level notifications waiting for the next flush
    outbox: Vec<EditorEvent>,
    bus: EventBus,
}

impl<R: SceneRenderer> EditorSession<R> {
    pub fn new(config: EditorConfig) -> Self {
        let panel = PropertyPanelState::from_config(&config);
        Self {
            brush: Brush::from_panel(&panel),
            binding: SelectionBinding::new(panel),
            config,
            lifecycle: Lifecycle::Uninitialized,
            mount: None,
            tools: ToolController::new(),
            clip: None,
            imports: Vec::new(),
            outbox: Vec::new(),
            bus: EventBus::new(),
        }
    }

    /// Attach `renderer` to the canvas mount point and create the scene.
    ///
    /// An unusable mount handle is a host bug and fails without side effects.
    pub fn acquire(&mut self, mount: &RawWindowHandle, mut renderer: R) -> Result<MountKind, EditorError> {
        match self.lifecycle {
            Lifecycle::Uninitialized => {}
            Lifecycle::Live { .. } => return Err(EditorError::AlreadyAcquired),
            Lifecycle::Released => return Err(EditorError::Released),
        }
        let kind = validate_mount(mount)?;

        renderer.configure_brush(&self.brush);
        renderer.set_drawing_mode(self.tools.mode() == ToolMode::FreeDraw);
        renderer.request_render();

        self.lifecycle = Lifecycle::Live {
            renderer,
            scene: Scene::new(self.config.background),
        };
        self.mount = Some(kind);
        log::info!("🎨 Canvas session acquired on {:?}", kind);
        Ok(kind)
    }

    /// Tear the session down. Safe to call more than once.
    pub fn release(&mut self) {
        match mem::replace(&mut self.lifecycle, Lifecycle::Released) {
            Lifecycle::Live { mut renderer, scene } => {
                renderer.release();
                log::info!("Canvas session released with {} elements", scene.len());
            }
            Lifecycle::Uninitialized => log::debug!("Releasing a session that never acquired a renderer"),
            Lifecycle::Released => return,
        }

        if !self.imports.is_empty() {
            log::info!("Dropping {} unfinished imports", self.imports.len());
        }
        self.imports.clear();
        self.clip = None;
        self.tools.reset_gesture();
        self.outbox.clear();
        self.bus.clear();
    }

    pub fn is_live(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Live { .. })
    }

    pub fn is_released(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Released)
    }

    pub fn mount_kind(&self) -> Option<MountKind> {
        self.mount
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scene(&self) -> Option<&Scene> {
        match &self.lifecycle {
            Lifecycle::Live { scene, .. } => Some(scene),
            _ => None,
        }
    }

    pub fn renderer(&self) -> Option<&R> {
        match &self.lifecycle {
            Lifecycle::Live { renderer, .. } => Some(renderer),
            _ => None,
        }
    }

    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        match &mut self.lifecycle {
            Lifecycle::Live { renderer, .. } => Some(renderer),
            _ => None,
        }
    }

    /// Both halves of a live session at once, for painting
    pub fn renderer_and_scene(&mut self) -> Option<(&mut R, &Scene)> {
        match &mut self.lifecycle {
            Lifecycle::Live { renderer, scene } => Some((renderer, &*scene)),
            _ => None,
        }
    }

    pub fn panel(&self) -> &PropertyPanelState {
        self.binding.panel()
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.mode()
    }

    pub fn pending_shape(&self) -> Option<PendingShapeKind> {
        self.tools.pending_shape()
    }

    pub fn drag_create_enabled(&self) -> bool {
        self.tools.drag_create_enabled()
    }

    pub fn clip(&self) -> Option<&ClipSession> {
        self.clip.as_ref()
    }

    pub fn pending_imports(&self) -> usize {
        self.imports.len()
    }

    /// Register an observer for the rest of the session
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.bus.subscribe(Box::new(handler));
    }

    // ---- tool mode ----------------------------------------------------

    /// Switch tool mode; the renderer's drawing flag follows in the same call
    pub fn set_mode(&mut self, mode: ToolMode) {
        if !self.is_live() {
            log::debug!("set_mode({}) ignored: no live canvas", mode);
            return;
        }
        let old = self.tools.set_mode(mode);
        self.mode_changed(old);
    }

    pub fn set_pending_shape(&mut self, kind: Option<PendingShapeKind>) {
        if self.is_released() {
            return;
        }
        let old = self.tools.set_pending_shape(kind);
        self.mode_changed(old);
    }

    pub fn set_drag_create(&mut self, enabled: bool) {
        if self.is_released() {
            return;
        }
        let old = self.tools.set_drag_create(enabled);
        self.mode_changed(old);
    }

    fn mode_changed(&mut self, old: Option<ToolMode>) {
        let new = self.tools.mode();
        if let Some(renderer) = self.renderer_mut() {
            renderer.set_drawing_mode(new == ToolMode::FreeDraw);
        }
        if let Some(old) = old {
            self.outbox.push(EditorEvent::ModeChanged { old, new });
        }
        self.flush();
    }

    // ---- pointer input ------------------------------------------------

    fn with_tools<T>(
        &mut self,
        op: &str,
        f: impl FnOnce(&mut ToolController, &mut ToolContext<'_, R>) -> T,
    ) -> Option<T> {
        let Lifecycle::Live { renderer, scene } = &mut self.lifecycle else {
            log::debug!("{} ignored: no live canvas", op);
            return None;
        };
        let mut ctx = ToolContext {
            scene,
            renderer,
            clip: self.clip.as_ref(),
            panel: self.binding.panel(),
            brush: &self.brush,
            config: &self.config,
        };
        let result = f(&mut self.tools, &mut ctx);
        self.flush();
        Some(result)
    }

    /// Creates the pending shape at `point` unless an object is already there
    pub fn pointer_double_click(&mut self, point: Pos2) -> Option<ElementId> {
        self.with_tools("double click", |tools, ctx| tools.on_double_click(ctx, point))
            .flatten()
    }

    pub fn pointer_down(&mut self, point: Pos2) {
        self.with_tools("pointer down", |tools, ctx| tools.on_pointer_down(ctx, point));
    }

    pub fn pointer_move(&mut self, point: Pos2) {
        self.with_tools("pointer move", |tools, ctx| tools.on_pointer_move(ctx, point));
    }

    pub fn pointer_up(&mut self, point: Pos2) {
        self.with_tools("pointer up", |tools, ctx| tools.on_pointer_up(ctx, point));
    }

    /// The host moved or resized an object through its own handles
    pub fn object_scaled(&mut self, id: ElementId, rect: Rect) {
        self.with_tools("object scaled", |tools, ctx| tools.on_object_scaled(ctx, id, rect));
    }

    /// Select one or several objects; an empty slice clears the selection
    pub fn select(&mut self, ids: &[ElementId]) {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return;
        };
        scene.set_active_group(ids);
        self.flush();
    }

    // ---- property panel -----------------------------------------------

    pub fn set_color(&mut self, color: Color32) {
        if self.is_released() {
            return;
        }
        let scene = match &mut self.lifecycle {
            Lifecycle::Live { scene, .. } => Some(scene),
            _ => None,
        };
        let changed = self.binding.set_color(color, scene);
        self.panel_edited(changed);
    }

    /// Color from the text input; accepts hex, `rgb()`/`rgba()` and a few names
    pub fn set_color_str(&mut self, input: &str) -> Result<(), ColorParseError> {
        let color = parse_color(input)?;
        self.set_color(color);
        Ok(())
    }

    pub fn set_width(&mut self, raw: i64) {
        if self.is_released() {
            return;
        }
        let changed = self.binding.set_width(raw);
        self.panel_edited(changed);
    }

    pub fn set_opacity(&mut self, raw: i64) {
        if self.is_released() {
            return;
        }
        let scene = match &mut self.lifecycle {
            Lifecycle::Live { scene, .. } => Some(scene),
            _ => None,
        };
        let changed = self.binding.set_opacity(raw, scene);
        self.panel_edited(changed);
    }

    fn panel_edited(&mut self, changed: bool) {
        if changed {
            self.outbox.push(EditorEvent::PanelChanged(*self.binding.panel()));
            self.sync_brush();
        }
        self.flush();
    }

    /// Mirror the panel onto the renderer's brush, whatever the mode
    fn sync_brush(&mut self) {
        if !self.brush.sync(self.binding.panel()) {
            return;
        }
        let brush = self.brush;
        if let Some(renderer) = self.renderer_mut() {
            renderer.configure_brush(&brush);
        }
    }

    // ---- layers -------------------------------------------------------

    pub fn reorder(&mut self, order: LayerOrder) -> bool {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            log::debug!("{:?} ignored: no live canvas", order);
            return false;
        };
        let moved = layer::reorder(scene, order);
        self.flush();
        moved
    }

    // ---- crop ---------------------------------------------------------

    /// Start cropping the active image. Ignored without one or while a crop
    /// is already running.
    pub fn begin_crop(&mut self) -> bool {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return false;
        };
        if self.clip.is_some() {
            log::debug!("Crop already in progress");
            return false;
        }
        let Some(clip) = ClipSession::begin(scene, &self.config) else {
            log::debug!("Crop ignored: no active image");
            return false;
        };
        self.outbox.push(EditorEvent::CropStarted { image: clip.target() });
        self.clip = Some(clip);
        self.flush();
        true
    }

    pub fn confirm_crop(&mut self) -> bool {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return false;
        };
        let Some(clip) = self.clip.take() else {
            return false;
        };
        let image = clip.target();
        let applied = clip.confirm(scene);
        self.tools.reset_gesture();
        self.outbox.push(EditorEvent::CropFinished { image, applied });
        self.flush();
        applied
    }

    pub fn cancel_crop(&mut self) {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return;
        };
        let Some(clip) = self.clip.take() else {
            return;
        };
        let image = clip.target();
        clip.cancel(scene);
        self.tools.reset_gesture();
        self.outbox.push(EditorEvent::CropFinished { image, applied: false });
        self.flush();
    }

    // ---- removal ------------------------------------------------------

    /// Delete the active object, or every member of an active group
    pub fn remove_active(&mut self) -> usize {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return 0;
        };
        let ids = match scene.active() {
            Some(ActiveSelection::Object(id)) => vec![*id],
            Some(ActiveSelection::Group(ids)) => ids.clone(),
            None => return 0,
        };

        if let Some(clip) = self.clip.take_if(|clip| ids.iter().any(|id| clip.involves(*id))) {
            let image = clip.target();
            clip.cancel(scene);
            self.outbox.push(EditorEvent::CropFinished { image, applied: false });
        }

        let removed = ids.iter().filter(|id| scene.remove(**id).is_some()).count();
        scene.discard_active();
        self.tools.reset_gesture();
        log::info!("🗑️ Removed {} elements", removed);
        self.flush();
        removed
    }

    /// Remove every object; the background stays
    pub fn clear(&mut self) {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            return;
        };
        if let Some(clip) = self.clip.take() {
            self.outbox.push(EditorEvent::CropFinished {
                image: clip.target(),
                applied: false,
            });
        }
        scene.clear();
        self.tools.reset_gesture();
        log::info!("🧹 Canvas cleared");
        self.flush();
    }

    // ---- export -------------------------------------------------------

    /// Rasterize the scene and deliver it as `filename`
    pub fn export_png(&mut self, filename: &str, sink: &mut dyn DownloadSink) -> Result<ExportOutcome, EditorError> {
        let live = match &mut self.lifecycle {
            Lifecycle::Live { renderer, scene } => Some((&*scene, renderer)),
            _ => None,
        };
        let outcome = export::export_png(filename, live, sink)?;
        if let ExportOutcome::Delivered { bytes } = outcome {
            self.outbox.push(EditorEvent::Exported {
                filename: filename.trim().to_owned(),
                bytes,
            });
            self.flush();
        }
        Ok(outcome)
    }

    // ---- import -------------------------------------------------------

    /// Start an image import. The host decodes the file and completes the
    /// ticket; the result is placed by the next `poll_imports`.
    pub fn begin_import(&mut self, name: impl Into<String>, drop_point: Option<Pos2>) -> ImportTicket {
        let (pending, ticket) = PendingImport::new(name, drop_point);
        if self.is_released() {
            log::warn!("Import {} started on a released session; it will be discarded", pending.name());
        } else {
            self.imports.push(pending);
        }
        ticket
    }

    /// Place every import that finished since the last call. Returns how
    /// many images were added.
    pub fn poll_imports(&mut self) -> usize {
        if !self.is_live() || self.imports.is_empty() {
            return 0;
        }

        let mut finished = Vec::new();
        self.imports.retain_mut(|pending| match pending.poll() {
            None => true,
            Some(result) => {
                finished.push((pending.drop_point(), result));
                false
            }
        });

        let mut added = 0;
        for (drop_point, result) in finished {
            match result {
                Ok(decoded) => {
                    if self.place_decoded(decoded, drop_point).is_some() {
                        added += 1;
                    }
                }
                Err(err) => {
                    log::error!("{}", err);
                    self.outbox.push(EditorEvent::ImportFailed {
                        name: err.name().to_owned(),
                        reason: err.to_string(),
                    });
                }
            }
        }
        self.flush();
        added
    }

    /// Put an already decoded image on the canvas, centred on `center` or on
    /// the canvas when `None`
    pub fn insert_image(&mut self, decoded: DecodedImage, center: Option<Pos2>) -> Option<ElementId> {
        let id = self.place_decoded(decoded, center);
        self.flush();
        id
    }

    fn place_decoded(&mut self, decoded: DecodedImage, center: Option<Pos2>) -> Option<ElementId> {
        let Lifecycle::Live { scene, .. } = &mut self.lifecycle else {
            log::debug!("Image {} ignored: no live canvas", decoded.name);
            return None;
        };
        let canvas = self.config.canvas_size();
        let center = center.unwrap_or((canvas / 2.0).to_pos2());
        let name = decoded.name.clone();
        let element = import::place_image(decoded, center, canvas, self.config.fit_imports);
        log::info!("🖼️ Placing image {} at {:?}", name, element.rect());
        Some(scene.add(element))
    }

    // ---- notifications ------------------------------------------------

    /// Deliver queued notifications: the selection binding reacts first, then
    /// observers, then at most one render request.
    fn flush(&mut self) {
        let mut events = match &mut self.lifecycle {
            Lifecycle::Live { scene, .. } => scene.take_events(),
            _ => Vec::new(),
        };
        events.append(&mut self.outbox);
        if events.is_empty() {
            return;
        }

        let panel_changed = match &self.lifecycle {
            Lifecycle::Live { scene, .. } => events
                .iter()
                .fold(false, |changed, event| self.binding.on_event(event, scene) || changed),
            _ => false,
        };
        if panel_changed {
            events.push(EditorEvent::PanelChanged(*self.binding.panel()));
            self.sync_brush();
        }

        for event in &events {
            self.bus.emit(event);
        }

        if events.iter().any(EditorEvent::needs_render) {
            if let Some(renderer) = self.renderer_mut() {
                renderer.request_render();
            }
        }
    }
}

impl<R: SceneRenderer> Drop for EditorSession<R> {
    fn drop(&mut self) {
        self.release();
    }
}
