use crate::renderer::SceneRenderer;
use crate::session::EditorSession;

use super::{InputEvent, WidgetEvent};

/// Routes canvas input to the session. This is the only dispatcher: it reads
/// the session's current mode and selection when the event arrives, so it
/// never needs re-registering after state changes.
pub fn route_event<R: SceneRenderer>(event: &InputEvent, session: &mut EditorSession<R>) {
    match *event {
        InputEvent::PointerDown { location } => session.pointer_down(location),
        InputEvent::PointerMove { location } => session.pointer_move(location),
        InputEvent::PointerUp { location } => session.pointer_up(location),
        InputEvent::DoubleClick { location } => {
            if let Some(id) = session.pointer_double_click(location) {
                log::debug!("Double-click created {}", id);
            }
        }
    }
}

/// Routes toolbar changes to the session
pub fn route_widget<R: SceneRenderer>(event: &WidgetEvent, session: &mut EditorSession<R>) {
    match event {
        WidgetEvent::Mode(mode) => session.set_mode(*mode),
        WidgetEvent::PendingShape(kind) => session.set_pending_shape(*kind),
        WidgetEvent::DragCreate(enabled) => session.set_drag_create(*enabled),
        WidgetEvent::Color(input) => {
            if let Err(err) = session.set_color_str(input) {
                log::warn!("Ignoring color input: {}", err);
            }
        }
        WidgetEvent::Width(width) => session.set_width(*width),
        WidgetEvent::Opacity(opacity) => session.set_opacity(*opacity),
        WidgetEvent::Layer(order) => {
            session.reorder(*order);
        }
        WidgetEvent::CropBegin => {
            session.begin_crop();
        }
        WidgetEvent::CropConfirm => {
            session.confirm_crop();
        }
        WidgetEvent::CropCancel => session.cancel_crop(),
        WidgetEvent::RemoveSelected => {
            session.remove_active();
        }
        WidgetEvent::Clear => session.clear(),
    }
}
