use crate::element::ElementId;
use crate::layer::LayerOrder;
use crate::panel::PropertyPanelState;
use crate::scene::ActiveSelection;
use crate::tools::ToolMode;

/// Notifications emitted by a canvas session.
///
/// Scene mutations are queued while an operation runs and delivered once it
/// finishes, so observers always see a consistent scene.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ObjectAdded { id: ElementId },
    ObjectRemoved { id: ElementId },
    /// Geometry or style of an object changed
    ObjectMutated { id: ElementId },
    SelectionChanged { selection: Option<ActiveSelection> },
    Reordered {
        id: ElementId,
        order: LayerOrder,
        old_index: usize,
        new_index: usize,
    },
    SceneCleared,
    ModeChanged { old: ToolMode, new: ToolMode },
    PanelChanged(PropertyPanelState),
    CropStarted { image: ElementId },
    CropFinished { image: ElementId, applied: bool },
    ImportFailed { name: String, reason: String },
    Exported { filename: String, bytes: usize },
}

impl EditorEvent {
    /// Whether the scene needs to be redrawn after this event
    pub fn needs_render(&self) -> bool {
        matches!(
            self,
            Self::ObjectAdded { .. }
                | Self::ObjectRemoved { .. }
                | Self::ObjectMutated { .. }
                | Self::SelectionChanged { .. }
                | Self::Reordered { .. }
                | Self::SceneCleared
        )
    }
}
