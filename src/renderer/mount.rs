use raw_window_handle::RawWindowHandle;

use crate::error::EditorError;

/// Surface families a renderer can be mounted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountKind {
    WebCanvas,
    Wayland,
    X11,
    Windows,
    AppKit,
    Android,
}

/// Checks the handle the host gave us for the canvas mount point.
///
/// Anything we cannot draw into is a setup bug in the host and aborts the
/// session immediately.
pub fn validate_mount(handle: &RawWindowHandle) -> Result<MountKind, EditorError> {
    let kind = match handle {
        RawWindowHandle::Web(_) | RawWindowHandle::WebCanvas(_) => MountKind::WebCanvas,
        RawWindowHandle::Wayland(_) => MountKind::Wayland,
        RawWindowHandle::Xlib(_) | RawWindowHandle::Xcb(_) => MountKind::X11,
        RawWindowHandle::Win32(_) => MountKind::Windows,
        RawWindowHandle::AppKit(_) => MountKind::AppKit,
        RawWindowHandle::AndroidNdk(_) => MountKind::Android,
        RawWindowHandle::WebOffscreenCanvas(_) => {
            return Err(EditorError::UnsupportedMount("web offscreen canvas"));
        }
        RawWindowHandle::Drm(_) | RawWindowHandle::Gbm(_) => {
            return Err(EditorError::UnsupportedMount("bare display plane"));
        }
        _ => return Err(EditorError::UnsupportedMount("unknown window system")),
    };
    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw_window_handle::{DrmWindowHandle, WebWindowHandle};

    #[test]
    fn test_web_handle_is_accepted() {
        let handle = RawWindowHandle::Web(WebWindowHandle::new(1));
        assert_eq!(validate_mount(&handle).unwrap(), MountKind::WebCanvas);
    }

    #[test]
    fn test_drm_handle_is_rejected() {
        let handle = RawWindowHandle::Drm(DrmWindowHandle::new(0));
        assert!(matches!(validate_mount(&handle), Err(EditorError::UnsupportedMount(_))));
    }
}
