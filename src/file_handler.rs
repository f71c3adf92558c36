use eframe::egui;

use crate::import::ImportTicket;
use crate::renderer::SceneRenderer;
use crate::session::EditorSession;

/// Turns files dropped on the window into image imports
#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect newly dropped files from the UI context.
    /// Returns true if any were dropped this frame.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        ctx.input(|i| {
            if i.raw.dropped_files.is_empty() {
                false
            } else {
                self.dropped_files.extend(i.raw.dropped_files.iter().cloned());
                true
            }
        })
    }

    /// Start an import for every dropped image and decode it into its ticket.
    /// `drop_point` is where the pointer was, in canvas coordinates.
    pub fn process_dropped_files<R: SceneRenderer>(
        &mut self,
        session: &mut EditorSession<R>,
        drop_point: Option<egui::Pos2>,
    ) -> usize {
        let mut started = 0;
        for file in std::mem::take(&mut self.dropped_files) {
            let name = file_name(&file);
            if !is_image_file(&file) {
                log::warn!("Dropped file is not a supported type: {}", name);
                continue;
            }
            let ticket = session.begin_import(name, drop_point);
            load_into(ticket, &file);
            started += 1;
        }
        started
    }

    /// Preview files being dragged over the application
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, FontId, Id, LayerId, Order};

        let text = ctx.input(|i| {
            if i.raw.hovered_files.is_empty() {
                return None;
            }
            let mut text = "Dropping files:\n".to_owned();
            for file in &i.raw.hovered_files {
                match &file.path {
                    Some(path) => text += &format!("\n{}", path.display()),
                    None => text += "\n(Path not available)",
                }
            }
            Some(text)
        });
        let Some(text) = text else {
            return;
        };

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            FontId::proportional(20.0),
            Color32::WHITE,
        );
    }
}

fn file_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let name = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .or_else(|| file.name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()));
    matches!(name.as_deref(), Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp"))
}

fn load_into(ticket: ImportTicket, file: &egui::DroppedFile) {
    if let Some(bytes) = &file.bytes {
        log::info!("Processing image from memory: {} ({} bytes)", ticket.name(), bytes.len());
        ticket.decode(bytes);
        return;
    }
    let Some(path) = &file.path else {
        log::warn!("Dropped file has no accessible data: {}", ticket.name());
        // Dropping the ticket abandons the import
        return;
    };
    match std::fs::read(path) {
        Ok(bytes) => ticket.decode(&bytes),
        Err(err) => {
            let reason = err.to_string();
            let name = ticket.name().to_owned();
            ticket.complete(Err(crate::error::ImportError::Decode { name, reason }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_image_detection() {
        let by_mime = egui::DroppedFile {
            mime: "image/png".to_owned(),
            ..Default::default()
        };
        assert!(is_image_file(&by_mime));

        let by_path = egui::DroppedFile {
            path: Some(PathBuf::from("/tmp/photo.JPG")),
            ..Default::default()
        };
        assert!(is_image_file(&by_path));

        let text = egui::DroppedFile {
            name: "notes.txt".to_owned(),
            ..Default::default()
        };
        assert!(!is_image_file(&text));
        assert_eq!(file_name(&text), "notes.txt");
    }
}
