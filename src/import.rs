use egui::{Pos2, Rect, Vec2};
use futures::channel::oneshot;
use image::RgbaImage;

use crate::element::{factory, Element, ImageContent};
use crate::error::ImportError;

/// A decoded image waiting to be placed on the scene
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub name: String,
    pub pixels: RgbaImage,
}

impl DecodedImage {
    /// Decode any format the image crate was built with
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self, ImportError> {
        let name = name.into();
        match image::load_from_memory(bytes) {
            Ok(img) => {
                log::debug!("Decoded {}: {}x{}", name, img.width(), img.height());
                Ok(Self {
                    name,
                    pixels: img.to_rgba8(),
                })
            }
            Err(err) => Err(ImportError::Decode {
                name,
                reason: err.to_string(),
            }),
        }
    }
}

pub type ImportResult = Result<DecodedImage, ImportError>;

/// Handed to the host when an import starts. Completing it delivers the
/// result to the session; dropping it abandons the import.
#[derive(Debug)]
pub struct ImportTicket {
    name: String,
    tx: oneshot::Sender<ImportResult>,
}

impl ImportTicket {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the session still wants this result
    pub fn is_wanted(&self) -> bool {
        !self.tx.is_canceled()
    }

    pub fn complete(self, result: ImportResult) {
        if self.tx.send(result).is_err() {
            log::warn!("Import {} finished after its session was released; discarding", self.name);
        }
    }

    /// Decode `bytes` and complete the ticket with the outcome
    pub fn decode(self, bytes: &[u8]) {
        let result = DecodedImage::decode(self.name.clone(), bytes);
        self.complete(result);
    }
}

/// Session side of an import
#[derive(Debug)]
pub struct PendingImport {
    name: String,
    drop_point: Option<Pos2>,
    rx: oneshot::Receiver<ImportResult>,
}

impl PendingImport {
    pub fn new(name: impl Into<String>, drop_point: Option<Pos2>) -> (Self, ImportTicket) {
        let name = name.into();
        let (tx, rx) = oneshot::channel();
        let pending = Self {
            name: name.clone(),
            drop_point,
            rx,
        };
        (pending, ImportTicket { name, tx })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn drop_point(&self) -> Option<Pos2> {
        self.drop_point
    }

    /// `None` while the host is still working on it
    pub fn poll(&mut self) -> Option<ImportResult> {
        match self.rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::Canceled) => Some(Err(ImportError::Abandoned(self.name.clone()))),
        }
    }
}

/// Displayed size for an image of `natural` pixels. With `fit` set, images
/// larger than `canvas` are scaled down uniformly to fit inside it.
pub fn fitted_size(natural: Vec2, canvas: Vec2, fit: bool) -> Vec2 {
    if !fit || natural.x <= 0.0 || natural.y <= 0.0 {
        return natural;
    }
    let scale = (canvas.x / natural.x).min(canvas.y / natural.y).min(1.0);
    natural * scale
}

/// Build the scene element for a decoded image centred on `center`
pub fn place_image(decoded: DecodedImage, center: Pos2, canvas: Vec2, fit: bool) -> Element {
    let content = ImageContent::new(decoded.name, decoded.pixels);
    let size = fitted_size(content.natural_size(), canvas, fit);
    let rect = Rect::from_center_size(center, size);
    factory::create_image(rect.min, size, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_ticket_delivers_decoded_image() {
        let (mut pending, ticket) = PendingImport::new("red.png", None);
        assert!(pending.poll().is_none());

        ticket.decode(&png_bytes(4, 3));
        let decoded = pending.poll().unwrap().unwrap();
        assert_eq!(decoded.pixels.dimensions(), (4, 3));
        assert_eq!(decoded.name, "red.png");
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let (mut pending, ticket) = PendingImport::new("junk.png", None);
        ticket.decode(b"not an image");
        assert!(matches!(pending.poll(), Some(Err(ImportError::Decode { .. }))));
    }

    #[test]
    fn test_dropped_ticket_is_abandoned() {
        let (mut pending, ticket) = PendingImport::new("gone.png", None);
        drop(ticket);
        assert!(matches!(pending.poll(), Some(Err(ImportError::Abandoned(name))) if name == "gone.png"));
    }

    #[test]
    fn test_ticket_after_release_is_unwanted() {
        let (pending, ticket) = PendingImport::new("late.png", None);
        drop(pending);
        assert!(!ticket.is_wanted());
        // Completing must not panic
        ticket.decode(&png_bytes(1, 1));
    }

    #[test]
    fn test_fitted_size() {
        let canvas = Vec2::splat(500.0);
        assert_eq!(fitted_size(Vec2::new(1000.0, 500.0), canvas, true), Vec2::new(500.0, 250.0));
        assert_eq!(fitted_size(Vec2::new(100.0, 50.0), canvas, true), Vec2::new(100.0, 50.0));
        assert_eq!(fitted_size(Vec2::new(1000.0, 500.0), canvas, false), Vec2::new(1000.0, 500.0));
    }
}
