use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use std::sync::Arc;

/// Pixel payload of an image element.
///
/// The element's own size is the displayed size; `crop` is the visible
/// window in source pixel coordinates. Cropping only ever shrinks the window,
/// the decoded pixels are shared and never copied.
#[derive(Clone)]
pub struct ImageContent {
    name: String,
    pixels: Arc<RgbaImage>,
    crop: Rect,
}

// Custom Debug implementation so logs don't dump pixel data
impl std::fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageContent")
            .field("name", &self.name)
            .field("natural_size", &self.natural_size())
            .field("crop", &self.crop)
            .finish()
    }
}

impl PartialEq for ImageContent {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.crop == other.crop && Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl ImageContent {
    pub fn new(name: impl Into<String>, pixels: RgbaImage) -> Self {
        let crop = Rect::from_min_size(
            Pos2::ZERO,
            Vec2::new(pixels.width() as f32, pixels.height() as f32),
        );
        Self {
            name: name.into(),
            pixels: Arc::new(pixels),
            crop,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Identifies the shared pixel buffer; clones of this content report the same key
    pub fn pixel_key(&self) -> u64 {
        Arc::as_ptr(&self.pixels) as usize as u64
    }

    pub fn natural_size(&self) -> Vec2 {
        Vec2::new(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    /// Visible window in source pixels
    pub fn crop(&self) -> Rect {
        self.crop
    }

    /// Sets the visible window, clipped to the source image
    pub fn set_crop(&mut self, crop: Rect) {
        let full = Rect::from_min_size(Pos2::ZERO, self.natural_size());
        self.crop = crop.intersect(full);
    }

    /// Display-to-source scale for an element showing this content at `displayed`
    pub fn scale(&self, displayed: Vec2) -> Vec2 {
        let crop = self.crop.size();
        Vec2::new(
            if crop.x > 0.0 { displayed.x / crop.x } else { 1.0 },
            if crop.y > 0.0 { displayed.y / crop.y } else { 1.0 },
        )
    }

    /// Normalized texture coordinates of the crop window
    pub fn uv(&self) -> Rect {
        let size = self.natural_size();
        if size.x <= 0.0 || size.y <= 0.0 {
            return Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        }
        Rect::from_min_max(
            Pos2::new(self.crop.min.x / size.x, self.crop.min.y / size.y),
            Pos2::new(self.crop.max.x / size.x, self.crop.max.y / size.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_is_clipped_to_source() {
        let mut content = ImageContent::new("a.png", RgbaImage::new(100, 50));
        content.set_crop(Rect::from_min_size(Pos2::new(80.0, 10.0), Vec2::new(50.0, 50.0)));
        assert_eq!(content.crop(), Rect::from_min_max(Pos2::new(80.0, 10.0), Pos2::new(100.0, 50.0)));
    }

    #[test]
    fn test_scale_and_uv() {
        let content = ImageContent::new("b.png", RgbaImage::new(200, 100));
        assert_eq!(content.scale(Vec2::new(100.0, 50.0)), Vec2::new(0.5, 0.5));
        assert_eq!(content.uv(), Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)));
    }
}
