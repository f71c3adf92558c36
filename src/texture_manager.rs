use std::collections::HashMap;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::element::{ElementId, ImageContent};

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Invalid texture dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

type CacheKey = (ElementId, u64);

/// GPU textures for image elements, cached by element and pixel buffer.
///
/// Least recently used textures are evicted once the cache grows past its
/// limit; textures of elements that left the scene are dropped by `retain`.
pub struct TextureManager {
    texture_cache: HashMap<CacheKey, TextureHandle>,
    last_used: HashMap<CacheKey, u64>,
    current_frame: u64,
    max_cache_size: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.texture_cache.len())
            .field("current_frame", &self.current_frame)
            .finish()
    }
}

impl TextureManager {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            texture_cache: HashMap::new(),
            last_used: HashMap::new(),
            current_frame: 0,
            max_cache_size,
        }
    }

    /// Increments the frame counter, should be called at the start of each frame
    pub fn begin_frame(&mut self) {
        self.current_frame += 1;
    }

    /// Texture showing `content` for element `id`, uploading it on first use
    pub fn texture_for(
        &mut self,
        id: ElementId,
        content: &ImageContent,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError> {
        self.get_or_create_texture(id, content.pixel_key(), || color_image(content), ctx)
    }

    pub fn get_or_create_texture<F>(
        &mut self,
        id: ElementId,
        pixel_key: u64,
        generator: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let cache_key = (id, pixel_key);

        if let Some(handle) = self.texture_cache.get(&cache_key) {
            self.last_used.insert(cache_key, self.current_frame);
            return Ok(handle.id());
        }

        let image = generator()?;
        log::info!("🖼️ Uploading texture for image {}: {}x{}", id, image.size[0], image.size[1]);
        let handle = ctx.load_texture(format!("image_{}", id), image, TextureOptions::LINEAR);

        self.texture_cache.insert(cache_key, handle.clone());
        self.last_used.insert(cache_key, self.current_frame);
        self.prune_cache_if_needed();

        Ok(handle.id())
    }

    /// Drop textures of elements `keep` rejects
    pub fn retain(&mut self, mut keep: impl FnMut(ElementId) -> bool) {
        self.texture_cache.retain(|(id, _), _| keep(*id));
        let cache = &self.texture_cache;
        self.last_used.retain(|key, _| cache.contains_key(key));
    }

    fn prune_cache_if_needed(&mut self) {
        if self.texture_cache.len() <= self.max_cache_size {
            return;
        }

        let mut entries: Vec<(CacheKey, u64)> = self.last_used.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(_, frame)| *frame);

        let to_remove = entries.len() - self.max_cache_size;
        for (key, _) in entries.iter().take(to_remove) {
            self.texture_cache.remove(key);
            self.last_used.remove(key);
        }
    }

    pub fn clear_cache(&mut self) {
        self.texture_cache.clear();
        self.last_used.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.texture_cache.len()
    }

    #[cfg(test)]
    fn contains(&self, id: ElementId, pixel_key: u64) -> bool {
        self.texture_cache.contains_key(&(id, pixel_key))
    }
}

fn color_image(content: &ImageContent) -> Result<ColorImage, TextureGenerationError> {
    let pixels = content.pixels();
    let (width, height) = pixels.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions { width, height });
    }
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        pixels.as_raw(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn mock_texture_generator() -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new([10, 10], egui::Color32::WHITE))
    }

    #[test]
    fn test_cache_hit() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let id = ElementId::new();

        let first = manager.get_or_create_texture(id, 1, mock_texture_generator, &ctx).unwrap();
        let second = manager.get_or_create_texture(id, 1, mock_texture_generator, &ctx).unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_retain_drops_removed_elements() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let kept = ElementId::new();
        let gone = ElementId::new();
        manager.get_or_create_texture(kept, 1, mock_texture_generator, &ctx).unwrap();
        manager.get_or_create_texture(gone, 1, mock_texture_generator, &ctx).unwrap();

        manager.retain(|id| id == kept);
        assert_eq!(manager.cache_size(), 1);
        assert!(manager.contains(kept, 1));
    }

    #[test]
    fn test_lru_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let [a, b, c] = [ElementId::new(), ElementId::new(), ElementId::new()];

        manager.get_or_create_texture(a, 1, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(b, 1, mock_texture_generator, &ctx).unwrap();
        manager.begin_frame();
        manager.get_or_create_texture(c, 1, mock_texture_generator, &ctx).unwrap();

        assert_eq!(manager.cache_size(), 2);
        assert!(!manager.contains(a, 1));
        assert!(manager.contains(b, 1));
        assert!(manager.contains(c, 1));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);
        let content = ImageContent::new("empty.png", RgbaImage::new(0, 0));
        assert!(manager.texture_for(ElementId::new(), &content, &ctx).is_err());
    }
}
