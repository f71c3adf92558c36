use egui::{Pos2, Rect, Vec2};

use crate::config::EditorConfig;
use crate::element::{factory, ElementId, ElementKind};
use crate::scene::Scene;

/// An in-progress image crop.
///
/// While it exists the target image is locked (not selectable) and a
/// translucent mask rectangle sits in front of it. The mask can be moved and
/// scaled but never leaves the bounds the image had when the crop began.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSession {
    target: ElementId,
    mask: ElementId,
    image_bounds: Rect,
}

impl ClipSession {
    /// Starts cropping the active element.
    ///
    /// Returns `None` without touching the scene unless exactly one image
    /// element is active.
    pub fn begin(scene: &mut Scene, config: &EditorConfig) -> Option<Self> {
        let image = scene.active_element().filter(|element| element.is_image())?;
        let target = image.id();
        let image_bounds = image.rect();

        scene.update(target, |element| element.set_selectable(false));

        let mut mask = factory::create_rectangle(image_bounds.min, image_bounds.size(), config.mask_fill);
        mask.set_stroke(Some(config.mask_stroke), 1.0);
        let mask = scene.add(mask);
        scene.set_active(mask);

        log::info!("✂️ Crop started on image {} with bounds {:?}", target, image_bounds);
        Some(Self {
            target,
            mask,
            image_bounds,
        })
    }

    pub fn target(&self) -> ElementId {
        self.target
    }

    pub fn mask(&self) -> ElementId {
        self.mask
    }

    pub fn image_bounds(&self) -> Rect {
        self.image_bounds
    }

    pub fn involves(&self, id: ElementId) -> bool {
        id == self.target || id == self.mask
    }

    /// Keeps `rect` inside the recorded image bounds: the size is capped to the
    /// image size, then the top-left corner is clamped so the whole rectangle fits.
    pub fn clamp_mask_rect(&self, rect: Rect) -> Rect {
        let bounds = self.image_bounds;
        let size = Vec2::new(
            rect.width().min(bounds.width()),
            rect.height().min(bounds.height()),
        );
        let min = Pos2::new(
            rect.min.x.clamp(bounds.min.x, bounds.max.x - size.x),
            rect.min.y.clamp(bounds.min.y, bounds.max.y - size.y),
        );
        Rect::from_min_size(min, size)
    }

    /// The host dragged the mask to `position` (its new top-left)
    pub fn on_mask_moved(&self, scene: &mut Scene, position: Pos2) {
        let Some(size) = scene.get(self.mask).map(|mask| mask.size()) else {
            return;
        };
        let clamped = self.clamp_mask_rect(Rect::from_min_size(position, size));
        scene.update(self.mask, |mask| mask.set_position(clamped.min));
    }

    /// The host resized the mask to `rect`
    pub fn on_mask_scaled(&self, scene: &mut Scene, rect: Rect) {
        let clamped = self.clamp_mask_rect(rect);
        scene.update(self.mask, |mask| {
            if let Err(err) = mask.resize(clamped) {
                log::debug!("Mask resize rejected: {}", err);
            }
        });
    }

    /// Applies the mask as the image's new visible window.
    ///
    /// Returns `false` if the image disappeared in the meantime; the mask is
    /// removed and the image unlocked either way.
    pub fn confirm(self, scene: &mut Scene) -> bool {
        let mask_rect = scene.get(self.mask).map(|mask| self.clamp_mask_rect(mask.rect()));
        self.teardown(scene);

        let Some(mask_rect) = mask_rect else {
            log::warn!("Crop mask {} vanished before confirm", self.mask);
            return false;
        };

        let origin = self.image_bounds.min;
        let applied = scene.update(self.target, |element| {
            let displayed = element.size();
            let ElementKind::Image(content) = element.kind_mut() else {
                return false;
            };
            let scale = content.scale(displayed);
            let crop = content.crop();
            let offset = (mask_rect.min - origin) / scale;
            content.set_crop(Rect::from_min_size(crop.min + offset, mask_rect.size() / scale));
            element.set_position(mask_rect.min);
            element.set_size(mask_rect.size());
            true
        });

        let applied = applied.unwrap_or(false);
        if applied {
            log::info!("✂️ Image {} cropped to {:?}", self.target, mask_rect);
        }
        applied
    }

    /// Drops the mask and unlocks the image, leaving it untouched
    pub fn cancel(self, scene: &mut Scene) {
        self.teardown(scene);
        log::info!("Crop on image {} cancelled", self.target);
    }

    fn teardown(&self, scene: &mut Scene) {
        scene.remove(self.mask);
        scene.update(self.target, |element| element.set_selectable(true));
    }
}
