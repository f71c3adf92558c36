//! Offscreen rendering used for PNG export.
//!
//! Draws the scene into a tiny-skia pixmap the size of the canvas, then hands
//! the pixels back as an `RgbaImage`. Text is laid out with ab_glyph using the
//! same Ubuntu face egui draws on screen.

use std::io::Cursor;
use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use egui::{Color32, Pos2, Rect, Vec2};
use image::{ImageFormat, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, IntSize, LineCap, LineJoin, Mask, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, Transform,
};

use crate::element::common::triangle_vertices;
use crate::element::{Element, ElementKind, ImageContent};
use crate::error::RenderError;
use crate::scene::Scene;

const MAX_DIMENSION: u32 = 16_384;
const TEXT_FONT: &str = "Ubuntu-Light";

/// Rasterize `scene` onto a `size` canvas
pub fn rasterize(scene: &Scene, size: Vec2) -> Result<RgbaImage, RenderError> {
    let width = size.x.round() as u32;
    let height = size.y.round() as u32;
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(RenderError::InvalidDimensions { width, height });
    }
    let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::InvalidDimensions { width, height })?;

    let [r, g, b, a] = scene.background().to_srgba_unmultiplied();
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
    for element in scene.elements() {
        draw_element(&mut pixmap, element);
    }
    to_image(&pixmap)
}

/// Rasterize and encode as PNG
pub fn encode_png(scene: &Scene, size: Vec2) -> Result<Vec<u8>, RenderError> {
    let canvas = rasterize(scene, size)?;
    let mut bytes = Vec::new();
    canvas
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| RenderError::Encode(err.to_string()))?;
    Ok(bytes)
}

fn draw_element(pixmap: &mut Pixmap, element: &Element) {
    let style = element.style();
    let rect = element.rect();
    let opacity = style.opacity;

    match element.kind() {
        ElementKind::Rectangle => {
            let Some(path) = polygon(&[rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()])
            else {
                return;
            };
            pixmap.fill_path(&path, &paint(style.fill, opacity), FillRule::Winding, Transform::identity(), None);
            if let Some(color) = style.stroke {
                let stroke = Stroke {
                    width: style.stroke_width,
                    ..Default::default()
                };
                pixmap.stroke_path(&path, &paint(color, opacity), &stroke, Transform::identity(), None);
            }
        }
        ElementKind::Triangle => {
            if let Some(path) = polygon(&triangle_vertices(rect)) {
                pixmap.fill_path(&path, &paint(style.fill, opacity), FillRule::Winding, Transform::identity(), None);
            }
        }
        ElementKind::Line { end } => {
            let start = element.position();
            let color = style.stroke.unwrap_or(style.fill);
            stroke_polyline(pixmap, &[start, start + *end], color, style.stroke_width, opacity);
        }
        ElementKind::Path(path) => {
            let points = path.absolute_points(element.position());
            let color = style.stroke.unwrap_or(style.fill);
            stroke_polyline(pixmap, &points, color, style.stroke_width, opacity);
        }
        ElementKind::Image(content) => draw_image(pixmap, rect, content, opacity),
        ElementKind::TextBox { text, font_size } => {
            draw_text(pixmap, element.position(), text, *font_size, style.fill, opacity);
        }
    }
}

fn paint(color: Color32, opacity: f32) -> Paint<'static> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8);
    paint.anti_alias = true;
    paint
}

/// Closed path through `points`
fn polygon(points: &[Pos2]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

fn stroke_polyline(pixmap: &mut Pixmap, points: &[Pos2], color: Color32, width: f32, opacity: f32) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width: width.max(1.0),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint(color, opacity), &stroke, Transform::identity(), None);
}

/// Draw the crop window of `content` scaled into `rect`
fn draw_image(pixmap: &mut Pixmap, rect: Rect, content: &ImageContent, opacity: f32) {
    let pixels = content.pixels();
    let crop = content.crop();
    let x = (crop.min.x.max(0.0) as u32).min(pixels.width());
    let y = (crop.min.y.max(0.0) as u32).min(pixels.height());
    let w = (crop.width().round() as u32).min(pixels.width() - x);
    let h = (crop.height().round() as u32).min(pixels.height() - y);
    if w == 0 || h == 0 || rect.width() <= 0.0 || rect.height() <= 0.0 {
        return;
    }

    let window = image::imageops::crop_imm(pixels, x, y, w, h).to_image();
    let Some(source) = from_image(&window) else {
        log::warn!("Skipping image {} in export: bad source size", content.name());
        return;
    };

    let paint = PixmapPaint {
        opacity: opacity.clamp(0.0, 1.0),
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    let transform = Transform::from_row(
        rect.width() / w as f32,
        0.0,
        0.0,
        rect.height() / h as f32,
        rect.min.x,
        rect.min.y,
    );
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
}

/// egui's bundled proportional face, loaded once
fn text_font() -> Option<&'static FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| {
        let definitions = egui::FontDefinitions::default();
        let data = definitions.font_data.get(TEXT_FONT)?;
        match FontArc::try_from_vec(data.font.to_vec()) {
            Ok(font) => Some(font),
            Err(err) => {
                log::error!("Failed to load {} for export: {}", TEXT_FONT, err);
                None
            }
        }
    })
    .as_ref()
}

/// Lay `text` out on one line with its top-left at `origin`
fn draw_text(pixmap: &mut Pixmap, origin: Pos2, text: &str, font_size: f32, color: Color32, opacity: f32) {
    let Some(font) = text_font() else {
        log::warn!("No font available, text left out of export");
        return;
    };
    let Some(mut mask) = Mask::new(pixmap.width(), pixmap.height()) else {
        return;
    };

    let scaled = font.as_scaled(PxScale::from(font_size));
    let baseline = origin.y + scaled.ascent();
    let (width, height) = (pixmap.width() as i64, pixmap.height() as i64);
    let mut cursor = origin.x;
    let mut previous = None;
    let mut covered = false;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            cursor += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(font_size, ab_glyph::point(cursor, baseline));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let data = mask.data_mut();
            outlined.draw(|px, py, coverage| {
                let x = bounds.min.x as i64 + px as i64;
                let y = bounds.min.y as i64 + py as i64;
                if (0..width).contains(&x) && (0..height).contains(&y) {
                    let cell = &mut data[(y * width + x) as usize];
                    *cell = (*cell).max((coverage.clamp(0.0, 1.0) * 255.0).round() as u8);
                    covered = true;
                }
            });
        }
        cursor += scaled.h_advance(id);
        previous = Some(id);
    }

    if !covered {
        return;
    }
    let Some(area) = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32) else {
        return;
    };
    pixmap.fill_rect(area, &paint(color, opacity), Transform::identity(), Some(&mask));
}

/// Premultiplied pixmap from straight-alpha pixels
fn from_image(image: &RgbaImage) -> Option<Pixmap> {
    let size = IntSize::from_wh(image.width(), image.height())?;
    let data = image
        .pixels()
        .flat_map(|p| {
            let [r, g, b, a] = p.0;
            let c = ColorU8::from_rgba(r, g, b, a).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

fn to_image(pixmap: &Pixmap) -> Result<RgbaImage, RenderError> {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data).ok_or(RenderError::InvalidDimensions {
        width: pixmap.width(),
        height: pixmap.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::factory;
    use image::Rgba;

    fn pixel(canvas: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        canvas.get_pixel(x, y).0
    }

    #[test]
    fn test_background_only() {
        let scene = Scene::new(Color32::WHITE);
        let canvas = rasterize(&scene, Vec2::new(20.0, 10.0)).unwrap();
        assert_eq!(canvas.dimensions(), (20, 10));
        assert_eq!(pixel(&canvas, 5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_rectangle_and_z_order() {
        let mut scene = Scene::new(Color32::WHITE);
        scene.add(factory::create_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::RED));
        scene.add(factory::create_rectangle(Pos2::new(5.0, 5.0), Vec2::splat(10.0), Color32::BLUE));
        let canvas = rasterize(&scene, Vec2::splat(20.0)).unwrap();

        assert_eq!(pixel(&canvas, 2, 2), [255, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 7, 7), [0, 0, 255, 255]);
        assert_eq!(pixel(&canvas, 18, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_opacity_blends_with_background() {
        let mut scene = Scene::new(Color32::WHITE);
        let mut rect = factory::create_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::BLACK);
        rect.set_opacity(0.5);
        scene.add(rect);
        let canvas = rasterize(&scene, Vec2::splat(10.0)).unwrap();
        let [r, _, _, a] = pixel(&canvas, 5, 5);
        assert!((126..=129).contains(&r));
        assert_eq!(a, 255);
    }

    #[test]
    fn test_line_is_stroked() {
        let mut scene = Scene::new(Color32::WHITE);
        scene.add(factory::create_line(Pos2::new(2.0, 10.0), Vec2::new(16.0, 0.0), Color32::BLACK, 4.0));
        let canvas = rasterize(&scene, Vec2::splat(20.0)).unwrap();
        assert_eq!(pixel(&canvas, 10, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&canvas, 10, 2), [255, 255, 255, 255]);
    }

    #[test]
    fn test_image_draws_its_crop_window() {
        // Left half red, right half blue
        let pixels = RgbaImage::from_fn(20, 10, |x, _| {
            if x < 10 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let mut content = ImageContent::new("halves.png", pixels);
        content.set_crop(Rect::from_min_size(Pos2::new(10.0, 0.0), Vec2::new(10.0, 10.0)));

        let mut scene = Scene::new(Color32::WHITE);
        scene.add(factory::create_image(Pos2::ZERO, Vec2::splat(20.0), content));
        let canvas = rasterize(&scene, Vec2::splat(20.0)).unwrap();
        assert_eq!(pixel(&canvas, 10, 10), [0, 0, 255, 255]);
    }

    #[test]
    fn test_text_is_rendered() {
        let mut scene = Scene::new(Color32::WHITE);
        scene.add(factory::create_text(Pos2::new(100.0, 100.0), "Text", 40.0, Color32::RED));
        let canvas = rasterize(&scene, Vec2::splat(500.0)).unwrap();

        let inked = canvas.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count();
        assert!(inked > 50, "only {} text pixels", inked);
        // Glyphs stay inside the text box
        let stray = canvas
            .enumerate_pixels()
            .filter(|(x, y, p)| p.0 != [255, 255, 255, 255] && (*x < 95 || *y < 95 || *y > 160))
            .count();
        assert_eq!(stray, 0);
    }

    #[test]
    fn test_zero_canvas_is_rejected() {
        let scene = Scene::new(Color32::WHITE);
        assert!(matches!(
            rasterize(&scene, Vec2::ZERO),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_png_signature() {
        let scene = Scene::new(Color32::WHITE);
        let png = encode_png(&scene, Vec2::splat(4.0)).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
