use egui::{Color32, Pos2, Rect, Vec2};
use image::RgbaImage;
use sketchboard::element::{factory, ElementKind, ImageContent};
use sketchboard::Element;

fn create_test_path() -> Element {
    let points = vec![Pos2::new(10.0, 10.0), Pos2::new(20.0, 20.0)];
    factory::create_path(&points, Color32::RED, 2.0).unwrap()
}

fn create_test_image() -> Element {
    let content = ImageContent::new("test.png", RgbaImage::new(100, 50));
    factory::create_image(Pos2::new(10.0, 20.0), Vec2::new(100.0, 50.0), content)
}

#[test]
fn test_element_ids_are_unique() {
    let a = create_test_path();
    let b = create_test_path();
    assert_ne!(a.id(), b.id());
    assert_eq!(a.element_type(), "path");
    assert_eq!(create_test_image().element_type(), "image");
}

#[test]
fn test_element_rect() {
    let path = create_test_path();
    let rect = path.rect();
    assert!(rect.contains(Pos2::new(10.0, 10.0)));
    assert!(rect.contains(Pos2::new(20.0, 20.0)));

    let image = create_test_image();
    assert_eq!(image.rect().min, Pos2::new(10.0, 20.0));
    assert_eq!(image.rect().size(), Vec2::new(100.0, 50.0));
}

#[test]
fn test_element_translate() {
    let mut path = create_test_path();
    let original = path.rect();
    path.translate(Vec2::new(5.0, 10.0));
    assert_eq!(path.rect(), original.translate(Vec2::new(5.0, 10.0)));

    // Relative points move with the element
    let ElementKind::Path(content) = path.kind() else {
        panic!("expected path");
    };
    assert_eq!(
        content.absolute_points(path.position()),
        vec![Pos2::new(15.0, 20.0), Pos2::new(25.0, 30.0)]
    );
}

#[test]
fn test_element_resize() {
    let mut path = create_test_path();
    let original = path.rect();
    path.resize(Rect::from_min_size(original.min, original.size() * 2.0)).unwrap();
    assert_eq!(path.rect().size(), original.size() * 2.0);

    let mut image = create_test_image();
    let original = image.rect();
    image.resize(Rect::from_min_size(original.min, original.size() / 2.0)).unwrap();
    assert_eq!(image.rect().width(), original.width() / 2.0);
    assert_eq!(image.rect().height(), original.height() / 2.0);
}

#[test]
fn test_element_hit_testing() {
    let path = create_test_path();
    assert!(path.hit_test(Pos2::new(15.0, 15.0)));
    assert!(!path.hit_test(Pos2::new(50.0, 50.0)));

    let image = create_test_image();
    assert!(image.hit_test(Pos2::new(50.0, 40.0)));
    assert!(!image.hit_test(Pos2::new(200.0, 200.0)));

    let triangle = factory::create_triangle(Pos2::ZERO, Vec2::splat(50.0), Color32::RED);
    assert!(triangle.hit_test(Pos2::new(25.0, 40.0)));
    // Inside the bounding box but outside the triangle
    assert!(!triangle.hit_test(Pos2::new(2.0, 2.0)));
}

#[test]
fn test_set_size_keeps_line_end_in_sync() {
    let mut line = factory::create_line(Pos2::ZERO, Vec2::new(48.0, 0.0), Color32::BLACK, 1.0);
    line.set_size(Vec2::new(-10.0, 20.0));
    assert_eq!(line.kind(), &ElementKind::Line { end: Vec2::new(-10.0, 20.0) });
    assert_eq!(line.rect(), Rect::from_min_max(Pos2::new(-10.0, 0.0), Pos2::new(0.0, 20.0)));
}

#[test]
fn test_invalid_resize_is_rejected() {
    let mut rect = factory::create_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::RED);
    let result = rect.resize(Rect::from_min_size(Pos2::ZERO, Vec2::new(0.1, 0.1)));
    assert!(result.unwrap_err().contains("too small"));
    assert_eq!(rect.size(), Vec2::splat(10.0));
}

#[test]
fn test_opacity_is_clamped() {
    let mut rect = factory::create_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::RED);
    rect.set_opacity(1.7);
    assert_eq!(rect.style().opacity, 1.0);
    rect.set_opacity(-0.2);
    assert_eq!(rect.style().opacity, 0.0);
}
