use egui::{Color32, Pos2, Vec2};
use sketchboard::element::{factory, ElementKind};
use sketchboard::panel::PropertyPanelState;
use sketchboard::{EditorConfig, PendingShapeKind};

#[test]
fn test_rectangle_factory() {
    let rect = factory::create_rectangle(Pos2::new(5.0, 5.0), Vec2::new(20.0, 10.0), Color32::RED);
    assert!(rect.is_rectangle());
    assert_eq!(rect.element_type(), "rect");
    assert_eq!(rect.style().fill, Color32::RED);
    assert_eq!(rect.style().stroke, None);
    assert!(rect.is_selectable());
}

#[test]
fn test_outline_rectangle_is_rectangle_kind() {
    let outline = factory::create_outline_rectangle(Pos2::ZERO, Vec2::splat(10.0), Color32::BLUE, 3.0);
    assert!(outline.is_rectangle());
    assert_eq!(outline.style().fill, Color32::TRANSPARENT);
    assert_eq!(outline.style().stroke, Some(Color32::BLUE));
    assert_eq!(outline.style().stroke_width, 3.0);
}

#[test]
fn test_line_factory() {
    let line = factory::create_line(Pos2::new(10.0, 10.0), Vec2::new(48.0, 0.0), Color32::BLACK, 2.0);
    assert_eq!(line.element_type(), "line");
    // Horizontal lines are still pickable along their length
    assert!(line.hit_test(Pos2::new(30.0, 11.0)));
    assert!(!line.hit_test(Pos2::new(30.0, 30.0)));
}

#[test]
fn test_text_factory() {
    let text = factory::create_text(Pos2::new(75.0, 75.0), "Text", 40.0, Color32::BLACK);
    let ElementKind::TextBox { text: content, font_size } = text.kind() else {
        panic!("expected text box");
    };
    assert_eq!(content, "Text");
    assert_eq!(*font_size, 40.0);
    assert!(text.size().x > 0.0 && text.size().y > 0.0);
}

#[test]
fn test_path_needs_two_points() {
    assert!(factory::create_path(&[Pos2::ZERO], Color32::BLACK, 1.0).is_none());
    assert!(factory::create_path(&[Pos2::ZERO, Pos2::new(3.0, 4.0)], Color32::BLACK, 1.0).is_some());
}

#[test]
fn test_pending_kinds_instantiate_with_panel_style() {
    let config = EditorConfig::default();
    let panel = PropertyPanelState {
        color: Color32::GREEN,
        width: 6,
        opacity: 4,
    };
    let point = Pos2::new(200.0, 120.0);

    for kind in PendingShapeKind::ALL {
        let element = kind.instantiate(point, &panel, &config);
        assert_eq!(element.style().opacity, 0.4, "{:?}", kind);
        match kind {
            PendingShapeKind::Rectangle | PendingShapeKind::Triangle => {
                assert_eq!(element.style().fill, Color32::GREEN);
                assert_eq!(element.rect().center(), point);
            }
            PendingShapeKind::OutlineRectangle => {
                assert_eq!(element.style().stroke, Some(Color32::GREEN));
                assert_eq!(element.style().stroke_width, 6.0);
            }
            PendingShapeKind::Line => {
                assert_eq!(element.style().stroke_width, 6.0);
                assert_eq!(element.position(), point);
            }
            PendingShapeKind::TextBox => {
                assert_eq!(element.position(), Pos2::new(175.0, 95.0));
            }
        }
    }
}
