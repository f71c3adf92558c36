use crate::SketchApp;
use crate::components::ToolButton;
use crate::input::WidgetEvent;
use crate::layer::LayerOrder;
use crate::panel::{MAX_OPACITY, MAX_WIDTH, MIN_OPACITY, MIN_WIDTH};
use crate::tools::{PendingShapeKind, ToolMode};

fn shape_icon(kind: PendingShapeKind) -> &'static str {
    match kind {
        PendingShapeKind::Rectangle => "⬛",
        PendingShapeKind::OutlineRectangle => "⬜",
        PendingShapeKind::Triangle => "▲",
        PendingShapeKind::Line => "╱",
        PendingShapeKind::TextBox => "T",
    }
}

pub fn tools_panel(app: &mut SketchApp, ctx: &egui::Context) {
    let mut events = Vec::new();
    let mut export_clicked = false;

    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            let session = app.session();
            let mode = session.mode();
            let pending = session.pending_shape();
            let drag_create = session.drag_create_enabled();
            let panel = *session.panel();
            let cropping = session.clip().is_some();

            ui.heading("Tools");
            ui.horizontal(|ui| {
                if ToolButton::new("⬉", "Select", mode == ToolMode::Select).show(ui).clicked() {
                    events.push(WidgetEvent::Mode(ToolMode::Select));
                }
                if ToolButton::new("✏", "Free draw", mode == ToolMode::FreeDraw).show(ui).clicked() {
                    events.push(WidgetEvent::Mode(ToolMode::FreeDraw));
                }
                if ToolButton::new("⬚", "Drag to create rectangle", drag_create).show(ui).clicked() {
                    events.push(WidgetEvent::DragCreate(!drag_create));
                }
            });

            ui.separator();
            ui.label("Double-click to add");
            ui.horizontal_wrapped(|ui| {
                for kind in PendingShapeKind::ALL {
                    let selected = pending == Some(kind);
                    if ToolButton::new(shape_icon(kind), kind.label(), selected).show(ui).clicked() {
                        events.push(WidgetEvent::PendingShape(if selected { None } else { Some(kind) }));
                    }
                }
            });

            ui.separator();
            ui.heading("Properties");
            ui.horizontal(|ui| {
                ui.label("Color:");
                let mut color = panel.color;
                if egui::color_picker::color_edit_button_srgba(ui, &mut color, egui::color_picker::Alpha::Opaque)
                    .changed()
                {
                    events.push(WidgetEvent::Color(crate::color::to_hex(color)));
                }
                let response = ui.text_edit_singleline(&mut app.toolbar_mut().color_text);
                if response.lost_focus() {
                    events.push(WidgetEvent::Color(app.toolbar().color_text.clone()));
                }
            });

            let mut width = panel.width;
            if ui
                .add(egui::Slider::new(&mut width, MIN_WIDTH..=MAX_WIDTH).text("Width"))
                .changed()
            {
                events.push(WidgetEvent::Width(width as i64));
            }
            let mut opacity = panel.opacity;
            if ui
                .add(egui::Slider::new(&mut opacity, MIN_OPACITY..=MAX_OPACITY).text("Opacity"))
                .changed()
            {
                events.push(WidgetEvent::Opacity(opacity as i64));
            }

            ui.separator();
            ui.heading("Arrange");
            ui.horizontal_wrapped(|ui| {
                for order in LayerOrder::ALL {
                    if ui.button(order.to_string()).clicked() {
                        events.push(WidgetEvent::Layer(order));
                    }
                }
            });

            ui.separator();
            ui.heading("Crop");
            ui.horizontal(|ui| {
                if ui.add_enabled(!cropping, egui::Button::new("Crop image")).clicked() {
                    events.push(WidgetEvent::CropBegin);
                }
                if ui.add_enabled(cropping, egui::Button::new("Apply")).clicked() {
                    events.push(WidgetEvent::CropConfirm);
                }
                if ui.add_enabled(cropping, egui::Button::new("Cancel")).clicked() {
                    events.push(WidgetEvent::CropCancel);
                }
            });

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Delete selected").clicked() {
                    events.push(WidgetEvent::RemoveSelected);
                }
                if ui.button("Clear canvas").clicked() {
                    events.push(WidgetEvent::Clear);
                }
            });

            ui.separator();
            ui.heading("Export");
            ui.horizontal(|ui| {
                ui.add(egui::TextEdit::singleline(&mut app.toolbar_mut().export_name).hint_text("file name"));
                export_clicked = ui.button("Save PNG").clicked();
            });

            if let Some(status) = &app.toolbar().status {
                ui.separator();
                ui.label(status);
            }
        });

    for event in events {
        log::debug!("Toolbar: {:?}", event);
        app.dispatch(event);
    }
    if export_clicked {
        app.export();
    }
}
