use crate::SketchApp;

pub fn central_panel(app: &mut SketchApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let canvas_size = app.session().config().canvas_size();

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(canvas_size, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;
            app.input_mut().set_canvas_rect(canvas_rect);

            match app.session_mut().renderer_and_scene() {
                Some((renderer, scene)) => renderer.paint(scene, &painter, canvas_rect.min),
                None => {
                    painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(60));
                    painter.text(
                        canvas_rect.center(),
                        egui::Align2::CENTER_CENTER,
                        "Canvas unavailable",
                        egui::FontId::proportional(18.0),
                        egui::Color32::WHITE,
                    );
                }
            }
        });
    });

    let events = app.input_mut().process_input(ctx);
    app.handle_input(&events);
}
