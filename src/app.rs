use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use raw_window_handle::HasWindowHandle;

use crate::color::to_hex;
use crate::config::EditorConfig;
use crate::event::EditorEvent;
use crate::export::{ExportOutcome, FileSink};
use crate::file_handler::FileHandler;
use crate::input::{route_event, route_widget, InputEvent, InputHandler, WidgetEvent};
use crate::panels::{central_panel, tools_panel};
use crate::renderer::EguiRenderer;
use crate::session::EditorSession;

/// Text fields of the toolbar that are edited across frames
#[derive(Debug, Clone)]
pub struct ToolbarState {
    pub color_text: String,
    pub export_name: String,
    pub status: Option<String>,
}

/// Desktop host around one canvas session
pub struct SketchApp {
    session: EditorSession<EguiRenderer>,
    input: InputHandler,
    file_handler: FileHandler,
    toolbar: ToolbarState,
    export_dir: PathBuf,
    /// Failures reported by session observers, shown in the status line
    notices: Rc<RefCell<Vec<String>>>,
}

impl SketchApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig, export_dir: PathBuf) -> Self {
        let mut session = EditorSession::new(config);
        let renderer = EguiRenderer::new(cc.egui_ctx.clone(), session.config().canvas_size());

        let status = match cc.window_handle() {
            Ok(handle) => match session.acquire(&handle.as_raw(), renderer) {
                Ok(_) => None,
                Err(err) => {
                    log::error!("{}", err);
                    Some(err.to_string())
                }
            },
            Err(err) => {
                log::error!("No window handle for the canvas: {}", err);
                Some(format!("No window handle: {}", err))
            }
        };

        let notices = Rc::new(RefCell::new(Vec::new()));
        let sink = notices.clone();
        session.subscribe(move |event: &EditorEvent| {
            if let EditorEvent::ImportFailed { reason, .. } = event {
                sink.borrow_mut().push(reason.clone());
            }
        });

        Self {
            toolbar: ToolbarState {
                color_text: to_hex(session.panel().color),
                export_name: String::new(),
                status,
            },
            session,
            input: InputHandler::new(),
            file_handler: FileHandler::new(),
            export_dir,
            notices,
        }
    }

    pub fn session(&self) -> &EditorSession<EguiRenderer> {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut EditorSession<EguiRenderer> {
        &mut self.session
    }

    pub(crate) fn input_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn toolbar(&self) -> &ToolbarState {
        &self.toolbar
    }

    pub(crate) fn toolbar_mut(&mut self) -> &mut ToolbarState {
        &mut self.toolbar
    }

    pub fn dispatch(&mut self, event: WidgetEvent) {
        route_widget(&event, &mut self.session);
        // Selecting an element may have changed the panel color
        self.toolbar.color_text = to_hex(self.session.panel().color);
    }

    pub fn handle_input(&mut self, events: &[InputEvent]) {
        for event in events {
            route_event(event, &mut self.session);
        }
        if !events.is_empty() {
            self.toolbar.color_text = to_hex(self.session.panel().color);
        }
    }

    /// Save the canvas as a PNG named after the export field
    pub fn export(&mut self) {
        let mut sink = FileSink::new(&self.export_dir);
        let name = self.toolbar.export_name.clone();
        self.toolbar.status = match self.session.export_png(&name, &mut sink) {
            Ok(ExportOutcome::Delivered { bytes }) => {
                Some(format!("Saved {} ({} bytes)", sink.target_path(name.trim()).display(), bytes))
            }
            Ok(ExportOutcome::Skipped) => Some("Enter a file name to export".to_owned()),
            Err(err) => {
                log::error!("Export failed: {}", err);
                Some(err.to_string())
            }
        };
    }
}

impl eframe::App for SketchApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.file_handler.check_for_dropped_files(ctx) {
            let drop_point = self.input.last_canvas_pos();
            self.file_handler.process_dropped_files(&mut self.session, drop_point);
        }
        self.session.poll_imports();
        if let Some(notice) = self.notices.borrow_mut().pop() {
            self.toolbar.status = Some(notice);
        }

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.file_handler.preview_files_being_dropped(ctx);
    }
}
