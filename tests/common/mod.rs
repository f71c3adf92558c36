#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use egui::{Color32, Pos2};
use image::{ImageFormat, Rgba, RgbaImage};
use raw_window_handle::{RawWindowHandle, WebWindowHandle};
use sketchboard::brush::{Brush, BrushInput, StrokeCapture};
use sketchboard::error::{ExportError, RenderError};
use sketchboard::event::EditorEvent;
use sketchboard::export::DownloadSink;
use sketchboard::{EditorConfig, EditorSession, Scene, SceneRenderer};

/// Renderer double that records every call the session makes
#[derive(Debug, Default)]
pub struct FakeRenderer {
    pub drawing: bool,
    pub drawing_calls: Vec<bool>,
    pub brushes: Vec<Brush>,
    pub renders: usize,
    pub encodes: usize,
    pub capture: StrokeCapture,
    pub released: Rc<Cell<bool>>,
}

impl SceneRenderer for FakeRenderer {
    fn set_drawing_mode(&mut self, enabled: bool) {
        self.drawing = enabled;
        self.drawing_calls.push(enabled);
    }

    fn configure_brush(&mut self, brush: &Brush) {
        self.brushes.push(*brush);
    }

    fn brush_input(&mut self, input: BrushInput) -> Option<Vec<Pos2>> {
        if !self.drawing {
            return None;
        }
        self.capture.feed(input)
    }

    fn request_render(&mut self) {
        self.renders += 1;
    }

    fn encode_png(&mut self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        self.encodes += 1;
        let mut png = vec![0x89, b'P', b'N', b'G'];
        png.push(scene.len() as u8);
        Ok(png)
    }

    fn release(&mut self) {
        self.released.set(true);
    }
}

/// Sink that keeps every delivered file in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub delivered: Vec<(String, Vec<u8>)>,
}

impl DownloadSink for RecordingSink {
    fn deliver(&mut self, filename: &str, png: Vec<u8>) -> Result<(), ExportError> {
        self.delivered.push((filename.to_owned(), png));
        Ok(())
    }
}

pub fn web_mount() -> RawWindowHandle {
    RawWindowHandle::Web(WebWindowHandle::new(1))
}

pub fn live_session() -> EditorSession<FakeRenderer> {
    let mut session = EditorSession::new(EditorConfig::default());
    session.acquire(&web_mount(), FakeRenderer::default()).unwrap();
    session
}

pub fn renderer(session: &EditorSession<FakeRenderer>) -> &FakeRenderer {
    session.renderer().unwrap()
}

pub fn scene(session: &EditorSession<FakeRenderer>) -> &Scene {
    session.scene().unwrap()
}

/// Click (down + up) at `point`
pub fn click(session: &mut EditorSession<FakeRenderer>, point: Pos2) {
    session.pointer_down(point);
    session.pointer_up(point);
}

pub fn record_events(session: &EditorSession<FakeRenderer>) -> Rc<RefCell<Vec<EditorEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    session.subscribe(move |event: &EditorEvent| sink.borrow_mut().push(event.clone()));
    events
}

pub fn png_bytes(width: u32, height: u32, color: Color32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color.to_srgba_unmultiplied()));
    let mut bytes = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
