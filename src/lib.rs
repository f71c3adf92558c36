#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod brush;
pub mod clip;
pub mod color;
pub mod components;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod export;
pub mod file_handler;
pub mod import;
pub mod input;
pub mod layer;
pub mod panel;
pub mod panels;
pub mod renderer;
pub mod scene;
pub mod selection;
pub mod session;
pub mod texture_manager;
pub mod tools;

pub use app::SketchApp;
pub use config::EditorConfig;
pub use element::{Element, ElementId, ElementKind};
pub use error::EditorError;
pub use event::EditorEvent;
pub use input::{InputEvent, WidgetEvent};
pub use renderer::{EguiRenderer, SceneRenderer};
pub use scene::Scene;
pub use session::EditorSession;
pub use tools::{PendingShapeKind, ToolMode};
