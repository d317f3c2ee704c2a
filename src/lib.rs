#![warn(clippy::all, rust_2018_idioms)]

pub mod assets;
pub mod behavior;
pub mod canvas;
pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod id_generator;
pub mod session;
pub mod style;

pub use assets::{AssetSource, ImageLoader, LoadedImage, MemoryAssetSource};
pub use behavior::{ImageController, ImageOptions, TextController, TextOptions};
pub use canvas::{Canvas, CanvasObject, CanvasSnapshot, ExportFormat, ObjectEvent};
pub use config::EditorConfig;
pub use element::{BaseElement, ElementRecord, ImageElement, TextElement};
pub use error::{DeserializationError, EditorError, EditorResult, LoadError};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use session::{EditorSession, EditorState, SnapshotHistory};
pub use style::{StyleConfig, StyleManager};
