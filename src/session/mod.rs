//! The canvas session: owns the canvas, the element mirror, the selection and
//! the undo history, and routes object events to the element behaviors.

mod history;
mod state;

use std::sync::Arc;

use log::{debug, error, info, warn};

pub use history::SnapshotHistory;
pub use state::EditorState;

use crate::assets::{AssetSource, ImageLoader};
use crate::behavior::{self, ImageController, ImageOptions, TextController, TextOptions};
use crate::canvas::{Canvas, CanvasObject, CanvasSnapshot, ExportFormat, ObjectEvent, SelectionStyle, raster};
use crate::config::EditorConfig;
use crate::error::{EditorError, EditorResult, LoadError};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::style::StyleManager;

pub struct EditorSession {
    canvas: Canvas,
    config: EditorConfig,
    state: EditorState,
    history: SnapshotHistory,
    text: TextController,
    images: ImageController,
    style: StyleManager,
    events: EventBus,
    selection_style: SelectionStyle,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("objects", &self.canvas.len())
            .field("state", &self.state)
            .field("history", &self.history.len())
            .field("text", &self.text)
            .finish()
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig, source: impl AssetSource + 'static) -> Self {
        Self::with_loader(config, Arc::new(ImageLoader::new(source)))
    }

    pub fn with_loader(config: EditorConfig, loader: Arc<ImageLoader>) -> Self {
        let mut canvas = Canvas::new(&config);
        TextController::register_controls(&mut canvas);

        Self {
            canvas,
            history: SnapshotHistory::with_limit(config.history_limit),
            config,
            state: EditorState::default(),
            text: TextController::new(),
            images: ImageController::new(loader),
            style: StyleManager::new(),
            events: EventBus::new(),
            selection_style: SelectionStyle::default(),
        }
    }

    /// Selection appearance applied to every object added through this session
    pub fn with_selection_style(mut self, style: SelectionStyle) -> Self {
        self.selection_style = style;
        self
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn style(&self) -> &StyleManager {
        &self.style
    }

    pub fn text(&self) -> &TextController {
        &self.text
    }

    pub fn images(&self) -> &ImageController {
        &self.images
    }

    pub fn active_object(&self) -> Option<&CanvasObject> {
        self.state.active_object().and_then(|id| self.canvas.object(id))
    }

    pub fn is_text_editing(&self) -> bool {
        self.state.is_text_editing()
    }

    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    /// Mutate the canvas directly, then resync the element mirror
    pub fn with_canvas<R>(&mut self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let result = f(&mut self.canvas);
        self.sync_elements();
        result
    }

    /// Run a style operation against the current selection, then resync the mirror
    pub fn apply_style<R>(&mut self, f: impl FnOnce(&mut StyleManager, &mut Canvas) -> R) -> R {
        let result = f(&mut self.style, &mut self.canvas);
        self.sync_elements();
        result
    }

    /// Insert an object, make it the selection and mirror it. Returns its id.
    pub fn add_element(&mut self, mut object: CanvasObject) -> String {
        let id = object.id.clone();
        if self.canvas.remove(&id).is_some() {
            warn!("Replacing existing object with id {}", id);
        }

        let style = &self.selection_style;
        object.appearance.border_color = style.border_color.clone();
        object.appearance.corner_color = style.corner_color.clone();
        object.appearance.corner_stroke_color = style.corner_stroke_color.clone();
        object.appearance.corner_size = style.corner_size;
        object.appearance.border_scale_factor = style.border_scale_factor;
        object.appearance.padding = style.padding;
        object.controls.mtr = true;
        self.canvas.add(object);
        self.refresh_element(&id);
        self.events.emit(EditorEvent::ElementAdded { id: id.clone() });

        self.select(Some(&id));
        self.canvas.request_render();
        id
    }

    pub fn create_text(&mut self, content: &str, options: TextOptions) -> String {
        let object = TextController::create_text(content, options);
        self.add_element(object)
    }

    pub async fn add_image(&mut self, src: &str, options: ImageOptions) -> Result<String, LoadError> {
        let object = self.images.create_image(src, options).await?;
        Ok(self.add_element(object))
    }

    /// Change the selection. Unknown ids clear it. Losing or moving the
    /// selection ends text edit mode.
    pub fn select(&mut self, id: Option<&str>) {
        let next = id
            .filter(|id| self.canvas.object(id).is_some())
            .map(str::to_owned);
        let previous = self.state.selected_element_id().map(str::to_owned);
        if next == previous {
            return;
        }

        if self.text.editing_id().is_some() && self.text.editing_id() != next.as_deref() {
            self.text.force_exit_edit(&mut self.canvas);
            self.state.set_text_editing(false);
        }
        if let Some(previous) = &previous {
            self.canvas.fire(previous, &ObjectEvent::Deselected);
        }

        self.canvas.set_active(next.as_deref());
        self.state.set_selection(next.clone());
        if let Some(next) = &next {
            self.canvas.fire(next, &ObjectEvent::Selected);
        }
        self.style.set_active_object(&self.canvas, next.as_deref());

        debug!("Selection changed: {:?} -> {:?}", previous, next);
        self.events.emit(EditorEvent::SelectionChanged { id: next });
    }

    /// Deliver an object event and react to it
    pub fn dispatch(&mut self, id: &str, event: ObjectEvent) -> bool {
        if !self.canvas.fire(id, &event) {
            return false;
        }

        match event {
            ObjectEvent::DoubleClick => {
                if self.canvas.object(id).is_some_and(|o| o.is_textbox()) {
                    self.enter_text_edit(id);
                }
            }
            ObjectEvent::Modified | ObjectEvent::Scaling { .. } | ObjectEvent::Changed => {
                self.refresh_element(id);
                self.events.emit(EditorEvent::ElementUpdated { id: id.to_owned() });
            }
            ObjectEvent::Selected | ObjectEvent::Deselected => {}
        }
        true
    }

    /// Select a textbox and put it into edit mode
    pub fn enter_text_edit(&mut self, id: &str) -> bool {
        self.select(Some(id));
        if !self.text.enter_edit(&mut self.canvas, id) {
            return false;
        }
        self.state.set_text_editing(true);
        self.events.emit(EditorEvent::TextEditingChanged { editing: true });
        true
    }

    pub fn exit_text_edit(&mut self) -> bool {
        if !self.text.force_exit_edit(&mut self.canvas) {
            return false;
        }
        self.state.set_text_editing(false);
        self.sync_elements();
        self.events.emit(EditorEvent::TextEditingChanged { editing: false });
        true
    }

    /// Lock or unlock the selection. Locking the textbox being edited ends edit mode first.
    pub fn toggle_lock(&mut self) -> bool {
        let active = self.state.selected_element_id().map(str::to_owned);
        if active.is_some() && self.text.editing_id() == active.as_deref() {
            self.exit_text_edit();
        }
        self.apply_style(|style, canvas| style.toggle_lock(canvas))
    }

    /// Remove the selected object from the canvas and the mirror
    pub fn remove_active(&mut self) -> bool {
        let Some(id) = self.state.selected_element_id().map(str::to_owned) else {
            return false;
        };

        if self.text.editing_id() == Some(id.as_str()) {
            self.text.exit_edit(&mut self.canvas, &id);
        }
        self.canvas.remove(&id);
        self.state.remove_element(&id);
        self.state.set_selection(None);
        self.style.set_active_object(&self.canvas, None);
        self.canvas.request_render();

        info!("🗑️ Removed {}", id);
        self.events.emit(EditorEvent::ElementRemoved { id });
        self.events.emit(EditorEvent::SelectionChanged { id: None });
        true
    }

    /// Empty the canvas, mirror, selection and edit mode together
    pub fn clear(&mut self) {
        self.canvas.clear();
        self.text.reset();
        self.state.clear();
        self.style.set_active_object(&self.canvas, None);
        self.canvas.request_render();

        info!("🧹 Canvas cleared");
        self.events.emit(EditorEvent::Cleared);
    }

    pub fn set_canvas_background(&mut self, color: &str) {
        self.config.background_color = color.to_owned();
        self.canvas.set_background(color);
        self.emit_view_changed();
    }

    /// Zoom the canvas, clamped to [0.1, 5]. Returns the applied zoom.
    pub fn zoom_canvas(&mut self, zoom: f32) -> f32 {
        let applied = self.canvas.set_zoom(zoom);
        self.config.zoom = applied;
        self.emit_view_changed();
        applied
    }

    fn emit_view_changed(&self) {
        self.events.emit(EditorEvent::ViewChanged {
            zoom: self.canvas.zoom(),
            background: self.canvas.background().to_owned(),
        });
    }

    /// Serialize the whole canvas, custom fields included. Objects are written
    /// with the interaction flags they have outside text edit mode.
    pub fn export_snapshot(&self) -> EditorResult<String> {
        let mut snapshot = self.canvas.snapshot();
        self.text.strip_edit_state(&mut snapshot.objects);
        snapshot.to_json().map_err(EditorError::Serialization)
    }

    /// Replace the canvas contents with a snapshot.
    ///
    /// The snapshot is parsed and its image assets resolved before the canvas is
    /// touched, so a failed restore leaves everything as it was.
    pub async fn restore_snapshot(&mut self, json: &str) -> EditorResult<()> {
        match self.try_restore(json).await {
            Ok(()) => {
                self.events.emit(EditorEvent::SnapshotRestored);
                self.events.emit(EditorEvent::SelectionChanged {
                    id: self.state.selected_element_id().map(str::to_owned),
                });
                Ok(())
            }
            Err(err) => {
                error!("❌ Failed to restore canvas snapshot: {}", err);
                self.events.emit(EditorEvent::RestoreFailed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn try_restore(&mut self, json: &str) -> EditorResult<()> {
        let CanvasSnapshot {
            background,
            mut objects,
            ..
        } = CanvasSnapshot::parse(json)?;

        for object in &objects {
            if let Some(image) = object.image() {
                self.images.loader().load(&image.src).await?;
            }
        }

        // Restored objects come back without handler bindings
        for object in &mut objects {
            behavior::install_handlers(object);
        }

        let previous = self.state.selected_element_id().map(str::to_owned);

        self.text.reset();
        self.canvas.replace_objects(objects);
        self.canvas.set_background(&background);
        self.state.set_text_editing(false);
        self.sync_elements();

        let reselect = previous.filter(|id| self.canvas.object(id).is_some());
        self.canvas.set_active(reselect.as_deref());
        self.state.set_selection(reselect.clone());
        self.style.set_active_object(&self.canvas, reselect.as_deref());
        self.canvas.request_render();

        info!("♻️ Restored snapshot with {} objects", self.canvas.len());
        Ok(())
    }

    /// Rasterize the canvas into a data URL
    pub fn export_image(&self, format: ExportFormat, quality: f32) -> EditorResult<String> {
        let image = raster::rasterize(&self.canvas, self.images.loader());
        let bytes = raster::encode(image, format, quality)?;
        Ok(raster::to_data_url(&bytes, format))
    }

    /// Record the current canvas as an undo step
    pub fn push_history(&mut self) -> bool {
        match self.export_snapshot() {
            Ok(snapshot) => {
                self.history.push(snapshot);
                self.emit_history_changed();
                true
            }
            Err(err) => {
                error!("❌ Failed to capture history snapshot: {}", err);
                false
            }
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restore the previous snapshot; no-op at the earliest entry
    pub async fn undo(&mut self) -> bool {
        let previous = self.history.cursor();
        let Some(snapshot) = self.history.undo().map(str::to_owned) else {
            return false;
        };
        self.restore_from_history(&snapshot, previous).await
    }

    /// Restore the next snapshot; no-op at the latest entry
    pub async fn redo(&mut self) -> bool {
        let previous = self.history.cursor();
        let Some(snapshot) = self.history.redo().map(str::to_owned) else {
            return false;
        };
        self.restore_from_history(&snapshot, previous).await
    }

    async fn restore_from_history(&mut self, snapshot: &str, previous: Option<usize>) -> bool {
        if self.restore_snapshot(snapshot).await.is_err() {
            self.history.set_cursor(previous);
            return false;
        }
        self.emit_history_changed();
        true
    }

    fn emit_history_changed(&self) {
        self.events.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn refresh_element(&mut self, id: &str) {
        if let Some(record) = self.canvas.object(id).and_then(behavior::element_record) {
            self.state.upsert_element(record);
        }
    }

    /// Rebuild the mirror from the canvas, in stacking order
    fn sync_elements(&mut self) {
        let records = self
            .canvas
            .objects()
            .iter()
            .filter_map(behavior::element_record)
            .collect();
        self.state.replace_elements(records);
    }
}
