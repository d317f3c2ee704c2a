//! In-process scene model: an ordered list of property-bag objects.
//!
//! The canvas owns its objects. Everything else refers to them by id. Every
//! mutation through the controllers ends with [`Canvas::request_render`], which
//! is what a display layer polls to know the canvas is dirty.

use log::{debug, trace};

mod controls;
mod events;
mod object;
pub mod raster;
mod snapshot;

pub use controls::{
    Control, ControlRenderer, ControlRenderers, ControlsVisibility, RotateIcon, rotation_handle_position,
};
pub use events::{EventKind, Handler, ObjectEvent};
pub use object::{
    ACCENT_COLOR, CanvasObject, CornerStyle, ElementKind, FontStyle, ImageProps, LockFlags, ObjectKind,
    SavedInteraction, SelectionStyle, Shadow, TRANSPARENT, TextAlign, TextProps,
};
pub(crate) use object::RecordSize;
pub use raster::ExportFormat;
pub use snapshot::CanvasSnapshot;

use crate::config::{EditorConfig, clamp_zoom};

#[derive(Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: String,
    zoom: f32,
    objects: Vec<CanvasObject>,
    active: Option<String>,
    control_renderers: ControlRenderers,
    render_requests: u64,
}

impl Canvas {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            background: config.background_color.clone(),
            zoom: clamp_zoom(config.zoom),
            objects: Vec::new(),
            active: None,
            control_renderers: ControlRenderers::default(),
            render_requests: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn set_background(&mut self, color: &str) {
        self.background = color.to_owned();
        self.request_render();
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom level, clamped to the supported range. Returns the applied value.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = clamp_zoom(zoom);
        self.request_render();
        self.zoom
    }

    /// Mark the canvas as needing a redraw
    pub fn request_render(&mut self) {
        self.render_requests += 1;
        trace!("Render requested ({})", self.render_requests);
    }

    /// Number of redraws requested since creation
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    /// Objects in stacking order, bottom first
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut CanvasObject> {
        self.objects.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object(&self, id: &str) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn object_mut(&mut self, id: &str) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn add(&mut self, object: CanvasObject) {
        debug!("Adding {:?} object {}", object.element_type, object.id);
        self.objects.push(object);
        self.reindex();
    }

    pub fn remove(&mut self, id: &str) -> Option<CanvasObject> {
        let index = self.index_of(id)?;
        let removed = self.objects.remove(index);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        self.reindex();
        Some(removed)
    }

    /// Remove every object and drop the selection
    pub fn clear(&mut self) {
        self.objects.clear();
        self.active = None;
    }

    /// Replace all objects at once, e.g. from a snapshot
    pub fn replace_objects(&mut self, objects: Vec<CanvasObject>) {
        self.objects = objects;
        self.active = None;
        self.reindex();
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_object(&self) -> Option<&CanvasObject> {
        self.active.as_deref().and_then(|id| self.object(id))
    }

    /// Set the active object. Unknown ids clear the selection.
    pub fn set_active(&mut self, id: Option<&str>) -> bool {
        self.active = id.filter(|id| self.object(id).is_some()).map(str::to_owned);
        self.active.is_some()
    }

    /// Run the handlers bound on `id` for this event, then request a redraw
    pub fn fire(&mut self, id: &str, event: &ObjectEvent) -> bool {
        let Some(object) = self.object_mut(id) else {
            return false;
        };
        object.emit(event);
        self.request_render();
        true
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        self.move_to(id, |_, len| len - 1)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        self.move_to(id, |_, _| 0)
    }

    pub fn bring_forward(&mut self, id: &str) -> bool {
        self.move_to(id, |i, len| (i + 1).min(len - 1))
    }

    pub fn send_backward(&mut self, id: &str) -> bool {
        self.move_to(id, |i, _| i.saturating_sub(1))
    }

    fn move_to(&mut self, id: &str, target: impl FnOnce(usize, usize) -> usize) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let new_index = target(index, self.objects.len());
        if new_index != index {
            let object = self.objects.remove(index);
            self.objects.insert(new_index, object);
            self.reindex();
        }
        true
    }

    /// Keep each object's `z_index` equal to its stacking position
    fn reindex(&mut self) {
        for (i, object) in self.objects.iter_mut().enumerate() {
            object.z_index = i as i32;
        }
    }

    pub fn control_renderers(&self) -> &ControlRenderers {
        &self.control_renderers
    }

    pub fn control_renderers_mut(&mut self) -> &mut ControlRenderers {
        &mut self.control_renderers
    }

    /// Shapes for the rotation handle of `id`, empty when hidden
    pub fn control_shapes(&self, id: &str) -> Vec<egui::Shape> {
        let Some(object) = self.object(id) else {
            return Vec::new();
        };
        if !object.is_control_visible(Control::Mtr) {
            return Vec::new();
        }
        let (width, _) = object.scaled_size();
        let center =
            rotation_handle_position(object.left as f32, object.top as f32, width as f32, object.rotation_offset);
        self.control_renderers
            .renderer_for(object.element_type)
            .render(center, object.angle as f32)
    }

    /// Capture the full canvas as a snapshot
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot::new(&self.background, self.objects.clone())
    }
}
