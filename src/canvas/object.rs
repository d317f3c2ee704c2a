use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::controls::{Control, ControlsVisibility};
use super::events::{EventKind, Handler, ObjectEvent};

/// Accent used for visible selection borders
pub const ACCENT_COLOR: &str = "#4285f4";
pub const TRANSPARENT: &str = "transparent";

/// Custom type tag attached to every object created by the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Text,
    Image,
    Shape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStyle {
    #[default]
    Rect,
    Circle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: String,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// How the selection border and corner handles of an object look.
///
/// Applied per object at creation or insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStyle {
    pub border_color: String,
    pub corner_color: String,
    pub corner_stroke_color: String,
    pub corner_style: CornerStyle,
    pub corner_size: f32,
    pub transparent_corners: bool,
    pub border_scale_factor: f32,
    pub padding: f32,
    pub with_connection: bool,
}

impl Default for SelectionStyle {
    fn default() -> Self {
        Self {
            border_color: "red".to_owned(),
            corner_color: "red".to_owned(),
            corner_stroke_color: "red".to_owned(),
            corner_style: CornerStyle::Rect,
            corner_size: 4.0,
            transparent_corners: false,
            border_scale_factor: 2.0,
            padding: 0.0,
            with_connection: false,
        }
    }
}

/// Movement, rotation and scaling locks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockFlags {
    pub movement_x: bool,
    pub movement_y: bool,
    pub rotation: bool,
    pub scaling_x: bool,
    pub scaling_y: bool,
}

impl LockFlags {
    pub fn all(locked: bool) -> Self {
        Self {
            movement_x: locked,
            movement_y: locked,
            rotation: locked,
            scaling_x: locked,
            scaling_y: locked,
        }
    }
}

/// Interaction flags an object had before it was locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInteraction {
    pub evented: bool,
    pub locks: LockFlags,
}

impl Default for SavedInteraction {
    fn default() -> Self {
        Self {
            evented: true,
            locks: LockFlags::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u32,
    pub font_style: FontStyle,
    pub text_align: TextAlign,
    pub underline: bool,
    pub linethrough: bool,
    pub line_height: f64,
    #[serde(default)]
    pub shadow: Option<Shadow>,
    pub split_by_grapheme: bool,
    #[serde(default = "default_text_transform")]
    pub text_transform: String,
    #[serde(default = "default_text_overflow")]
    pub text_overflow: String,
    #[serde(skip)]
    pub is_editing: bool,
    /// Selected character range while editing
    #[serde(skip)]
    pub selection: Option<(usize, usize)>,
}

fn default_text_transform() -> String {
    "none".to_owned()
}

fn default_text_overflow() -> String {
    "visible".to_owned()
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 20.0,
            font_family: "Arial".to_owned(),
            font_weight: 400,
            font_style: FontStyle::Normal,
            text_align: TextAlign::Left,
            underline: false,
            linethrough: false,
            line_height: 1.16,
            shadow: None,
            split_by_grapheme: true,
            text_transform: default_text_transform(),
            text_overflow: default_text_overflow(),
            is_editing: false,
            selection: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProps {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub lock_uni_scaling: bool,
    /// Decoded asset size, recorded before any scale is applied
    #[serde(default)]
    pub original_width: Option<f64>,
    #[serde(default)]
    pub original_height: Option<f64>,
    /// Displayed size of the record this image was rebuilt from
    #[serde(skip)]
    pub(crate) record_size: Option<RecordSize>,
}

/// Record size paired with the geometry it was unscaled into.
///
/// `width / scale * scale` is not always `width` in floating point, so the
/// record size is reported as-is while the geometry is unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RecordSize {
    pub width: f64,
    pub height: f64,
    geometry: [f64; 4],
}

impl RecordSize {
    pub fn new(width: f64, height: f64, object: &CanvasObject) -> Self {
        Self {
            width,
            height,
            geometry: Self::geometry(object),
        }
    }

    pub fn matches(&self, object: &CanvasObject) -> bool {
        self.geometry == Self::geometry(object)
    }

    fn geometry(object: &CanvasObject) -> [f64; 4] {
        [object.width, object.height, object.scale_x, object.scale_y]
    }
}

/// Native object type, serialized as `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Textbox(TextProps),
    Image(ImageProps),
    Rect,
}

#[derive(Clone)]
struct Binding {
    event: EventKind,
    handler: Handler,
}

/// A live object on the canvas.
///
/// A property bag in the shape the snapshot format expects. Event handlers are
/// bound per object and are never serialized, so restored objects come back
/// without them.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasObject {
    // Custom fields
    pub id: String,
    pub element_type: ElementKind,
    #[serde(default)]
    pub is_editable: bool,

    // Geometry
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    #[serde(default)]
    pub skew_x: f64,
    #[serde(default)]
    pub skew_y: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub flip_y: bool,

    // Style
    pub opacity: f64,
    #[serde(default)]
    pub fill: String,
    #[serde(default)]
    pub stroke: Option<String>,
    #[serde(default)]
    pub stroke_width: f64,
    #[serde(default)]
    pub background_color: String,

    // Interaction
    pub selectable: bool,
    pub evented: bool,
    #[serde(default)]
    pub locks: LockFlags,
    /// Set while locked, restored on unlock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlock_state: Option<SavedInteraction>,
    #[serde(default)]
    pub appearance: SelectionStyle,
    #[serde(default)]
    pub controls: ControlsVisibility,
    /// Vertical offset of the rotation handle from the top edge
    #[serde(default)]
    pub rotation_offset: f32,

    // Mirror bookkeeping
    #[serde(default)]
    pub z_index: i32,
    #[serde(default = "default_radius")]
    pub radius: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(flatten)]
    pub kind: ObjectKind,

    #[serde(skip)]
    handlers: Vec<Binding>,
}

fn default_radius() -> String {
    "0".to_owned()
}

impl std::fmt::Debug for CanvasObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasObject")
            .field("id", &self.id)
            .field("element_type", &self.element_type)
            .field("left", &self.left)
            .field("top", &self.top)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("scale_x", &self.scale_x)
            .field("scale_y", &self.scale_y)
            .field("kind", &self.kind)
            .field("handlers", &format!("<{} handlers>", self.handlers.len()))
            .finish()
    }
}

impl CanvasObject {
    /// Create an object with neutral geometry and default interaction flags
    pub fn new(id: impl Into<String>, element_type: ElementKind, kind: ObjectKind) -> Self {
        Self {
            id: id.into(),
            element_type,
            is_editable: false,
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            skew_x: 0.0,
            skew_y: 0.0,
            flip_x: false,
            flip_y: false,
            opacity: 1.0,
            fill: String::new(),
            stroke: None,
            stroke_width: 0.0,
            background_color: String::new(),
            selectable: true,
            evented: true,
            locks: LockFlags::default(),
            unlock_state: None,
            appearance: SelectionStyle::default(),
            controls: ControlsVisibility::default(),
            rotation_offset: -35.0,
            z_index: 0,
            radius: default_radius(),
            parent_id: None,
            kind,
            handlers: Vec::new(),
        }
    }

    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            ObjectKind::Textbox(t) => Some(t),
            _ => None,
        }
    }

    pub fn text_mut(&mut self) -> Option<&mut TextProps> {
        match &mut self.kind {
            ObjectKind::Textbox(t) => Some(t),
            _ => None,
        }
    }

    pub fn image(&self) -> Option<&ImageProps> {
        match &self.kind {
            ObjectKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn image_mut(&mut self) -> Option<&mut ImageProps> {
        match &mut self.kind {
            ObjectKind::Image(i) => Some(i),
            _ => None,
        }
    }

    pub fn is_textbox(&self) -> bool {
        matches!(self.kind, ObjectKind::Textbox(_))
    }

    pub fn is_editing(&self) -> bool {
        self.text().is_some_and(|t| t.is_editing)
    }

    /// An object is locked when it has been made non-selectable by the lock toggle
    pub fn is_locked(&self) -> bool {
        !self.selectable
    }

    /// Displayed size after scaling
    pub fn scaled_size(&self) -> (f64, f64) {
        (self.width * self.scale_x.abs(), self.height * self.scale_y.abs())
    }

    pub fn set_controls_visibility(&mut self, visibility: ControlsVisibility) {
        self.controls = visibility;
    }

    pub fn is_control_visible(&self, control: Control) -> bool {
        self.controls.is_visible(control)
    }

    /// Bind a handler to an event kind
    pub fn on<F>(&mut self, event: EventKind, handler: F)
    where
        F: Fn(&mut CanvasObject, &ObjectEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Binding {
            event,
            handler: Arc::new(handler),
        });
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn clear_handlers(&mut self) {
        self.handlers.clear();
    }

    /// Run every handler bound to the event's kind
    pub fn emit(&mut self, event: &ObjectEvent) {
        let kind = event.kind();
        let handlers: Vec<Handler> = self
            .handlers
            .iter()
            .filter(|b| b.event == kind)
            .map(|b| Arc::clone(&b.handler))
            .collect();

        for handler in handlers {
            handler(self, event);
        }
    }
}
