use log::{debug, info};

use crate::canvas::{
    ACCENT_COLOR, Canvas, CanvasObject, ControlsVisibility, CornerStyle, ElementKind, EventKind, FontStyle,
    ObjectKind, RotateIcon, Shadow, TRANSPARENT, TextAlign, TextProps,
};
use crate::element::{BaseElement, TextDecoration, TextElement};
use crate::id_generator::generate_id;

/// Scale deviation from 1 below which a committed transform is ignored
pub const SCALE_EPSILON: f64 = 0.01;
/// Uniform resizes never shrink the font below this size
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const DEFAULT_TEXT: &str = "Double-click to edit";

/// Options for [`TextController::create_text`]; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub id: Option<String>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub width: Option<f64>,
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<u32>,
    pub fill: Option<String>,
    pub background_color: Option<String>,
    pub text_align: Option<TextAlign>,
}

/// Partial style update for a textbox
#[derive(Debug, Clone, Default)]
pub struct TextStyle {
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub font_weight: Option<u32>,
    pub font_style: Option<FontStyle>,
    pub fill: Option<String>,
    pub background_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub text_decoration: Option<TextDecoration>,
    pub line_height: Option<f64>,
}

/// Shadow request; unset fields take the defaults
#[derive(Debug, Clone, Default)]
pub struct ShadowOptions {
    pub color: Option<String>,
    pub blur: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

/// How a committed text resize was interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizePolicy {
    /// Only one axis was stretched: the box was resized, the font kept
    Reflow,
    /// Both axes were scaled: box and font scaled by `factor`
    Uniform { factor: f64 },
}

/// Fold a committed scale on a textbox back into its box size and font size.
///
/// Returns `None` when the object is not a textbox or the scale is within
/// [`SCALE_EPSILON`] of 1 on both axes.
pub fn normalize_text_resize(object: &mut CanvasObject) -> Option<ResizePolicy> {
    let font_size = object.text()?.font_size;
    let (scale_x, scale_y) = (object.scale_x, object.scale_y);
    let scaled_x = (scale_x - 1.0).abs() > SCALE_EPSILON;
    let scaled_y = (scale_y - 1.0).abs() > SCALE_EPSILON;

    if !scaled_x && !scaled_y {
        return None;
    }

    let policy = if scaled_x && scaled_y {
        let factor = scale_x.min(scale_y);
        object.width *= factor;
        object.height *= factor;
        if let Some(text) = object.text_mut() {
            text.font_size = (font_size * factor).round().max(MIN_FONT_SIZE);
        }
        ResizePolicy::Uniform { factor }
    } else {
        object.width *= scale_x;
        object.height *= scale_y;
        ResizePolicy::Reflow
    };

    object.scale_x = 1.0;
    object.scale_y = 1.0;
    Some(policy)
}

struct EditSession {
    id: String,
    /// `(id, selectable, evented)` of every other object before entering
    saved: Vec<(String, bool, bool)>,
}

/// Creation defaults, edit mode and style forwarding for textboxes
#[derive(Default)]
pub struct TextController {
    editing: Option<EditSession>,
}

impl std::fmt::Debug for TextController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextController")
            .field("editing", &self.editing_id())
            .finish()
    }
}

impl TextController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the textbox rotation handle renderer on a canvas
    pub fn register_controls(canvas: &mut Canvas) {
        canvas
            .control_renderers_mut()
            .register(ElementKind::Text, RotateIcon::light());
    }

    /// Build a textbox with the editor defaults and its behavior handlers.
    /// Empty content gets the placeholder text.
    pub fn create_text(content: &str, options: TextOptions) -> CanvasObject {
        let font_size = options.font_size.unwrap_or(20.0);
        let props = TextProps {
            text: if content.is_empty() { DEFAULT_TEXT } else { content }.to_owned(),
            font_size,
            font_family: options.font_family.unwrap_or_else(|| "Arial".to_owned()),
            font_weight: options.font_weight.unwrap_or(400),
            text_align: options.text_align.unwrap_or_default(),
            ..TextProps::default()
        };
        let line_height = props.line_height;

        let id = options.id.unwrap_or_else(|| generate_id("text"));
        let mut object = CanvasObject::new(id, ElementKind::Text, ObjectKind::Textbox(props));
        object.is_editable = true;
        object.left = options.left.unwrap_or(100.0);
        object.top = options.top.unwrap_or(100.0);
        object.width = options.width.unwrap_or(100.0);
        object.height = font_size * line_height;
        object.fill = options.fill.unwrap_or_else(|| "#000000".to_owned());
        object.background_color = options.background_color.unwrap_or_default();

        object.appearance.corner_style = CornerStyle::Rect;
        object.appearance.corner_size = 0.0;
        object.appearance.corner_stroke_color = "red".to_owned();
        object.set_controls_visibility(ControlsVisibility::all(true));
        object.rotation_offset = -35.0;

        Self::install_handlers(&mut object);
        debug!("Created text object {}", object.id);
        object
    }

    /// Replace the handlers on a textbox with the text behaviors
    pub fn install_handlers(object: &mut CanvasObject) {
        object.clear_handlers();

        object.on(EventKind::Modified, |obj, _| {
            if let Some(policy) = normalize_text_resize(obj) {
                debug!(
                    "Normalized text resize on {}: {:?} -> {}x{}",
                    obj.id, policy, obj.width, obj.height
                );
            }
        });

        object.on(EventKind::Selected, |obj, _| {
            if !obj.is_editing() {
                obj.appearance.border_color = ACCENT_COLOR.to_owned();
                obj.appearance.corner_color = ACCENT_COLOR.to_owned();
                obj.appearance.transparent_corners = false;
            }
        });

        object.on(EventKind::Deselected, |obj, _| {
            if !obj.is_editing() {
                obj.appearance.border_color = TRANSPARENT.to_owned();
                obj.appearance.corner_color = TRANSPARENT.to_owned();
            }
        });
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_ref().map(|s| s.id.as_str())
    }

    /// Put a textbox into exclusive edit mode.
    ///
    /// Any other textbox being edited is exited first. Locked, non-editable or
    /// non-text objects are refused.
    pub fn enter_edit(&mut self, canvas: &mut Canvas, id: &str) -> bool {
        match canvas.object(id) {
            Some(object) if object.is_textbox() && object.is_editable && !self.is_locked(object) => {}
            _ => return false,
        }

        if let Some(current) = self.editing_id() {
            if current == id {
                return true;
            }
            let previous = current.to_owned();
            self.exit_edit(canvas, &previous);
        }

        let mut saved = Vec::new();
        for object in canvas.objects_mut() {
            if object.id == id {
                object.appearance.border_color = TRANSPARENT.to_owned();
                object.appearance.corner_color = TRANSPARENT.to_owned();
                if let Some(text) = object.text_mut() {
                    text.is_editing = true;
                    text.selection = Some((0, text.text.chars().count()));
                }
            } else {
                saved.push((object.id.clone(), object.selectable, object.evented));
                object.selectable = false;
                object.evented = false;
            }
        }

        self.editing = Some(EditSession {
            id: id.to_owned(),
            saved,
        });
        canvas.request_render();
        info!("✏️ Entered text edit mode on {}", id);
        true
    }

    /// Leave edit mode on `id`, restoring every other object's interaction flags
    pub fn exit_edit(&mut self, canvas: &mut Canvas, id: &str) -> bool {
        let Some(session) = self.editing.take_if(|s| s.id == id) else {
            return false;
        };

        if let Some(object) = canvas.object_mut(id) {
            if let Some(text) = object.text_mut() {
                text.is_editing = false;
                text.selection = None;
            }
            object.appearance.border_color = ACCENT_COLOR.to_owned();
            object.appearance.corner_color = ACCENT_COLOR.to_owned();
        }

        for (other, selectable, evented) in session.saved {
            if let Some(object) = canvas.object_mut(&other) {
                object.selectable = selectable;
                object.evented = evented;
            }
        }

        canvas.request_render();
        info!("✅ Exited text edit mode on {}", id);
        true
    }

    /// Lock state ignoring the temporary flags edit mode puts on other objects
    fn is_locked(&self, object: &CanvasObject) -> bool {
        self.saved_flags(&object.id)
            .map_or(object.is_locked(), |(selectable, _)| !selectable)
    }

    fn saved_flags(&self, id: &str) -> Option<(bool, bool)> {
        let session = self.editing.as_ref()?;
        session
            .saved
            .iter()
            .find(|(other, ..)| other == id)
            .map(|&(_, selectable, evented)| (selectable, evented))
    }

    /// Undo edit mode's temporary changes on copies of the canvas objects, so
    /// a snapshot taken mid-edit records the objects as they are outside it
    pub fn strip_edit_state(&self, objects: &mut [CanvasObject]) {
        let Some(session) = &self.editing else {
            return;
        };
        for object in objects {
            if object.id == session.id {
                object.appearance.border_color = ACCENT_COLOR.to_owned();
                object.appearance.corner_color = ACCENT_COLOR.to_owned();
                if let Some(text) = object.text_mut() {
                    text.is_editing = false;
                    text.selection = None;
                }
            } else if let Some((selectable, evented)) = self.saved_flags(&object.id) {
                object.selectable = selectable;
                object.evented = evented;
            }
        }
    }

    /// Exit whatever textbox is being edited
    pub fn force_exit_edit(&mut self, canvas: &mut Canvas) -> bool {
        match self.editing_id().map(str::to_owned) {
            Some(id) => self.exit_edit(canvas, &id),
            None => false,
        }
    }

    /// Forget the edit session without touching the canvas, for when the
    /// canvas contents were replaced wholesale
    pub fn reset(&mut self) {
        self.editing = None;
    }

    fn update(canvas: &mut Canvas, id: &str, f: impl FnOnce(&mut CanvasObject)) -> bool {
        let Some(object) = canvas.object_mut(id).filter(|o| o.is_textbox()) else {
            return false;
        };
        f(object);
        canvas.request_render();
        true
    }

    fn update_props(canvas: &mut Canvas, id: &str, f: impl FnOnce(&mut TextProps)) -> bool {
        Self::update(canvas, id, |object| {
            if let Some(text) = object.text_mut() {
                f(text);
            }
        })
    }

    pub fn set_text(canvas: &mut Canvas, id: &str, content: &str) -> bool {
        Self::update_props(canvas, id, |text| text.text = content.to_owned())
    }

    pub fn set_text_style(canvas: &mut Canvas, id: &str, style: TextStyle) -> bool {
        Self::update(canvas, id, |object| {
            if let Some(fill) = style.fill {
                object.fill = fill;
            }
            if let Some(background) = style.background_color {
                object.background_color = background;
            }
            let Some(text) = object.text_mut() else {
                return;
            };
            if let Some(size) = style.font_size {
                text.font_size = size;
            }
            if let Some(family) = style.font_family {
                text.font_family = family;
            }
            if let Some(weight) = style.font_weight {
                text.font_weight = weight;
            }
            if let Some(font_style) = style.font_style {
                text.font_style = font_style;
            }
            if let Some(align) = style.text_align {
                text.text_align = align;
            }
            if let Some(decoration) = style.text_decoration {
                (text.underline, text.linethrough) = decoration.to_flags();
            }
            if let Some(line_height) = style.line_height {
                text.line_height = line_height;
            }
        })
    }

    pub fn set_text_align(canvas: &mut Canvas, id: &str, align: TextAlign) -> bool {
        Self::update_props(canvas, id, |text| text.text_align = align)
    }

    pub fn set_font_weight(canvas: &mut Canvas, id: &str, weight: u32) -> bool {
        Self::update_props(canvas, id, |text| text.font_weight = weight)
    }

    pub fn set_font_style(canvas: &mut Canvas, id: &str, style: FontStyle) -> bool {
        Self::update_props(canvas, id, |text| text.font_style = style)
    }

    pub fn set_text_decoration(canvas: &mut Canvas, id: &str, decoration: TextDecoration) -> bool {
        Self::update_props(canvas, id, |text| {
            (text.underline, text.linethrough) = decoration.to_flags();
        })
    }

    pub fn set_line_height(canvas: &mut Canvas, id: &str, line_height: f64) -> bool {
        Self::update_props(canvas, id, |text| text.line_height = line_height)
    }

    /// Set or remove (`None`) the text shadow
    pub fn set_text_shadow(canvas: &mut Canvas, id: &str, shadow: Option<ShadowOptions>) -> bool {
        Self::update_props(canvas, id, |text| {
            text.shadow = shadow.map(|s| Shadow {
                color: s.color.unwrap_or_else(|| "rgba(0,0,0,0.3)".to_owned()),
                blur: s.blur.unwrap_or(5.0),
                offset_x: s.offset_x.unwrap_or(2.0),
                offset_y: s.offset_y.unwrap_or(2.0),
            });
        })
    }

    /// Copy font, color, alignment and line height from one textbox to another
    pub fn copy_text_style(canvas: &mut Canvas, source: &str, target: &str) -> bool {
        let Some(src) = canvas.object(source) else {
            return false;
        };
        let Some(text) = src.text() else {
            return false;
        };
        let style = TextStyle {
            font_size: Some(text.font_size),
            font_family: Some(text.font_family.clone()),
            font_weight: Some(text.font_weight),
            font_style: Some(text.font_style),
            fill: Some(src.fill.clone()),
            background_color: Some(src.background_color.clone()),
            text_align: Some(text.text_align),
            text_decoration: None,
            line_height: Some(text.line_height),
        };
        Self::set_text_style(canvas, target, style)
    }

    pub fn to_element_record(object: &CanvasObject) -> Option<TextElement> {
        let text = object.text()?;
        Some(TextElement {
            base: BaseElement {
                id: object.id.clone(),
                x: object.left,
                y: object.top,
                width: object.width,
                height: object.height,
                rotation: object.angle,
                z_index: object.z_index,
                opacity: object.opacity,
                radius: object.radius.clone(),
                parent_id: object.parent_id.clone(),
            },
            text: text.text.clone(),
            font_size: text.font_size,
            font_weight: text.font_weight,
            font_style: text.font_style,
            font_family: text.font_family.clone(),
            color: object.fill.clone(),
            background: object.background_color.clone(),
            text_align: text.text_align,
            text_decoration: TextDecoration::from_flags(text.underline, text.linethrough),
            text_transform: text.text_transform.clone(),
            text_overflow: text.text_overflow.clone(),
        })
    }

    pub fn from_element_record(element: &TextElement) -> CanvasObject {
        let base = &element.base;
        let mut object = Self::create_text(
            &element.text,
            TextOptions {
                id: Some(base.id.clone()),
                left: Some(base.x),
                top: Some(base.y),
                width: Some(base.width),
                font_size: Some(element.font_size),
                font_family: Some(element.font_family.clone()),
                font_weight: Some(element.font_weight),
                fill: Some(element.color.clone()),
                background_color: Some(element.background.clone()),
                text_align: Some(element.text_align),
            },
        );
        object.height = base.height;
        object.angle = base.rotation;
        object.z_index = base.z_index;
        object.opacity = base.opacity;
        object.radius = base.radius.clone();
        object.parent_id = base.parent_id.clone();
        if let Some(text) = object.text_mut() {
            text.text = element.text.clone();
            text.font_style = element.font_style;
            (text.underline, text.linethrough) = element.text_decoration.to_flags();
            text.text_transform = element.text_transform.clone();
            text.text_overflow = element.text_overflow.clone();
        }
        object
    }
}
