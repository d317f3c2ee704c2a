//! Style panel state and the edits it applies to the selected object.
//!
//! Every `apply_*`/`toggle_*` operation is a no-op returning `false` when
//! nothing is selected, and text-only operations are also no-ops when the
//! selection is not a textbox.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::canvas::{
    Canvas, CanvasObject, ElementKind, FontStyle, LockFlags, SavedInteraction, TextAlign, TextProps,
};

pub const FONT_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Times New Roman",
    "Georgia",
    "Verdana",
    "Comic Sans MS",
    "Impact",
    "Arial Black",
    "Tahoma",
    "Trebuchet MS",
    "Lucida Console",
    "Microsoft YaHei",
    "SimSun",
    "SimHei",
    "KaiTi",
    "LiSu",
];

pub const FONT_SIZES: &[f64] = &[
    8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 24.0, 28.0, 32.0, 36.0, 48.0, 60.0, 72.0, 96.0, 120.0, 144.0,
];

pub const FONT_WEIGHTS: &[(&str, u32)] = &[
    ("Thin", 100),
    ("Extra Light", 200),
    ("Light", 300),
    ("Normal", 400),
    ("Medium", 500),
    ("Semi Bold", 600),
    ("Bold", 700),
    ("Extra Bold", 800),
    ("Black", 900),
];

pub const PRESET_COLORS: &[&str] = &[
    "#000000", "#ffffff", "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#808080", "#800000",
    "#808000", "#008000", "#800080", "#008080", "#000080", "#ffa500", "#ffc0cb", "#a52a2a", "#deb887", "#5f9ea0",
];

pub const BOLD_WEIGHT: u32 = 700;
pub const NORMAL_WEIGHT: u32 = 400;

/// Flat style values shown in the style panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub font_size: f64,
    pub font_family: String,
    pub font_weight: u32,
    pub color: String,
    pub background_color: String,
    pub opacity: f64,
    pub border_width: f64,
    pub border_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            font_family: "Arial".to_owned(),
            font_weight: NORMAL_WEIGHT,
            color: "#000000".to_owned(),
            background_color: String::new(),
            opacity: 1.0,
            border_width: 0.0,
            border_color: "#000000".to_owned(),
        }
    }
}

#[derive(Debug, Default)]
pub struct StyleManager {
    active: Option<String>,
    current: StyleConfig,
}

impl StyleManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn current_style(&self) -> &StyleConfig {
        &self.current
    }

    pub fn is_text_object(&self, canvas: &Canvas) -> bool {
        self.active_object(canvas)
            .is_some_and(|o| o.element_type == ElementKind::Text)
    }

    pub fn is_image_object(&self, canvas: &Canvas) -> bool {
        self.active_object(canvas)
            .is_some_and(|o| o.element_type == ElementKind::Image)
    }

    fn active_object<'c>(&self, canvas: &'c Canvas) -> Option<&'c CanvasObject> {
        self.active.as_deref().and_then(|id| canvas.object(id))
    }

    /// Track a new selection and re-read the style values from it
    pub fn set_active_object(&mut self, canvas: &Canvas, id: Option<&str>) {
        self.active = id.map(str::to_owned);
        if let Some(object) = self.active_object(canvas) {
            let mut style = self.current.clone();
            Self::read_style(&mut style, object);
            self.current = style;
        }
    }

    fn read_style(style: &mut StyleConfig, object: &CanvasObject) {
        if let Some(text) = object.text() {
            style.font_size = text.font_size;
            style.font_family = text.font_family.clone();
            style.font_weight = text.font_weight;
            style.color = object.fill.clone();
            style.background_color = object.background_color.clone();
        }
        style.opacity = object.opacity;
        style.border_width = object.stroke_width;
        style.border_color = object.stroke.clone().unwrap_or_else(|| "#000000".to_owned());
    }

    fn update(&self, canvas: &mut Canvas, f: impl FnOnce(&mut CanvasObject)) -> bool {
        let Some(object) = self.active.as_deref().and_then(|id| canvas.object_mut(id)) else {
            return false;
        };
        f(object);
        canvas.request_render();
        true
    }

    fn update_text(&self, canvas: &mut Canvas, f: impl FnOnce(&mut CanvasObject)) -> bool {
        if !self.is_text_object(canvas) {
            return false;
        }
        self.update(canvas, f)
    }

    fn update_text_props(&self, canvas: &mut Canvas, f: impl FnOnce(&mut TextProps)) -> bool {
        self.update_text(canvas, |object| {
            if let Some(text) = object.text_mut() {
                f(text);
            }
        })
    }

    pub fn apply_font_size(&mut self, canvas: &mut Canvas, font_size: f64) -> bool {
        let applied = self.update_text_props(canvas, |text| text.font_size = font_size);
        if applied {
            self.current.font_size = font_size;
        }
        applied
    }

    pub fn apply_font_family(&mut self, canvas: &mut Canvas, font_family: &str) -> bool {
        let applied = self.update_text_props(canvas, |text| text.font_family = font_family.to_owned());
        if applied {
            self.current.font_family = font_family.to_owned();
        }
        applied
    }

    pub fn apply_font_weight(&mut self, canvas: &mut Canvas, font_weight: u32) -> bool {
        let applied = self.update_text_props(canvas, |text| text.font_weight = font_weight);
        if applied {
            self.current.font_weight = font_weight;
        }
        applied
    }

    pub fn apply_text_color(&mut self, canvas: &mut Canvas, color: &str) -> bool {
        let applied = self.update_text(canvas, |object| object.fill = color.to_owned());
        if applied {
            self.current.color = color.to_owned();
        }
        applied
    }

    /// Text boxes get the background; other objects only update the panel value
    pub fn apply_background_color(&mut self, canvas: &mut Canvas, color: &str) -> bool {
        let is_text = self.is_text_object(canvas);
        let applied = self.update(canvas, |object| {
            if is_text {
                object.background_color = color.to_owned();
            }
        });
        if applied {
            self.current.background_color = color.to_owned();
        }
        applied
    }

    /// Opacity is clamped to [0, 1] before it reaches the object
    pub fn apply_opacity(&mut self, canvas: &mut Canvas, opacity: f64) -> bool {
        let opacity = opacity.clamp(0.0, 1.0);
        let applied = self.update(canvas, |object| object.opacity = opacity);
        if applied {
            self.current.opacity = opacity;
        }
        applied
    }

    pub fn apply_border_width(&mut self, canvas: &mut Canvas, width: f64) -> bool {
        let applied = self.update(canvas, |object| object.stroke_width = width);
        if applied {
            self.current.border_width = width;
        }
        applied
    }

    pub fn apply_border_color(&mut self, canvas: &mut Canvas, color: &str) -> bool {
        let applied = self.update(canvas, |object| object.stroke = Some(color.to_owned()));
        if applied {
            self.current.border_color = color.to_owned();
        }
        applied
    }

    pub fn toggle_bold(&mut self, canvas: &mut Canvas) -> bool {
        let Some(weight) = self.active_object(canvas).and_then(|o| o.text()).map(|t| t.font_weight) else {
            return false;
        };
        let new_weight = if weight >= BOLD_WEIGHT { NORMAL_WEIGHT } else { BOLD_WEIGHT };
        self.apply_font_weight(canvas, new_weight)
    }

    pub fn toggle_italic(&mut self, canvas: &mut Canvas) -> bool {
        self.update_text_props(canvas, |text| {
            text.font_style = match text.font_style {
                FontStyle::Italic => FontStyle::Normal,
                FontStyle::Normal => FontStyle::Italic,
            };
        })
    }

    pub fn toggle_underline(&mut self, canvas: &mut Canvas) -> bool {
        self.update_text_props(canvas, |text| {
            text.underline = !text.underline;
            if text.underline {
                text.linethrough = false;
            }
        })
    }

    pub fn set_text_align(&mut self, canvas: &mut Canvas, align: TextAlign) -> bool {
        self.update_text_props(canvas, |text| text.text_align = align)
    }

    fn reorder(&self, canvas: &mut Canvas, op: fn(&mut Canvas, &str) -> bool) -> bool {
        let Some(id) = self.active.as_deref() else {
            return false;
        };
        let moved = op(canvas, id);
        if moved {
            canvas.request_render();
        }
        moved
    }

    pub fn bring_to_front(&mut self, canvas: &mut Canvas) -> bool {
        self.reorder(canvas, Canvas::bring_to_front)
    }

    pub fn send_to_back(&mut self, canvas: &mut Canvas) -> bool {
        self.reorder(canvas, Canvas::send_to_back)
    }

    pub fn bring_forward(&mut self, canvas: &mut Canvas) -> bool {
        self.reorder(canvas, Canvas::bring_forward)
    }

    pub fn send_backward(&mut self, canvas: &mut Canvas) -> bool {
        self.reorder(canvas, Canvas::send_backward)
    }

    pub fn flip_horizontal(&mut self, canvas: &mut Canvas) -> bool {
        self.update(canvas, |object| object.flip_x = !object.flip_x)
    }

    pub fn flip_vertical(&mut self, canvas: &mut Canvas) -> bool {
        self.update(canvas, |object| object.flip_y = !object.flip_y)
    }

    pub fn reset_transform(&mut self, canvas: &mut Canvas) -> bool {
        self.update(canvas, |object| {
            object.scale_x = 1.0;
            object.scale_y = 1.0;
            object.angle = 0.0;
            object.flip_x = false;
            object.flip_y = false;
            object.skew_x = 0.0;
            object.skew_y = 0.0;
        })
    }

    /// Flip the lock state. Locking sets all five transform locks and clears
    /// selectable and evented. Unlocking puts back the flags saved on lock.
    pub fn toggle_lock(&mut self, canvas: &mut Canvas) -> bool {
        self.update(canvas, |object| {
            if object.is_locked() {
                let saved = object.unlock_state.take().unwrap_or_default();
                object.selectable = true;
                object.evented = saved.evented;
                object.locks = saved.locks;
                debug!("Unlocked {}", object.id);
            } else {
                object.unlock_state = Some(SavedInteraction {
                    evented: object.evented,
                    locks: object.locks,
                });
                object.selectable = false;
                object.evented = false;
                object.locks = LockFlags::all(true);
                debug!("Locked {}", object.id);
            }
        })
    }

    /// Copy the selection's style onto `target`. Text style is copied only
    /// between textboxes; opacity and border always.
    pub fn copy_style_to(&mut self, canvas: &mut Canvas, target: &str) -> bool {
        let Some(source) = self.active_object(canvas) else {
            return false;
        };
        if source.id == target {
            return false;
        }
        let text = source.text().cloned();
        let fill = source.fill.clone();
        let background = source.background_color.clone();
        let (opacity, stroke_width, stroke) = (source.opacity, source.stroke_width, source.stroke.clone());

        let Some(object) = canvas.object_mut(target) else {
            return false;
        };
        if let Some(src) = text {
            if let Some(dst) = object.text_mut() {
                dst.font_size = src.font_size;
                dst.font_family = src.font_family;
                dst.font_weight = src.font_weight;
                dst.font_style = src.font_style;
                dst.text_align = src.text_align;
                dst.underline = src.underline;
                dst.linethrough = src.linethrough;
                object.fill = fill;
                object.background_color = background;
            }
        }
        object.opacity = opacity;
        object.stroke_width = stroke_width;
        object.stroke = stroke;
        canvas.request_render();
        true
    }
}
