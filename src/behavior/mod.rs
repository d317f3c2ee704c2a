//! Per-element-type behaviors: creation defaults, event handlers, sizing and
//! record conversion.

pub mod image;
pub mod text;

pub use image::{FlipAxis, ImageController, ImageOptions, apply_scaling_lock};
pub use text::{
    MIN_FONT_SIZE, ResizePolicy, SCALE_EPSILON, ShadowOptions, TextController, TextOptions, TextStyle,
    normalize_text_resize,
};

use crate::canvas::{CanvasObject, ElementKind};
use crate::element::ElementRecord;

/// Attach the behavior handlers matching the object's element type
pub fn install_handlers(object: &mut CanvasObject) {
    match object.element_type {
        ElementKind::Text if object.is_textbox() => TextController::install_handlers(object),
        ElementKind::Image => ImageController::install_handlers(object),
        _ => {}
    }
}

/// Mirror record for a live object; shapes have none
pub fn element_record(object: &CanvasObject) -> Option<ElementRecord> {
    match object.element_type {
        ElementKind::Text => TextController::to_element_record(object).map(ElementRecord::Text),
        ElementKind::Image => ImageController::to_element_record(object).map(ElementRecord::Image),
        ElementKind::Shape => None,
    }
}

/// Live object for a mirror record
pub fn object_from_record(record: &ElementRecord) -> CanvasObject {
    match record {
        ElementRecord::Text(text) => TextController::from_element_record(text),
        ElementRecord::Image(image) => ImageController::from_element_record(image),
    }
}
