//! Plain-data mirror of the live canvas objects.
//!
//! Records are what panels and persistence see. They are rebuilt from the
//! canvas objects after every mutation routed through the session, so there is
//! exactly one record per live text or image object.

use serde::{Deserialize, Serialize};

mod image;
mod text;

pub use image::ImageElement;
pub use text::{TextDecoration, TextElement};

/// Fields shared by every element kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseElement {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub opacity: f64,
    pub radius: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Default for BaseElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation: 0.0,
            z_index: 0,
            opacity: 1.0,
            radius: "0".to_owned(),
            parent_id: None,
        }
    }
}

/// Enumeration of all element records, tagged on `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementRecord {
    Text(TextElement),
    Image(ImageElement),
}

impl ElementRecord {
    pub fn id(&self) -> &str {
        &self.base().id
    }

    pub fn element_type(&self) -> &'static str {
        match self {
            ElementRecord::Text(_) => "text",
            ElementRecord::Image(_) => "image",
        }
    }

    pub fn base(&self) -> &BaseElement {
        match self {
            ElementRecord::Text(t) => &t.base,
            ElementRecord::Image(i) => &i.base,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            ElementRecord::Text(t) => Some(t),
            ElementRecord::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageElement> {
        match self {
            ElementRecord::Image(i) => Some(i),
            ElementRecord::Text(_) => None,
        }
    }
}
