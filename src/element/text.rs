use serde::{Deserialize, Serialize};

use super::BaseElement;
use crate::canvas::{FontStyle, TextAlign};

/// Text decoration, collapsed from the object's mutually exclusive flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextDecoration {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "underline")]
    Underline,
    #[serde(rename = "line-through")]
    LineThrough,
}

impl TextDecoration {
    /// Collapse the `(underline, linethrough)` flag pair. Underline wins.
    pub fn from_flags(underline: bool, linethrough: bool) -> Self {
        if underline {
            TextDecoration::Underline
        } else if linethrough {
            TextDecoration::LineThrough
        } else {
            TextDecoration::None
        }
    }

    /// Expand into `(underline, linethrough)`
    pub fn to_flags(self) -> (bool, bool) {
        match self {
            TextDecoration::None => (false, false),
            TextDecoration::Underline => (true, false),
            TextDecoration::LineThrough => (false, true),
        }
    }
}

/// Record mirroring a textbox on the canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub base: BaseElement,
    pub text: String,
    pub font_size: f64,
    pub font_weight: u32,
    pub font_style: FontStyle,
    pub font_family: String,
    pub color: String,
    pub background: String,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub text_transform: String,
    pub text_overflow: String,
}
