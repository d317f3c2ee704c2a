use serde::{Deserialize, Serialize};

use super::BaseElement;

/// Record mirroring a bitmap image on the canvas.
///
/// `width`/`height` in the base are the displayed size, i.e. the intrinsic
/// size multiplied by the scale factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub base: BaseElement,
    pub src: String,
    pub alt: String,
    pub scale_x: f64,
    pub scale_y: f64,
    #[serde(default)]
    pub lock_uni_scaling: bool,
}
