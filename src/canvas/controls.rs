use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::Arc;

use egui::emath::Rot2;
use egui::{Color32, Pos2, Shape, Stroke, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use super::object::ElementKind;

/// The nine transform handles around an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Tl,
    Tr,
    Br,
    Bl,
    Ml,
    Mr,
    Mt,
    Mb,
    Mtr,
}

impl Control {
    pub const ALL: [Control; 9] = [
        Control::Tl,
        Control::Tr,
        Control::Br,
        Control::Bl,
        Control::Ml,
        Control::Mr,
        Control::Mt,
        Control::Mb,
        Control::Mtr,
    ];

    /// Corner handles scale both axes at once
    pub fn is_corner(self) -> bool {
        matches!(self, Control::Tl | Control::Tr | Control::Br | Control::Bl)
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Control::Ml | Control::Mr | Control::Mt | Control::Mb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlsVisibility {
    pub tl: bool,
    pub tr: bool,
    pub br: bool,
    pub bl: bool,
    pub ml: bool,
    pub mr: bool,
    pub mt: bool,
    pub mb: bool,
    pub mtr: bool,
}

impl Default for ControlsVisibility {
    fn default() -> Self {
        Self::all(true)
    }
}

impl ControlsVisibility {
    pub fn all(visible: bool) -> Self {
        Self {
            tl: visible,
            tr: visible,
            br: visible,
            bl: visible,
            ml: visible,
            mr: visible,
            mt: visible,
            mb: visible,
            mtr: visible,
        }
    }

    pub fn is_visible(&self, control: Control) -> bool {
        match control {
            Control::Tl => self.tl,
            Control::Tr => self.tr,
            Control::Br => self.br,
            Control::Bl => self.bl,
            Control::Ml => self.ml,
            Control::Mr => self.mr,
            Control::Mt => self.mt,
            Control::Mb => self.mb,
            Control::Mtr => self.mtr,
        }
    }
}

/// Draws a transform handle
pub trait ControlRenderer: Send + Sync {
    /// Produce the shapes for a handle centered at `center`, rotated by the
    /// owning object's angle in degrees
    fn render(&self, center: Pos2, angle_deg: f32) -> Vec<Shape>;
}

/// Circular rotation badge with an arc arrow
#[derive(Debug, Clone)]
pub struct RotateIcon {
    pub size: f32,
    pub fill: Color32,
    pub stroke: Color32,
    pub arc_radius: f32,
    /// Start and end of the arc, in fractions of PI
    pub arc_span: (f32, f32),
    pub line_width: f32,
}

impl RotateIcon {
    /// Blue badge with a dark arrow, used for every object kind by default
    pub fn standard() -> Self {
        Self {
            size: 24.0,
            fill: Color32::from_rgb(0x42, 0x85, 0xf4),
            stroke: Color32::BLACK,
            arc_radius: 24.0 / 2.0 * 0.45,
            arc_span: (-0.75, 0.75),
            line_width: 2.5,
        }
    }

    /// Blue badge with a white arrow, used for text boxes
    pub fn light() -> Self {
        Self {
            size: 24.0,
            fill: Color32::from_rgb(0x42, 0x85, 0xf4),
            stroke: Color32::WHITE,
            arc_radius: 8.0,
            arc_span: (-0.3, 0.9),
            line_width: 2.0,
        }
    }

    fn arc_points(&self, center: Pos2, rot: Rot2) -> Vec<Pos2> {
        const SEGMENTS: usize = 16;
        let (start, end) = self.arc_span;
        (0..=SEGMENTS)
            .map(|i| {
                let t = start + (end - start) * i as f32 / SEGMENTS as f32;
                let a = t * PI;
                center + rot * vec2(a.cos(), a.sin()) * self.arc_radius
            })
            .collect()
    }
}

impl ControlRenderer for RotateIcon {
    fn render(&self, center: Pos2, angle_deg: f32) -> Vec<Shape> {
        let rot = Rot2::from_angle(angle_deg.to_radians());
        let stroke = Stroke::new(self.line_width, self.stroke);

        let mut shapes = vec![
            Shape::circle_filled(center, self.size / 2.0, self.fill),
            Shape::circle_stroke(center, self.size / 2.0, Stroke::new(2.0, self.stroke)),
            Shape::line(self.arc_points(center, rot), stroke),
        ];

        // Arrow head at the end of the arc
        let end = self.arc_span.1 * PI;
        let tip = center + rot * vec2(end.cos(), end.sin()) * self.arc_radius;
        let head = 5.0 * 0.7;
        shapes.push(Shape::line_segment([tip, tip + rot * vec2(-head, -head)], stroke));
        shapes.push(Shape::line_segment([tip, tip + rot * vec2(head, -head)], stroke));
        shapes
    }
}

/// Renderers registered per element kind on one canvas instance
#[derive(Clone)]
pub struct ControlRenderers {
    fallback: Arc<dyn ControlRenderer>,
    by_kind: HashMap<ElementKind, Arc<dyn ControlRenderer>>,
}

impl Default for ControlRenderers {
    fn default() -> Self {
        Self {
            fallback: Arc::new(RotateIcon::standard()),
            by_kind: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for ControlRenderers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlRenderers")
            .field("kinds", &self.by_kind.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ControlRenderers {
    pub fn register(&mut self, kind: ElementKind, renderer: impl ControlRenderer + 'static) {
        self.by_kind.insert(kind, Arc::new(renderer));
    }

    pub fn is_registered(&self, kind: ElementKind) -> bool {
        self.by_kind.contains_key(&kind)
    }

    pub fn renderer_for(&self, kind: ElementKind) -> &dyn ControlRenderer {
        self.by_kind
            .get(&kind)
            .map(|r| r.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

/// Position of the rotation handle for an axis-aligned box
pub fn rotation_handle_position(left: f32, top: f32, width: f32, offset: f32) -> Pos2 {
    pos2(left + width / 2.0, top) + Vec2::new(0.0, offset)
}
