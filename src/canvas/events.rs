use std::sync::Arc;

use super::controls::Control;
use super::object::CanvasObject;

/// Events delivered to an individual canvas object
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectEvent {
    /// Intermediate step of an interactive resize through `control`
    Scaling { control: Control },
    /// A transform gesture was committed
    Modified,
    DoubleClick,
    /// Text content changed while editing
    Changed,
    Selected,
    Deselected,
}

/// Discriminant used to bind handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Scaling,
    Modified,
    DoubleClick,
    Changed,
    Selected,
    Deselected,
}

impl ObjectEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ObjectEvent::Scaling { .. } => EventKind::Scaling,
            ObjectEvent::Modified => EventKind::Modified,
            ObjectEvent::DoubleClick => EventKind::DoubleClick,
            ObjectEvent::Changed => EventKind::Changed,
            ObjectEvent::Selected => EventKind::Selected,
            ObjectEvent::Deselected => EventKind::Deselected,
        }
    }
}

/// Per-object event handler
pub type Handler = Arc<dyn Fn(&mut CanvasObject, &ObjectEvent) + Send + Sync>;
