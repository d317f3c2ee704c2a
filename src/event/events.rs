/// Notifications the session sends to its observers
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    SelectionChanged {
        id: Option<String>,
    },
    ElementAdded {
        id: String,
    },
    ElementRemoved {
        id: String,
    },
    ElementUpdated {
        id: String,
    },
    /// Canvas, mirror, selection and edit mode were all emptied together
    Cleared,
    TextEditingChanged {
        editing: bool,
    },
    HistoryChanged {
        can_undo: bool,
        can_redo: bool,
    },
    SnapshotRestored,
    RestoreFailed {
        reason: String,
    },
    ViewChanged {
        zoom: f32,
        background: String,
    },
}
