use crate::element::ElementRecord;

/// Selection and mirror state exposed to panels.
///
/// The active object and the selected element id are one value, so they can
/// never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    selected: Option<String>,
    elements: Vec<ElementRecord>,
    is_text_editing: bool,
}

impl EditorState {
    /// Id of the active object
    pub fn active_object(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_element_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn element(&self, id: &str) -> Option<&ElementRecord> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn is_text_editing(&self) -> bool {
        self.is_text_editing
    }

    pub(crate) fn set_selection(&mut self, id: Option<String>) {
        if id.is_none() {
            self.is_text_editing = false;
        }
        self.selected = id;
    }

    pub(crate) fn set_text_editing(&mut self, editing: bool) {
        self.is_text_editing = editing;
    }

    /// Insert or replace the record with the same id
    pub(crate) fn upsert_element(&mut self, record: ElementRecord) {
        match self.elements.iter_mut().find(|e| e.id() == record.id()) {
            Some(existing) => *existing = record,
            None => self.elements.push(record),
        }
    }

    pub(crate) fn remove_element(&mut self, id: &str) -> Option<ElementRecord> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    pub(crate) fn replace_elements(&mut self, elements: Vec<ElementRecord>) {
        self.elements = elements;
    }

    pub(crate) fn clear(&mut self) {
        self.selected = None;
        self.elements.clear();
        self.is_text_editing = false;
    }
}
