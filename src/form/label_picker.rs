use crate::model::label::{Label, has_label};

use super::draft::DraftEdit;

/// State of the label sub-form: hidden by default, a cursor over the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelPicker {
    visible: bool,
    cursor: usize,
}

impl LabelPicker {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn open(&mut self) {
        self.visible = true;
        self.cursor = 0;
    }

    pub fn close(&mut self) {
        self.visible = false;
    }

    pub fn move_down(&mut self, catalog_len: usize) {
        if catalog_len > 0 {
            self.cursor = (self.cursor + 1).min(catalog_len - 1);
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Catalog rows paired with whether each label is currently selected
    pub fn rows<'a>(catalog: &'a [Label], selected: &[Label]) -> Vec<(&'a Label, bool)> {
        catalog
            .iter()
            .map(|label| (label, has_label(selected, &label.title)))
            .collect()
    }

    /// The checkbox change for the label under the cursor: flips its state.
    pub fn toggle_at_cursor(&self, catalog: &[Label], selected: &[Label]) -> Option<DraftEdit> {
        let label = catalog.get(self.cursor)?;
        Some(DraftEdit::ToggleLabel {
            label: label.clone(),
            checked: !has_label(selected, &label.title),
        })
    }
}
