//! Checkable, filterable parameter table

use crate::snapshot::ParameterDescriptor;

/// One table row: a descriptor and its check state
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub descriptor: ParameterDescriptor,
    pub checked: bool,
}

/// The parameter list of the current source node
///
/// Check state is kept per row and survives filter changes; hiding a row
/// never unchecks it.
#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    rows: Vec<ParameterRow>,
    filter: String,
    show_only_modified: bool,
}

impl ParameterTable {
    pub fn new(show_only_modified: bool) -> Self {
        Self {
            show_only_modified,
            ..Self::default()
        }
    }

    /// Replace the rows; every row starts unchecked
    pub fn set_parameters(&mut self, descriptors: Vec<ParameterDescriptor>) {
        self.rows = descriptors
            .into_iter()
            .map(|descriptor| ParameterRow {
                descriptor,
                checked: false,
            })
            .collect();
    }

    /// Replace the rows, keeping the check state of names that survive
    pub fn reload(&mut self, descriptors: Vec<ParameterDescriptor>) {
        let checked: Vec<String> = self
            .checked_descriptors()
            .map(|d| d.name().to_string())
            .collect();
        self.set_parameters(descriptors);
        for row in &mut self.rows {
            row.checked = checked.iter().any(|n| n == row.descriptor.name());
        }
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    pub fn show_only_modified(&self) -> bool {
        self.show_only_modified
    }

    pub fn set_show_only_modified(&mut self, enabled: bool) {
        self.show_only_modified = enabled;
    }

    fn is_visible(&self, row: &ParameterRow) -> bool {
        if self.show_only_modified && row.descriptor.is_at_default() {
            return false;
        }
        row.descriptor.matches_text(&self.filter)
    }

    /// All rows in declaration order
    pub fn rows(&self) -> &[ParameterRow] {
        &self.rows
    }

    /// Rows passing the current filters
    pub fn visible_rows(&self) -> impl Iterator<Item = &ParameterRow> {
        self.rows.iter().filter(|row| self.is_visible(row))
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose parameter differs from its default
    pub fn modified_count(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.descriptor.is_at_default())
            .count()
    }

    /// Set the check state of a row by parameter name
    ///
    /// Returns `false` when no row has that name.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> bool {
        match self.rows.iter_mut().find(|row| row.descriptor.name() == name) {
            Some(row) => {
                row.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Check every visible row, leaving hidden rows as they are
    pub fn check_all_visible(&mut self) {
        let visible: Vec<bool> = self.rows.iter().map(|row| self.is_visible(row)).collect();
        for (row, visible) in self.rows.iter_mut().zip(visible) {
            if visible {
                row.checked = true;
            }
        }
    }

    pub fn uncheck_all(&mut self) {
        for row in &mut self.rows {
            row.checked = false;
        }
    }

    /// Check exactly the modified rows, visible or not
    pub fn check_non_default(&mut self) {
        for row in &mut self.rows {
            row.checked = !row.descriptor.is_at_default();
        }
    }

    /// Checked descriptors in declaration order, hidden ones included
    pub fn checked_descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.rows
            .iter()
            .filter(|row| row.checked)
            .map(|row| &row.descriptor)
    }

    pub fn checked_count(&self) -> usize {
        self.rows.iter().filter(|row| row.checked).count()
    }

    /// Label under the table, e.g. `"3 parameters selected"`
    pub fn selection_label(&self) -> String {
        format!("{} parameters selected", self.checked_count())
    }
}
