//! Column registration and display-name construction

use tracing::debug;

use super::column::{Column, ColumnHandle};
use super::diagnostics::Diagnostic;
use super::store::Table;
use crate::{Result, WaveError};

/// Build a column's display name from its scope path and leaf name
///
/// Every scope element is followed by `_`, then the leaf is appended:
/// `["top", "sub"]` + `"v"` gives `"top_sub_v"`.
pub fn display_name<S: AsRef<str>>(leaf: Option<&str>, scope: &[S]) -> String {
    let leaf = leaf.unwrap_or_default();
    let len = leaf.len() + scope.iter().map(|s| s.as_ref().len() + 1).sum::<usize>();

    let mut name = String::with_capacity(len);
    for element in scope {
        name.push_str(element.as_ref());
        name.push('_');
    }
    name.push_str(leaf);
    name
}

impl Table {
    /// Register a new signal column
    ///
    /// Returns the column's 1-based handle. Fails with
    /// [`WaveError::CapacityExceeded`] when the table is full or when the
    /// computed display name would be empty.
    pub fn define<S: AsRef<str>>(
        &mut self,
        leaf: Option<&str>,
        scope: &[S],
    ) -> Result<ColumnHandle> {
        let name = display_name(leaf, scope);

        if name.is_empty() {
            self.diagnostics.report(Diagnostic::EmptyDefinition);
            return Err(WaveError::CapacityExceeded(
                "column definition without a leaf name or scope".to_string(),
            ));
        }

        if self.columns.len() >= self.limits.max_columns {
            self.diagnostics.report(Diagnostic::ColumnCapacityExceeded {
                name: name.clone(),
                capacity: self.limits.max_columns,
            });
            return Err(WaveError::CapacityExceeded(format!(
                "cannot define '{}': maximum of {} columns reached",
                name, self.limits.max_columns
            )));
        }

        self.columns.push(Column::new(name));
        let handle = ColumnHandle::from_slot(self.columns.len() - 1);
        debug!("Defined column {}: {}", handle, self.columns[handle.slot()].name());

        Ok(handle)
    }
}
