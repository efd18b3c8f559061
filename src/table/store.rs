//! Bounded sample store shared by all columns of one stream

use tracing::debug;

use super::column::{Column, ColumnHandle, put};
use super::diagnostics::{Diagnostic, DiagnosticReporter};
use super::mode::{Encoding, ModeCheck, ModePolicy, ModeTracker};
use crate::{Result, WaveError};

/// Logical ceilings of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLimits {
    /// Maximum number of columns that can be defined
    pub max_columns: usize,
    /// Maximum number of rows stored per column
    pub max_rows: usize,
}

impl Default for TableLimits {
    fn default() -> Self {
        Self {
            max_columns: 10_000,
            max_rows: 100_000,
        }
    }
}

/// What happened to an inserted point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored at the given row
    Stored { row: usize },
    /// Dropped because the column was full; a diagnostic was reported
    Dropped { row: usize },
}

impl InsertOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, InsertOutcome::Stored { .. })
    }
}

/// Columns × rows waveform buffer
///
/// The sweep array holds one independent-variable value per row and is
/// shared by every column: the last column written at a row decides that
/// row's sweep value.
#[derive(Debug)]
pub struct Table {
    pub(super) columns: Vec<Column>,
    sweep: Vec<f64>,
    row_count: usize,
    sweep_name: String,
    mode: ModeTracker,
    pub(super) limits: TableLimits,
    pub(super) diagnostics: DiagnosticReporter,
}

impl Table {
    /// Create an empty table whose sweep column is called `sweep_name`
    pub fn new(sweep_name: impl Into<String>) -> Self {
        Self {
            columns: Vec::new(),
            sweep: Vec::new(),
            row_count: 0,
            sweep_name: sweep_name.into(),
            mode: ModeTracker::default(),
            limits: TableLimits::default(),
            diagnostics: DiagnosticReporter::new(),
        }
    }

    pub fn with_limits(mut self, limits: TableLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_mode_policy(mut self, policy: ModePolicy) -> Self {
        self.mode = ModeTracker::new(policy);
        self
    }

    pub fn with_diagnostics(mut self, reporter: DiagnosticReporter) -> Self {
        self.diagnostics = reporter;
        self
    }

    pub fn sweep_name(&self) -> &str {
        &self.sweep_name
    }

    pub fn limits(&self) -> TableLimits {
        self.limits
    }

    /// Number of rows to serialize (high-water mark of all column cursors)
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Columns in registration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, handle: ColumnHandle) -> Option<&Column> {
        self.columns.get(handle.slot())
    }

    /// Sweep value at `row`, or 0.0 if no column ever reached it
    pub fn sweep(&self, row: usize) -> f64 {
        self.sweep.get(row).copied().unwrap_or(0.0)
    }

    pub fn mode(&self) -> &ModeTracker {
        &self.mode
    }

    pub fn is_digital(&self) -> bool {
        self.mode.is_digital()
    }

    pub fn is_complex(&self) -> bool {
        self.mode.is_complex()
    }

    /// Add a real-valued analog point
    pub fn add_analog_real(
        &mut self,
        handle: ColumnHandle,
        real: f64,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        self.insert(handle, Encoding::Real, real, None, sweep)
    }

    /// Add a complex analog point (typically an AC sweep over frequency)
    pub fn add_analog_complex(
        &mut self,
        handle: ColumnHandle,
        real: f64,
        imag: f64,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        self.insert(handle, Encoding::Complex, real, Some(imag), sweep)
    }

    /// Add a logic point; the code is stored in the real slot
    ///
    /// Codes outside 0..=3 are accepted and render as an empty field.
    pub fn add_digital(
        &mut self,
        handle: ColumnHandle,
        value: impl Into<i32>,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        let code = value.into();
        self.insert(handle, Encoding::Digital, f64::from(code), None, sweep)
    }

    fn insert(
        &mut self,
        handle: ColumnHandle,
        encoding: Encoding,
        real: f64,
        imag: Option<f64>,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        if handle.slot() >= self.columns.len() {
            return Err(WaveError::UnknownColumn(handle.get()));
        }

        if let ModeCheck::Rejected { window } = self.mode.check(encoding) {
            return Err(WaveError::MixedEncoding {
                window,
                attempted: encoding,
            });
        }

        let column = &mut self.columns[handle.slot()];
        // The cursor advances even when the point is dropped
        let idx = column.advance();

        if idx >= self.limits.max_rows {
            self.diagnostics.report(Diagnostic::RowCapacityExceeded {
                handle,
                row: idx,
                capacity: self.limits.max_rows,
            });
            return Ok(InsertOutcome::Dropped { row: idx });
        }

        column.put_real(idx, real);
        if let Some(imag) = imag {
            column.put_imag(idx, imag);
        }
        put(&mut self.sweep, idx, sweep);
        self.row_count = self.row_count.max(idx + 1);
        if let Some(window) = self.mode.record(encoding) {
            self.diagnostics.report(Diagnostic::MixedEncoding {
                window,
                attempted: encoding,
            });
        }

        Ok(InsertOutcome::Stored { row: idx })
    }

    /// Rewind every column and empty the row count for the next sweep
    ///
    /// Names and stored values are kept; the next sweep overwrites in place.
    pub fn reset(&mut self) {
        self.row_count = 0;
        for column in &mut self.columns {
            column.rewind();
        }
        self.mode.restart_window();
        debug!("Table reset: {} columns kept", self.columns.len());
    }

    /// Verify the invariants the serializer relies on
    pub fn check_consistency(&self) -> Result<()> {
        if self.row_count > self.limits.max_rows {
            return Err(WaveError::InconsistentState(format!(
                "row count {} above row limit {}",
                self.row_count, self.limits.max_rows
            )));
        }
        if self.columns.len() > self.limits.max_columns {
            return Err(WaveError::InconsistentState(format!(
                "{} columns above column limit {}",
                self.columns.len(),
                self.limits.max_columns
            )));
        }
        if let Some(pos) = self.columns.iter().position(|c| c.name().is_empty()) {
            return Err(WaveError::InconsistentState(format!(
                "column {} has no name",
                ColumnHandle::from_slot(pos)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::diagnostics;
    use crate::table::logic::Logic;

    fn table_with(names: &[&str]) -> (Table, Vec<ColumnHandle>) {
        let mut table = Table::new("time");
        let handles = names
            .iter()
            .map(|n| table.define(Some(*n), &[] as &[&str]).unwrap())
            .collect();
        (table, handles)
    }

    #[test]
    fn test_insert_advances_rows() {
        let (mut table, h) = table_with(&["a"]);
        for i in 0..5 {
            let outcome = table.add_analog_real(h[0], i as f64 * 2.0, i as f64).unwrap();
            assert_eq!(outcome, InsertOutcome::Stored { row: i });
        }
        assert_eq!(table.row_count(), 5);
        assert_eq!(table.column(h[0]).unwrap().real(3), 6.0);
        assert_eq!(table.sweep(4), 4.0);
    }

    #[test]
    fn test_row_count_is_high_water_mark() {
        let (mut table, h) = table_with(&["a", "b"]);
        for i in 0..3 {
            table.add_analog_real(h[0], 1.0, i as f64).unwrap();
        }
        table.add_analog_real(h[1], 2.0, 0.0).unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column(h[1]).unwrap().cursor(), 1);
    }

    #[test]
    fn test_last_column_written_sets_sweep() {
        let (mut table, h) = table_with(&["a", "b"]);
        table.add_analog_real(h[0], 1.0, 10.0).unwrap();
        table.add_analog_real(h[1], 1.0, 99.0).unwrap();
        assert_eq!(table.sweep(0), 99.0);
    }

    #[test]
    fn test_mode_flags_follow_last_insert() {
        let (mut table, h) = table_with(&["a"]);
        table.add_analog_complex(h[0], 1.0, 2.0, 0.0).unwrap();
        assert!(table.is_complex());
        table.add_digital(h[0], Logic::One, 1.0).unwrap();
        assert!(table.is_digital());
        assert!(!table.is_complex());
        table.add_analog_real(h[0], 0.5, 2.0).unwrap();
        assert!(!table.is_digital());
        assert!(!table.is_complex());
    }

    #[test]
    fn test_digital_code_stored_as_real() {
        let (mut table, h) = table_with(&["d"]);
        table.add_digital(h[0], Logic::HighZ, 0.0).unwrap();
        table.add_digital(h[0], 9, 1.0).unwrap();
        let column = table.column(h[0]).unwrap();
        assert_eq!(column.real(0), 3.0);
        assert_eq!(column.real(1), 9.0);
    }

    #[test]
    fn test_overflow_drops_point() {
        let (mut table, h) = table_with(&["a", "b"]);
        table = table.with_limits(TableLimits {
            max_columns: 4,
            max_rows: 3,
        });
        table.add_analog_real(h[1], 7.0, 0.0).unwrap();
        for i in 0..3 {
            assert!(table.add_analog_real(h[0], i as f64, i as f64).unwrap().is_stored());
        }
        let outcome = table.add_analog_real(h[0], 100.0, 100.0).unwrap();
        assert_eq!(outcome, InsertOutcome::Dropped { row: 3 });
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.sweep(2), 2.0);
        assert_eq!(table.column(h[0]).unwrap().cursor(), 4);
        // Neighbouring column untouched
        assert_eq!(table.column(h[1]).unwrap().real(0), 7.0);
        assert_eq!(table.column(h[1]).unwrap().real(3), 0.0);
    }

    #[test]
    fn test_repeated_overflow_keeps_advancing_cursor() {
        let (reporter, rx) = diagnostics::channel(16);
        let mut table = Table::new("time")
            .with_limits(TableLimits {
                max_columns: 1,
                max_rows: 1,
            })
            .with_diagnostics(reporter);
        let h = table.define(Some("a"), &[] as &[&str]).unwrap();
        table.add_analog_real(h, 1.0, 0.0).unwrap();
        for _ in 0..3 {
            assert!(!table.add_analog_real(h, 2.0, 1.0).unwrap().is_stored());
        }
        assert_eq!(table.column(h).unwrap().cursor(), 4);
        assert_eq!(table.row_count(), 1);
        let rows: Vec<usize> = rx
            .try_iter()
            .filter_map(|d| match d {
                Diagnostic::RowCapacityExceeded { row, .. } => Some(row),
                _ => None,
            })
            .collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_handle_rejected() {
        let (mut table, _) = table_with(&["a"]);
        let bogus = ColumnHandle::new(2).unwrap();
        assert!(matches!(
            table.add_analog_real(bogus, 1.0, 0.0),
            Err(WaveError::UnknownColumn(2))
        ));
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_strict_policy_rejects_mixed_kinds() {
        let mut table = Table::new("time").with_mode_policy(ModePolicy::Strict);
        let h = table.define(Some("a"), &[] as &[&str]).unwrap();
        table.add_analog_real(h, 1.0, 0.0).unwrap();
        let err = table.add_digital(h, Logic::One, 1.0).unwrap_err();
        assert!(matches!(
            err,
            WaveError::MixedEncoding {
                window: Encoding::Real,
                attempted: Encoding::Digital
            }
        ));
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column(h).unwrap().cursor(), 1);

        table.reset();
        assert!(table.add_digital(h, Logic::One, 0.0).is_ok());
    }

    #[test]
    fn test_mixed_kinds_reported_once_per_window() {
        let (reporter, rx) = diagnostics::channel(16);
        let mut table = Table::new("time").with_diagnostics(reporter);
        let h = table.define(Some("a"), &[] as &[&str]).unwrap();
        table.add_analog_real(h, 1.0, 0.0).unwrap();
        table.add_digital(h, Logic::One, 1.0).unwrap();
        table.add_analog_complex(h, 1.0, 1.0, 2.0).unwrap();
        let mixes = rx
            .try_iter()
            .filter(|d| matches!(d, Diagnostic::MixedEncoding { .. }))
            .count();
        assert_eq!(mixes, 1);
        assert!(table.is_complex());
    }

    #[test]
    fn test_dropped_insertion_does_not_report_mix() {
        let (reporter, rx) = diagnostics::channel(16);
        let mut table = Table::new("time")
            .with_limits(TableLimits {
                max_columns: 2,
                max_rows: 1,
            })
            .with_diagnostics(reporter);
        let a = table.define(Some("a"), &[] as &[&str]).unwrap();
        let b = table.define(Some("b"), &[] as &[&str]).unwrap();
        table.add_analog_real(a, 1.0, 0.0).unwrap();

        // Column a is full: the digital point is dropped and the flags keep real
        assert!(!table.add_digital(a, Logic::One, 1.0).unwrap().is_stored());
        assert!(!table.is_digital());
        let mixes = rx
            .try_iter()
            .filter(|d| matches!(d, Diagnostic::MixedEncoding { .. }))
            .count();
        assert_eq!(mixes, 0);

        // A stored mix later in the same window is still reported
        assert!(table.add_digital(b, Logic::One, 0.0).unwrap().is_stored());
        assert!(table.is_digital());
        let mixes: Vec<Diagnostic> = rx
            .try_iter()
            .filter(|d| matches!(d, Diagnostic::MixedEncoding { .. }))
            .collect();
        assert_eq!(
            mixes,
            vec![Diagnostic::MixedEncoding {
                window: Encoding::Real,
                attempted: Encoding::Digital
            }]
        );
    }

    #[test]
    fn test_reset_rewinds_all_columns() {
        let (mut table, h) = table_with(&["a", "b", "c"]);
        for handle in &h {
            table.add_analog_real(*handle, 1.0, 0.0).unwrap();
            table.add_analog_real(*handle, 2.0, 1.0).unwrap();
        }
        table.reset();
        assert_eq!(table.row_count(), 0);
        assert!(table.columns().iter().all(|c| c.cursor() == 0));
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.column(h[2]).unwrap().real(1), 2.0);
    }

    #[test]
    fn test_consistency_check_passes_for_fresh_table() {
        let (table, _) = table_with(&["a"]);
        assert!(table.check_consistency().is_ok());
    }

    #[test]
    fn test_consistency_check_flags_shrunk_limits() {
        let (table, _) = table_with(&["a", "b", "c"]);
        let table = table.with_limits(TableLimits {
            max_columns: 2,
            max_rows: 10,
        });
        assert!(matches!(
            table.check_consistency(),
            Err(WaveError::InconsistentState(_))
        ));
    }
}
