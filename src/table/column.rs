//! Column storage and the handles that address it

use std::fmt;

/// Handle returned when a signal column is defined
///
/// Handles are 1-based: the first defined column is handle 1. Storage inside
/// the table is 0-based, so a handle maps to slot `handle - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnHandle(usize);

impl ColumnHandle {
    /// Wrap a raw handle value; 0 is never a valid handle
    pub fn new(raw: usize) -> Option<Self> {
        (raw != 0).then_some(Self(raw))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Storage slot this handle addresses
    pub(crate) fn slot(&self) -> usize {
        self.0 - 1
    }

    pub(crate) fn from_slot(slot: usize) -> Self {
        Self(slot + 1)
    }
}

impl fmt::Display for ColumnHandle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One signal column
///
/// Value arrays only ever grow. A flush rewinds the cursor but keeps the
/// values, so the next sweep overwrites them in place and rows a column does
/// not reach keep the previous sweep's data.
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    cursor: usize,
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl Column {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            cursor: 0,
            real: Vec::new(),
            imag: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Next row index this column will write
    ///
    /// Keeps advancing on overflow, so it may exceed the row limit.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Real value at `row`, or 0.0 if the row was never written
    pub fn real(&self, row: usize) -> f64 {
        self.real.get(row).copied().unwrap_or(0.0)
    }

    /// Imaginary value at `row`, or 0.0 if the row was never written
    pub fn imag(&self, row: usize) -> f64 {
        self.imag.get(row).copied().unwrap_or(0.0)
    }

    /// Claim the next row index and advance the cursor
    pub(crate) fn advance(&mut self) -> usize {
        let idx = self.cursor;
        self.cursor = self.cursor.saturating_add(1);
        idx
    }

    pub(crate) fn put_real(&mut self, row: usize, value: f64) {
        put(&mut self.real, row, value);
    }

    pub(crate) fn put_imag(&mut self, row: usize, value: f64) {
        put(&mut self.imag, row, value);
    }

    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }
}

/// Write `value` at `idx`, zero-filling any gap
pub(crate) fn put(values: &mut Vec<f64>, idx: usize, value: f64) {
    if idx >= values.len() {
        values.resize(idx + 1, 0.0);
    }
    values[idx] = value;
}
