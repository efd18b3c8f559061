//! Waveform table: column registry, sample store and mode tracking
//!
//! A [`Table`] owns every column of one output stream. Columns are registered
//! with [`Table::define`] and receive points through the three insertion
//! entry points until the serializer drains the table.

pub mod column;
pub mod diagnostics;
pub mod logic;
pub mod mode;
mod registry;
pub mod store;

pub use column::{Column, ColumnHandle};
pub use diagnostics::{Diagnostic, DiagnosticReporter};
pub use logic::Logic;
pub use mode::{Encoding, ModePolicy, ModeTracker};
pub use registry::display_name;
pub use store::{InsertOutcome, Table, TableLimits};
