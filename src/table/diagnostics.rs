//! Non-fatal diagnostics raised while accumulating samples
//!
//! Capacity overflows and encoding mixes are absorbed locally: the call
//! returns normally and the event is logged with `warn!`. Hosts that want to
//! react programmatically can attach a [`DiagnosticReporter`] and drain the
//! paired crossbeam receiver.

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use std::fmt;
use tracing::warn;

use super::column::ColumnHandle;
use super::mode::Encoding;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A point was dropped because the column's cursor reached the row limit
    RowCapacityExceeded {
        handle: ColumnHandle,
        row: usize,
        capacity: usize,
    },
    /// A definition was refused because the table holds the maximum column count
    ColumnCapacityExceeded { name: String, capacity: usize },
    /// A definition was refused because it had neither a leaf name nor a scope
    EmptyDefinition,
    /// Encodings were mixed in one flush window; the last one decides rendering
    MixedEncoding { window: Encoding, attempted: Encoding },
    /// The stream was closed with rows that were never flushed
    PendingRowsDiscarded { rows: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::RowCapacityExceeded { handle, row, capacity } => write!(
                f,
                "Exceeded the maximum data point that can be stored: column {} row {} (capacity {})",
                handle, row, capacity
            ),
            Diagnostic::ColumnCapacityExceeded { name, capacity } => write!(
                f,
                "Cannot define '{}': table already holds {} columns",
                name, capacity
            ),
            Diagnostic::EmptyDefinition => {
                f.write_str("Cannot define a column without a leaf name or scope")
            }
            Diagnostic::MixedEncoding { window, attempted } => write!(
                f,
                "Mixed encodings in one flush window ({} then {}); the whole table renders as the last one",
                window, attempted
            ),
            Diagnostic::PendingRowsDiscarded { rows } => {
                write!(f, "Closing with {} unflushed rows; they are discarded", rows)
            }
        }
    }
}

/// Fan-out point for diagnostics
///
/// Sending never blocks: a full or disconnected channel just loses the
/// message. The `warn!` log line is emitted either way.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticReporter {
    destination: Option<Sender<Diagnostic>>,
}

impl DiagnosticReporter {
    /// Reporter that only logs
    pub fn new() -> Self {
        Self { destination: None }
    }

    /// Reporter that also forwards to an existing crossbeam sender
    pub fn with_sender(destination: Sender<Diagnostic>) -> Self {
        Self {
            destination: Some(destination),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.destination.is_some()
    }

    pub fn report(&self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        if let Some(tx) = &self.destination
            && let Err(TrySendError::Full(dropped)) = tx.try_send(diagnostic)
        {
            tracing::debug!("Diagnostic channel full, dropping: {}", dropped);
        }
    }
}

/// Create a bounded diagnostic channel
pub fn channel(capacity: usize) -> (DiagnosticReporter, Receiver<Diagnostic>) {
    let (tx, rx) = bounded(capacity);
    (DiagnosticReporter::with_sender(tx), rx)
}
