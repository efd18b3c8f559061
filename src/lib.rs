//! Columnar waveform accumulator with CSV serialization
//!
//! This library buffers simulator waveforms (real, complex or four-valued logic
//! samples across many named signal columns) and writes a full sweep as
//! comma-separated text on demand.
//!
//! # Architecture
//!
//! - **Table**: bounded column store; signals are registered once and then
//!   receive points tagged with a sweep value (time, frequency, ...)
//! - **Mode tracker**: table-wide digital/complex flags set by the last insertion
//! - **CsvSerializer**: renders the header and one line per row, then resets the table
//! - **StorageSink**: open/write/close contract for the output stream
//! - **WaveformFormat**: plugin-style entry point a simulator host drives
//!
//! # Example
//!
//! ```no_run
//! use wavecsv::{Analysis, CsvFormat, FileSink, Setup, WaveDefinition, WaveformFormat};
//!
//! let mut csv = CsvFormat::new(FileSink::new());
//! csv.open(&Setup::new("/tmp", "rc_filter", Analysis::Transient))?;
//! let out = csv.define(&WaveDefinition::new("out").with_scope(["top", "rc"]))?;
//! for step in 0..100 {
//!     let t = step as f64 * 1e-6;
//!     csv.add_analog_point(out, (-t / 1e-5).exp(), t)?;
//! }
//! csv.flush()?;
//! csv.close()?;
//! # Ok::<(), wavecsv::WaveError>(())
//! ```
//!
//! # Known quirk
//!
//! The digital and complex flags are shared by the whole table, and the most
//! recent insertion decides how every column is rendered at flush time. Use
//! [`ModePolicy::Strict`] to reject mixed encodings within one flush window.

use thiserror::Error;

pub mod format;
pub mod output;
pub mod table;

pub use format::{Analysis, CsvFormat, Setup, WaveDefinition, WaveformFormat};
pub use output::{CsvConfig, CsvSerializer, FileSink, MemorySink, StorageSink};
pub use table::{
    ColumnHandle, Diagnostic, DiagnosticReporter, Encoding, InsertOutcome, Logic, ModePolicy,
    Table, TableLimits,
};

#[derive(Error, Debug)]
pub enum WaveError {
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Sink unavailable: {0}")]
    SinkUnavailable(#[from] std::io::Error),

    #[error("Cannot open sink at '{path}': {source}")]
    SinkOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Inconsistent table state: {0}")]
    InconsistentState(String),

    #[error("Unknown column handle: {0}")]
    UnknownColumn(usize),

    #[error("Mixed encodings in one flush window: table holds {window} samples, got {attempted}")]
    MixedEncoding {
        window: Encoding,
        attempted: Encoding,
    },

    #[error("Waveform stream is not open")]
    NotOpen,

    #[error("Waveform stream is already open")]
    AlreadyOpen,
}

pub type Result<T> = std::result::Result<T, WaveError>;
