//! Waveform output formats driven by a simulator host
//!
//! A host opens a stream once per run, defines its signals, pushes points
//! and flushes at the end of every sweep. [`WaveformFormat`] is that
//! protocol; [`CsvFormat`] implements it on top of a [`Table`](crate::Table).

mod csv_stream;

pub use csv_stream::CsvFormat;

use crate::Result;
use crate::table::{ColumnHandle, InsertOutcome, Logic};

/// Kind of analysis producing the waveforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Analysis {
    /// Time-domain analysis, swept over `time`
    Transient,
    /// Small-signal frequency analysis, swept over `freq`
    Ac,
    /// DC sweep over a source value
    Dc,
    /// Any other sweep
    Other,
}

impl Analysis {
    /// Name of the independent-variable column
    pub fn sweep_name(&self) -> &'static str {
        match self {
            Analysis::Transient => "time",
            Analysis::Ac => "freq",
            Analysis::Dc | Analysis::Other => "sweep",
        }
    }
}

/// Where and what a stream writes
#[derive(Debug, Clone)]
pub struct Setup {
    /// Output directory
    pub raw_dir: String,
    /// File name without extension
    pub file_name: String,
    pub analysis: Analysis,
}

impl Setup {
    pub fn new(
        raw_dir: impl Into<String>,
        file_name: impl Into<String>,
        analysis: Analysis,
    ) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            file_name: file_name.into(),
            analysis,
        }
    }
}

/// Signal definition: a leaf name and its enclosing scopes, outermost first
#[derive(Debug, Clone, Default)]
pub struct WaveDefinition {
    pub name: Option<String>,
    pub scope: Vec<String>,
}

impl WaveDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            scope: Vec::new(),
        }
    }

    pub fn with_scope<I, S>(mut self, scope: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scope = scope.into_iter().map(Into::into).collect();
        self
    }
}

/// Protocol between a simulator host and a waveform writer
///
/// Calls other than `open` require an open stream and fail with
/// [`WaveError::NotOpen`](crate::WaveError::NotOpen) otherwise.
pub trait WaveformFormat {
    /// Short format identifier, e.g. `"CSV"`
    fn format(&self) -> &str;

    fn open(&mut self, setup: &Setup) -> Result<()>;

    fn define(&mut self, definition: &WaveDefinition) -> Result<ColumnHandle>;

    fn add_analog_point(&mut self, handle: ColumnHandle, real: f64, sweep: f64)
    -> Result<InsertOutcome>;

    fn add_analog_complex_point(
        &mut self,
        handle: ColumnHandle,
        real: f64,
        imag: f64,
        sweep: f64,
    ) -> Result<InsertOutcome>;

    fn add_digital_point(&mut self, handle: ColumnHandle, value: Logic, sweep: f64)
    -> Result<InsertOutcome>;

    /// Write everything accumulated since the last flush
    fn flush(&mut self) -> Result<()>;

    /// Finalize the stream; unflushed points are discarded
    fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;
}
