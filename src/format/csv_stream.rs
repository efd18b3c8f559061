//! CSV waveform format
//!
//! Owns one [`Table`] and one sink stream per open session. The file is
//! created at `<raw_dir>/<file_name>.csv` and each flush appends a header
//! plus the accumulated rows.

use tracing::debug;

use super::{Setup, WaveDefinition, WaveformFormat};
use crate::output::{CsvConfig, CsvSerializer, StorageSink};
use crate::table::{
    ColumnHandle, Diagnostic, DiagnosticReporter, InsertOutcome, Logic, ModePolicy, Table,
    TableLimits,
};
use crate::{Result, WaveError};

struct Session<W> {
    stream: W,
    table: Table,
    location: String,
}

/// CSV writer implementing the host protocol
pub struct CsvFormat<S: StorageSink> {
    sink: S,
    serializer: CsvSerializer,
    limits: TableLimits,
    policy: ModePolicy,
    diagnostics: DiagnosticReporter,
    session: Option<Session<S::Stream>>,
}

impl<S: StorageSink> CsvFormat<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            serializer: CsvSerializer::default(),
            limits: TableLimits::default(),
            policy: ModePolicy::default(),
            diagnostics: DiagnosticReporter::new(),
            session: None,
        }
    }

    pub fn with_limits(mut self, limits: TableLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_mode_policy(mut self, policy: ModePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_csv_config(mut self, config: CsvConfig) -> Self {
        self.serializer = CsvSerializer::new(config);
        self
    }

    pub fn with_diagnostics(mut self, reporter: DiagnosticReporter) -> Self {
        self.diagnostics = reporter;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Table of the open session
    pub fn table(&self) -> Option<&Table> {
        self.session.as_ref().map(|s| &s.table)
    }

    /// Location of the open session, as handed to the sink
    pub fn location(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.location.as_str())
    }

    fn table_mut(&mut self) -> Result<&mut Table> {
        self.session
            .as_mut()
            .map(|s| &mut s.table)
            .ok_or(WaveError::NotOpen)
    }
}

impl<S: StorageSink> WaveformFormat for CsvFormat<S> {
    fn format(&self) -> &str {
        "CSV"
    }

    fn open(&mut self, setup: &Setup) -> Result<()> {
        if self.session.is_some() {
            return Err(WaveError::AlreadyOpen);
        }

        let file_name = format!("{}.csv", setup.file_name);
        let stream = self.sink.open(&[setup.raw_dir.as_str(), file_name.as_str()])?;
        let table = Table::new(setup.analysis.sweep_name())
            .with_limits(self.limits)
            .with_mode_policy(self.policy)
            .with_diagnostics(self.diagnostics.clone());
        let location = format!("{}/{}", setup.raw_dir, file_name);

        debug!("Opened CSV stream {} ({:?})", location, setup.analysis);
        self.session = Some(Session {
            stream,
            table,
            location,
        });
        Ok(())
    }

    fn define(&mut self, definition: &WaveDefinition) -> Result<ColumnHandle> {
        self.table_mut()?
            .define(definition.name.as_deref(), definition.scope.as_slice())
    }

    fn add_analog_point(
        &mut self,
        handle: ColumnHandle,
        real: f64,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        self.table_mut()?.add_analog_real(handle, real, sweep)
    }

    fn add_analog_complex_point(
        &mut self,
        handle: ColumnHandle,
        real: f64,
        imag: f64,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        self.table_mut()?.add_analog_complex(handle, real, imag, sweep)
    }

    fn add_digital_point(
        &mut self,
        handle: ColumnHandle,
        value: Logic,
        sweep: f64,
    ) -> Result<InsertOutcome> {
        self.table_mut()?.add_digital(handle, value, sweep)
    }

    fn flush(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(WaveError::NotOpen)?;
        self.serializer.flush(&mut session.table, &mut session.stream)?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(WaveError::NotOpen)?;

        let pending = session.table.row_count();
        if pending > 0 {
            self.diagnostics
                .report(Diagnostic::PendingRowsDiscarded { rows: pending });
        }

        debug!(
            "Closing CSV stream {} ({} columns)",
            session.location,
            session.table.num_columns()
        );
        self.sink.close(session.stream)
    }

    fn is_open(&self) -> bool {
        self.session.is_some()
    }
}
