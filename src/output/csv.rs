//! CSV rendering of a waveform table
//!
//! The layout depends on the table-wide mode flags, not on the columns:
//!
//! ```text
//! time,top_a,top_b            freq,vout              time,clk
//! 0.000000,1.000000,0.500000  100.000000:+0.0,...    0.000000,x
//! ```
//!
//! - analog real: fixed-point decimal with `precision` places (default 6)
//! - complex: `<real>:+<imag>` per column, the sweep field gets a literal `:+0.0`
//! - digital: one token from `0`, `1`, `x`, `z` or the empty string
//!
//! Field contents are never quoted or escaped; a column name containing the
//! delimiter shifts the header.

use std::fmt;
use std::io::Write;

use tracing::info;

use crate::Result;
use crate::table::Table;
use crate::table::logic;

/// Suffix appended to the sweep field in complex mode
const SWEEP_IMAG_SUFFIX: &str = ":+0.0";

/// Configuration for CSV rendering
///
/// The defaults produce the standard layout (six decimals, comma-separated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Number of decimal places for analog values (default: 6)
    pub precision: usize,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            precision: 6,
        }
    }
}

impl CsvConfig {
    /// Builder pattern: set delimiter
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder pattern: set precision
    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Fixed-point rendering with C-style spelling of non-finite values
pub(crate) struct Fixed {
    value: f64,
    precision: usize,
}

impl Fixed {
    pub(crate) fn new(value: f64, precision: usize) -> Self {
        Self { value, precision }
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let v = self.value;
        if v.is_nan() {
            f.write_str("nan")
        } else if v.is_infinite() {
            f.write_str(if v < 0.0 { "-inf" } else { "inf" })
        } else {
            write!(f, "{:.prec$}", v, prec = self.precision)
        }
    }
}

/// Writes a [`Table`] as delimited text and rewinds it
#[derive(Debug, Clone, Default)]
pub struct CsvSerializer {
    config: CsvConfig,
}

impl CsvSerializer {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Write the header and every accumulated row, then reset the table
    ///
    /// Returns the number of data rows written. The writer is flushed before
    /// the table is reset, so a buffered write error keeps the rows.
    pub fn flush<W: Write>(&self, table: &mut Table, out: &mut W) -> Result<usize> {
        let rows = table.row_count();
        self.write_table(table, out)?;
        out.flush()?;
        table.reset();

        info!(
            "Flushed {} rows x {} columns (sweep '{}')",
            rows,
            table.num_columns(),
            table.sweep_name()
        );
        Ok(rows)
    }

    /// Render the table without touching its state
    pub fn write_table<W: Write>(&self, table: &Table, out: &mut W) -> Result<()> {
        table.check_consistency()?;

        let mut line = String::new();
        self.render_header(table, &mut line);
        out.write_all(line.as_bytes())?;

        for row in 0..table.row_count() {
            line.clear();
            self.render_row(table, row, &mut line);
            out.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    /// Render the whole table to a string
    pub fn render(&self, table: &Table) -> Result<String> {
        let mut buf = Vec::new();
        self.write_table(table, &mut buf)?;
        // Only `str` data and ASCII formatting are written
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn render_header(&self, table: &Table, line: &mut String) {
        let delimiter = self.config.delimiter;
        line.push_str(table.sweep_name());
        line.push(delimiter);
        for (i, column) in table.columns().iter().enumerate() {
            if i > 0 {
                line.push(delimiter);
            }
            line.push_str(column.name());
        }
        line.push('\n');
    }

    fn render_row(&self, table: &Table, row: usize, line: &mut String) {
        use std::fmt::Write as _;

        let delimiter = self.config.delimiter;
        let precision = self.config.precision;
        let digital = table.is_digital();
        let complex = table.is_complex();

        // Writing into a String cannot fail
        let _ = write!(line, "{}", Fixed::new(table.sweep(row), precision));
        if complex {
            line.push_str(SWEEP_IMAG_SUFFIX);
        }
        line.push(delimiter);

        for (i, column) in table.columns().iter().enumerate() {
            if i > 0 {
                line.push(delimiter);
            }
            if digital {
                line.push_str(logic::encode(column.real(row) as i32));
            } else {
                let _ = write!(line, "{}", Fixed::new(column.real(row), precision));
                if complex {
                    let _ = write!(line, ":+{}", Fixed::new(column.imag(row), precision));
                }
            }
        }
        line.push('\n');
    }
}
