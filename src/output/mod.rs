//! Serialization of accumulated tables
//!
//! - [`csv`]: renders a [`Table`](crate::table::Table) as delimited text
//! - [`sink`]: the byte streams the rendered text is written to

pub mod csv;
pub mod sink;

pub use csv::{CsvConfig, CsvSerializer};
pub use sink::{FileSink, MemorySink, MemoryStream, StorageSink};
