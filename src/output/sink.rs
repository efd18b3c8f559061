//! Storage sinks the serializer writes through
//!
//! A sink turns path components into an open byte stream and finalizes that
//! stream on close. The serializer only needs ordered writes.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::{Result, WaveError};

/// Open/write/close contract for an output stream
pub trait StorageSink {
    type Stream: Write;

    /// Open a stream at the location described by `components`
    fn open(&mut self, components: &[&str]) -> Result<Self::Stream>;

    /// Finalize a stream previously returned by `open`
    fn close(&mut self, stream: Self::Stream) -> Result<()>;
}

/// Filesystem sink: components are joined into a path and created
#[derive(Debug, Clone, Default)]
pub struct FileSink {
    root: Option<PathBuf>,
}

impl FileSink {
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Resolve relative paths against `root`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, components: &[&str]) -> PathBuf {
        let mut path = self.root.clone().unwrap_or_default();
        for component in components {
            path.push(component);
        }
        path
    }
}

impl StorageSink for FileSink {
    type Stream = BufWriter<File>;

    fn open(&mut self, components: &[&str]) -> Result<Self::Stream> {
        let path = self.resolve(components);
        let file = File::create(&path).map_err(|source| WaveError::SinkOpen {
            path: path.display().to_string(),
            source,
        })?;
        debug!("Opened {}", path.display());
        Ok(BufWriter::new(file))
    }

    fn close(&mut self, mut stream: Self::Stream) -> Result<()> {
        stream.flush()?;
        Ok(())
    }
}

/// Shared in-memory byte buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryStream {
    fn lock(&self) -> io::Result<MutexGuard<'_, Vec<u8>>> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("memory stream lock poisoned"))
    }
}

impl Write for MemoryStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock()?.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sink; every opened stream writes into the same buffer
///
/// The sink keeps a handle on the buffer, so the text can be read back
/// after the stream is closed.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    stream: MemoryStream,
    opened: Vec<String>,
    closed: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn contents(&self) -> String {
        self.stream
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }

    /// Paths requested through `open`, joined with `/`
    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn closed(&self) -> usize {
        self.closed
    }
}

impl StorageSink for MemorySink {
    type Stream = MemoryStream;

    fn open(&mut self, components: &[&str]) -> Result<Self::Stream> {
        self.opened.push(components.join("/"));
        Ok(self.stream.clone())
    }

    fn close(&mut self, _stream: Self::Stream) -> Result<()> {
        self.closed += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_writes_and_flushes() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::with_root(dir.path());
        let mut stream = sink.open(&["out.csv"]).unwrap();
        stream.write_all(b"time,v\n").unwrap();
        sink.close(stream).unwrap();

        let text = std::fs::read_to_string(dir.path().join("out.csv")).unwrap();
        assert_eq!(text, "time,v\n");
    }

    #[test]
    fn test_file_sink_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::with_root(dir.path());
        let result = sink.open(&["does_not_exist", "out.csv"]);
        match result {
            Err(WaveError::SinkOpen { path, .. }) => assert!(path.ends_with("out.csv")),
            other => panic!("expected SinkOpen, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_memory_sink_keeps_text_after_close() {
        let mut sink = MemorySink::new();
        let mut stream = sink.open(&["raw", "run.csv"]).unwrap();
        write!(stream, "a,b\n").unwrap();
        sink.close(stream).unwrap();

        assert_eq!(sink.contents(), "a,b\n");
        assert_eq!(sink.opened(), ["raw/run.csv".to_string()]);
        assert_eq!(sink.closed(), 1);
    }
}
