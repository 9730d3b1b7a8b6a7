//! Element sinks: where consumed values go.

use std::io::Write;

use parking_lot::Mutex;
use tracing::info;

use crate::error::SinkError;

/// Receives each element as it is consumed.
pub trait ElementSink: Send + Sync {
    /// Consume the element at `index`.
    fn consume(&self, index: usize, value: f64) -> Result<(), SinkError>;
}

/// Logs every consumed value through `tracing`. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ElementSink for TracingSink {
    fn consume(&self, index: usize, value: f64) -> Result<(), SinkError> {
        info!(index, value, "Element processed");
        Ok(())
    }
}

/// Writes one value per line to a writer.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Create a sink writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> ElementSink for WriterSink<W> {
    fn consume(&self, _index: usize, value: f64) -> Result<(), SinkError> {
        let mut writer = self.writer.lock();
        writeln!(writer, "{value}")?;
        writer.flush()?;
        Ok(())
    }
}

/// Records consumed values in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    values: Mutex<Vec<f64>>,
}

impl RecordingSink {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Values consumed so far.
    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.values.lock().clone()
    }
}

impl ElementSink for RecordingSink {
    fn consume(&self, _index: usize, value: f64) -> Result<(), SinkError> {
        self.values.lock().push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracing_sink_accepts_values() {
        let sink = TracingSink;
        assert!(sink.consume(0, 1.5).is_ok());
    }

    #[test]
    fn writer_sink_writes_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.consume(0, 1.0).unwrap();
        sink.consume(1, 2.5).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "1\n2.5\n");
    }

    #[test]
    fn writer_sink_propagates_io_error() {
        struct BrokenPipe;

        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sink = WriterSink::new(BrokenPipe);
        let err = sink.consume(0, 1.0).unwrap_err();
        assert_eq!(err.to_string(), "pipe closed");
    }

    #[test]
    fn recording_sink_records() {
        let sink = RecordingSink::new();
        sink.consume(0, 3.0).unwrap();
        sink.consume(1, 4.0).unwrap();
        assert_eq!(sink.values(), vec![3.0, 4.0]);
    }
}
