//! In-memory capture of the service's JSON log records.
//!
//! The capturing subscriber is installed with `tracing::subscriber::set_default`,
//! so it only sees events emitted on the installing thread. Use it from a
//! current-thread `#[tokio::test]` (the default) so that spawned server tasks
//! run on the same thread.

use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use video_service::observability::logging::json_layer;

/// Collects every JSON log line written while installed.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a JSON subscriber writing into this capture for the current
    /// thread. Records are collected until the guard is dropped.
    pub fn install(&self) -> DefaultGuard {
        self.install_with_filter("video=info")
    }

    /// Like [`LogCapture::install`], with an explicit `EnvFilter` directive
    /// string (e.g. the service's default filter).
    pub fn install_with_filter(&self, filter: &str) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(filter))
            .with(json_layer(self.clone()));
        tracing::subscriber::set_default(subscriber)
    }

    /// Raw captured output.
    pub fn output(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Every captured record, one per line.
    pub fn records(&self) -> Vec<Value> {
        self.output()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("log line is not JSON"))
            .collect()
    }

    /// Captured records whose `message` equals `message`.
    pub fn records_with_message(&self, message: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|record| record["message"] == message)
            .collect()
    }

    /// Captured records at `level` (e.g. "ERROR").
    pub fn records_at_level(&self, level: &str) -> Vec<Value> {
        self.records()
            .into_iter()
            .filter(|record| record["level"] == level)
            .collect()
    }
}

/// Writer handed out per event by [`LogCapture`].
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}
