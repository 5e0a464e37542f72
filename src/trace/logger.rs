use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::warn;

use crate::trace::trace::DispatchTraceEvent;

/// Appends one JSON line per finished dispatch.
///
/// A logger whose file cannot be opened is disabled rather than failing the
/// view; dispatches behave the same either way.
pub struct TraceLogger {
    sink: Option<TraceSink>,
}

struct TraceSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                sink: Some(TraceSink {
                    path: path.to_path_buf(),
                    file: Mutex::new(file),
                }),
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not open dispatch trace file, tracing disabled");
                Self::disabled()
            }
        }
    }

    /// A logger that records nothing.
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|s| s.path.as_path())
    }

    pub fn log(&self, event: &DispatchTraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                warn!(identity = %event.identity, error = %e, "could not serialize dispatch trace event");
                return;
            }
        };

        let mut file = sink.file.lock();
        if let Err(e) = writeln!(file, "{}", line) {
            warn!(path = %sink.path.display(), error = %e, "could not append dispatch trace event");
        }
    }
}
