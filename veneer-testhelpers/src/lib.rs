#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{LevelFilter, Log, Metadata, Record};

/// Buffers warning-and-above records from the crates under test.
struct CaptureLogger {
    records: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Warn
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            self.records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

/// Serializes tests that inspect diagnostics. The capture guard holds this
/// for its lifetime so concurrent tests cannot interleave their output.
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Start capturing warning diagnostics.
///
/// Installs the capturing logger (once per process), clears anything captured
/// previously and returns a guard. Tests that assert on diagnostics must hold
/// the guard for their whole body; it serializes them against each other.
pub fn capture() -> Capture {
    let guard = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    // Only the first install can succeed; later calls just reuse it.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Warn);
    LOGGER
        .records
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
    Capture { _guard: guard }
}

/// Guard returned by [`capture`]; read the diagnostics through it.
pub struct Capture {
    _guard: MutexGuard<'static, ()>,
}

impl Capture {
    /// All warnings captured since this capture began.
    pub fn warnings(&self) -> Vec<String> {
        LOGGER
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of warnings captured so far.
    pub fn warning_count(&self) -> usize {
        LOGGER
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
