//! Process exit seam.
//!
//! `/stop` must kill the process, which would also kill the test runner. The
//! handler goes through `Terminator` so tests can record the exit instead.

use std::sync::Mutex;

/// Ends the process with an exit code.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Calls `std::process::exit`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Records exit codes instead of exiting.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit codes requested so far, oldest first.
    pub fn codes(&self) -> Vec<i32> {
        match self.codes.lock() {
            Ok(codes) => codes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        match self.codes.lock() {
            Ok(mut codes) => codes.push(code),
            Err(poisoned) => poisoned.into_inner().push(code),
        }
    }
}
