//! Executor that applies commands immediately.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::Executor;
use crate::command::Command;
use crate::error::TuneError;
use crate::fs::FileSystem;
use crate::os::Proc;

/// Applies every command to the live system synchronously.
pub struct DirectExecutor<F: FileSystem> {
    fs: F,
    proc: Arc<dyn Proc>,
    timeout: Duration,
}

impl<F: FileSystem> DirectExecutor<F> {
    /// Creates a direct executor.
    ///
    /// # Arguments
    /// * `fs` - Filesystem the `WriteFile` commands go to
    /// * `proc` - Process runner for `Launch` commands
    /// * `timeout` - Upper bound for each launched program
    pub fn new(fs: F, proc: Arc<dyn Proc>, timeout: Duration) -> Self {
        Self { fs, proc, timeout }
    }
}

impl<F: FileSystem> Executor for DirectExecutor<F> {
    fn execute(&self, command: &Command) -> Result<(), TuneError> {
        debug!("executing '{}'", command);
        command.execute(&self.fs, self.proc.as_ref(), self.timeout)
    }

    fn is_lazy(&self) -> bool {
        false
    }
}
