//! Fake process runner for testing collaborators and the direct executor.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::error::TuneError;
use crate::os::Proc;

#[derive(Debug, Default)]
struct State {
    outputs: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    calls: Vec<String>,
}

/// `Proc` implementation that never spawns anything.
///
/// Unknown programs succeed with empty output. Every invocation is recorded
/// as `program arg1 arg2`.
#[derive(Debug, Clone, Default)]
pub struct MockProc {
    state: Arc<Mutex<State>>,
}

impl MockProc {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the stdout returned for `program`.
    pub fn with_output(self, program: &str, output: &str) -> Self {
        self.state().outputs.insert(
            program.to_string(),
            output.lines().map(str::to_string).collect(),
        );
        self
    }

    /// Makes every invocation of `program` fail.
    pub fn with_failure(self, program: &str) -> Self {
        self.state().failing.insert(program.to_string());
        self
    }

    /// Returns the recorded invocations in order.
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }
}

impl Proc for MockProc {
    fn run_with_timeout(
        &self,
        command: &str,
        args: &[&str],
        _timeout: Duration,
    ) -> Result<Vec<String>, TuneError> {
        let mut state = self.state();
        let mut cmdline = command.to_string();
        for arg in args {
            cmdline.push(' ');
            cmdline.push_str(arg);
        }
        state.calls.push(cmdline.clone());

        if state.failing.contains(command) {
            return Err(TuneError::Execution {
                command: cmdline,
                reason: "exit status: 1".to_string(),
            });
        }
        Ok(state.outputs.get(command).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_proc_records_calls() {
        let proc = MockProc::new().with_output("hwloc-calc", "0xff\n");
        let out = proc
            .run_with_timeout("hwloc-calc", &["all"], Duration::from_secs(1))
            .unwrap();
        assert_eq!(out, vec!["0xff".to_string()]);
        assert_eq!(proc.calls(), vec!["hwloc-calc all".to_string()]);
    }

    #[test]
    fn test_mock_proc_failure() {
        let proc = MockProc::new().with_failure("pgrep");
        assert!(!proc.is_running("irqbalance", Duration::from_secs(1)));
        assert_eq!(proc.calls(), vec!["pgrep -x irqbalance".to_string()]);
    }
}
