//! Process execution abstraction.
//!
//! Collaborators that shell out (`hwloc-calc`, `ethtool`, `pgrep`) and the
//! direct executor's `Launch` commands go through the `Proc` trait so tests can
//! substitute `MockProc`.

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::TuneError;

/// Poll interval while waiting for a child process.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs external programs.
pub trait Proc: Send + Sync {
    /// Runs `command` with `args` and returns its stdout split into lines.
    ///
    /// Fails with `TuneError::Execution` if the program cannot be spawned,
    /// exits unsuccessfully, or does not finish within `timeout`.
    fn run_with_timeout(
        &self,
        command: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Vec<String>, TuneError>;

    /// Checks whether a process with the given name is running.
    fn is_running(&self, name: &str, timeout: Duration) -> bool {
        self.run_with_timeout("pgrep", &["-x", name], timeout)
            .map(|lines| !lines.is_empty())
            .unwrap_or(false)
    }
}

/// `Proc` implementation backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProc;

impl SystemProc {
    pub fn new() -> Self {
        Self
    }
}

fn render(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

/// Reads a child pipe to the end on its own thread so the child never blocks
/// on a full pipe while we poll for its exit.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<io::Result<String>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = String::new();
            pipe.read_to_string(&mut buf)?;
            Ok(buf)
        })
    })
}

fn collect(handle: Option<JoinHandle<io::Result<String>>>) -> io::Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("pipe reader panicked"))?,
        None => Ok(String::new()),
    }
}

impl Proc for SystemProc {
    fn run_with_timeout(
        &self,
        command: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Vec<String>, TuneError> {
        let cmdline = render(command, args);
        debug!("running '{}' (timeout {:?})", cmdline, timeout);

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TuneError::execution(&cmdline, &e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if start.elapsed() >= timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(TuneError::Execution {
                            command: cmdline,
                            reason: format!("timed out after {:?}", timeout),
                        });
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(TuneError::execution(&cmdline, &e)),
            }
        };

        let stdout = collect(stdout).map_err(|e| TuneError::execution(&cmdline, &e))?;
        if !status.success() {
            let stderr = collect(stderr).unwrap_or_default();
            return Err(TuneError::Execution {
                command: cmdline,
                reason: format!("{}: {}", status, stderr.trim()),
            });
        }

        Ok(stdout.lines().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_proc_captures_stdout_lines() {
        let proc = SystemProc::new();
        let lines = proc
            .run_with_timeout("sh", &["-c", "echo one; echo two"], Duration::from_secs(5))
            .unwrap();
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_system_proc_reports_failure_status() {
        let proc = SystemProc::new();
        let err = proc
            .run_with_timeout("sh", &["-c", "echo boom >&2; exit 3"], Duration::from_secs(5))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("sh -c"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_system_proc_reads_output_larger_than_pipe_buffer() {
        let proc = SystemProc::new();
        let lines = proc
            .run_with_timeout(
                "sh",
                &["-c", "head -c 200000 /dev/zero | tr '\\0' 'a'; echo"],
                Duration::from_secs(5),
            )
            .unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 200_000);
    }

    #[test]
    fn test_system_proc_large_stderr_on_failure() {
        let proc = SystemProc::new();
        let err = proc
            .run_with_timeout(
                "sh",
                &["-c", "head -c 200000 /dev/zero | tr '\\0' 'e' >&2; exit 1"],
                Duration::from_secs(5),
            )
            .unwrap_err();
        let msg = err.to_string();
        assert!(!msg.contains("timed out"));
        assert!(msg.contains("eeee"));
    }

    #[test]
    fn test_system_proc_times_out() {
        let proc = SystemProc::new();
        let err = proc
            .run_with_timeout("sleep", &["5"], Duration::from_millis(100))
            .unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_system_proc_missing_program() {
        let proc = SystemProc::new();
        let result = proc.run_with_timeout(
            "definitely-not-a-real-binary-12345",
            &[],
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(TuneError::Execution { .. })));
    }
}
