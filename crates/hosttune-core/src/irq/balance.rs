//! irqbalance service inspection.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::IRQBALANCE_CONFIG_FILE;
use crate::command::Command;
use crate::error::TuneError;
use crate::executor::Executor;
use crate::fs::FileSystem;
use crate::os::Proc;

const BANNED_KEY: &str = "IRQBALANCE_BANNED_INTERRUPTS";

/// Talks to the irqbalance daemon and its configuration.
pub struct BalanceService<F: FileSystem> {
    fs: F,
    proc: Arc<dyn Proc>,
    executor: Arc<dyn Executor>,
    timeout: Duration,
}

impl<F: FileSystem> BalanceService<F> {
    pub fn new(
        fs: F,
        proc: Arc<dyn Proc>,
        executor: Arc<dyn Executor>,
        timeout: Duration,
    ) -> Self {
        Self {
            fs,
            proc,
            executor,
            timeout,
        }
    }

    pub fn is_running(&self) -> bool {
        self.proc.is_running("irqbalance", self.timeout)
    }

    /// IRQs excluded from balancing in the irqbalance configuration.
    ///
    /// A missing configuration file means nothing is banned.
    pub fn banned_irqs(&self) -> Result<Vec<u32>, TuneError> {
        let path = Path::new(IRQBALANCE_CONFIG_FILE);
        if !self.fs.exists(path) {
            return Ok(Vec::new());
        }
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| TuneError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(parse_banned_irqs(&content))
    }

    /// Restarts the daemon through the session's executor.
    pub fn restart(&self) -> Result<(), TuneError> {
        self.executor
            .execute(&Command::launch("systemctl", &["restart", "irqbalance"]))
    }
}

fn parse_banned_irqs(content: &str) -> Vec<u32> {
    let mut irqs: Vec<u32> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.strip_prefix(BANNED_KEY)?.trim_start().strip_prefix('='))
        .flat_map(|value| {
            value
                .trim()
                .trim_matches('"')
                .split_whitespace()
                .filter_map(|irq| irq.parse::<u32>().ok())
                .collect::<Vec<_>>()
        })
        .collect();
    irqs.sort_unstable();
    irqs.dedup();
    irqs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{SCRIPT_HEADER, ScriptRenderingExecutor};
    use crate::mock::{MockFs, MockProc};

    fn service(fs: &MockFs, proc: MockProc) -> BalanceService<MockFs> {
        let exec = Arc::new(ScriptRenderingExecutor::new(fs.clone(), "/tune.sh").unwrap());
        BalanceService::new(fs.clone(), Arc::new(proc), exec, Duration::from_secs(1))
    }

    #[test]
    fn test_parse_banned_irqs() {
        let content = "# IRQBALANCE_BANNED_INTERRUPTS=\"1\"\n\
                       ENABLED=\"1\"\n\
                       IRQBALANCE_BANNED_INTERRUPTS=\"42 8 40\"\n";
        assert_eq!(parse_banned_irqs(content), vec![8, 40, 42]);
    }

    #[test]
    fn test_banned_irqs_from_scenario() {
        let fs = MockFs::untuned_host();
        assert_eq!(service(&fs, MockProc::new()).banned_irqs().unwrap(), vec![8]);
    }

    #[test]
    fn test_banned_irqs_without_config() {
        let fs = MockFs::new();
        assert!(service(&fs, MockProc::new()).banned_irqs().unwrap().is_empty());
    }

    #[test]
    fn test_is_running() {
        let fs = MockFs::new();
        assert!(service(&fs, MockProc::new().with_output("pgrep", "812\n")).is_running());
        assert!(!service(&fs, MockProc::new()).is_running());
    }

    #[test]
    fn test_restart_goes_through_executor() {
        let fs = MockFs::new();
        service(&fs, MockProc::new()).restart().unwrap();
        assert_eq!(
            fs.file("/tune.sh"),
            Some(format!("{}systemctl restart irqbalance\n", SCRIPT_HEADER))
        );
    }
}
