//! Tuning session configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TuneError;
use crate::executor::{DirectExecutor, Executor, ScriptRenderingExecutor};
use crate::fs::FileSystem;
use crate::os::Proc;
use crate::tuner::TuningTarget;
use crate::tuner::network::{LISTEN_BACKLOG, RFS_TABLE_SIZE, SYN_BACKLOG};

/// Timeout for external tools (hwloc, ethtool, launched commands).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Tuners shipped with hosttune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunerKind {
    SynBacklog,
    ListenBacklog,
    RfsTableSize,
}

impl TunerKind {
    /// All tuners, in the order they run.
    pub const ALL: [TunerKind; 3] = [
        TunerKind::SynBacklog,
        TunerKind::ListenBacklog,
        TunerKind::RfsTableSize,
    ];

    pub fn target(self) -> TuningTarget {
        match self {
            TunerKind::SynBacklog => SYN_BACKLOG,
            TunerKind::ListenBacklog => LISTEN_BACKLOG,
            TunerKind::RfsTableSize => RFS_TABLE_SIZE,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.target().id
    }
}

impl fmt::Display for TunerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TunerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TunerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = TunerKind::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown tuner '{}', expected one of: {}", s, known.join(", "))
            })
    }
}

/// Where corrective commands go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Apply changes to the running host.
    #[default]
    Direct,
    /// Record changes into a shell script at the given path.
    Script(PathBuf),
}

impl ExecutionMode {
    /// Creates the executor for one tuning session.
    ///
    /// In script mode this writes the script banner immediately.
    pub fn build_executor<F: FileSystem + 'static>(
        &self,
        fs: F,
        proc: Arc<dyn Proc>,
        timeout: Duration,
    ) -> Result<Arc<dyn Executor>, TuneError> {
        let executor: Arc<dyn Executor> = match self {
            ExecutionMode::Direct => Arc::new(DirectExecutor::new(fs, proc, timeout)),
            ExecutionMode::Script(path) => {
                Arc::new(ScriptRenderingExecutor::new(fs, path.clone())?)
            }
        };
        Ok(executor)
    }
}

/// Settings of one tuning session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneConfig {
    pub mode: ExecutionMode,
    pub timeout: Duration,
    pub tuners: Vec<TunerKind>,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Direct,
            timeout: DEFAULT_TIMEOUT,
            tuners: TunerKind::ALL.to_vec(),
        }
    }
}

impl TuneConfig {
    pub fn new(mode: ExecutionMode, timeout: Duration, tuners: Vec<TunerKind>) -> Self {
        Self {
            mode,
            timeout,
            tuners,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SCRIPT_HEADER;
    use crate::mock::{MockFs, MockProc};

    #[test]
    fn test_tuner_kind_round_trips_names() {
        for kind in TunerKind::ALL {
            assert_eq!(kind.to_string().parse::<TunerKind>().unwrap(), kind);
        }
        assert_eq!(" syn_backlog ".parse::<TunerKind>(), Ok(TunerKind::SynBacklog));
    }

    #[test]
    fn test_tuner_kind_unknown() {
        let err = "swappiness".parse::<TunerKind>().unwrap_err();
        assert!(err.contains("swappiness"));
        assert!(err.contains("listen_backlog"));
    }

    #[test]
    fn test_default_config() {
        let config = TuneConfig::default();
        assert_eq!(config.mode, ExecutionMode::Direct);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert_eq!(config.tuners.len(), 3);
    }

    #[test]
    fn test_build_script_executor_writes_banner() {
        let fs = MockFs::new();
        let mode = ExecutionMode::Script(PathBuf::from("/out/tune.sh"));
        let exec = mode
            .build_executor(fs.clone(), Arc::new(MockProc::new()), DEFAULT_TIMEOUT)
            .unwrap();
        assert!(exec.is_lazy());
        assert_eq!(fs.file("/out/tune.sh").as_deref(), Some(SCRIPT_HEADER));
    }

    #[test]
    fn test_build_direct_executor() {
        let exec = ExecutionMode::Direct
            .build_executor(MockFs::new(), Arc::new(MockProc::new()), DEFAULT_TIMEOUT)
            .unwrap();
        assert!(!exec.is_lazy());
    }
}
