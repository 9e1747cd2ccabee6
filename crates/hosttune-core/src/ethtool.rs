//! Wrapper around the `ethtool` binary for NIC offload configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::TuneError;
use crate::fs::FileSystem;
use crate::os::Proc;

/// Directories searched for the `ethtool` binary, in order.
pub const ETHTOOL_SEARCH_PATHS: [&str; 4] = ["/usr/sbin", "/sbin", "/usr/bin", "/bin"];

/// Queries NIC settings through `ethtool`.
#[derive(Clone)]
pub struct EthtoolWrapper {
    binary: PathBuf,
    proc: Arc<dyn Proc>,
    timeout: Duration,
}

impl EthtoolWrapper {
    /// Locates the `ethtool` binary.
    ///
    /// Fails with `TuneError::Construction` when it is not installed.
    pub fn new<F: FileSystem>(
        fs: &F,
        proc: Arc<dyn Proc>,
        timeout: Duration,
    ) -> Result<Self, TuneError> {
        let binary = ETHTOOL_SEARCH_PATHS
            .iter()
            .map(|dir| Path::new(dir).join("ethtool"))
            .find(|candidate| fs.exists(candidate))
            .ok_or_else(|| TuneError::Construction {
                component: "ethtool",
                reason: format!(
                    "ethtool binary not found in {}",
                    ETHTOOL_SEARCH_PATHS.join(", ")
                ),
            })?;
        Ok(Self {
            binary,
            proc,
            timeout,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Kernel driver bound to `iface` (`ethtool -i`).
    pub fn driver(&self, iface: &str) -> Result<String, TuneError> {
        let binary = self.binary.to_string_lossy();
        let lines = self
            .proc
            .run_with_timeout(&binary, &["-i", iface], self.timeout)?;
        lines
            .iter()
            .find_map(|line| line.strip_prefix("driver:"))
            .map(|driver| driver.trim().to_string())
            .ok_or_else(|| TuneError::Execution {
                command: format!("{} -i {}", binary, iface),
                reason: "no driver line in output".to_string(),
            })
    }
}
