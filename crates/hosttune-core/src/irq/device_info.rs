//! NIC to IRQ lookup.

use std::path::{Path, PathBuf};

use super::ProcFile;
use crate::error::TuneError;
use crate::fs::FileSystem;

const SYS_CLASS_NET: &str = "/sys/class/net";

/// Resolves which IRQs belong to a network interface.
#[derive(Debug, Clone)]
pub struct DeviceInfo<F: FileSystem> {
    fs: F,
    proc_file: ProcFile<F>,
}

impl<F: FileSystem> DeviceInfo<F> {
    pub fn new(fs: F, proc_file: ProcFile<F>) -> Self {
        Self { fs, proc_file }
    }

    /// Lists network interfaces, loopback excluded, sorted by name.
    pub fn interfaces(&self) -> Result<Vec<String>, TuneError> {
        let path = Path::new(SYS_CLASS_NET);
        let entries = self.fs.read_dir(path).map_err(|source| TuneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut names: Vec<String> = entries
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| n != "lo")
            .collect();
        names.sort();
        Ok(names)
    }

    /// Returns the IRQs of `iface`, sorted.
    ///
    /// MSI vectors under `/sys/class/net/<iface>/device/msi_irqs` win; for
    /// devices without MSI the `/proc/interrupts` rows naming the interface
    /// are used.
    pub fn irqs(&self, iface: &str) -> Result<Vec<u32>, TuneError> {
        let msi_dir = PathBuf::from(SYS_CLASS_NET)
            .join(iface)
            .join("device/msi_irqs");

        let mut irqs: Vec<u32> = if self.fs.exists(&msi_dir) {
            self.fs
                .read_dir(&msi_dir)
                .map_err(|source| TuneError::Read {
                    path: msi_dir.clone(),
                    source,
                })?
                .iter()
                .filter_map(|p| p.file_name()?.to_str()?.parse::<u32>().ok())
                .collect()
        } else {
            let queue_prefix = format!("{}-", iface);
            self.proc_file
                .interrupts()?
                .into_iter()
                .filter(|(_, line)| {
                    line.split_whitespace()
                        .any(|w| w == iface || w.starts_with(&queue_prefix))
                })
                .map(|(irq, _)| irq)
                .collect()
        };
        irqs.sort_unstable();
        Ok(irqs)
    }
}
