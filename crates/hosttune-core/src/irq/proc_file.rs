//! Reader for `/proc/interrupts`.

use std::collections::BTreeMap;
use std::path::Path;

use super::PROC_INTERRUPTS_FILE;
use crate::error::TuneError;
use crate::fs::FileSystem;

/// Maps numbered IRQs to their `/proc/interrupts` line.
#[derive(Debug, Clone)]
pub struct ProcFile<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> ProcFile<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Returns IRQ number -> full line. Named rows (`NMI`, `LOC`, ...) are skipped.
    pub fn interrupts(&self) -> Result<BTreeMap<u32, String>, TuneError> {
        let path = Path::new(PROC_INTERRUPTS_FILE);
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| TuneError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(parse_interrupts(&content))
    }
}

pub(crate) fn parse_interrupts(content: &str) -> BTreeMap<u32, String> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let (irq, _) = line.split_once(':')?;
            let irq = irq.trim().parse::<u32>().ok()?;
            Some((irq, line.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFs;

    #[test]
    fn test_parse_interrupts_skips_named_rows() {
        let content = "           CPU0       CPU1
  0:         36          0   IO-APIC   2-edge      timer
 40:     104217          0   PCI-MSI 524288-edge      eth0-TxRx-0
NMI:          0          0   Non-maskable interrupts
";
        let irqs = parse_interrupts(content);
        assert_eq!(irqs.keys().copied().collect::<Vec<_>>(), vec![0, 40]);
        assert!(irqs[&40].ends_with("eth0-TxRx-0"));
    }

    #[test]
    fn test_interrupts_from_scenario() {
        let proc_file = ProcFile::new(MockFs::untuned_host());
        let irqs = proc_file.interrupts().unwrap();
        assert!(irqs.contains_key(&42));
    }

    #[test]
    fn test_interrupts_missing_file() {
        let err = ProcFile::new(MockFs::new()).interrupts().unwrap_err();
        assert!(err.to_string().contains(PROC_INTERRUPTS_FILE));
    }
}
