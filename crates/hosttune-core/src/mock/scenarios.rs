//! Pre-built host states for tests and demos.

use super::MockFs;
use crate::ethtool::ETHTOOL_SEARCH_PATHS;
use crate::irq::{IRQBALANCE_CONFIG_FILE, PROC_INTERRUPTS_FILE};
use crate::tuner::network::{LISTEN_BACKLOG_FILE, RFS_TABLE_SIZE_FILE, SYN_BACKLOG_FILE};

const INTERRUPTS: &str = "           CPU0       CPU1
  0:         36          0   IO-APIC   2-edge      timer
  8:          0          0   IO-APIC   8-edge      rtc0
 40:     104217          0   PCI-MSI 524288-edge      eth0-TxRx-0
 41:          0      98123   PCI-MSI 524289-edge      eth0-TxRx-1
 42:          2          0   PCI-MSI 524290-edge      eth0
NMI:          0          0   Non-maskable interrupts
";

impl MockFs {
    /// Host with distribution defaults: every network limit below its reference.
    pub fn untuned_host() -> Self {
        let fs = Self::with_nic();
        fs.add_file(SYN_BACKLOG_FILE, "128\n");
        fs.add_file(LISTEN_BACKLOG_FILE, "128\n");
        fs.add_file(RFS_TABLE_SIZE_FILE, "0\n");
        fs
    }

    /// Host where every network limit sits exactly at its reference.
    pub fn tuned_host() -> Self {
        let fs = Self::with_nic();
        fs.add_file(SYN_BACKLOG_FILE, "4096\n");
        fs.add_file(LISTEN_BACKLOG_FILE, "4096\n");
        fs.add_file(RFS_TABLE_SIZE_FILE, "32768\n");
        fs
    }

    /// Host where an operator already raised every limit well above reference.
    pub fn generous_host() -> Self {
        let fs = Self::with_nic();
        fs.add_file(SYN_BACKLOG_FILE, "20000000\n");
        fs.add_file(LISTEN_BACKLOG_FILE, "65535\n");
        fs.add_file(RFS_TABLE_SIZE_FILE, "65536\n");
        fs
    }

    /// One NIC (`eth0`, IRQs 40-42), irqbalance config and an `ethtool` binary.
    fn with_nic() -> Self {
        let fs = Self::new();
        fs.add_file(PROC_INTERRUPTS_FILE, INTERRUPTS);
        fs.add_file("/sys/class/net/eth0/device/msi_irqs/40", "msix\n");
        fs.add_file("/sys/class/net/eth0/device/msi_irqs/41", "msix\n");
        fs.add_file("/sys/class/net/eth0/device/msi_irqs/42", "msix\n");
        fs.add_dir("/sys/class/net/lo");
        fs.add_file(
            IRQBALANCE_CONFIG_FILE,
            "ENABLED=\"1\"\nIRQBALANCE_BANNED_INTERRUPTS=\"8\"\n",
        );
        fs.add_file(format!("{}/ethtool", ETHTOOL_SEARCH_PATHS[0]), "");
        fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileSystem;
    use std::path::Path;

    #[test]
    fn test_untuned_host_has_tuning_files() {
        let fs = MockFs::untuned_host();
        assert!(fs.exists(Path::new(SYN_BACKLOG_FILE)));
        assert!(fs.exists(Path::new(LISTEN_BACKLOG_FILE)));
        assert!(fs.exists(Path::new(RFS_TABLE_SIZE_FILE)));
        assert!(fs.exists(Path::new(PROC_INTERRUPTS_FILE)));
    }

    #[test]
    fn test_tuned_host_sits_on_reference() {
        let fs = MockFs::tuned_host();
        let syn = fs.read_to_string(Path::new(SYN_BACKLOG_FILE)).unwrap();
        assert_eq!(syn.trim(), "4096");
    }

    #[test]
    fn test_generous_host_above_reference() {
        let fs = MockFs::generous_host();
        let syn = fs.read_to_string(Path::new(SYN_BACKLOG_FILE)).unwrap();
        assert_eq!(syn.trim(), "20000000");
    }
}
