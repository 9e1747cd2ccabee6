//! CPU mask computation.

use crate::error::TuneError;
use crate::hwloc::HwLocCmd;

/// Computes CPU masks through hwloc.
#[derive(Clone)]
pub struct CpuMasks {
    hwloc: HwLocCmd,
}

impl CpuMasks {
    pub fn new(hwloc: HwLocCmd) -> Self {
        Self { hwloc }
    }

    pub fn is_supported(&self) -> bool {
        self.hwloc.is_supported()
    }

    /// Mask covering every CPU of the host, e.g. `0x000000ff`.
    pub fn all_cpus_mask(&self) -> Result<String, TuneError> {
        self.hwloc.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProc;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_all_cpus_mask() {
        let proc = MockProc::new().with_output("hwloc-calc", "0x000000ff\n");
        let masks = CpuMasks::new(HwLocCmd::new(Arc::new(proc), Duration::from_secs(1)));
        assert_eq!(masks.all_cpus_mask().unwrap(), "0x000000ff");
        assert!(masks.is_supported());
    }
}
