//! Wrapper around the `hwloc-calc` tool.

use std::sync::Arc;
use std::time::Duration;

use crate::error::TuneError;
use crate::os::Proc;

const HWLOC_CALC: &str = "hwloc-calc";

/// Runs `hwloc-calc` with a fixed timeout.
#[derive(Clone)]
pub struct HwLocCmd {
    proc: Arc<dyn Proc>,
    timeout: Duration,
}

impl HwLocCmd {
    pub fn new(proc: Arc<dyn Proc>, timeout: Duration) -> Self {
        Self { proc, timeout }
    }

    pub fn is_supported(&self) -> bool {
        self.proc
            .run_with_timeout(HWLOC_CALC, &["--version"], self.timeout)
            .is_ok()
    }

    /// Mask of all processing units.
    pub fn all(&self) -> Result<String, TuneError> {
        self.calc_single(&["all"])
    }

    /// Runs `hwloc-calc` and expects exactly one non-empty output line.
    pub fn calc_single(&self, args: &[&str]) -> Result<String, TuneError> {
        let lines = self.proc.run_with_timeout(HWLOC_CALC, args, self.timeout)?;
        let mut values = lines.iter().map(|l| l.trim()).filter(|l| !l.is_empty());
        match (values.next(), values.next()) {
            (Some(value), None) => Ok(value.to_string()),
            _ => Err(TuneError::Execution {
                command: format!("{} {}", HWLOC_CALC, args.join(" ")),
                reason: format!("expected a single line of output, got {:?}", lines),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProc;

    #[test]
    fn test_all_trims_output() {
        let proc = MockProc::new().with_output(HWLOC_CALC, "  0x0000000f  \n");
        let hwloc = HwLocCmd::new(Arc::new(proc.clone()), Duration::from_secs(1));
        assert_eq!(hwloc.all().unwrap(), "0x0000000f");
        assert_eq!(proc.calls(), vec!["hwloc-calc all".to_string()]);
    }

    #[test]
    fn test_calc_single_rejects_multiline() {
        let proc = MockProc::new().with_output(HWLOC_CALC, "0x1\n0x2\n");
        let hwloc = HwLocCmd::new(Arc::new(proc), Duration::from_secs(1));
        assert!(matches!(hwloc.all(), Err(TuneError::Execution { .. })));
    }

    #[test]
    fn test_not_supported_when_missing() {
        let proc = MockProc::new().with_failure(HWLOC_CALC);
        let hwloc = HwLocCmd::new(Arc::new(proc), Duration::from_secs(1));
        assert!(!hwloc.is_supported());
    }
}
