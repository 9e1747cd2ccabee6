//! Factory wiring shared host handles into ready-to-run network tuners.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use super::network::{LISTEN_BACKLOG, RFS_TABLE_SIZE, SYN_BACKLOG};
use super::{Tunable, TuneResult, Tuner};
use crate::checker::IntChecker;
use crate::config::TunerKind;
use crate::error::TuneError;
use crate::ethtool::EthtoolWrapper;
use crate::executor::Executor;
use crate::fs::FileSystem;
use crate::hwloc::HwLocCmd;
use crate::irq::{BalanceService, CpuMasks, DeviceInfo, ProcFile};
use crate::os::Proc;

/// What happened to one tuner in a session.
#[derive(Debug)]
pub enum TunerOutcome {
    /// The tuner does not apply to this host.
    Skipped { id: &'static str, reason: String },
    /// The tuner ran.
    Tuned { id: &'static str, result: TuneResult },
}

impl TunerOutcome {
    pub fn id(&self) -> &'static str {
        match self {
            TunerOutcome::Skipped { id, .. } | TunerOutcome::Tuned { id, .. } => *id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TunerOutcome::Tuned { result, .. } if result.is_failed())
    }
}

/// Builds network tuners that share one filesystem handle and one executor.
///
/// Construction does no I/O for the backlog tuners; failures surface when
/// `tune()` runs.
pub struct NetTunersFactory<F: FileSystem + Clone> {
    fs: F,
    proc_file: ProcFile<F>,
    device_info: DeviceInfo<F>,
    offload: EthtoolWrapper,
    balance_service: BalanceService<F>,
    cpu_masks: CpuMasks,
    executor: Arc<dyn Executor>,
}

impl<F: FileSystem + Clone> NetTunersFactory<F> {
    /// Creates a factory from already constructed collaborators.
    pub fn new(
        fs: F,
        proc_file: ProcFile<F>,
        device_info: DeviceInfo<F>,
        offload: EthtoolWrapper,
        balance_service: BalanceService<F>,
        cpu_masks: CpuMasks,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            fs,
            proc_file,
            device_info,
            offload,
            balance_service,
            cpu_masks,
            executor,
        }
    }

    /// Constructs every collaborator and the factory.
    ///
    /// # Arguments
    /// * `fs` - Filesystem implementation (real or mock)
    /// * `proc` - Process runner used by the hwloc, ethtool and irqbalance wrappers
    /// * `executor` - Session executor shared by every tuner
    /// * `timeout` - Timeout for external tools
    ///
    /// Fails if the offload wrapper cannot find `ethtool`.
    pub fn build(
        fs: F,
        proc: Arc<dyn Proc>,
        executor: Arc<dyn Executor>,
        timeout: Duration,
    ) -> Result<Self, TuneError> {
        let offload = EthtoolWrapper::new(&fs, proc.clone(), timeout)?;
        let proc_file = ProcFile::new(fs.clone());
        let device_info = DeviceInfo::new(fs.clone(), proc_file.clone());
        let balance_service =
            BalanceService::new(fs.clone(), proc.clone(), executor.clone(), timeout);
        let cpu_masks = CpuMasks::new(HwLocCmd::new(proc, timeout));
        Ok(Self::new(
            fs,
            proc_file,
            device_info,
            offload,
            balance_service,
            cpu_masks,
            executor,
        ))
    }

    pub fn new_syn_backlog_tuner(&self) -> Tuner<F> {
        Tuner::new(self.fs.clone(), SYN_BACKLOG, self.executor.clone())
    }

    pub fn new_listen_backlog_tuner(&self) -> Tuner<F> {
        Tuner::new(self.fs.clone(), LISTEN_BACKLOG, self.executor.clone())
    }

    pub fn new_rfs_table_size_tuner(&self) -> Tuner<F> {
        Tuner::new(self.fs.clone(), RFS_TABLE_SIZE, self.executor.clone())
    }

    pub fn new_tuner(&self, kind: TunerKind) -> Tuner<F> {
        match kind {
            TunerKind::SynBacklog => self.new_syn_backlog_tuner(),
            TunerKind::ListenBacklog => self.new_listen_backlog_tuner(),
            TunerKind::RfsTableSize => self.new_rfs_table_size_tuner(),
        }
    }

    /// Every tuner, in `TunerKind::ALL` order.
    pub fn tuners(&self) -> Vec<Tuner<F>> {
        TunerKind::ALL.iter().map(|&kind| self.new_tuner(kind)).collect()
    }

    /// Read-only checks for the given tuners.
    pub fn checkers(&self, kinds: &[TunerKind]) -> Vec<IntChecker<F>> {
        kinds
            .iter()
            .map(|kind| IntChecker::new(self.fs.clone(), kind.target()))
            .collect()
    }

    /// Runs the given tuners one after another, in order.
    ///
    /// Unsupported tuners are skipped; a failing tuner does not stop the
    /// remaining ones.
    pub fn run(&self, kinds: &[TunerKind]) -> Vec<TunerOutcome> {
        kinds
            .iter()
            .map(|&kind| {
                let tuner = self.new_tuner(kind);
                if let Err(reason) = tuner.check_if_supported() {
                    warn!("skipping {}: {}", tuner.id(), reason);
                    return TunerOutcome::Skipped {
                        id: tuner.id(),
                        reason,
                    };
                }
                let result = tuner.tune();
                if !result.is_failed() && !result.is_changed() {
                    info!("{}: already tuned", tuner.id());
                }
                TunerOutcome::Tuned {
                    id: tuner.id(),
                    result,
                }
            })
            .collect()
    }

    pub fn proc_file(&self) -> &ProcFile<F> {
        &self.proc_file
    }

    pub fn device_info(&self) -> &DeviceInfo<F> {
        &self.device_info
    }

    pub fn offload(&self) -> &EthtoolWrapper {
        &self.offload
    }

    pub fn balance_service(&self) -> &BalanceService<F> {
        &self.balance_service
    }

    pub fn cpu_masks(&self) -> &CpuMasks {
        &self.cpu_masks
    }

    pub fn executor(&self) -> &Arc<dyn Executor> {
        &self.executor
    }
}
