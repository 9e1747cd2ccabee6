//! Tuners: read a kernel parameter, decide, emit the correction.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                    NetTunersFactory                   │
//! │   fs, irq/hwloc/ethtool collaborators, executor       │
//! └───────────────────────────┬───────────────────────────┘
//!                             │ new_*_tuner()
//!                      ┌──────▼──────┐
//!                      │    Tuner    │  TuningTarget (path, reference)
//!                      └──┬───────┬──┘
//!          read + compare │       │ Command::WriteFile
//!                ┌────────▼──┐ ┌──▼───────────────┐
//!                │IntChecker │ │ Executor (trait) │
//!                └───────────┘ └──┬────────────┬──┘
//!                                 │            │
//!                        ┌────────▼───┐ ┌──────▼──────────────┐
//!                        │  Direct    │ │  ScriptRendering    │
//!                        └────────────┘ └─────────────────────┘
//! ```

mod factory;
pub mod network;

pub use factory::{NetTunersFactory, TunerOutcome};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::checker::{IntChecker, needs_change};
use crate::command::Command;
use crate::error::TuneError;
use crate::executor::Executor;
use crate::fs::FileSystem;

/// A pseudo-file and the minimum value it should hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningTarget {
    /// Short identifier, e.g. `syn_backlog`.
    pub id: &'static str,
    pub path: &'static str,
    /// Minimum acceptable value. Tuning only ever raises towards it.
    pub reference: i64,
    pub desc: &'static str,
}

/// Outcome of one `tune()` call.
#[derive(Debug, Default)]
pub struct TuneResult {
    error: Option<TuneError>,
    changed: bool,
}

impl TuneResult {
    /// Nothing needed to change.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// A command was accepted by the executor.
    pub fn changed() -> Self {
        Self {
            changed: true,
            ..Self::default()
        }
    }

    /// Tuning failed; `changed` tells whether a command had been accepted.
    pub fn failed(error: TuneError, changed: bool) -> Self {
        Self {
            error: Some(error),
            changed,
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&TuneError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<TuneError> {
        self.error
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }
}

/// Uniform contract of every tuner.
pub trait Tunable {
    fn id(&self) -> &'static str;

    /// Returns `Err(reason)` when the tuner cannot run on this host.
    fn check_if_supported(&self) -> Result<(), String>;

    fn tune(&self) -> TuneResult;
}

/// Raises one integer pseudo-file to its reference value.
pub struct Tuner<F: FileSystem + Clone> {
    fs: F,
    checker: IntChecker<F>,
    executor: Arc<dyn Executor>,
}

impl<F: FileSystem + Clone> Tuner<F> {
    pub fn new(fs: F, target: TuningTarget, executor: Arc<dyn Executor>) -> Self {
        Self {
            checker: IntChecker::new(fs.clone(), target),
            fs,
            executor,
        }
    }

    pub fn target(&self) -> &TuningTarget {
        self.checker.target()
    }

    pub fn checker(&self) -> &IntChecker<F> {
        &self.checker
    }

    fn path(&self) -> PathBuf {
        PathBuf::from(self.target().path)
    }

    /// Re-reads the value after a direct change.
    fn verify(&self) -> Result<(), TuneError> {
        let target = self.target();
        let actual = self.checker.current()?;
        if needs_change(actual, target.reference) {
            return Err(TuneError::Verification {
                path: self.path(),
                expected: target.reference,
                actual,
            });
        }
        Ok(())
    }
}

impl<F: FileSystem + Clone> Tunable for Tuner<F> {
    fn id(&self) -> &'static str {
        self.target().id
    }

    fn check_if_supported(&self) -> Result<(), String> {
        let path = self.target().path;
        if self.fs.exists(Path::new(path)) {
            Ok(())
        } else {
            Err(format!("{} not present on this host", path))
        }
    }

    fn tune(&self) -> TuneResult {
        let target = *self.target();

        let current = match self.checker.current() {
            Ok(value) => value,
            Err(e) => {
                warn!("{}: {}", target.id, e);
                return TuneResult::failed(e, false);
            }
        };

        if !needs_change(current, target.reference) {
            debug!(
                "{}: current value {} satisfies reference {}",
                target.id, current, target.reference
            );
            return TuneResult::unchanged();
        }

        let command = Command::write_file(target.path, target.reference);
        if let Err(e) = self.executor.execute(&command) {
            warn!("{}: {}", target.id, e);
            return TuneResult::failed(e, false);
        }

        if !self.executor.is_lazy()
            && let Err(e) = self.verify()
        {
            warn!("{}: {}", target.id, e);
            return TuneResult::failed(e, true);
        }

        info!(
            "{}: raised {} from {} to {}",
            target.id, target.path, current, target.reference
        );
        TuneResult::changed()
    }
}
