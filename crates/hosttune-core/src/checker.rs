//! Raise-only comparator and per-target checks.
//!
//! A check reads the current value of a tuning target and compares it with the
//! reference. Values above the reference are always accepted: tuning only
//! raises kernel limits, it never lowers them.

use std::path::Path;

use serde::Serialize;

use crate::error::TuneError;
use crate::fs::FileSystem;
use crate::tuner::TuningTarget;
use crate::value::ValueSource;

/// Returns `true` when `current` is insufficient and must be raised to `reference`.
pub fn needs_change(current: i64, reference: i64) -> bool {
    current < reference
}

/// Outcome of a single check, serializable for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub id: &'static str,
    pub desc: &'static str,
    pub required: i64,
    /// `None` when the value could not be read.
    pub current: Option<i64>,
    pub is_ok: bool,
    pub error: Option<String>,
}

/// Checks that an integer pseudo-file is at least its reference value.
#[derive(Debug, Clone)]
pub struct IntChecker<F: FileSystem> {
    target: TuningTarget,
    source: ValueSource<F>,
}

impl<F: FileSystem> IntChecker<F> {
    pub fn new(fs: F, target: TuningTarget) -> Self {
        Self {
            target,
            source: ValueSource::new(fs),
        }
    }

    pub fn target(&self) -> &TuningTarget {
        &self.target
    }

    /// Reads the current value of the target.
    pub fn current(&self) -> Result<i64, TuneError> {
        self.source.read_int(Path::new(self.target.path))
    }

    /// Reads the current value and compares it with the reference.
    pub fn check(&self) -> CheckResult {
        let (current, is_ok, error) = match self.current() {
            Ok(value) => (
                Some(value),
                !needs_change(value, self.target.reference),
                None,
            ),
            Err(e) => (None, false, Some(e.to_string())),
        };
        CheckResult {
            id: self.target.id,
            desc: self.target.desc,
            required: self.target.reference,
            current,
            is_ok,
            error,
        }
    }
}
