//! Mock implementations for testing.
//!
//! This module provides `MockFs`, `MockProc` and pre-built host scenarios for
//! testing tuners and executors without a real Linux host.

mod filesystem;
mod process;
mod scenarios;

pub use filesystem::MockFs;
pub use process::MockProc;
