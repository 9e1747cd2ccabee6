//! hosttune-core — decision/execution core of the hosttune host tuner.
//!
//! Provides:
//! - `fs` — filesystem abstraction over pseudo-files (`/proc`, `/sys`)
//! - `os` — process execution abstraction
//! - `value` — integer value source for pseudo-files
//! - `checker` — raise-only comparator and per-target checks
//! - `command` — corrective commands and their script rendering
//! - `executor` — direct and script-rendering execution strategies
//! - `tuner` — tuning targets, the parametrized tuner and the factory
//! - `irq`, `hwloc`, `ethtool` — narrow collaborators handed to the factory
//! - `config` — execution mode and tuner selection
//! - `mock` — in-memory filesystem, fake process runner and host scenarios

pub mod checker;
pub mod command;
pub mod config;
pub mod error;
pub mod ethtool;
pub mod executor;
pub mod fs;
pub mod hwloc;
pub mod irq;
pub mod mock;
pub mod os;
pub mod tuner;
pub mod value;

pub use error::TuneError;
