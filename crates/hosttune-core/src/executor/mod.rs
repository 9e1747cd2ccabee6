//! Execution strategies for corrective commands.
//!
//! Tuners decide *what* to change and hand the resulting `Command` to an
//! `Executor`. The executor decides *how*: `DirectExecutor` applies it to the
//! live system, `ScriptRenderingExecutor` records it into a shell script.
//!
//! ```
//! use hosttune_core::command::Command;
//! use hosttune_core::executor::{Executor, ScriptRenderingExecutor, SCRIPT_HEADER};
//! use hosttune_core::mock::MockFs;
//!
//! let fs = MockFs::new();
//! let exec = ScriptRenderingExecutor::new(fs.clone(), "/tune.sh").unwrap();
//! exec.execute(&Command::write_file("/proc/sys/net/core/somaxconn", 4096)).unwrap();
//!
//! let script = fs.file("/tune.sh").unwrap();
//! assert_eq!(script, format!("{}echo '4096' > /proc/sys/net/core/somaxconn\n", SCRIPT_HEADER));
//! ```

mod direct;
mod script;

pub use direct::DirectExecutor;
pub use script::{SCRIPT_HEADER, ScriptRenderingExecutor};

use crate::command::Command;
use crate::error::TuneError;

/// Strategy that turns a decided correction into an effect.
pub trait Executor: Send + Sync {
    /// Applies or records `command`.
    fn execute(&self, command: &Command) -> Result<(), TuneError>;

    /// Returns `true` if commands are only recorded, not applied.
    ///
    /// Tuners skip post-change verification for lazy executors.
    fn is_lazy(&self) -> bool;
}
