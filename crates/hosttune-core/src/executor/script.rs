//! Executor that renders commands into a shell script instead of applying them.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::Executor;
use crate::command::Command;
use crate::error::TuneError;
use crate::fs::FileSystem;

/// Banner written at the top of every generated script.
pub const SCRIPT_HEADER: &str = "#!/bin/bash

# Hosttune Tuning Script
# ----------------------------------
# This file was autogenerated by hosttune

";

/// Records commands into a single script file.
///
/// The banner is written when the executor is created, so a session that
/// changes nothing still leaves a valid (empty) script behind. Every accepted
/// command is appended to the in-memory buffer and the whole file is
/// rewritten; a failed write keeps the line buffered.
pub struct ScriptRenderingExecutor<F: FileSystem> {
    fs: F,
    path: PathBuf,
    lines: Mutex<Vec<String>>,
}

impl<F: FileSystem> ScriptRenderingExecutor<F> {
    /// Creates the executor and writes the banner to `path`.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Result<Self, TuneError> {
        let path = path.into();
        fs.write(&path, SCRIPT_HEADER)
            .map_err(|e| TuneError::execution(format!("render {}", path.display()), &e))?;
        debug!("rendering tuning script to {}", path.display());
        Ok(Self {
            fs,
            path,
            lines: Mutex::new(Vec::new()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the recorded command lines in acceptance order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn render(lines: &[String]) -> String {
    let mut script = String::from(SCRIPT_HEADER);
    for line in lines {
        script.push_str(line);
        script.push('\n');
    }
    script
}

impl<F: FileSystem> Executor for ScriptRenderingExecutor<F> {
    fn execute(&self, command: &Command) -> Result<(), TuneError> {
        let line = command.render_script();
        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        lines.push(line.clone());
        debug!("recording '{}' into {}", line, self.path.display());
        self.fs
            .write(&self.path, &render(&lines))
            .map_err(|e| TuneError::execution(line, &e))
    }

    fn is_lazy(&self) -> bool {
        true
    }
}
