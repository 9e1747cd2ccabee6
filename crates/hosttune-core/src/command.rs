//! Corrective commands emitted by tuners and collaborators.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::TuneError;
use crate::fs::FileSystem;
use crate::os::Proc;

/// A single corrective action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write `value` into the pseudo-file at `path`.
    WriteFile { path: PathBuf, value: i64 },
    /// Run an external program.
    Launch { program: String, args: Vec<String> },
}

impl Command {
    pub fn write_file(path: impl AsRef<Path>, value: i64) -> Self {
        Command::WriteFile {
            path: path.as_ref().to_path_buf(),
            value,
        }
    }

    pub fn launch(program: &str, args: &[&str]) -> Self {
        Command::Launch {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Renders the command as one shell line, without the trailing newline.
    pub fn render_script(&self) -> String {
        match self {
            Command::WriteFile { path, value } => {
                format!("echo '{}' > {}", value, path.display())
            }
            Command::Launch { program, args } => {
                let mut line = program.clone();
                for arg in args {
                    line.push(' ');
                    line.push_str(arg);
                }
                line
            }
        }
    }

    /// Applies the command to the live system.
    pub fn execute<F: FileSystem>(
        &self,
        fs: &F,
        proc: &dyn Proc,
        timeout: Duration,
    ) -> Result<(), TuneError> {
        match self {
            Command::WriteFile { path, value } => fs
                .write(path, &value.to_string())
                .map_err(|e| TuneError::execution(self.render_script(), &e)),
            Command::Launch { program, args } => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                proc.run_with_timeout(program, &args, timeout).map(|_| ())
            }
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render_script())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockFs, MockProc};

    #[test]
    fn test_render_write_file() {
        let cmd = Command::write_file("/proc/sys/net/core/somaxconn", 4096);
        assert_eq!(
            cmd.render_script(),
            "echo '4096' > /proc/sys/net/core/somaxconn"
        );
    }

    #[test]
    fn test_render_launch() {
        let cmd = Command::launch("systemctl", &["restart", "irqbalance"]);
        assert_eq!(cmd.to_string(), "systemctl restart irqbalance");
    }

    #[test]
    fn test_execute_write_file() {
        let fs = MockFs::new();
        fs.add_file("/proc/sys/net/core/somaxconn", "128\n");
        let cmd = Command::write_file("/proc/sys/net/core/somaxconn", 4096);

        cmd.execute(&fs, &MockProc::new(), Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            fs.file("/proc/sys/net/core/somaxconn").as_deref(),
            Some("4096")
        );
    }

    #[test]
    fn test_execute_write_file_failure() {
        let fs = MockFs::new();
        fs.set_read_only("/proc/sys/net/core/somaxconn");
        let cmd = Command::write_file("/proc/sys/net/core/somaxconn", 4096);

        let err = cmd
            .execute(&fs, &MockProc::new(), Duration::from_secs(1))
            .unwrap_err();
        assert!(err.to_string().contains("echo '4096' > /proc/sys/net/core/somaxconn"));
    }

    #[test]
    fn test_execute_launch() {
        let proc = MockProc::new();
        let cmd = Command::launch("systemctl", &["restart", "irqbalance"]);
        cmd.execute(&MockFs::new(), &proc, Duration::from_secs(1))
            .unwrap();
        assert_eq!(proc.calls(), vec!["systemctl restart irqbalance".to_string()]);
    }
}
