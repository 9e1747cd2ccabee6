//! Error type shared by value sources, executors, tuners and collaborators.

use std::io;
use std::path::PathBuf;

/// Error type for tuning failures.
#[derive(Debug)]
pub enum TuneError {
    /// Pseudo-file could not be read (usually missing).
    Read { path: PathBuf, source: io::Error },
    /// Pseudo-file content is not an integer.
    Parse { path: PathBuf, content: String },
    /// A command could not be applied or recorded.
    Execution { command: String, reason: String },
    /// A collaborator could not be constructed (e.g. a required tool is missing).
    Construction {
        component: &'static str,
        reason: String,
    },
    /// The value is still below the reference after a direct change.
    Verification {
        path: PathBuf,
        expected: i64,
        actual: i64,
    },
}

impl TuneError {
    /// Builds an `Execution` error from an I/O failure.
    pub fn execution(command: impl Into<String>, source: &io::Error) -> Self {
        TuneError::Execution {
            command: command.into(),
            reason: source.to_string(),
        }
    }
}

impl std::fmt::Display for TuneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuneError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            TuneError::Parse { path, content } => write!(
                f,
                "failed to parse integer from {}: {:?}",
                path.display(),
                content
            ),
            TuneError::Execution { command, reason } => {
                write!(f, "failed to execute '{}': {}", command, reason)
            }
            TuneError::Construction { component, reason } => {
                write!(f, "unable to initialize {}: {}", component, reason)
            }
            TuneError::Verification {
                path,
                expected,
                actual,
            } => write!(
                f,
                "{} is still {} after tuning, expected at least {}",
                path.display(),
                actual,
                expected
            ),
        }
    }
}

impl std::error::Error for TuneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuneError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_read_error_mentions_path() {
        let err = TuneError::Read {
            path: PathBuf::from("/proc/sys/net/core/somaxconn"),
            source: io::Error::new(io::ErrorKind::NotFound, "file not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/proc/sys/net/core/somaxconn"));
        assert!(msg.contains("file not found"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse_error_mentions_path_and_content() {
        let err = TuneError::Parse {
            path: PathBuf::from("/proc/sys/net/ipv4/tcp_max_syn_backlog"),
            content: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/proc/sys/net/ipv4/tcp_max_syn_backlog"));
        assert!(msg.contains("\"abc\""));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_verification_error_message() {
        let err = TuneError::Verification {
            path: PathBuf::from("/proc/sys/net/core/somaxconn"),
            expected: 4096,
            actual: 128,
        };
        assert_eq!(
            err.to_string(),
            "/proc/sys/net/core/somaxconn is still 128 after tuning, expected at least 4096"
        );
    }
}
