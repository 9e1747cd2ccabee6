//! Integer value source for kernel pseudo-files.

use std::path::Path;

use crate::error::TuneError;
use crate::fs::FileSystem;

/// Reads single integer values from pseudo-files such as
/// `/proc/sys/net/core/somaxconn`.
///
/// Nothing is cached: every call reads the file again.
#[derive(Debug, Clone)]
pub struct ValueSource<F: FileSystem> {
    fs: F,
}

impl<F: FileSystem> ValueSource<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    /// Reads the file at `path`, trims surrounding whitespace and parses it.
    pub fn read_int(&self, path: &Path) -> Result<i64, TuneError> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|source| TuneError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        parse_int(path, &content)
    }
}

/// Parses pseudo-file content as a signed integer.
pub fn parse_int(path: &Path, content: &str) -> Result<i64, TuneError> {
    let trimmed = content.trim();
    trimmed.parse::<i64>().map_err(|_| TuneError::Parse {
        path: path.to_path_buf(),
        content: trimmed.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFs;

    const PATH: &str = "/proc/sys/net/core/somaxconn";

    #[test]
    fn test_read_int_trims_whitespace() {
        let fs = MockFs::new();
        fs.add_file(PATH, "  4096\n");
        let source = ValueSource::new(fs);
        assert_eq!(source.read_int(Path::new(PATH)).unwrap(), 4096);
    }

    #[test]
    fn test_read_int_negative() {
        let fs = MockFs::new();
        fs.add_file(PATH, "-1\n");
        let source = ValueSource::new(fs);
        assert_eq!(source.read_int(Path::new(PATH)).unwrap(), -1);
    }

    #[test]
    fn test_read_int_missing_file() {
        let source = ValueSource::new(MockFs::new());
        let err = source.read_int(Path::new(PATH)).unwrap_err();
        assert!(matches!(err, TuneError::Read { .. }));
        assert!(err.to_string().contains(PATH));
    }

    #[test]
    fn test_read_int_garbage() {
        let fs = MockFs::new();
        fs.add_file(PATH, "4096 8192\n");
        let source = ValueSource::new(fs);
        let err = source.read_int(Path::new(PATH)).unwrap_err();
        assert!(matches!(err, TuneError::Parse { .. }));
        assert!(err.to_string().contains(PATH));
    }

    #[test]
    fn test_read_int_is_not_cached() {
        let fs = MockFs::new();
        fs.add_file(PATH, "128");
        let source = ValueSource::new(fs.clone());
        assert_eq!(source.read_int(Path::new(PATH)).unwrap(), 128);

        fs.add_file(PATH, "4096");
        assert_eq!(source.read_int(Path::new(PATH)).unwrap(), 4096);
    }
}
