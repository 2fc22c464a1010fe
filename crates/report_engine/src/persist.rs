use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use report_logging::report_debug;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use {path} as an export directory: {reason}")]
    Directory { path: PathBuf, reason: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes files into one directory, each through a temp file that is renamed
/// into place, so a reader never sees a half-written file.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Creates the directory when missing and checks that it accepts files.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        let fail = |reason: String| PersistError::Directory {
            path: dir.clone(),
            reason,
        };
        match fs::metadata(&dir) {
            Ok(meta) if !meta.is_dir() => return Err(fail("not a directory".into())),
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                fs::create_dir_all(&dir).map_err(|err| fail(err.to_string()))?;
            }
            Err(err) => return Err(fail(err.to_string())),
        }
        NamedTempFile::new_in(&dir).map_err(|err| fail(err.to_string()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `content` to `file_name`, replacing any previous file.
    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(file_name);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|err| PersistError::Io(err.error))?;
        report_debug!("wrote {} bytes to {}", content.len(), target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::{PersistError, ReportWriter};

    #[test]
    fn creates_missing_directory_and_overwrites() {
        let root = tempfile::tempdir().unwrap();
        let writer = ReportWriter::open(root.path().join("nested/out")).unwrap();
        let first = writer.write("a.txt", "one").unwrap();
        let second = writer.write("a.txt", "two").unwrap();
        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(second).unwrap(), "two");
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(
            ReportWriter::open(&file),
            Err(PersistError::Directory { .. })
        ));
    }
}
