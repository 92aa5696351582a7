//! Standard-library implementation of the filesystem port.

use std::io::Write;
use std::path::{Path, PathBuf};

use relforge_domain::{DomainError, DomainResult, ErrorCode, FileInfo, FileSystemPort};

/// Filesystem port backed by `std::fs`.
///
/// Writes are atomic: content goes to a temporary file in the target
/// directory which is then renamed over the destination, so a failed
/// write never leaves a torn artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Create the port.
    pub fn new() -> Self {
        Self
    }
}

fn map_io(err: std::io::Error, fallback: ErrorCode, path: &Path) -> DomainError {
    let code = match err.kind() {
        std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
        std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
        _ => fallback,
    };
    DomainError::new(code, "Filesystem operation failed")
        .with_context(path.display().to_string())
        .with_cause(err)
}

impl FileSystemPort for StdFileSystem {
    fn read_file(&self, path: &Path) -> DomainResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io(e, ErrorCode::FileReadFailed, path))
    }

    fn write_file(&self, path: &Path, data: &[u8], mode: u32) -> DomainResult<()> {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = dir.unwrap_or(Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| map_io(e, ErrorCode::FileWriteFailed, path))?;
        tmp.write_all(data)
            .map_err(|e| map_io(e, ErrorCode::FileWriteFailed, path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io(e, ErrorCode::FileWriteFailed, path))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        tmp.persist(path)
            .map_err(|e| map_io(e.error, ErrorCode::FileWriteFailed, path))?;
        Ok(())
    }

    fn file_exists(&self, path: &Path) -> DomainResult<bool> {
        Ok(path.is_file())
    }

    fn dir_exists(&self, path: &Path) -> DomainResult<bool> {
        Ok(path.is_dir())
    }

    fn mkdir_all(&self, path: &Path, mode: u32) -> DomainResult<()> {
        std::fs::create_dir_all(path)
            .map_err(|e| map_io(e, ErrorCode::DirectoryCreateFailed, path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| map_io(e, ErrorCode::DirectoryCreateFailed, path))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        Ok(())
    }

    fn stat(&self, path: &Path) -> DomainResult<FileInfo> {
        let meta =
            std::fs::metadata(path).map_err(|e| map_io(e, ErrorCode::FileNotFound, path))?;
        Ok(FileInfo {
            size: meta.len(),
            is_dir: meta.is_dir(),
            modified: meta.modified().ok(),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> DomainResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io(e, ErrorCode::FileWriteFailed, from))
    }

    fn remove_file(&self, path: &Path) -> DomainResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io(e, ErrorCode::FileWriteFailed, path))
    }

    fn remove_dir(&self, path: &Path) -> DomainResult<()> {
        std::fs::remove_dir(path).map_err(|e| map_io(e, ErrorCode::FileWriteFailed, path))
    }

    fn list_dir(&self, path: &Path) -> DomainResult<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| map_io(e, ErrorCode::FileReadFailed, path))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io(e, ErrorCode::FileReadFailed, path))?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}
