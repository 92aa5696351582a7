//! Shared fixtures for the workflow integration tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use relforge_domain::{
    DomainError, DomainResult, ErrorCode, FileInfo, FileSystemPort,
};
use relforge_workflows::{Job, JobContext};

/// Std-backed filesystem port for tests, with the same atomic-write
/// contract the production port honours.
pub struct StdFs;

fn io_error(code: ErrorCode, path: &Path, err: std::io::Error) -> DomainError {
    DomainError::new(code, "Filesystem operation failed")
        .with_context(path.display().to_string())
        .with_cause(err)
}

impl FileSystemPort for StdFs {
    fn read_file(&self, path: &Path) -> DomainResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| io_error(ErrorCode::FileReadFailed, path, e))
    }

    fn write_file(&self, path: &Path, data: &[u8], _mode: u32) -> DomainResult<()> {
        let dir = path.parent().unwrap_or(Path::new("."));
        let tmp = dir.join(format!(
            ".{}.tmp",
            path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        ));
        std::fs::write(&tmp, data).map_err(|e| io_error(ErrorCode::FileWriteFailed, &tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| io_error(ErrorCode::FileWriteFailed, path, e))
    }

    fn file_exists(&self, path: &Path) -> DomainResult<bool> {
        Ok(path.is_file())
    }

    fn dir_exists(&self, path: &Path) -> DomainResult<bool> {
        Ok(path.is_dir())
    }

    fn mkdir_all(&self, path: &Path, _mode: u32) -> DomainResult<()> {
        std::fs::create_dir_all(path)
            .map_err(|e| io_error(ErrorCode::DirectoryCreateFailed, path, e))
    }

    fn stat(&self, path: &Path) -> DomainResult<FileInfo> {
        let meta =
            std::fs::metadata(path).map_err(|e| io_error(ErrorCode::FileNotFound, path, e))?;
        Ok(FileInfo {
            size: meta.len(),
            is_dir: meta.is_dir(),
            modified: meta.modified().ok(),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> DomainResult<()> {
        std::fs::rename(from, to).map_err(|e| io_error(ErrorCode::FileWriteFailed, from, e))
    }

    fn remove_file(&self, path: &Path) -> DomainResult<()> {
        std::fs::remove_file(path).map_err(|e| io_error(ErrorCode::FileWriteFailed, path, e))
    }

    fn remove_dir(&self, path: &Path) -> DomainResult<()> {
        std::fs::remove_dir(path).map_err(|e| io_error(ErrorCode::FileWriteFailed, path, e))
    }

    fn list_dir(&self, path: &Path) -> DomainResult<Vec<PathBuf>> {
        let entries =
            std::fs::read_dir(path).map_err(|e| io_error(ErrorCode::FileReadFailed, path, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(ErrorCode::FileReadFailed, path, e))?;
            paths.push(entry.path());
        }
        paths.sort();
        Ok(paths)
    }

    fn temp_dir(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

/// Build a context rooted at `dir`.
pub fn context(dir: &Path) -> JobContext {
    JobContext::new(Arc::new(StdFs), dir)
}

/// Seed a minimal buildable project layout.
#[allow(dead_code)]
pub fn seed_project(dir: &Path) {
    std::fs::write(dir.join("go.mod"), "module example.com/tool\n").unwrap();
    std::fs::write(dir.join("main.go"), "package main\n").unwrap();
}

/// A scripted job that records execution and rollback order.
pub struct RecordingJob {
    id: String,
    fail: bool,
    delay: Duration,
    observe_cancellation: bool,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingJob {
    pub fn ok(id: &str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            id: id.to_string(),
            fail: false,
            delay: Duration::ZERO,
            observe_cancellation: false,
            log,
        }
    }

    pub fn failing(id: &str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            fail: true,
            ..Self::ok(id, log)
        }
    }

    #[allow(dead_code)]
    pub fn slow(id: &str, delay: Duration, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            delay,
            observe_cancellation: true,
            ..Self::ok(id, log)
        }
    }
}

#[async_trait]
impl Job for RecordingJob {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.id
    }

    async fn execute(&self, ctx: &JobContext) -> DomainResult<()> {
        if self.observe_cancellation {
            ctx.check_cancelled()?;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
            if self.observe_cancellation {
                ctx.check_cancelled()?;
            }
        }
        self.log.lock().unwrap().push(format!("execute:{}", self.id));
        if self.fail {
            return Err(DomainError::new(ErrorCode::JobFailed, "scripted failure")
                .with_context(self.id.clone()));
        }
        Ok(())
    }

    async fn rollback(&self, _ctx: &JobContext) -> DomainResult<()> {
        self.log.lock().unwrap().push(format!("rollback:{}", self.id));
        Ok(())
    }
}
