//! Project-structure inspection and recommendations.

use std::path::{Path, PathBuf};

use tracing::debug;

use relforge_domain::{DomainResult, FileSystemPort, ProjectKind};

/// What inspection learned about the working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Module name parsed from the descriptor, if present.
    pub module_name: Option<String>,
    /// Whether the module descriptor exists.
    pub has_descriptor: bool,
    /// Relative path of the entry file, if one was found.
    pub entry_file: Option<String>,
    /// Project kind inferred from the layout.
    pub inferred_kind: ProjectKind,
    /// Binary name inferred from the layout or module name.
    pub inferred_binary: Option<String>,
    /// Whether the project looks buildable.
    pub buildable: bool,
}

/// Inspects a working directory through the filesystem port.
pub struct ProjectInspector<'a> {
    fs: &'a dyn FileSystemPort,
    working_dir: &'a Path,
}

impl<'a> ProjectInspector<'a> {
    /// Create an inspector for `working_dir`.
    pub fn new(fs: &'a dyn FileSystemPort, working_dir: &'a Path) -> Self {
        Self { fs, working_dir }
    }

    /// Analyse the directory layout.
    pub fn inspect(&self) -> DomainResult<ProjectInfo> {
        let descriptor = self.working_dir.join("go.mod");
        let has_descriptor = self.fs.file_exists(&descriptor)?;

        let module_name = if has_descriptor {
            self.parse_module_name(&descriptor)?
        } else {
            None
        };

        let entry_file = self.find_entry_file()?;
        let inferred_kind = Self::infer_kind(entry_file.as_deref());
        let inferred_binary =
            Self::infer_binary(entry_file.as_deref(), module_name.as_deref());

        let buildable = has_descriptor && entry_file.is_some();
        debug!(buildable, ?entry_file, "project inspected");

        Ok(ProjectInfo {
            module_name,
            has_descriptor,
            entry_file,
            inferred_kind,
            inferred_binary,
            buildable,
        })
    }

    /// Follow-ups worth suggesting for this layout.
    pub fn recommendations(&self, info: &ProjectInfo, manifest_path: &str, workflow_dir: &str) -> Vec<String> {
        let mut recommendations = Vec::new();

        let exists = |rel: &str| -> bool {
            let path = self.working_dir.join(rel);
            self.fs.file_exists(&path).unwrap_or(false)
                || self.fs.dir_exists(&path).unwrap_or(false)
        };

        if !exists(workflow_dir) {
            recommendations
                .push("Add a CI workflow for automated builds and releases".to_string());
        }
        if !exists("README.md") {
            recommendations.push("Add README.md with project documentation".to_string());
        }
        if !exists(manifest_path) {
            recommendations
                .push("Add a release manifest for automated releases".to_string());
        }
        if !exists("Dockerfile") && info.inferred_kind.container_build_supported() {
            recommendations.push("Add a Dockerfile for containerized builds".to_string());
        }

        recommendations
    }

    fn parse_module_name(&self, descriptor: &Path) -> DomainResult<Option<String>> {
        let bytes = self.fs.read_file(descriptor)?;
        let content = String::from_utf8_lossy(&bytes);
        for line in content.lines() {
            let line = line.trim();
            if let Some(rest) = line.strip_prefix("module ") {
                return Ok(Some(rest.trim().trim_matches('"').to_string()));
            }
        }
        Ok(None)
    }

    fn find_entry_file(&self) -> DomainResult<Option<String>> {
        for candidate in ["main.go", "cmd/main.go", "src/main.go"] {
            if self.fs.file_exists(&self.working_dir.join(candidate))? {
                return Ok(Some(candidate.to_string()));
            }
        }

        let cmd_dir = self.working_dir.join("cmd");
        if self.fs.dir_exists(&cmd_dir)? {
            for entry in self.fs.list_dir(&cmd_dir)? {
                if self.fs.dir_exists(&entry)? && self.fs.file_exists(&entry.join("main.go"))? {
                    let sub = entry
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    return Ok(Some(format!("cmd/{sub}/main.go")));
                }
            }
        }

        Ok(None)
    }

    fn infer_kind(entry_file: Option<&str>) -> ProjectKind {
        match entry_file {
            Some(path) if path.starts_with("cmd/") => ProjectKind::Cli,
            Some(path) if path.contains("server/") || path.contains("api/") => {
                ProjectKind::ApiService
            }
            Some(path) if path.contains("web/") => ProjectKind::WebService,
            Some(_) => ProjectKind::Cli,
            None => ProjectKind::Library,
        }
    }

    fn infer_binary(entry_file: Option<&str>, module_name: Option<&str>) -> Option<String> {
        if let Some(path) = entry_file {
            let dir = PathBuf::from(path);
            if let Some(parent) = dir.parent() {
                if parent != Path::new("") && parent != Path::new("cmd") {
                    if let Some(name) = parent.file_name() {
                        return Some(name.to_string_lossy().into_owned());
                    }
                }
            }
        }
        module_name.map(|m| {
            m.rsplit('/')
                .next()
                .unwrap_or(m)
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::StdFileSystem;

    #[test]
    fn a_cmd_layout_is_inferred_as_a_cli() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module example.com/org/toolbox\n").unwrap();
        std::fs::create_dir_all(dir.path().join("cmd/toolbox")).unwrap();
        std::fs::write(dir.path().join("cmd/toolbox/main.go"), "package main\n").unwrap();

        let fs = StdFileSystem::new();
        let inspector = ProjectInspector::new(&fs, dir.path());
        let info = inspector.inspect().unwrap();

        assert!(info.buildable);
        assert_eq!(info.module_name.as_deref(), Some("example.com/org/toolbox"));
        assert_eq!(info.entry_file.as_deref(), Some("cmd/toolbox/main.go"));
        assert_eq!(info.inferred_kind, ProjectKind::Cli);
        assert_eq!(info.inferred_binary.as_deref(), Some("toolbox"));
    }

    #[test]
    fn a_bare_directory_is_not_buildable() {
        let dir = tempfile::tempdir().unwrap();
        let fs = StdFileSystem::new();
        let inspector = ProjectInspector::new(&fs, dir.path());
        let info = inspector.inspect().unwrap();

        assert!(!info.buildable);
        assert!(!info.has_descriptor);
        assert_eq!(info.inferred_kind, ProjectKind::Library);
    }

    #[test]
    fn recommendations_cover_the_missing_pieces() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module example.com/t\n").unwrap();
        std::fs::write(dir.path().join("main.go"), "package main\n").unwrap();

        let fs = StdFileSystem::new();
        let inspector = ProjectInspector::new(&fs, dir.path());
        let info = inspector.inspect().unwrap();
        let recommendations =
            inspector.recommendations(&info, ".releaser.yaml", ".ci/workflows");

        assert!(recommendations.iter().any(|r| r.contains("CI workflow")));
        assert!(recommendations.iter().any(|r| r.contains("README")));
        assert!(recommendations.iter().any(|r| r.contains("release manifest")));
    }

    #[test]
    fn top_level_entry_binary_falls_back_to_the_module_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("go.mod"), "module example.com/org/widget\n").unwrap();
        std::fs::write(dir.path().join("main.go"), "package main\n").unwrap();

        let fs = StdFileSystem::new();
        let inspector = ProjectInspector::new(&fs, dir.path());
        let info = inspector.inspect().unwrap();

        assert_eq!(info.inferred_binary.as_deref(), Some("widget"));
    }
}
