//! Previewing and writing generated files

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Component,
    Style,
}

/// A generated file not yet on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentFile {
    pub path: PathBuf,
    pub content: String,
    pub kind: FileKind,
}

impl ComponentFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            kind,
        }
    }
}

/// Outcome of writing a set of files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Path and error message for every failed write
    pub failed: Vec<(PathBuf, String)>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render files for dry-run output.
pub fn preview(files: &[ComponentFile]) -> String {
    let mut out = String::from("\n=== PREVIEW MODE ===\n\n");
    for file in files {
        out.push_str(&format!("--- {} ---\n{}\n\n\n", file.path.display(), file.content));
    }
    out
}

/// Create `directory` and write every file into place. Failures are logged and
/// recorded; the remaining files are still attempted.
pub fn write_files(files: &[ComponentFile], directory: &Path) -> WriteReport {
    let mut report = WriteReport::default();

    if !directory.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(directory)
    {
        tracing::warn!("Directory creation failed ({}): {}", directory.display(), e);
    }

    for file in files {
        match fs::write(&file.path, &file.content) {
            Ok(()) => {
                tracing::info!("Created: {}", file.path.display());
                report.written.push(file.path.clone());
            }
            Err(e) => {
                tracing::warn!("File creation failed ({}): {}", file.path.display(), e);
                report.failed.push((file.path.clone(), e.to_string()));
            }
        }
    }

    report
}
