//! Generating many components in one run

use std::path::PathBuf;

use super::files::{self, ComponentFile};
use super::{ComponentGenerator, ComponentRequest};
use crate::error::MkcompError;
use crate::result::{Result, ResultExt};

/// A component that could not be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub component: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Names of components generated without error
    pub generated: Vec<String>,
    pub failures: Vec<BatchFailure>,
    pub files_written: Vec<PathBuf>,
}

impl BatchSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Runs component requests independently, collecting failures instead of
/// stopping at the first one
#[derive(Debug, Clone, Default)]
pub struct BatchGenerator {
    generator: ComponentGenerator,
}

impl BatchGenerator {
    pub fn new(generator: ComponentGenerator) -> Self {
        Self { generator }
    }

    pub fn generate_all(&self, requests: &[ComponentRequest]) -> BatchSummary {
        let mut summary = BatchSummary::default();
        if requests.is_empty() {
            tracing::info!("No components to generate.");
            return summary;
        }

        tracing::info!("Generating {} component(s)", requests.len());
        for request in requests {
            tracing::info!("Generating {}...", request.name);
            let outcome = self.generate_one(request);
            if let Err(err) = &outcome {
                summary.failures.push(BatchFailure {
                    component: request.name.clone(),
                    error: err.to_string(),
                });
            }
            if let Some(written) = outcome.log_and_continue(&request.name) {
                summary.generated.push(request.name.clone());
                summary.files_written.extend(written);
            }
        }

        summary
    }

    fn generate_one(&self, request: &ComponentRequest) -> Result<Vec<PathBuf>> {
        let files: Vec<ComponentFile> = self.generator.render(request)?;
        let report = files::write_files(&files, &request.directory);

        match report.failed.first() {
            None => Ok(report.written),
            Some((path, error)) => Err(MkcompError::io_error(
                path,
                std::io::Error::other(error.clone()),
            )),
        }
    }

    /// Listing of what a run would generate, without touching the disk.
    pub fn preview(requests: &[ComponentRequest]) -> String {
        let mut out = String::from("\n=== YAML PREVIEW MODE ===\n\n");
        out.push_str(&format!("Found {} component(s) to generate:\n\n", requests.len()));

        for (ix, request) in requests.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", ix + 1, request.name));
            out.push_str(&format!("   Type: {}\n", request.component_type));
            out.push_str(&format!("   Style: {}\n", request.style));
            out.push_str(&format!("   Directory: {}\n", request.directory.display()));
            if !request.props.is_empty() {
                out.push_str(&format!("   Props: {}\n", request.props));
            }
            if !request.structure.as_str().is_empty() {
                out.push_str(&format!("   Structure: {}\n", request.structure.as_str()));
            }
            out.push('\n');
        }

        out.push_str("To generate these components, run the same command without --test\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{StyleType, Structure};
    use tempfile::TempDir;

    fn request(name: &str, dir: &std::path::Path) -> ComponentRequest {
        ComponentRequest {
            directory: dir.to_path_buf(),
            ..ComponentRequest::new(name)
        }
    }

    #[test]
    fn test_failures_do_not_stop_the_batch() {
        let temp_dir = TempDir::new().unwrap();
        let requests = vec![
            request("Button", temp_dir.path()),
            request("bad-name", temp_dir.path()),
            ComponentRequest {
                style: StyleType::Tailwind,
                ..request("Card", temp_dir.path())
            },
        ];

        let summary = BatchGenerator::default().generate_all(&requests);
        assert_eq!(summary.generated, vec!["Button", "Card"]);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].component, "bad-name");
        assert_eq!(summary.files_written.len(), 3);
        assert!(summary.has_failures());
        assert!(temp_dir.path().join("Card.tsx").exists());
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchGenerator::default().generate_all(&[]);
        assert_eq!(summary, BatchSummary::default());
    }

    #[test]
    fn test_preview_lists_details() {
        let requests = vec![ComponentRequest {
            props: "title:string".into(),
            structure: Structure::Abbreviation("div.card".into()),
            ..ComponentRequest::new("Card")
        }];

        let output = BatchGenerator::preview(&requests);
        assert!(output.contains("1. Card\n   Type: tsx\n   Style: css\n"));
        assert!(output.contains("   Props: title:string\n"));
        assert!(output.contains("   Structure: div.card\n"));
    }
}
