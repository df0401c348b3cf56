//! Component generation from request to files on disk

use insta::assert_snapshot;
use mkcomp_core::generator::{
    BatchGenerator, ComponentGenerator, ComponentRequest, ComponentType, FileKind, MarkupProcessor,
    StyleType, Structure, files,
};
use std::fs;
use tempfile::TempDir;

fn card_request() -> ComponentRequest {
    ComponentRequest {
        props: "title:string,subtitle?:string".into(),
        structure: Structure::Abbreviation("div.card>h2.title".into()),
        ..ComponentRequest::new("Card")
    }
}

#[test]
fn test_tsx_component_with_stylesheet() {
    let files = ComponentGenerator::default().render(&card_request()).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].kind, FileKind::Component);
    assert_eq!(files[1].kind, FileKind::Style);

    assert_snapshot!(files[0].content, @r#"
import React from 'react';
import './Card.css';

interface CardProps {
  title: string;
  subtitle?: string;
}

const Card = (props: CardProps) => {
  return (
    <div className="card">
      <h2 className="title"></h2>
    </div>
  );
};

export default Card;
"#);

    assert_snapshot!(files[1].content, @r#"
/* Generated styles */

.card {
  /* Add your styles here */
}

.title {
  /* Add your styles here */
}
"#);
}

#[test]
fn test_jsx_component_with_prop_types() {
    let request = ComponentRequest {
        component_type: ComponentType::Jsx,
        style: StyleType::Tailwind,
        ..card_request()
    };
    let files = ComponentGenerator::default().render(&request).unwrap();
    assert_eq!(files.len(), 1);

    let content = &files[0].content;
    assert!(
        content.starts_with("import React from 'react';\nimport PropTypes from 'prop-types';\n\n")
    );
    assert!(content.contains("const Card = (props) => {"));
    assert!(content.contains(
        "Card.propTypes = {\n  title: PropTypes.string.isRequired,\n  subtitle: PropTypes.string,\n};"
    ));
    assert!(!content.contains("interface CardProps"));
}

#[test]
fn test_bad_abbreviation_falls_back_to_container() {
    let request = ComponentRequest {
        structure: Structure::Abbreviation("div[".into()),
        ..ComponentRequest::new("Broken")
    };
    let files = ComponentGenerator::default().render(&request).unwrap();
    assert!(files[0].content.contains("    <div className=\"container\"></div>"));
    assert!(files[1].content.contains(".container {"));
}

#[test]
fn test_markup_processor_scrapes_selectors() {
    let result = MarkupProcessor::default().expand("section#hero.banner.dark>p.banner");
    assert_eq!(result.classes, vec!["banner", "dark"]);
    assert_eq!(result.ids, vec!["hero"]);
}

#[test]
fn test_preview_then_write() {
    let temp_dir = TempDir::new().unwrap();
    let request = ComponentRequest {
        directory: temp_dir.path().join("src/ui"),
        ..card_request()
    };
    let rendered = ComponentGenerator::default().render(&request).unwrap();

    let preview = files::preview(&rendered);
    assert!(preview.contains("=== PREVIEW MODE ==="));
    assert!(!request.directory.exists());

    let report = files::write_files(&rendered, &request.directory);
    assert!(report.is_success());
    let written = fs::read_to_string(request.directory.join("Card.tsx")).unwrap();
    assert_eq!(written, rendered[0].content);
    assert!(request.directory.join("Card.css").exists());
}

#[test]
fn test_batch_reports_each_component() {
    let temp_dir = TempDir::new().unwrap();
    let requests: Vec<ComponentRequest> = ["Header", "footer", "Sidebar"]
        .iter()
        .map(|name| ComponentRequest {
            directory: temp_dir.path().to_path_buf(),
            style: StyleType::None,
            ..ComponentRequest::new(*name)
        })
        .collect();

    let summary = BatchGenerator::default().generate_all(&requests);
    assert_eq!(summary.generated, vec!["Header", "Sidebar"]);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].error.contains("capital letter"));
    assert_eq!(summary.files_written.len(), 2);
}
