//! Manifest validation and conversion to component requests

use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::{Manifest, ManifestComponent, ManifestDefaults};
use crate::config::DefaultsConfiguration;
use crate::error::MkcompError;
use crate::generator::{ComponentRequest, ComponentType, StyleType, Structure, TypeSetting};
use crate::result::Result;

/// Directory left out of reconstructed command lines
const DEFAULT_DIRECTORY: &str = "src/components";

/// Settings from outside the manifest
#[derive(Debug, Clone, Default)]
pub struct ManifestOverrides {
    /// Replaces every component's output directory
    pub directory: Option<PathBuf>,
    /// Project defaults, consulted after the manifest's own `config.defaults`
    pub project: DefaultsConfiguration,
}

pub struct ManifestProcessor;

impl ManifestProcessor {
    /// Read, validate and convert a manifest file.
    pub fn process_file(
        path: &Path,
        overrides: &ManifestOverrides,
    ) -> Result<Vec<ComponentRequest>> {
        let content = fs::read_to_string(path).map_err(|e| {
            MkcompError::manifest_error(format!("Cannot read '{}': {}", path.display(), e))
        })?;
        tracing::debug!("Processing manifest {}", path.display());
        Self::process_str(&content, overrides)
    }

    pub fn process_str(
        content: &str,
        overrides: &ManifestOverrides,
    ) -> Result<Vec<ComponentRequest>> {
        let manifest = Self::parse(content)?;
        Ok(Self::process(&manifest, overrides))
    }

    /// Parse and validate manifest text.
    pub fn parse(content: &str) -> Result<Manifest> {
        if is_blank_document(content) {
            return Err(MkcompError::invalid_manifest("Document is empty"));
        }

        let document: Value = serde_yaml::from_str(content).map_err(MkcompError::invalid_manifest)?;
        Self::validate(&document)?;
        serde_yaml::from_value(document).map_err(MkcompError::invalid_manifest)
    }

    /// Structural checks, reported in document order before typed decoding.
    fn validate(document: &Value) -> Result<()> {
        if document.is_null() {
            return Err(MkcompError::invalid_manifest("Document is empty"));
        }

        let Some(Value::Sequence(components)) = document.get("components") else {
            return Err(MkcompError::invalid_manifest("\"components\" must be an array"));
        };
        if components.is_empty() {
            return Err(MkcompError::invalid_manifest("At least one component must be defined"));
        }

        for (index, component) in components.iter().enumerate() {
            let Some(name) = component.get("name").filter(|v| is_present(v)) else {
                return Err(MkcompError::invalid_manifest(format!(
                    "Component at index {index} missing \"name\""
                )));
            };

            let has_directory = component
                .get("output")
                .and_then(|output| output.get("directory"))
                .is_some_and(is_present);
            if !has_directory {
                return Err(MkcompError::invalid_manifest(format!(
                    "Component \"{}\" missing output directory",
                    display_scalar(name)
                )));
            }
        }

        Ok(())
    }

    /// Convert every component of a validated manifest.
    pub fn process(manifest: &Manifest, overrides: &ManifestOverrides) -> Vec<ComponentRequest> {
        let defaults = manifest
            .config
            .as_ref()
            .and_then(|config| config.defaults.clone())
            .unwrap_or_default();

        manifest
            .components
            .iter()
            .map(|component| Self::process_component(component, &defaults, overrides))
            .collect()
    }

    fn process_component(
        component: &ManifestComponent,
        defaults: &ManifestDefaults,
        overrides: &ManifestOverrides,
    ) -> ComponentRequest {
        let component_type = component
            .component_type
            .resolve()
            .or_else(|| defaults.component_type.resolve())
            .or_else(|| overrides.project.component_type.and_then(TypeSetting::resolve))
            .unwrap_or_default();

        let style = component
            .output
            .style
            .or(defaults.style)
            .or(overrides.project.style)
            .unwrap_or_default();

        let directory = overrides
            .directory
            .clone()
            .unwrap_or_else(|| PathBuf::from(&component.output.directory));

        let props = component
            .props
            .iter()
            .map(|prop| prop.to_prop_entry())
            .collect::<Vec<_>>()
            .join(",");

        let structure = match &component.structure {
            Some(s) if s.emmet.as_deref().is_some_and(|e| !e.is_empty()) => {
                Structure::Abbreviation(s.emmet.clone().unwrap_or_default())
            }
            Some(s) if s.jsx.as_deref().is_some_and(|j| !j.is_empty()) => {
                Structure::Markup(s.jsx.clone().unwrap_or_default())
            }
            _ => Structure::default(),
        };

        let mut request = ComponentRequest {
            name: component.name.clone(),
            props,
            directory,
            style,
            structure,
            component_type,
            imports: component.imports.iter().map(|i| i.to_statement()).collect(),
            hooks: component.hooks.clone(),
            effects: component
                .custom
                .as_ref()
                .map(|custom| custom.effects.clone())
                .unwrap_or_default(),
            command: None,
        };
        request.command = Some(command_line(&request));
        request
    }

    /// Keep only the named components, warning about names not in the manifest.
    pub fn filter(requests: Vec<ComponentRequest>, names: &[String]) -> Vec<ComponentRequest> {
        for name in names {
            if !requests.iter().any(|r| &r.name == name) {
                tracing::warn!("Component '{}' not found in manifest", name);
            }
        }

        requests
            .into_iter()
            .filter(|r| names.contains(&r.name))
            .collect()
    }
}

/// Equivalent single-component invocation, recorded in file headers
fn command_line(request: &ComponentRequest) -> String {
    let mut parts = vec!["mkcomp".to_string(), request.name.clone()];

    if !request.props.is_empty() {
        parts.push(format!("-p \"{}\"", request.props));
    }
    let directory = request.directory.display().to_string();
    if directory != DEFAULT_DIRECTORY {
        parts.push(format!("-d {directory}"));
    }
    if request.style != StyleType::Css {
        parts.push(format!("-s {}", request.style));
    }
    if !request.structure.as_str().is_empty() {
        parts.push(format!("-e \"{}\"", request.structure.as_str()));
    }
    parts.push(match request.component_type {
        ComponentType::Jsx => "--jsx".to_string(),
        ComponentType::Tsx => "--tsx".to_string(),
    });

    parts.join(" ")
}

fn is_blank_document(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---"
    })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        _ => true,
    }
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_of(content: &str) -> String {
        ManifestProcessor::parse(content).unwrap_err().to_string()
    }

    #[test]
    fn test_validation_messages_in_order() {
        assert_eq!(error_of(""), "Failed to process YAML file: Invalid YAML: Document is empty");
        assert_eq!(
            error_of("# nothing\n"),
            "Failed to process YAML file: Invalid YAML: Document is empty"
        );
        assert_eq!(
            error_of("components: Button\n"),
            "Failed to process YAML file: Invalid YAML: \"components\" must be an array"
        );
        assert_eq!(
            error_of("config: {}\n"),
            "Failed to process YAML file: Invalid YAML: \"components\" must be an array"
        );
        assert_eq!(
            error_of("components: []\n"),
            "Failed to process YAML file: Invalid YAML: At least one component must be defined"
        );
        assert_eq!(
            error_of("components:\n  - name: A\n    output: { directory: x }\n  - output: { directory: y }\n"),
            "Failed to process YAML file: Invalid YAML: Component at index 1 missing \"name\""
        );
        assert_eq!(
            error_of("components:\n  - name: Card\n    output: { style: css }\n"),
            "Failed to process YAML file: Invalid YAML: Component \"Card\" missing output directory"
        );
    }

    #[test]
    fn test_syntax_error_has_manifest_prefix() {
        let message = error_of("components: [\n");
        assert!(message.starts_with("Failed to process YAML file: Invalid YAML: "));
    }

    #[test]
    fn test_resolution_order() {
        let requests = ManifestProcessor::process_str(
            r#"
components:
  - name: First
    output: { directory: src/a }
  - name: Second
    type: tsx
    output: { directory: src/b, style: tailwind }
config:
  defaults: { type: jsx, style: scss }
"#,
            &ManifestOverrides::default(),
        )
        .unwrap();

        assert_eq!(requests[0].component_type, ComponentType::Jsx);
        assert_eq!(requests[0].style, StyleType::Scss);
        assert_eq!(requests[1].component_type, ComponentType::Tsx);
        assert_eq!(requests[1].style, StyleType::Tailwind);
    }

    #[test]
    fn test_fallbacks_without_defaults() {
        let requests = ManifestProcessor::process_str(
            "components:\n  - name: Plain\n    output: { directory: src/components }\n",
            &ManifestOverrides::default(),
        )
        .unwrap();

        let request = &requests[0];
        assert_eq!(request.component_type, ComponentType::Tsx);
        assert_eq!(request.style, StyleType::Css);
        assert_eq!(request.structure, Structure::default());
        assert_eq!(request.command.as_deref(), Some("mkcomp Plain --tsx"));
    }

    #[test]
    fn test_project_defaults_apply_after_manifest_defaults() {
        let overrides = ManifestOverrides {
            directory: None,
            project: DefaultsConfiguration {
                component_type: Some(TypeSetting::Jsx),
                style: Some(StyleType::None),
                directory: None,
            },
        };
        let requests = ManifestProcessor::process_str(
            "components:\n  - name: Plain\n    output: { directory: out }\n",
            &overrides,
        )
        .unwrap();

        assert_eq!(requests[0].component_type, ComponentType::Jsx);
        assert_eq!(requests[0].style, StyleType::None);
    }

    #[test]
    fn test_full_component_conversion() {
        let requests = ManifestProcessor::process_str(
            r#"
components:
  - name: Modal
    type: tsx
    output:
      directory: src/overlays
      style: scss
    props:
      - { name: isOpen, type: boolean, required: true }
      - { name: size, type: string, required: false, default: "'md'" }
    structure:
      emmet: div.modal>h2.title
    hooks: [useState]
    custom:
      effects:
        - { trigger: isOpen, action: "console.log(isOpen)" }
    imports:
      - { from: clsx, import: clsx }
"#,
            &ManifestOverrides::default(),
        )
        .unwrap();

        let modal = &requests[0];
        assert_eq!(modal.props, "isOpen:boolean,size?:string");
        assert_eq!(modal.directory, PathBuf::from("src/overlays"));
        assert_eq!(modal.structure, Structure::Abbreviation("div.modal>h2.title".into()));
        assert_eq!(modal.hooks, vec!["useState"]);
        assert_eq!(modal.effects[0].trigger, "isOpen");
        assert_eq!(modal.imports, vec!["import clsx from 'clsx';"]);
        assert_eq!(
            modal.command.as_deref(),
            Some(
                "mkcomp Modal -p \"isOpen:boolean,size?:string\" -d src/overlays -s scss -e \"div.modal>h2.title\" --tsx"
            )
        );
    }

    #[test]
    fn test_raw_markup_and_directory_override() {
        let overrides = ManifestOverrides {
            directory: Some(PathBuf::from("build")),
            ..Default::default()
        };
        let requests = ManifestProcessor::process_str(
            "components:\n  - name: Raw\n    output: { directory: src/x }\n    structure: { jsx: \"<hr />\" }\n",
            &overrides,
        )
        .unwrap();

        assert_eq!(requests[0].directory, PathBuf::from("build"));
        assert_eq!(requests[0].structure, Structure::Markup("<hr />".into()));
    }

    #[test]
    fn test_filter_keeps_named_components() {
        let requests = vec![
            ComponentRequest::new("Button"),
            ComponentRequest::new("Modal"),
            ComponentRequest::new("Card"),
        ];
        let only = vec!["Card".to_string(), "Button".to_string(), "Missing".to_string()];

        let names: Vec<String> = ManifestProcessor::filter(requests, &only)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Button", "Card"]);
    }

    #[test]
    fn test_unreadable_file() {
        let err = ManifestProcessor::process_file(
            Path::new("does/not/exist.yaml"),
            &ManifestOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Failed to process YAML file: Cannot read"));
    }
}
