//! Starter manifests

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::{
    Manifest, ManifestComponent, ManifestConfig, ManifestCustom, ManifestDefaults, ManifestOutput,
    ManifestProp, ManifestStructure,
};
use crate::error::MkcompError;
use crate::generator::{Effect, StyleType, TypeSetting};
use crate::result::Result;

pub const DEFAULT_TEMPLATE_FILE: &str = "components.yaml";

const HEADER: &str = "# mkcomp YAML Template
# This file defines multiple components that can be batch-generated
#
# Usage:
#   mkcomp --from-yaml components.yaml
#   mkcomp --from-yaml components.yaml --only Button,Modal
#   mkcomp --from-yaml components.yaml --test

";

const MINIMAL_HEADER: &str = "# Minimal React Component Template
# Generate with: mkcomp --from-yaml components.yaml

";

pub struct ManifestTemplate;

impl ManifestTemplate {
    /// Example manifest covering styles, hooks and effects
    pub fn full() -> Result<String> {
        let manifest = Manifest {
            components: vec![
                ManifestComponent {
                    name: "Button".into(),
                    component_type: TypeSetting::Tsx,
                    output: output("src/components/ui", StyleType::Css),
                    props: vec![
                        ManifestProp::new("children", "React.ReactNode", false),
                        ManifestProp::new("variant", "'primary' | 'secondary' | 'danger'", false)
                            .with_default("'primary'"),
                        ManifestProp::new("size", "'sm' | 'md' | 'lg'", false).with_default("'md'"),
                        ManifestProp::new("onClick", "() => void", false),
                        ManifestProp::new("disabled", "boolean", false).with_default(false),
                    ],
                    structure: emmet("button.btn[type=button]>span.btn-text"),
                    ..Default::default()
                },
                ManifestComponent {
                    name: "Modal".into(),
                    component_type: TypeSetting::Tsx,
                    output: output("src/components/overlays", StyleType::Scss),
                    props: vec![
                        ManifestProp::new("isOpen", "boolean", true),
                        ManifestProp::new("title", "string", true),
                        ManifestProp::new("children", "React.ReactNode", false),
                        ManifestProp::new("onClose", "() => void", true),
                        ManifestProp::new("size", "'sm' | 'md' | 'lg' | 'xl'", false)
                            .with_default("'md'"),
                    ],
                    structure: emmet(
                        "div.modal-overlay>div.modal>div.modal-header>h2.modal-title+button.modal-close[aria-label=\"Close\"]^div.modal-body+div.modal-footer",
                    ),
                    hooks: vec!["useEffect".into(), "useState".into()],
                    custom: Some(ManifestCustom {
                        effects: vec![Effect {
                            trigger: "isOpen".into(),
                            action: "document.body.style.overflow = isOpen ? 'hidden' : 'auto'".into(),
                        }],
                    }),
                    ..Default::default()
                },
                ManifestComponent {
                    name: "Card".into(),
                    component_type: TypeSetting::Jsx,
                    output: output("src/components/ui", StyleType::Tailwind),
                    props: vec![
                        ManifestProp::new("title", "string", true),
                        ManifestProp::new("description", "string", false),
                        ManifestProp::new("children", "React.ReactNode", false),
                    ],
                    structure: emmet(
                        "div.bg-white.rounded-lg.shadow-md.p-6>h3.text-lg.font-semibold.mb-2+p.text-gray-600.mb-4+div.card-content",
                    ),
                    ..Default::default()
                },
            ],
            config: Some(ManifestConfig {
                defaults: Some(ManifestDefaults {
                    component_type: TypeSetting::Auto,
                    style: Some(StyleType::Css),
                    directory: Some("src/components".into()),
                }),
            }),
        };

        let body = to_yaml(&manifest)?
            .replacen(
                "components:",
                "# Example components with different configurations\ncomponents:",
                1,
            )
            .replacen("- name: Button", "# Basic UI Button Component\n- name: Button", 1)
            .replacen("- name: Modal", "# Modal Dialog with hooks and effects\n- name: Modal", 1)
            .replacen("- name: Card", "# Tailwind Card Component (JavaScript)\n- name: Card", 1)
            .replacen("\nconfig:", "\n# Global configuration settings\nconfig:", 1)
            .replacen("  defaults:", "  # Default settings for all components\n  defaults:", 1);

        Ok(format!("{HEADER}{body}"))
    }

    /// Single-component manifest
    pub fn minimal() -> Result<String> {
        let manifest = Manifest {
            components: vec![ManifestComponent {
                name: "ExampleComponent".into(),
                component_type: TypeSetting::Auto,
                output: output("src/components", StyleType::Css),
                props: vec![
                    ManifestProp::new("title", "string", true),
                    ManifestProp::new("children", "React.ReactNode", false),
                ],
                structure: emmet("div.example>h2.title+div.content"),
                ..Default::default()
            }],
            config: None,
        };

        Ok(format!("{MINIMAL_HEADER}{}", to_yaml(&manifest)?))
    }

    /// Write `content` to `path`, failing if the file already exists.
    pub fn write(path: &Path, content: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => MkcompError::validation_error(format!(
                    "File {} already exists. Choose a different name or remove it first.",
                    path.display()
                )),
                _ => MkcompError::io_error(path, e),
            })?;

        file.write_all(content.as_bytes())
            .map_err(|e| MkcompError::io_error(path, e))?;
        tracing::info!("Created template: {}", path.display());
        Ok(())
    }
}

fn output(directory: &str, style: StyleType) -> ManifestOutput {
    ManifestOutput {
        directory: directory.into(),
        style: Some(style),
    }
}

fn emmet(abbreviation: &str) -> Option<ManifestStructure> {
    Some(ManifestStructure {
        emmet: Some(abbreviation.into()),
        jsx: None,
    })
}

fn to_yaml(manifest: &Manifest) -> Result<String> {
    serde_yaml::to_string(manifest)
        .map_err(|e| MkcompError::internal_error(format!("Failed to serialize template: {e}")))
}
