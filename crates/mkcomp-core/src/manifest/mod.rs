//! YAML component manifests
//!
//! A manifest lists many components to generate in one run:
//!
//! ```yaml
//! components:
//!   - name: Button
//!     type: tsx
//!     output:
//!       directory: src/ui
//!       style: css
//!     props:
//!       - { name: label, type: string, required: true }
//!     structure:
//!       emmet: button.btn>span
//! config:
//!   defaults:
//!     style: scss
//! ```
//!
//! [`ManifestProcessor`] validates the document and turns each entry into a
//! [`ComponentRequest`](crate::generator::ComponentRequest).

pub mod processor;
pub mod template;

pub use processor::{ManifestOverrides, ManifestProcessor};
pub use template::{DEFAULT_TEMPLATE_FILE, ManifestTemplate};

use serde::{Deserialize, Serialize};

use crate::generator::{Effect, StyleType, TypeSetting};

/// Root of a manifest file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub components: Vec<ManifestComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ManifestConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestComponent {
    pub name: String,
    #[serde(default, rename = "type")]
    pub component_type: TypeSetting,
    pub output: ManifestOutput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<ManifestProp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<ManifestStructure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<ManifestCustom>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<ManifestImport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestOutput {
    pub directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestProp {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Documented default; not used when generating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_yaml::Value>,
}

impl ManifestProp {
    pub fn new(name: &str, ty: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            required: Some(required),
            default: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<serde_yaml::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// `name:type`, or `name?:type` when the prop is explicitly not required
    pub fn to_prop_entry(&self) -> String {
        let marker = if self.required == Some(false) { "?" } else { "" };
        format!("{}{}:{}", self.name, marker, self.ty)
    }
}

/// Markup source: an abbreviation (`emmet`) or raw markup (`jsx`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emmet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsx: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestCustom {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestImport {
    pub from: String,
    pub import: String,
}

impl ManifestImport {
    pub fn to_statement(&self) -> String {
        format!("import {} from '{}';", self.import, self.from)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<ManifestDefaults>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManifestDefaults {
    #[serde(default, rename = "type")]
    pub component_type: TypeSetting,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}
