//! React component generation
//!
//! A [`ComponentRequest`] describes one component: its name, props, markup
//! structure and output settings. [`ComponentGenerator::render`] turns it into
//! the component file plus an optional stylesheet; [`files`] previews or
//! writes them and [`batch`] drives many requests at once.

pub mod batch;
pub mod component;
pub mod files;
pub mod markup;
pub mod props;
pub mod style;

pub use batch::{BatchFailure, BatchGenerator, BatchSummary};
pub use component::{ComponentTemplate, Effect, GeneratedComponent, TemplateContext};
pub use files::{ComponentFile, FileKind, WriteReport};
pub use markup::{MarkupProcessor, MarkupResult};
pub use props::{ParsedProps, PropDefinition, PropsParser};
pub use style::StyleTemplate;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::abbreviation::ExpandConfig;
use crate::error::MkcompError;
use crate::result::Result;

static COMPONENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]*$").unwrap());

/// Language flavor of the generated component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    #[default]
    Tsx,
    Jsx,
}

impl ComponentType {
    pub fn extension(self) -> &'static str {
        match self {
            ComponentType::Tsx => "tsx",
            ComponentType::Jsx => "jsx",
        }
    }

    /// Pick the type from explicit flags, then a configured default, then tsx.
    pub fn resolve(force_jsx: bool, force_tsx: bool, default: TypeSetting) -> Self {
        if force_jsx {
            ComponentType::Jsx
        } else if force_tsx {
            ComponentType::Tsx
        } else {
            default.resolve().unwrap_or_default()
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A component type as written in manifests and config files, where `auto`
/// defers to the next source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSetting {
    Tsx,
    Jsx,
    #[default]
    Auto,
}

impl TypeSetting {
    pub fn resolve(self) -> Option<ComponentType> {
        match self {
            TypeSetting::Tsx => Some(ComponentType::Tsx),
            TypeSetting::Jsx => Some(ComponentType::Jsx),
            TypeSetting::Auto => None,
        }
    }
}

impl From<ComponentType> for TypeSetting {
    fn from(value: ComponentType) -> Self {
        match value {
            ComponentType::Tsx => TypeSetting::Tsx,
            ComponentType::Jsx => TypeSetting::Jsx,
        }
    }
}

/// How the component is styled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    #[default]
    Css,
    Scss,
    Tailwind,
    Styled,
    None,
}

impl StyleType {
    pub const ALL: [StyleType; 5] = [
        StyleType::Css,
        StyleType::Scss,
        StyleType::Tailwind,
        StyleType::Styled,
        StyleType::None,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StyleType::Css => "css",
            StyleType::Scss => "scss",
            StyleType::Tailwind => "tailwind",
            StyleType::Styled => "styled",
            StyleType::None => "none",
        }
    }

    /// Whether a stylesheet file is generated next to the component
    pub fn has_stylesheet(self) -> bool {
        matches!(self, StyleType::Css | StyleType::Scss)
    }
}

impl fmt::Display for StyleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        StyleType::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| {
                format!("Unknown style '{s}' (expected css, scss, tailwind, styled or none)")
            })
    }
}

/// Where the component markup comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Structure {
    /// Abbreviation expanded through the engine; empty gives the default container
    Abbreviation(String),
    /// Markup used as written
    Markup(String),
}

impl Default for Structure {
    fn default() -> Self {
        Structure::Abbreviation(String::new())
    }
}

impl Structure {
    pub fn as_str(&self) -> &str {
        match self {
            Structure::Abbreviation(value) | Structure::Markup(value) => value,
        }
    }
}

/// Everything needed to generate one component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentRequest {
    pub name: String,
    /// Comma-separated `name[?]:type` list
    pub props: String,
    pub directory: PathBuf,
    pub style: StyleType,
    pub structure: Structure,
    pub component_type: ComponentType,
    /// Extra import lines
    pub imports: Vec<String>,
    /// React hooks to import
    pub hooks: Vec<String>,
    pub effects: Vec<Effect>,
    /// Command line recorded in the generated file header
    pub command: Option<String>,
}

impl ComponentRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: PathBuf::from("."),
            ..Default::default()
        }
    }

    pub fn component_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}.{}", self.name, self.component_type.extension()))
    }

    pub fn style_path(&self) -> Option<PathBuf> {
        self.style
            .has_stylesheet()
            .then(|| self.directory.join(format!("{}.{}", self.name, self.style)))
    }
}

/// Check a component name is PascalCase letters and digits.
pub fn validate_component_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MkcompError::validation_error("Component name is required"));
    }
    if !COMPONENT_NAME_RE.is_match(name) {
        return Err(MkcompError::validation_error(
            "Component name must start with capital letter and contain only letters and numbers",
        ));
    }
    Ok(())
}

/// Renders component requests into files
#[derive(Debug, Clone, Default)]
pub struct ComponentGenerator {
    markup: MarkupProcessor,
}

impl ComponentGenerator {
    pub fn new(expand: ExpandConfig) -> Self {
        Self {
            markup: MarkupProcessor::new(expand),
        }
    }

    /// Build the component file and, for css/scss, its stylesheet.
    pub fn render(&self, request: &ComponentRequest) -> Result<Vec<ComponentFile>> {
        validate_component_name(&request.name)?;

        let markup = match &request.structure {
            Structure::Abbreviation(abbr) => self.markup.expand(abbr),
            Structure::Markup(markup) => MarkupResult::from_markup(markup.trim()),
        };
        tracing::debug!(
            "Rendering {} ({}, {}) with {} classes and {} ids",
            request.name,
            request.component_type,
            request.style,
            markup.classes.len(),
            markup.ids.len()
        );

        let context = TemplateContext {
            name: &request.name,
            props: &request.props,
            markup: &markup.markup,
            component_type: request.component_type,
            style: request.style,
            command: request.command.as_deref(),
            imports: &request.imports,
            hooks: &request.hooks,
            effects: &request.effects,
        };
        let component = ComponentTemplate::generate(&context);

        let mut files = vec![ComponentFile::new(
            request.component_path(),
            component.full_content,
            FileKind::Component,
        )];

        if let Some(path) = request.style_path() {
            let content = StyleTemplate::generate(
                &markup.classes,
                &markup.ids,
                request.style,
                request.command.as_deref(),
            );
            files.push(ComponentFile::new(path, content, FileKind::Style));
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_name_validation() {
        assert!(validate_component_name("Button").is_ok());
        assert!(validate_component_name("UserCard2").is_ok());

        let err = validate_component_name("").unwrap_err();
        assert_eq!(err.to_string(), "Component name is required");

        for bad in ["button", "User-Card", "1Card", "Card_X"] {
            let err = validate_component_name(bad).unwrap_err();
            assert!(err.to_string().starts_with("Component name must start with capital letter"));
        }
    }

    #[test]
    fn test_component_type_resolution() {
        assert_eq!(ComponentType::resolve(true, false, TypeSetting::Tsx), ComponentType::Jsx);
        assert_eq!(ComponentType::resolve(false, true, TypeSetting::Jsx), ComponentType::Tsx);
        assert_eq!(ComponentType::resolve(false, false, TypeSetting::Jsx), ComponentType::Jsx);
        assert_eq!(ComponentType::resolve(false, false, TypeSetting::Auto), ComponentType::Tsx);
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("scss".parse::<StyleType>().unwrap(), StyleType::Scss);
        assert!("less".parse::<StyleType>().is_err());
        assert!(StyleType::Css.has_stylesheet());
        assert!(!StyleType::Tailwind.has_stylesheet());
    }

    #[test]
    fn test_render_produces_component_and_stylesheet() {
        let generator = ComponentGenerator::default();
        let mut request = ComponentRequest::new("Card");
        request.directory = PathBuf::from("src/ui");
        request.structure = Structure::Abbreviation("div.card>h2.title".into());

        let files = generator.render(&request).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path, PathBuf::from("src/ui/Card.tsx"));
        assert_eq!(files[1].path, PathBuf::from("src/ui/Card.css"));
        assert!(files[0].content.contains("<div className=\"card\">"));
        assert!(files[1].content.contains(".title {"));
    }

    #[test]
    fn test_render_without_stylesheet() {
        let generator = ComponentGenerator::default();
        let mut request = ComponentRequest::new("Badge");
        request.style = StyleType::Tailwind;
        request.component_type = ComponentType::Jsx;

        let files = generator.render(&request).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].kind, FileKind::Component);
        assert!(files[0].path.ends_with("Badge.jsx"));
    }

    #[test]
    fn test_raw_markup_structure() {
        let generator = ComponentGenerator::default();
        let mut request = ComponentRequest::new("Raw");
        request.structure = Structure::Markup("<section className=\"wrap\" />".into());

        let files = generator.render(&request).unwrap();
        assert!(files[0].content.contains("<section className=\"wrap\" />"));
        assert!(files[1].content.contains(".wrap {"));
    }

    #[test]
    fn test_render_rejects_bad_name() {
        let generator = ComponentGenerator::default();
        assert!(generator.render(&ComponentRequest::new("lower")).is_err());
    }
}
