//! Project configuration file contents

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::abbreviation::{AttributeQuotes, ExpandConfig, SelfClosingStyle};
use crate::generator::{StyleType, TypeSetting};

/// Root of `.mkcomprc.*` / `mkcomp.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Component defaults used when the command line leaves them out
    pub defaults: Option<DefaultsConfiguration>,

    /// Abbreviation expansion settings
    pub expand: Option<ExpandConfiguration>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DefaultsConfiguration {
    /// `tsx`, `jsx` or `auto`
    #[serde(rename = "type")]
    pub component_type: Option<TypeSetting>,

    pub style: Option<StyleType>,

    /// Output directory for generated components
    pub directory: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpandConfiguration {
    /// Indentation unit for generated markup
    pub indent: Option<String>,
    pub self_closing_style: Option<SelfClosingStyle>,
    pub attribute_quotes: Option<AttributeQuotes>,
    pub compact_boolean: Option<bool>,
    /// Adjacent inline elements before each goes on its own line
    pub inline_break: Option<usize>,
    pub max_repeat: Option<usize>,
    /// Expand BEM shorthand classes
    pub bem: Option<bool>,
    /// Fixed seed for lorem text
    pub lorem_seed: Option<u64>,
}

impl ExpandConfiguration {
    /// Overlay the values that are set onto `config`.
    pub fn apply(&self, config: &mut ExpandConfig) {
        if let Some(indent) = &self.indent {
            config.options.indent = indent.clone();
        }
        if let Some(style) = self.self_closing_style {
            config.options.self_closing_style = style;
        }
        if let Some(quotes) = self.attribute_quotes {
            config.options.attribute_quotes = quotes;
        }
        if let Some(compact) = self.compact_boolean {
            config.options.compact_boolean = compact;
        }
        if let Some(inline_break) = self.inline_break {
            config.options.inline_break = inline_break;
        }
        if let Some(max_repeat) = self.max_repeat {
            config.max_repeat = max_repeat;
        }
        if let Some(bem) = self.bem {
            config.options.bem.enabled = bem;
        }
        if let Some(seed) = self.lorem_seed {
            config.lorem_seed = Some(seed);
        }
    }
}

impl ProjectConfig {
    /// Load from a file, choosing the format by extension
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str());

        match ext {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some("toml") => Ok(toml::from_str(&content)?),
            _ => Err("Unsupported file extension (expected .json, .toml, .yaml or .yml)".into()),
        }
    }

    pub fn defaults(&self) -> DefaultsConfiguration {
        self.defaults.clone().unwrap_or_default()
    }

    /// Expansion config for `base` with this file's `expand` section applied.
    pub fn expand_config(&self, mut base: ExpandConfig) -> ExpandConfig {
        if let Some(expand) = &self.expand {
            expand.apply(&mut base);
        }
        base
    }
}
