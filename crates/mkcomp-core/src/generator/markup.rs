//! Component markup from an abbreviation

use regex::Regex;
use std::sync::LazyLock;

use crate::abbreviation::{self, ExpandConfig, SelfClosingStyle, Syntax};

/// Markup used when no structure is given or expansion fails
pub const DEFAULT_MARKUP: &str = r#"<div className="container"></div>"#;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:className|class)="([^"]+)""#).unwrap());
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\bid="([^"]+)""#).unwrap());

/// Expanded markup with the selectors it uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupResult {
    pub markup: String,
    /// Class names in first-seen order
    pub classes: Vec<String>,
    /// Ids in first-seen order
    pub ids: Vec<String>,
}

impl MarkupResult {
    /// Scrape classes and ids from finished markup.
    pub fn from_markup(markup: &str) -> Self {
        let mut classes: Vec<String> = Vec::new();
        for caps in CLASS_RE.captures_iter(markup) {
            for class in caps[1].split_whitespace() {
                push_unique(&mut classes, class);
            }
        }

        let mut ids: Vec<String> = Vec::new();
        for caps in ID_RE.captures_iter(markup) {
            push_unique(&mut ids, &caps[1]);
        }

        Self {
            markup: markup.to_string(),
            classes,
            ids,
        }
    }
}

fn push_unique(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing == item) {
        items.push(item.to_string());
    }
}

/// Expands abbreviations into JSX for component bodies
#[derive(Debug, Clone)]
pub struct MarkupProcessor {
    config: ExpandConfig,
}

impl Default for MarkupProcessor {
    fn default() -> Self {
        Self::new(ExpandConfig::for_syntax(Syntax::Jsx))
    }
}

impl MarkupProcessor {
    /// Use `config` for expansion, forcing JSX output with two-space indent
    /// unless the config already sets a different indent.
    pub fn new(mut config: ExpandConfig) -> Self {
        config.syntax = Syntax::Jsx;
        config.options.jsx = true;
        if config.options.self_closing_style == SelfClosingStyle::Html {
            config.options.self_closing_style = SelfClosingStyle::Xhtml;
        }
        if config.options.indent == "\t" {
            config.options.indent = "  ".to_string();
        }
        Self { config }
    }

    pub fn config(&self) -> &ExpandConfig {
        &self.config
    }

    /// Expand `abbr`, falling back to [`DEFAULT_MARKUP`] when it is empty or
    /// invalid.
    pub fn expand(&self, abbr: &str) -> MarkupResult {
        let abbr = abbr.trim();
        if abbr.is_empty() {
            return MarkupResult::from_markup(DEFAULT_MARKUP);
        }

        match abbreviation::expand(abbr, &self.config) {
            Ok(markup) => {
                let markup = COMMENT_RE.replace_all(&markup, "");
                MarkupResult::from_markup(markup.trim())
            }
            Err(err) => {
                tracing::warn!("Abbreviation expansion failed: {}. Using default structure.", err);
                tracing::debug!("\n{}", err.annotate(abbr));
                MarkupResult::from_markup(DEFAULT_MARKUP)
            }
        }
    }
}
