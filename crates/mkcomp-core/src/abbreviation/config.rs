//! Expansion configuration
//!
//! [`ExpandOptions`] holds the serializable formatting knobs and can be
//! embedded in project configuration files. [`ExpandConfig`] bundles those
//! options with everything else a single [`expand`](super::expand) call
//! needs: output syntax, snippets, variables, replacement text and hooks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::snippets::SnippetRegistry;

/// Default cap on the total number of repeater iterations per expansion
pub const DEFAULT_MAX_REPEAT: usize = 10_000;

/// Output syntax
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Syntax {
    #[default]
    Html,
    Xhtml,
    Xml,
    Xsl,
    Jsx,
    Pug,
    Haml,
    Slim,
}

impl Syntax {
    pub const ALL: [Syntax; 8] = [
        Syntax::Html,
        Syntax::Xhtml,
        Syntax::Xml,
        Syntax::Xsl,
        Syntax::Jsx,
        Syntax::Pug,
        Syntax::Haml,
        Syntax::Slim,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Html => "html",
            Syntax::Xhtml => "xhtml",
            Syntax::Xml => "xml",
            Syntax::Xsl => "xsl",
            Syntax::Jsx => "jsx",
            Syntax::Pug => "pug",
            Syntax::Haml => "haml",
            Syntax::Slim => "slim",
        }
    }

    /// Indentation-based syntaxes without closing tags
    pub fn is_indent_based(self) -> bool {
        matches!(self, Syntax::Pug | Syntax::Haml | Syntax::Slim)
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Syntax::ALL
            .into_iter()
            .find(|syntax| syntax.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown syntax '{s}'"))
    }
}

/// How elements without content are closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelfClosingStyle {
    /// `<br>`
    #[default]
    Html,
    /// `<br />`
    Xhtml,
    /// `<br/>`
    Xml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeQuotes {
    #[default]
    Double,
    Single,
}

impl AttributeQuotes {
    pub fn as_char(self) -> char {
        match self {
            AttributeQuotes::Double => '"',
            AttributeQuotes::Single => '\'',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringCase {
    #[default]
    AsIs,
    Lower,
    Upper,
}

impl StringCase {
    pub fn apply(self, value: &str) -> String {
        match self {
            StringCase::AsIs => value.to_string(),
            StringCase::Lower => value.to_lowercase(),
            StringCase::Upper => value.to_uppercase(),
        }
    }
}

/// BEM class name expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BemOptions {
    pub enabled: bool,
    /// Separator between block and element
    pub element: String,
    /// Separator before a modifier
    pub modifier: String,
}

impl Default for BemOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            element: "__".to_string(),
            modifier: "_".to_string(),
        }
    }
}

/// Formatting options for the markup writers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpandOptions {
    /// Single indentation unit
    pub indent: String,
    /// Prefix added after every newline
    pub base_indent: String,
    pub newline: String,
    pub tag_case: StringCase,
    pub attribute_case: StringCase,
    pub attribute_quotes: AttributeQuotes,
    pub self_closing_style: SelfClosingStyle,
    /// Insert newlines and indentation between block elements
    pub format: bool,
    /// Elements whose children are not indented
    pub format_skip: Vec<String>,
    /// Elements whose content always goes on its own line
    pub format_force: Vec<String>,
    /// Put content of childless elements on its own line
    pub format_leaf_node: bool,
    /// Number of adjacent inline siblings after which each goes on its own line
    pub inline_break: usize,
    /// Output boolean attributes without a value: `<input disabled>`
    pub compact_boolean: bool,
    pub boolean_attributes: Vec<String>,
    /// Snippet attributes go after the abbreviation's own attributes
    pub reverse_attributes: bool,
    pub inline_elements: Vec<String>,
    /// Generate `href` for links whose text looks like a URL or email
    pub href: bool,
    pub jsx: bool,
    /// Attribute renames applied in JSX, `class*` matches `..name` shorthand
    pub jsx_attribute_names: IndexMap<String, String>,
    /// Prefix for expression values, keyed like `jsx_attribute_names`
    pub jsx_value_prefix: IndexMap<String, String>,
    pub bem: BemOptions,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            base_indent: String::new(),
            newline: "\n".to_string(),
            tag_case: StringCase::AsIs,
            attribute_case: StringCase::AsIs,
            attribute_quotes: AttributeQuotes::Double,
            self_closing_style: SelfClosingStyle::Html,
            format: true,
            format_skip: vec!["html".to_string()],
            format_force: vec!["body".to_string()],
            format_leaf_node: false,
            inline_break: 3,
            compact_boolean: false,
            boolean_attributes: to_strings(BOOLEAN_ATTRIBUTES),
            reverse_attributes: false,
            inline_elements: to_strings(INLINE_ELEMENTS),
            href: true,
            jsx: false,
            jsx_attribute_names: IndexMap::from([
                ("class".to_string(), "className".to_string()),
                ("class*".to_string(), "styleName".to_string()),
                ("for".to_string(), "htmlFor".to_string()),
            ]),
            jsx_value_prefix: IndexMap::from([("class*".to_string(), "styles".to_string())]),
            bem: BemOptions::default(),
        }
    }
}

impl ExpandOptions {
    pub fn is_inline(&self, name: &str) -> bool {
        contains_ignore_case(&self.inline_elements, name)
    }

    pub fn is_boolean_attribute(&self, name: &str) -> bool {
        contains_ignore_case(&self.boolean_attributes, name)
    }
}

pub(crate) fn contains_ignore_case(list: &[String], name: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(name))
}

const BOOLEAN_ATTRIBUTES: &[&str] = &[
    "contenteditable",
    "seamless",
    "async",
    "autofocus",
    "autoplay",
    "checked",
    "controls",
    "defer",
    "disabled",
    "formnovalidate",
    "hidden",
    "ismap",
    "loop",
    "multiple",
    "muted",
    "novalidate",
    "readonly",
    "required",
    "reversed",
    "selected",
    "typemustmatch",
];

const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "acronym", "applet", "b", "basefont", "bdo", "big", "br", "button", "cite",
    "code", "del", "dfn", "em", "font", "i", "iframe", "img", "input", "ins", "kbd", "label",
    "map", "object", "q", "s", "samp", "select", "small", "span", "strike", "strong", "sub",
    "sup", "textarea", "tt", "u", "var",
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Parent tag to implied child tag, consulted for nameless elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitTagTable {
    entries: Vec<(String, String)>,
    /// Used when the parent is inline
    pub inline_fallback: String,
    pub block_fallback: String,
}

impl ImplicitTagTable {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(parent, child)| (parent.to_string(), child.to_string()))
                .collect(),
            inline_fallback: "span".to_string(),
            block_fallback: "div".to_string(),
        }
    }

    pub fn html() -> Self {
        Self::new(&[
            ("p", "span"),
            ("ul", "li"),
            ("ol", "li"),
            ("table", "tr"),
            ("tr", "td"),
            ("tbody", "tr"),
            ("thead", "tr"),
            ("tfoot", "tr"),
            ("colgroup", "col"),
            ("select", "option"),
            ("optgroup", "option"),
            ("audio", "source"),
            ("video", "source"),
            ("object", "param"),
            ("map", "area"),
        ])
    }

    /// Child tag for `parent`, matched case-insensitively.
    pub fn lookup(&self, parent: &str) -> Option<&str> {
        let parent = parent.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == parent)
            .map(|(_, child)| child.as_str())
    }

    pub fn insert(&mut self, parent: impl Into<String>, child: impl Into<String>) {
        let parent = parent.into().to_lowercase();
        let child = child.into();
        match self.entries.iter_mut().find(|(key, _)| *key == parent) {
            Some(entry) => entry.1 = child,
            None => self.entries.push((parent, child)),
        }
    }
}

impl Default for ImplicitTagTable {
    fn default() -> Self {
        Self::html()
    }
}

/// Text to insert into the expanded tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplacementText {
    Single(String),
    /// One item per implicit (`*`) repetition
    List(Vec<String>),
}

impl ReplacementText {
    pub fn items(&self) -> Vec<&str> {
        match self {
            ReplacementText::Single(text) => vec![text.as_str()],
            ReplacementText::List(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

pub type TextHook = Arc<dyn Fn(&str) -> String + Send + Sync>;
pub type FieldHook = Arc<dyn Fn(usize, &str) -> String + Send + Sync>;
pub type WarnHook = Arc<dyn Fn(&str) + Send + Sync>;

/// Output interception points. Text goes through `text`, indexed fields
/// through `field` (the default writes the placeholder name).
#[derive(Clone, Default)]
pub struct OutputHooks {
    pub text: Option<TextHook>,
    pub field: Option<FieldHook>,
}

impl OutputHooks {
    pub fn text(&self, value: &str) -> String {
        match &self.text {
            Some(hook) => hook(value),
            None => value.to_string(),
        }
    }

    pub fn field(&self, index: usize, placeholder: &str) -> String {
        match &self.field {
            Some(hook) => hook(index, placeholder),
            None => placeholder.to_string(),
        }
    }
}

impl fmt::Debug for OutputHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputHooks")
            .field("text", &self.text.is_some())
            .field("field", &self.field.is_some())
            .finish()
    }
}

/// Everything one expansion needs
#[derive(Clone)]
pub struct ExpandConfig {
    pub syntax: Syntax,
    pub options: ExpandOptions,
    pub snippets: SnippetRegistry,
    /// Values for `${name}` references
    pub variables: IndexMap<String, String>,
    pub text: Option<ReplacementText>,
    pub max_repeat: usize,
    /// Seed for lorem text; random when unset
    pub lorem_seed: Option<u64>,
    pub hooks: OutputHooks,
    /// Non-fatal problems such as malformed snippets
    pub warn: Option<WarnHook>,
    pub implicit_tags: ImplicitTagTable,
}

impl ExpandConfig {
    /// Preset for the given output syntax.
    pub fn for_syntax(syntax: Syntax) -> Self {
        let mut options = ExpandOptions::default();
        let mut snippets = SnippetRegistry::html();

        match syntax {
            Syntax::Xhtml => options.self_closing_style = SelfClosingStyle::Xhtml,
            Syntax::Xml => options.self_closing_style = SelfClosingStyle::Xml,
            Syntax::Xsl => {
                options.self_closing_style = SelfClosingStyle::Xml;
                snippets = SnippetRegistry::xsl();
            }
            Syntax::Jsx => {
                options.jsx = true;
                options.self_closing_style = SelfClosingStyle::Xhtml;
            }
            Syntax::Html | Syntax::Pug | Syntax::Haml | Syntax::Slim => {}
        }

        Self {
            syntax,
            options,
            snippets,
            variables: default_variables(),
            text: None,
            max_repeat: DEFAULT_MAX_REPEAT,
            lorem_seed: None,
            hooks: OutputHooks::default(),
            warn: None,
            implicit_tags: ImplicitTagTable::html(),
        }
    }

    /// Replace the output options, keeping what the syntax mandates.
    ///
    /// JSX stays on for the jsx preset. `SelfClosingStyle::Html` is the
    /// default value, so it reads as unset and the preset's style wins; use
    /// [`ExpandConfig::with_self_closing_style`] afterwards to force it.
    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        let jsx = self.options.jsx;
        let self_closing = self.options.self_closing_style;
        self.options = options;
        self.options.jsx |= jsx;
        if self.options.self_closing_style == SelfClosingStyle::Html {
            self.options.self_closing_style = self_closing;
        }
        self
    }

    /// Set the self-closing style regardless of the syntax preset
    pub fn with_self_closing_style(mut self, style: SelfClosingStyle) -> Self {
        self.options.self_closing_style = style;
        self
    }

    pub fn with_text(mut self, text: ReplacementText) -> Self {
        self.text = Some(text);
        self
    }

    pub fn with_max_repeat(mut self, max_repeat: usize) -> Self {
        self.max_repeat = max_repeat;
        self
    }

    pub fn with_lorem_seed(mut self, seed: u64) -> Self {
        self.lorem_seed = Some(seed);
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_warn(mut self, warn: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.warn = Some(Arc::new(warn));
        self
    }

    /// Report a non-fatal problem through the warn hook, or the log.
    pub fn warn(&self, message: &str) {
        match &self.warn {
            Some(hook) => hook(message),
            None => tracing::warn!("{}", message),
        }
    }
}

impl Default for ExpandConfig {
    fn default() -> Self {
        Self::for_syntax(Syntax::Html)
    }
}

impl fmt::Debug for ExpandConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpandConfig")
            .field("syntax", &self.syntax)
            .field("options", &self.options)
            .field("snippets", &self.snippets.len())
            .field("variables", &self.variables)
            .field("text", &self.text)
            .field("max_repeat", &self.max_repeat)
            .field("lorem_seed", &self.lorem_seed)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

fn default_variables() -> IndexMap<String, String> {
    IndexMap::from([
        ("lang".to_string(), "en".to_string()),
        ("locale".to_string(), "en-US".to_string()),
        ("charset".to_string(), "UTF-8".to_string()),
    ])
}
