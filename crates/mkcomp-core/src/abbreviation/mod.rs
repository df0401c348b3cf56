//! Markup abbreviation engine
//!
//! Expands shorthand like `ul>li.item*3` into markup. The pipeline runs
//! tokenize → parse → convert → resolve snippets → transform → stringify and
//! is a pure function of the abbreviation and the [`ExpandConfig`].
//!
//! ```
//! use mkcomp_core::abbreviation::{expand, ExpandConfig};
//!
//! let html = expand("ul>li*2", &ExpandConfig::default()).unwrap();
//! assert_eq!(html, "<ul>\n\t<li></li>\n\t<li></li>\n</ul>");
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod node;
pub mod output;
pub mod parser;
pub mod scanner;
pub mod snippets;
pub mod token;
pub mod tokenizer;
pub mod transform;

pub use config::{
    AttributeQuotes, BemOptions, DEFAULT_MAX_REPEAT, ExpandConfig, ExpandOptions, ImplicitTagTable,
    OutputHooks, ReplacementText, SelfClosingStyle, StringCase, Syntax,
};
pub use convert::ConvertOptions;
pub use error::{AbbreviationError, AbbreviationErrorKind};
pub use node::{Abbreviation, Attribute, Node, Value, ValueType};
pub use snippets::{Resolution, SnippetRegistry};

use parser::ParserOptions;

/// Tokenize, parse and convert without snippets or transforms.
pub(crate) fn parse_tree(
    source: &str,
    jsx: bool,
    options: ConvertOptions<'_>,
) -> Result<Abbreviation, AbbreviationError> {
    let tokens = tokenizer::tokenize(source)?;
    let group = parser::parse(&tokens, ParserOptions { jsx })?;
    Ok(convert::convert(&group, options))
}

/// Parse an abbreviation into its final node tree: snippets resolved and all
/// transforms applied.
pub fn parse_abbreviation(
    source: &str,
    config: &ExpandConfig,
) -> Result<Abbreviation, AbbreviationError> {
    let tree = parse_tree(source, config.options.jsx, ConvertOptions::from_config(config))?;
    let mut abbr = snippets::resolve_snippets(tree, config);
    transform::transform(&mut abbr, config);
    Ok(abbr)
}

/// Expand an abbreviation into markup for `config.syntax`.
pub fn expand(source: &str, config: &ExpandConfig) -> Result<String, AbbreviationError> {
    let abbr = parse_abbreviation(source, config)?;
    tracing::trace!("Expanded '{}' into {} top-level nodes", source, abbr.children.len());
    Ok(output::stringify(&abbr, config))
}
