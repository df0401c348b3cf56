//! Serialization of the node tree
//!
//! [`stringify`] picks the writer for the configured syntax: the tag-based
//! writer in [`html`] or the indentation-based one in [`indent`].

mod html;
mod indent;

use super::config::{ExpandConfig, ExpandOptions, OutputHooks, SelfClosingStyle, Syntax};
use super::node::{Abbreviation, Attribute, Node, Value, ValueType};

pub use indent::IndentStyle;

/// Render the tree in the configured syntax.
pub fn stringify(abbr: &Abbreviation, config: &ExpandConfig) -> String {
    match config.syntax {
        Syntax::Pug => indent::render(abbr, config, &IndentStyle::pug(config)),
        Syntax::Haml => indent::render(abbr, config, &IndentStyle::haml()),
        Syntax::Slim => indent::render(abbr, config, &IndentStyle::slim()),
        Syntax::Html | Syntax::Xhtml | Syntax::Xml | Syntax::Xsl | Syntax::Jsx => {
            html::render(abbr, config)
        }
    }
}

/// Accumulated output plus cursor position
#[derive(Debug)]
pub struct OutputStream<'a> {
    options: &'a ExpandOptions,
    hooks: &'a OutputHooks,
    pub value: String,
    /// Current indentation depth
    pub level: isize,
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl<'a> OutputStream<'a> {
    pub fn new(options: &'a ExpandOptions, hooks: &'a OutputHooks) -> Self {
        Self {
            options,
            hooks,
            value: String::new(),
            level: 0,
            offset: 0,
            line: 0,
            column: 0,
        }
    }

    /// Push text through the text hook.
    pub fn push(&mut self, text: &str) {
        let processed = self.hooks.text(text);
        self.push_raw(&processed);
    }

    fn push_raw(&mut self, text: &str) {
        let len = text.chars().count();
        self.value.push_str(text);
        self.offset += len;
        self.column += len;
    }

    /// Push possibly multi-line text, re-indenting every line break.
    pub fn push_string(&mut self, value: &str) {
        let lines = split_lines(value);
        let last = lines.len().saturating_sub(1);
        for (ix, line) in lines.into_iter().enumerate() {
            self.push(line);
            if ix != last {
                self.push_newline(self.level);
            }
        }
    }

    /// Newline plus base indent, then `indent` levels when positive.
    pub fn push_newline(&mut self, indent: isize) {
        let newline = format!("{}{}", self.options.newline, self.options.base_indent);
        self.push_raw(&newline);
        self.line += 1;
        self.column = self.options.base_indent.chars().count();
        if indent > 0 {
            self.push_indent(indent);
        }
    }

    pub fn push_indent(&mut self, size: isize) {
        let unit = self.options.indent.repeat(size.max(0) as usize);
        self.push_raw(&unit);
    }

    /// Whether an empty cursor field renders as nothing.
    pub fn caret_is_empty(&self) -> bool {
        self.hooks.field(0, "").is_empty()
    }

    /// Push an indexed field; the field hook decides its text.
    pub fn push_field(&mut self, index: usize, placeholder: &str) {
        let field = self.hooks.field(index, placeholder);
        self.push_raw(&field);
    }
}

/// Writer state shared by both output styles
struct WalkState<'a> {
    out: OutputStream<'a>,
    config: &'a ExpandConfig,
    /// Offset added to field indices so each emitted value gets fresh ones
    field_index: usize,
}

impl<'a> WalkState<'a> {
    fn new(config: &'a ExpandConfig) -> Self {
        Self {
            out: OutputStream::new(&config.options, &config.hooks),
            config,
            field_index: 0,
        }
    }

    fn push_tokens(&mut self, tokens: &[Value]) {
        let mut largest = None;
        for token in tokens {
            match token {
                Value::Text(text) => self.out.push_string(text),
                Value::Field(field) => {
                    self.out.push_field(self.field_index + field.index, &field.name);
                    largest = largest.max(Some(field.index));
                }
            }
        }
        if let Some(largest) = largest {
            self.field_index += largest + 1;
        }
    }
}

/// Cursor position for empty content
fn caret() -> Vec<Value> {
    vec![Value::Field(super::node::Field {
        index: 0,
        name: String::new(),
    })]
}

fn split_lines(value: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = value.as_bytes();
    let mut ix = 0;
    while ix < bytes.len() {
        match bytes[ix] {
            b'\r' => {
                lines.push(&value[start..ix]);
                ix += if bytes.get(ix + 1) == Some(&b'\n') { 2 } else { 1 };
                start = ix;
            }
            b'\n' => {
                lines.push(&value[start..ix]);
                ix += 1;
                start = ix;
            }
            _ => ix += 1,
        }
    }
    lines.push(&value[start..]);
    lines
}

/// Split value tokens into lines, breaking text tokens on newlines.
fn split_value_lines(values: &[Value]) -> Vec<Vec<Value>> {
    let mut result = Vec::new();
    let mut line = Vec::new();

    for value in values {
        match value {
            Value::Text(text) => {
                let parts = split_lines(text);
                let last = parts.len() - 1;
                for (ix, part) in parts.into_iter().enumerate() {
                    if !part.is_empty() {
                        line.push(Value::text(part));
                    }
                    if ix != last {
                        result.push(std::mem::take(&mut line));
                    }
                }
            }
            Value::Field(_) => line.push(value.clone()),
        }
    }

    result.push(line);
    result
}

fn has_newline(value: &Value) -> bool {
    matches!(value, Value::Text(text) if text.contains(['\r', '\n']))
}

fn is_snippet(node: Option<&Node>) -> bool {
    node.is_some_and(Node::is_snippet)
}

fn is_inline(node: &Node, options: &ExpandOptions) -> bool {
    match node.name() {
        Some(name) => options.is_inline(name),
        None => node.value.is_some() && node.attributes.is_none(),
    }
}

/// Named inline element; text nodes do not count
fn is_inline_element(node: &Node, options: &ExpandOptions) -> bool {
    node.name().is_some_and(|name| options.is_inline(name))
}

/// Implied attributes without a value are dropped.
fn should_output_attribute(attr: &Attribute) -> bool {
    !attr.implied || attr.value_type != ValueType::Raw || attr.has_value()
}

fn is_boolean_attribute(attr: &Attribute, options: &ExpandOptions) -> bool {
    attr.boolean || attr.name.as_deref().is_some_and(|name| options.is_boolean_attribute(name))
}

fn attr_quotes(attr: &Attribute, options: &ExpandOptions) -> (char, char) {
    if attr.value_type == ValueType::Expression {
        return ('{', '}');
    }
    let quote = options.attribute_quotes.as_char();
    (quote, quote)
}

fn self_close(options: &ExpandOptions) -> &'static str {
    match options.self_closing_style {
        SelfClosingStyle::Html => "",
        SelfClosingStyle::Xhtml => " /",
        SelfClosingStyle::Xml => "/",
    }
}
