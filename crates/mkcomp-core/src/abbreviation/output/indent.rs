//! Indentation-based writer for pug, haml and slim

use super::{
    WalkState, attr_quotes, caret, is_boolean_attribute, should_output_attribute, split_value_lines,
};
use crate::abbreviation::config::{ExpandConfig, SelfClosingStyle};
use crate::abbreviation::node::{Abbreviation, Attribute, Node, Value};

/// Punctuation that distinguishes the indent-based syntaxes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentStyle {
    pub before_name: &'static str,
    pub before_attribute: &'static str,
    pub after_attribute: &'static str,
    pub glue_attribute: &'static str,
    pub before_text_line: &'static str,
    pub after_text_line: &'static str,
    /// Value written for a boolean attribute without one
    pub boolean_value: Option<&'static str>,
    pub self_close: &'static str,
}

impl IndentStyle {
    pub fn pug(config: &ExpandConfig) -> Self {
        Self {
            before_attribute: "(",
            after_attribute: ")",
            glue_attribute: ", ",
            before_text_line: "| ",
            self_close: if config.options.self_closing_style == SelfClosingStyle::Xml {
                "/"
            } else {
                ""
            },
            ..Default::default()
        }
    }

    pub fn haml() -> Self {
        Self {
            before_name: "%",
            before_attribute: "(",
            after_attribute: ")",
            glue_attribute: " ",
            after_text_line: " |",
            boolean_value: Some("true"),
            self_close: "/",
            ..Default::default()
        }
    }

    pub fn slim() -> Self {
        Self {
            before_attribute: " ",
            glue_attribute: " ",
            before_text_line: "| ",
            self_close: "/",
            ..Default::default()
        }
    }
}

pub(super) fn render(abbr: &Abbreviation, config: &ExpandConfig, style: &IndentStyle) -> String {
    let mut state = WalkState::new(config);
    for (index, node) in abbr.children.iter().enumerate() {
        element(node, index, None, &mut state, style);
    }
    state.out.value
}

fn element(
    node: &Node,
    index: usize,
    parent: Option<&Node>,
    state: &mut WalkState<'_>,
    style: &IndentStyle,
) {
    let (primary, secondary): (Vec<&Attribute>, Vec<&Attribute>) =
        node.attributes().iter().partition(|attr| is_primary(attr));

    let level = if parent.is_some() { 1 } else { 0 };
    state.out.level += level;

    // First top-level element and text nodes stay on the current line
    if (parent.is_some() || index > 0) && !node.is_snippet() {
        state.out.push_newline(state.out.level);
    }

    if let Some(name) = node.name()
        && (name != "div" || primary.is_empty())
    {
        state.out.push_string(&format!("{}{}", style.before_name, name));
    }

    push_primary_attributes(&primary, state);
    let secondary: Vec<&Attribute> = secondary
        .into_iter()
        .filter(|a| should_output_attribute(a))
        .collect();
    push_secondary_attributes(&secondary, state, style);

    if node.self_closing && node.value.is_none() && node.children.is_empty() {
        state.out.push_string(style.self_close);
    } else {
        push_value(node, state, style);
        for (ix, child) in node.children.iter().enumerate() {
            element(child, ix, Some(node), state, style);
        }
    }

    state.out.level -= level;
}

fn is_primary(attr: &Attribute) -> bool {
    matches!(attr.name.as_deref(), Some("class" | "id"))
}

/// `.class` and `#id` shorthand
fn push_primary_attributes(attrs: &[&Attribute], state: &mut WalkState<'_>) {
    for attr in attrs {
        let Some(value) = &attr.value else {
            continue;
        };
        if attr.name.as_deref() == Some("class") {
            state.out.push_string(".");
            let tokens: Vec<Value> = value
                .iter()
                .map(|token| match token {
                    Value::Text(text) => {
                        Value::Text(text.split_whitespace().collect::<Vec<_>>().join("."))
                    }
                    field => field.clone(),
                })
                .collect();
            state.push_tokens(&tokens);
        } else {
            state.out.push_string("#");
            state.push_tokens(value);
        }
    }
}

fn push_secondary_attributes(attrs: &[&Attribute], state: &mut WalkState<'_>, style: &IndentStyle) {
    if attrs.is_empty() {
        return;
    }
    let config = state.config;
    let options = &config.options;

    state.out.push_string(style.before_attribute);
    for (ix, attr) in attrs.iter().enumerate() {
        let name = options.attribute_case.apply(attr.name.as_deref().unwrap_or_default());
        state.out.push_string(&name);

        if is_boolean_attribute(attr, options) && attr.value.is_none() {
            if !options.compact_boolean
                && let Some(boolean) = style.boolean_value
            {
                state.out.push_string(&format!("={boolean}"));
            }
        } else {
            let (open, close) = attr_quotes(attr, options);
            state.out.push_string(&format!("={open}"));
            match &attr.value {
                Some(value) => state.push_tokens(value),
                None => state.push_tokens(&caret()),
            }
            state.out.push_string(&close.to_string());
        }

        if ix + 1 != attrs.len() {
            state.out.push_string(style.glue_attribute);
        }
    }
    state.out.push_string(style.after_attribute);
}

fn push_value(node: &Node, state: &mut WalkState<'_>, style: &IndentStyle) {
    let value = match &node.value {
        Some(value) => value.clone(),
        None if !node.children.is_empty() => return,
        // An empty leaf only gets a caret when the field hook renders one
        None if state.out.caret_is_empty() => return,
        None => caret(),
    };

    let lines = split_value_lines(&value);
    if lines.len() == 1 {
        if node.name.is_some() || node.attributes.is_some() {
            state.out.push(" ");
        }
        state.push_tokens(&value);
        return;
    }

    let lengths: Vec<usize> = lines.iter().map(|line| value_length(line)).collect();
    let max_length = lengths.iter().copied().max().unwrap_or(0);

    state.out.level += 1;
    for (line, length) in lines.iter().zip(&lengths) {
        state.out.push_newline(state.out.level);
        if !style.before_text_line.is_empty() {
            state.out.push(style.before_text_line);
        }
        state.push_tokens(line);
        if !style.after_text_line.is_empty() {
            state.out.push(&" ".repeat(max_length - length));
            state.out.push(style.after_text_line);
        }
    }
    state.out.level -= 1;
}

fn value_length(tokens: &[Value]) -> usize {
    tokens
        .iter()
        .map(|token| match token {
            Value::Text(text) => text.chars().count(),
            Value::Field(field) => field.name.chars().count(),
        })
        .sum()
}
