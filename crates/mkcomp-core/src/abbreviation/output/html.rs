//! Tag-based writer for html, xhtml, xml, xsl and jsx

use regex::Regex;
use std::sync::LazyLock;

use super::{
    WalkState, attr_quotes, caret, has_newline, is_boolean_attribute, is_inline,
    is_inline_element, is_snippet, self_close, should_output_attribute,
};
use crate::abbreviation::config::{
    ExpandConfig, ExpandOptions, SelfClosingStyle, contains_ignore_case,
};
use crate::abbreviation::node::{Abbreviation, Attribute, Node, Value};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^<([\w\-:]+)[\s>]").unwrap());
static PROP_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][\w$]*$").unwrap());

pub(super) fn render(abbr: &Abbreviation, config: &ExpandConfig) -> String {
    let mut state = WalkState::new(config);
    for (index, node) in abbr.children.iter().enumerate() {
        element(node, index, &abbr.children, None, &mut state);
    }
    state.out.value
}

fn element(
    node: &Node,
    index: usize,
    items: &[Node],
    parent: Option<&Node>,
    state: &mut WalkState<'_>,
) {
    let config = state.config;
    let options = &config.options;
    let format = should_format(node, index, items, parent, options);
    let level = indent_level(parent, options);

    state.out.level += level;
    if format {
        state.out.push_newline(state.out.level);
    }

    if let Some(raw_name) = node.name() {
        let name = options.tag_case.apply(raw_name);
        state.out.push_string(&format!("<{name}"));
        for attr in node.attributes() {
            if should_output_attribute(attr) {
                push_attribute(attr, state);
            }
        }

        if node.self_closing && node.children.is_empty() && node.value.is_none() {
            state.out.push_string(&format!("{}>", self_close(options)));
        } else {
            state.out.push_string(">");
            if !push_snippet(node, state) {
                if let Some(value) = &node.value {
                    let inner_format =
                        value.iter().any(has_newline) || starts_with_block_tag(value, options);
                    if inner_format {
                        state.out.level += 1;
                        state.out.push_newline(state.out.level);
                    }
                    state.push_tokens(value);
                    if inner_format {
                        state.out.level -= 1;
                        state.out.push_newline(state.out.level);
                    }
                }

                for (ix, child) in node.children.iter().enumerate() {
                    element(child, ix, &node.children, Some(node), state);
                }

                if node.value.is_none() && node.children.is_empty() {
                    let inner_format = options.format_leaf_node
                        || contains_ignore_case(&options.format_force, raw_name);
                    if inner_format {
                        state.out.level += 1;
                        state.out.push_newline(state.out.level);
                    }
                    state.push_tokens(&caret());
                    if inner_format {
                        state.out.level -= 1;
                        state.out.push_newline(state.out.level);
                    }
                }
            }
            state.out.push_string(&format!("</{name}>"));
        }
    } else if !push_snippet(node, state)
        && let Some(value) = &node.value
    {
        state.push_tokens(value);
        for (ix, child) in node.children.iter().enumerate() {
            element(child, ix, &node.children, Some(node), state);
        }
    }

    if format && index + 1 == items.len() && parent.is_some() {
        let offset = if is_snippet(parent) { 0 } else { 1 };
        state.out.push_newline(state.out.level - offset);
    }

    state.out.level -= level;
}

fn push_attribute(attr: &Attribute, state: &mut WalkState<'_>) {
    let Some(raw_name) = attr.name.as_deref() else {
        return;
    };
    let config = state.config;
    let options = &config.options;
    let (mut l_quote, mut r_quote) = attr_quotes(attr, options);
    let mut value = attr.value.clone();

    let mut name = raw_name.to_string();
    if options.jsx {
        if let Some(renamed) = multi_value(raw_name, &options.jsx_attribute_names, attr.multiple) {
            name = renamed.to_string();
        }
        if attr.multiple {
            (l_quote, r_quote) = ('{', '}');
        }

        let prefix = multi_value(raw_name, &options.jsx_value_prefix, attr.multiple);
        if let (Some(prefix), Some([Value::Text(text)])) = (prefix, value.as_deref()) {
            let prefixed = if PROP_KEY_RE.is_match(text) {
                format!("{prefix}.{text}")
            } else {
                format!("{prefix}['{text}']")
            };
            value = Some(vec![Value::Text(prefixed)]);
            (l_quote, r_quote) = ('{', '}');
        }
    }
    let name = options.attribute_case.apply(&name);

    if is_boolean_attribute(attr, options) && value.is_none() {
        if !options.compact_boolean {
            value = Some(vec![Value::Text(name.clone())]);
        }
    } else if value.is_none() {
        value = Some(caret());
    }

    state.out.push_string(&format!(" {name}"));
    match value {
        Some(value) => {
            state.out.push_string(&format!("={l_quote}"));
            state.push_tokens(&value);
            state.out.push_string(&r_quote.to_string());
        }
        None if options.self_closing_style != SelfClosingStyle::Html => {
            state.out.push_string(&format!("={l_quote}{r_quote}"));
        }
        None => {}
    }
}

/// `class*` entries apply to `..name` attributes, plain keys to the rest.
fn multi_value<'m>(
    name: &str,
    map: &'m indexmap::IndexMap<String, String>,
    multiple: bool,
) -> Option<&'m str> {
    multiple
        .then(|| map.get(&format!("{name}*")))
        .flatten()
        .or_else(|| map.get(name))
        .map(String::as_str)
}

/// Output children at the first field of a wrapper snippet's value.
fn push_snippet(node: &Node, state: &mut WalkState<'_>) -> bool {
    let Some(value) = &node.value else {
        return false;
    };
    if node.children.is_empty() {
        return false;
    }
    let Some(field_ix) = value.iter().position(|v| matches!(v, Value::Field(_))) else {
        return false;
    };

    state.push_tokens(&value[..field_ix]);
    let line = state.out.line;
    let mut pos = field_ix + 1;
    for (ix, child) in node.children.iter().enumerate() {
        element(child, ix, &node.children, Some(node), state);
    }

    if state.out.line != line
        && let Some(Value::Text(text)) = value.get(pos)
    {
        state.out.push_string(text.trim_start());
        pos += 1;
    }
    if pos < value.len() {
        state.push_tokens(&value[pos..]);
    }
    true
}

fn should_format(
    node: &Node,
    index: usize,
    items: &[Node],
    parent: Option<&Node>,
    options: &ExpandOptions,
) -> bool {
    if !options.format {
        return false;
    }
    if index == 0 && parent.is_none() {
        return false;
    }
    if is_snippet(parent) && items.len() == 1 {
        return false;
    }

    if node.is_snippet() {
        let value = node.value.as_deref().unwrap_or_default();
        let format = (index > 0 && is_snippet(items.get(index - 1)))
            || is_snippet(items.get(index + 1))
            || value.iter().any(has_newline)
            || (node.has_field() && !node.children.is_empty());
        if format {
            return true;
        }
    }

    if !is_inline(node, options) {
        return true;
    }

    if index == 0 {
        if items.iter().any(|item| !is_inline(item, options)) {
            return true;
        }
    } else if !is_inline(&items[index - 1], options) {
        return true;
    }

    if options.inline_break > 0 {
        let adjacent = |n: &&Node| is_inline_element(n, options);
        let before = items[..index].iter().rev().take_while(adjacent).count();
        let after = items[index + 1..].iter().take_while(adjacent).count();
        if 1 + before + after >= options.inline_break {
            return true;
        }
    }

    node.children
        .iter()
        .enumerate()
        .any(|(ix, child)| should_format(child, ix, &node.children, Some(node), options))
}

fn indent_level(parent: Option<&Node>, options: &ExpandOptions) -> isize {
    match parent {
        None => 0,
        Some(p) if p.is_snippet() => 0,
        Some(p)
            if p.name()
                .is_some_and(|name| contains_ignore_case(&options.format_skip, name)) =>
        {
            0
        }
        Some(_) => 1,
    }
}

fn starts_with_block_tag(value: &[Value], options: &ExpandOptions) -> bool {
    match value.first() {
        Some(Value::Text(text)) => TAG_RE
            .captures(text)
            .is_some_and(|caps| !options.is_inline(&caps[1])),
        _ => false,
    }
}
