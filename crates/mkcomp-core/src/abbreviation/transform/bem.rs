//! BEM class name expansion
//!
//! Inside a block `.card`, `-title` becomes `card__title` and `_active`
//! becomes a modifier of the class before it: `.-title_active` gives
//! `card__title card__title_active`. Each extra leading `-` or `_` looks one
//! ancestor further up for the block name.

use regex::Regex;
use std::sync::LazyLock;

use super::Frame;
use crate::abbreviation::config::BemOptions;
use crate::abbreviation::node::{Node, Value};

static ELEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(-+)([a-z0-9]+[a-z0-9-]*)").unwrap());
static MODIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(_+)([a-z0-9]+[a-z0-9-_]*)").unwrap());
static BLOCK_WITH_DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z]-").unwrap());
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z]").unwrap());

/// Class names of a node and the block they belong to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BemData {
    pub class_names: Vec<String>,
    pub block: Option<String>,
}

impl BemData {
    fn parse(class_value: &str) -> Self {
        let class_names: Vec<String> = class_value.split_whitespace().map(str::to_string).collect();
        let block = find_block_name(&class_names);
        Self { class_names, block }
    }
}

/// Expand BEM shorthand classes on `node`. Returns the block data descendants
/// resolve against.
pub(super) fn apply(node: &mut Node, ancestors: &[Frame], options: &BemOptions) -> BemData {
    let data = expand_class_names(node);
    expand_short_notation(node, ancestors, &data, options);
    data
}

/// Split `block_mod` into `block _mod` so modifiers can find their block.
fn expand_class_names(node: &mut Node) -> BemData {
    let mut data = BemData::parse(&class_value(node));

    let mut class_names = Vec::new();
    for class in &data.class_names {
        match class.find('_') {
            Some(ix) if ix > 0 && !class.starts_with('-') => {
                class_names.push(class[..ix].to_string());
                class_names.push(class[ix..].to_string());
            }
            _ => class_names.push(class.clone()),
        }
    }

    if !class_names.is_empty() {
        data.class_names = unique(class_names);
        data.block = find_block_name(&data.class_names);
        update_class(node, data.class_names.join(" "));
    }

    data
}

fn expand_short_notation(
    node: &mut Node,
    ancestors: &[Frame],
    data: &BemData,
    options: &BemOptions,
) {
    let mut class_names = Vec::new();

    for original in &data.class_names {
        let mut class = original.as_str();
        let mut prefix = String::new();

        if let Some(caps) = ELEMENT_RE.captures(class) {
            let depth = caps[1].len();
            let block = block_name(ancestors, data, depth);
            prefix = format!("{}{}{}", block, options.element, &caps[2]);
            class_names.push(prefix.clone());
            class = &class[caps[0].len()..];
        }

        if let Some(caps) = MODIFIER_RE.captures(class) {
            if prefix.is_empty() {
                prefix = block_name(ancestors, data, caps[1].len());
                class_names.push(prefix.clone());
            }
            class_names.push(format!("{prefix}{}{}", options.modifier, &caps[2]));
            class = &class[caps[0].len()..];
        }

        if class == original {
            class_names.push(original.clone());
        }
    }

    let class_names = unique(class_names);
    if !class_names.is_empty() {
        update_class(node, class_names.join(" "));
    }
}

/// Block name `depth` levels up the path, where the path ends with the
/// current node. Falls back to any block closer to the root.
fn block_name(ancestors: &[Frame], current: &BemData, depth: usize) -> String {
    let path_len = ancestors.len() + 1;
    let start = path_len.saturating_sub(depth);

    (0..=start)
        .rev()
        .find_map(|ix| {
            let data = if ix == ancestors.len() {
                Some(current)
            } else {
                ancestors.get(ix).and_then(|frame| frame.bem.as_ref())
            };
            data.and_then(|d| d.block.clone())
        })
        .unwrap_or_default()
}

/// First class that looks like a block, preferring `b-name` prefixes and
/// stopping at the first element or modifier.
fn find_block_name(class_names: &[String]) -> Option<String> {
    find_before_bem(class_names, &BLOCK_WITH_DASH_RE)
        .or_else(|| find_before_bem(class_names, &BLOCK_RE))
}

fn find_before_bem(class_names: &[String], re: &Regex) -> Option<String> {
    for class in class_names {
        if ELEMENT_RE.is_match(class) || MODIFIER_RE.is_match(class) {
            break;
        }
        if re.is_match(class) {
            return Some(class.clone());
        }
    }
    None
}

fn class_value(node: &Node) -> String {
    node.find_attribute("class")
        .filter(|attr| attr.value.is_some())
        .map(|attr| attr.value_text())
        .unwrap_or_default()
}

fn update_class(node: &mut Node, value: String) {
    if let Some(attr) = node.find_attribute_mut("class") {
        attr.value = Some(vec![Value::Text(value)]);
    }
}

fn unique(items: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !item.is_empty() && !result.contains(&item) {
            result.push(item);
        }
    }
    result
}
