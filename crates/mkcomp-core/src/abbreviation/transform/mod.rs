//! Node rewrites applied after snippet resolution
//!
//! The tree is walked depth-first and each node is rewritten before its
//! children are visited, so a child can read its parent's resolved tag name
//! (`ul>.item` needs `ul` before `.item` becomes `li`). Per node:
//!
//! 1. implicit tag name for nameless elements with attributes
//! 2. duplicate attribute merging
//! 3. `lorem` placeholder text
//! 4. XSL `select` cleanup (xsl syntax only)
//! 5. empty `for`/`id` removal around labelled inputs
//! 6. BEM class expansion (when enabled)

mod bem;
mod lorem;

pub use bem::BemData;
pub use lorem::{Vocabulary, paragraph};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::{ExpandConfig, Syntax};
use super::node::{Abbreviation, Attribute, Node, Repeat, Value};

/// What a node exposes to its descendants during the walk
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub name: Option<String>,
    pub repeat: Option<Repeat>,
    pub bem: Option<BemData>,
}

/// Apply every rewrite to the tree in place.
pub fn transform(abbr: &mut Abbreviation, config: &ExpandConfig) {
    let seed = config.lorem_seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ancestors = Vec::new();

    for child in &mut abbr.children {
        walk(child, &mut ancestors, config, &mut rng);
    }
}

fn walk(node: &mut Node, ancestors: &mut Vec<Frame>, config: &ExpandConfig, rng: &mut ChaCha8Rng) {
    implicit_tag(node, ancestors, config);
    merge_attributes(node, config);
    lorem::apply(node, ancestors, config, rng);
    if config.syntax == Syntax::Xsl {
        xsl(node);
    }
    label(node);

    let bem = config
        .options
        .bem
        .enabled
        .then(|| bem::apply(node, ancestors, &config.options.bem));

    ancestors.push(Frame {
        name: node.name.clone(),
        repeat: node.repeat,
        bem,
    });
    for child in &mut node.children {
        walk(child, ancestors, config, rng);
    }
    ancestors.pop();
}

fn implicit_tag(node: &mut Node, ancestors: &[Frame], config: &ExpandConfig) {
    if node.name.is_none() && node.attributes.is_some() {
        resolve_implicit_tag(node, ancestors, config);
    }
}

/// Pick a tag name from the closest named ancestor.
pub(crate) fn resolve_implicit_tag(node: &mut Node, ancestors: &[Frame], config: &ExpandConfig) {
    let parent = ancestors
        .iter()
        .rev()
        .find_map(|frame| frame.name.as_deref())
        .unwrap_or_default()
        .to_lowercase();

    let table = &config.implicit_tags;
    let name = match table.lookup(&parent) {
        Some(child) => child.to_string(),
        None if config.options.is_inline(&parent) => table.inline_fallback.clone(),
        None => table.block_fallback.clone(),
    };
    node.name = Some(name);
}

/// Merge attributes sharing a name. `class` values are joined with a space;
/// for any other name the later declaration wins but keeps the first one's
/// position.
fn merge_attributes(node: &mut Node, config: &ExpandConfig) {
    let Some(attributes) = node.attributes.take() else {
        return;
    };

    let mut merged: Vec<Attribute> = Vec::with_capacity(attributes.len());
    for attr in attributes {
        let existing = attr
            .name
            .as_deref()
            .and_then(|name| merged.iter().position(|a| a.name.as_deref() == Some(name)));

        match existing {
            Some(ix) if attr.name.as_deref() == Some("class") => {
                let prev = &mut merged[ix];
                prev.value = merge_values(prev.value.take(), attr.value, " ");
            }
            Some(ix) => merge_declaration(&mut merged[ix], attr, config.options.reverse_attributes),
            None => merged.push(attr),
        }
    }

    node.attributes = Some(merged);
}

fn merge_values(
    prev: Option<Vec<Value>>,
    next: Option<Vec<Value>>,
    glue: &str,
) -> Option<Vec<Value>> {
    match (prev, next) {
        (Some(mut prev), Some(next)) => {
            if !prev.is_empty() {
                push_value(&mut prev, Value::text(glue));
            }
            for value in next {
                push_value(&mut prev, value);
            }
            Some(prev)
        }
        (prev, next) => prev.or(next),
    }
}

fn push_value(values: &mut Vec<Value>, value: Value) {
    match (values.last_mut(), value) {
        (Some(Value::Text(last)), Value::Text(text)) => last.push_str(&text),
        (_, value) => values.push(value),
    }
}

/// Later declaration overrides the earlier one in place. With reversed
/// attribute order the earlier value is the one kept. The value type always
/// follows the declaration whose value is kept.
fn merge_declaration(dest: &mut Attribute, src: Attribute, reverse: bool) {
    dest.name = src.name;
    if !reverse {
        dest.value = src.value;
        dest.value_type = src.value_type;
    }
    dest.implied |= src.implied;
    dest.boolean |= src.boolean;
    dest.multiple |= src.multiple;
}

/// `select` is redundant once an XSL variable has content.
fn xsl(node: &mut Node) {
    let matches = matches!(node.name(), Some("xsl:variable" | "xsl:with-param"));
    if matches
        && (!node.children.is_empty() || node.value.is_some())
        && let Some(attributes) = node.attributes.as_mut()
    {
        attributes.retain(|attr| attr.name.as_deref() != Some("select"));
    }
}

/// A label wrapping its input needs neither `for` nor the input's `id`.
fn label(node: &mut Node) {
    if node.name() != Some("label") {
        return;
    }

    let Some(input) = find_descendant(node, |n| matches!(n.name(), Some("input" | "textarea")))
    else {
        return;
    };
    if let Some(attributes) = input.attributes.as_mut() {
        attributes.retain(|attr| !(attr.name.as_deref() == Some("id") && is_empty_value(attr)));
    }

    if let Some(attributes) = node.attributes.as_mut() {
        attributes.retain(|attr| !(attr.name.as_deref() == Some("for") && is_empty_value(attr)));
    }
}

fn find_descendant(node: &mut Node, pred: impl Fn(&Node) -> bool + Copy) -> Option<&mut Node> {
    for child in &mut node.children {
        if pred(child) {
            return Some(child);
        }
        if let Some(found) = find_descendant(child, pred) {
            return Some(found);
        }
    }
    None
}

/// No value, or only empty text and unnamed fields.
fn is_empty_value(attr: &Attribute) -> bool {
    attr.value.as_deref().is_none_or(|values| {
        values.iter().all(|v| match v {
            Value::Text(text) => text.is_empty(),
            Value::Field(field) => field.name.is_empty(),
        })
    })
}
