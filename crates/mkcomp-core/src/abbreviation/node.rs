//! Abbreviation node tree produced by the converter
//!
//! This is the durable tree: snippet resolution splices into it, the
//! transformer rewrites names and attributes in place, and the output writers
//! only read it.

/// Root of a converted abbreviation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Abbreviation {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: Option<String>,
    pub value: Option<Vec<Value>>,
    pub attributes: Option<Vec<Attribute>>,
    pub children: Vec<Node>,
    pub repeat: Option<Repeat>,
    pub self_closing: bool,
}

impl Node {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        self.attributes.as_deref().unwrap_or_default()
    }

    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Nameless node without attributes: plain text or a wrapper snippet.
    pub fn is_snippet(&self) -> bool {
        self.name.is_none() && self.attributes.is_none()
    }

    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().iter().find(|a| a.name.as_deref() == Some(name))
    }

    pub fn find_attribute_mut(&mut self, name: &str) -> Option<&mut Attribute> {
        self.attributes
            .as_mut()?
            .iter_mut()
            .find(|a| a.name.as_deref() == Some(name))
    }

    /// The last node in the deepest descent through each last child.
    pub fn deepest_mut(&mut self) -> &mut Node {
        let mut node = self;
        while !node.children.is_empty() {
            let last = node.children.len() - 1;
            node = &mut node.children[last];
        }
        node
    }

    /// Whether the value contains an indexed field, i.e. a snippet placeholder.
    pub fn has_field(&self) -> bool {
        self.value
            .as_ref()
            .is_some_and(|v| v.iter().any(|t| matches!(t, Value::Field(_))))
    }

    /// Plain text of the value, fields rendered by their name.
    pub fn value_text(&self) -> String {
        self.value.as_deref().map(values_to_string).unwrap_or_default()
    }
}

/// Piece of a node or attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Field(Field),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }
}

/// Indexed placeholder kept for the host editor, `${1:name}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueType {
    #[default]
    Raw,
    SingleQuote,
    DoubleQuote,
    Expression,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribute {
    pub name: Option<String>,
    pub value: Option<Vec<Value>>,
    /// `[checked.]`
    pub boolean: bool,
    /// `[!href]`: dropped from output unless a value shows up
    pub implied: bool,
    pub value_type: ValueType,
    /// `..foo` in JSX
    pub multiple: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(vec![Value::text(value)]),
            ..Default::default()
        }
    }

    pub fn has_value(&self) -> bool {
        self.value.as_ref().is_some_and(|v| !v.is_empty())
    }

    pub fn value_text(&self) -> String {
        self.value.as_deref().map(values_to_string).unwrap_or_default()
    }
}

/// Current iteration of a repeated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub count: usize,
    /// Zero-based iteration index
    pub value: usize,
    pub implicit: bool,
}

/// Concatenate values, rendering fields as their placeholder name.
pub fn values_to_string(values: &[Value]) -> String {
    values
        .iter()
        .map(|v| match v {
            Value::Text(text) => text.as_str(),
            Value::Field(field) => field.name.as_str(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deepest_follows_last_children() {
        let mut root = Node::named("ul");
        root.children.push(Node::named("li"));
        let mut second = Node::named("li");
        second.children.push(Node::named("a"));
        root.children.push(second);

        assert_eq!(root.deepest_mut().name(), Some("a"));
    }

    #[test]
    fn test_has_field_ignores_plain_text() {
        let mut node = Node {
            value: Some(vec![Value::text("hello")]),
            ..Default::default()
        };
        assert!(node.is_snippet());
        assert!(!node.has_field());

        node.value = Some(vec![Value::Field(Field {
            index: 0,
            name: String::new(),
        })]);
        assert!(node.has_field());
    }
}
