//! Statement tree to node tree conversion
//!
//! Unrolls repeaters into sibling copies, resolves `$` numbering and `$#`
//! placeholders, substitutes `${variable}` references and distributes the
//! replacement text.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

use super::config::{DEFAULT_MAX_REPEAT, ExpandConfig, ReplacementText};
use super::node::{Abbreviation, Attribute, Field, Node, Repeat, Value, ValueType};
use super::parser::{Statement, TokenAttribute, TokenElement, TokenGroup};
use super::token::{BracketContext, RepeaterNumber, RepeaterToken, Token, TokenKind};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((https?:|ftp:|file:)?//|(www|ftp)\.)[^ ]*$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.%+-]+@[\w-]+\.[\w.-]+$").unwrap());
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+:").unwrap());

/// Inputs of the conversion step
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions<'a> {
    pub text: Option<&'a ReplacementText>,
    pub variables: Option<&'a IndexMap<String, String>>,
    pub max_repeat: usize,
    /// Generate `href` for a link receiving URL-like text
    pub href: bool,
}

impl Default for ConvertOptions<'_> {
    fn default() -> Self {
        Self {
            text: None,
            variables: None,
            max_repeat: DEFAULT_MAX_REPEAT,
            href: false,
        }
    }
}

impl<'a> ConvertOptions<'a> {
    pub fn from_config(config: &'a ExpandConfig) -> Self {
        Self {
            text: config.text.as_ref(),
            variables: Some(&config.variables),
            max_repeat: config.max_repeat,
            href: config.options.href,
        }
    }
}

/// Active repeater chain, innermost first. Each iteration gets its own link
/// so nested lookups never observe a later iteration.
#[derive(Debug, Clone, Copy)]
struct RepeaterContext<'a> {
    repeat: Repeat,
    parent: Option<&'a RepeaterContext<'a>>,
}

impl<'a> RepeaterContext<'a> {
    fn closest_implicit(ctx: Option<&'a RepeaterContext<'a>>) -> Option<Repeat> {
        let mut current = ctx;
        while let Some(link) = current {
            if link.repeat.implicit {
                return Some(link.repeat);
            }
            current = link.parent;
        }
        None
    }

    /// Climb `levels` links up, stopping at the outermost one. Returns `None`
    /// when no climbing happened.
    fn ancestor(&self, levels: usize) -> Option<Repeat> {
        let mut current = self;
        let mut climbed = 0;
        while climbed < levels {
            match current.parent {
                Some(parent) => {
                    current = parent;
                    climbed += 1;
                }
                None => break,
            }
        }
        (climbed > 0).then_some(current.repeat)
    }
}

struct Converter<'a> {
    options: ConvertOptions<'a>,
    /// Non-blank replacement items
    clean_text: Vec<&'a str>,
    /// Text landed somewhere; no implicit injection needed any more
    inserted: bool,
    /// Replacement text was read at least once
    text_consumed: bool,
    guard: usize,
}

/// Convert a parsed statement tree into the node tree.
pub fn convert(group: &TokenGroup, options: ConvertOptions<'_>) -> Abbreviation {
    let clean_text = match options.text {
        Some(ReplacementText::List(items)) => items
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(ReplacementText::Single(text)) => vec![text.as_str()],
        None => Vec::new(),
    };

    let mut converter = Converter {
        options,
        clean_text,
        inserted: false,
        text_consumed: false,
        guard: options.max_repeat.max(1),
    };

    let mut children = converter.group(group, None, None);

    if let Some(text) = options.text
        && !converter.text_consumed
        && let Some(last) = children.last_mut()
    {
        let text = match text {
            ReplacementText::Single(text) => text.clone(),
            ReplacementText::List(items) => items.join("\n"),
        };
        let deepest = last.deepest_mut();
        insert_text(deepest, &text);
        if options.href && deepest.name() == Some("a") {
            insert_href(deepest, &text);
        }
    }

    Abbreviation { children }
}

impl<'a> Converter<'a> {
    fn statement(&mut self, statement: &Statement, ctx: Option<&RepeaterContext<'_>>) -> Vec<Node> {
        let token = match statement {
            Statement::Group(group) => group.repeat,
            Statement::Element(element) => element.repeat,
        };

        let Some(RepeaterToken { count, implicit }) = token else {
            return self.single(statement, None, ctx);
        };

        let count = match self.options.text {
            Some(ReplacementText::List(_)) if implicit => self.clean_text.len(),
            _ => count.max(1),
        };

        let mut result = Vec::new();
        for value in 0..count {
            let repeat = Repeat {
                count,
                value,
                implicit,
            };
            let link = RepeaterContext { repeat, parent: ctx };
            let mut items = self.single(statement, Some(repeat), Some(&link));

            if implicit
                && !self.inserted
                && let Some(last) = items.last_mut()
            {
                let text = self.text_at(Some(value));
                insert_text(last.deepest_mut(), &text);
            }

            result.extend(items);

            self.guard = self.guard.saturating_sub(1);
            if self.guard == 0 {
                tracing::debug!("Repeat limit reached, stopping expansion");
                break;
            }
        }

        if implicit {
            self.inserted = true;
        }

        result
    }

    fn single(
        &mut self,
        statement: &Statement,
        repeat: Option<Repeat>,
        ctx: Option<&RepeaterContext<'_>>,
    ) -> Vec<Node> {
        match statement {
            Statement::Group(group) => self.group(group, repeat, ctx),
            Statement::Element(element) => self.element(element, repeat, ctx),
        }
    }

    fn group(
        &mut self,
        group: &TokenGroup,
        repeat: Option<Repeat>,
        ctx: Option<&RepeaterContext<'_>>,
    ) -> Vec<Node> {
        let mut result = Vec::new();
        for child in &group.elements {
            result.extend(self.statement(child, ctx));
        }

        if let Some(repeat) = repeat {
            for node in &mut result {
                node.repeat.get_or_insert(repeat);
            }
        }

        result
    }

    fn element(
        &mut self,
        element: &TokenElement,
        repeat: Option<Repeat>,
        ctx: Option<&RepeaterContext<'_>>,
    ) -> Vec<Node> {
        let mut node = Node {
            name: element.name.as_ref().map(|tokens| self.stringify_name(tokens, ctx)),
            value: element.value.as_ref().map(|tokens| self.stringify_value(tokens, ctx)),
            attributes: None,
            children: Vec::new(),
            repeat,
            self_closing: element.self_close,
        };

        let mut children = Vec::new();
        for child in &element.elements {
            children.extend(self.statement(child, ctx));
        }

        if let Some(attrs) = &element.attributes {
            node.attributes = Some(attrs.iter().map(|attr| self.attribute(attr, ctx)).collect());
        }

        // Plain text node: its children belong to the parent
        if node.name.is_none()
            && node.attributes.is_none()
            && node.value.is_some()
            && !node.has_field()
        {
            let mut result = vec![node];
            result.extend(children);
            return result;
        }

        node.children = children;
        vec![node]
    }

    fn attribute(&mut self, attr: &TokenAttribute, ctx: Option<&RepeaterContext<'_>>) -> Attribute {
        let mut name = attr.name.as_ref().map(|tokens| self.stringify_name(tokens, ctx));
        let mut implied = false;
        let mut boolean = false;

        if let Some(n) = name.as_mut() {
            if let Some(rest) = n.strip_prefix('!') {
                *n = rest.to_string();
                implied = true;
            }
            if let Some(rest) = n.strip_suffix('.') {
                *n = rest.to_string();
                boolean = true;
            }
        }

        let mut value_type = if attr.expression {
            ValueType::Expression
        } else {
            ValueType::Raw
        };

        let value = attr.value.as_ref().map(|tokens| {
            let mut tokens = tokens.as_slice();
            if let Some((first, rest)) = tokens.split_first() {
                if let TokenKind::Quote { single } = first.kind {
                    tokens = rest;
                    if tokens.last().is_some_and(|t| t.is_quote(Some(single))) {
                        tokens = &tokens[..tokens.len() - 1];
                    }
                    value_type = if single {
                        ValueType::SingleQuote
                    } else {
                        ValueType::DoubleQuote
                    };
                } else if first.is_bracket(BracketContext::Expression, Some(true)) {
                    tokens = rest;
                    if tokens
                        .last()
                        .is_some_and(|t| t.is_bracket(BracketContext::Expression, Some(false)))
                    {
                        tokens = &tokens[..tokens.len() - 1];
                    }
                    value_type = ValueType::Expression;
                }
            }
            self.stringify_value(tokens, ctx)
        });

        Attribute {
            name,
            value,
            boolean,
            implied,
            value_type,
            multiple: attr.multiple,
        }
    }

    fn stringify_name(&mut self, tokens: &[Token], ctx: Option<&RepeaterContext<'_>>) -> String {
        tokens.iter().map(|token| self.stringify(token, ctx)).collect()
    }

    /// Value pieces, keeping indexed fields for the output writer.
    fn stringify_value(
        &mut self,
        tokens: &[Token],
        ctx: Option<&RepeaterContext<'_>>,
    ) -> Vec<Value> {
        let mut result = Vec::new();
        let mut text = String::new();

        for token in tokens {
            match &token.kind {
                TokenKind::Field {
                    index: Some(index),
                    name,
                } => {
                    if !text.is_empty() {
                        result.push(Value::Text(std::mem::take(&mut text)));
                    }
                    result.push(Value::Field(Field {
                        index: *index,
                        name: name.clone(),
                    }));
                }
                _ => text.push_str(&self.stringify(token, ctx)),
            }
        }

        if !text.is_empty() {
            result.push(Value::Text(text));
        }
        result
    }

    fn stringify(&mut self, token: &Token, ctx: Option<&RepeaterContext<'_>>) -> String {
        match &token.kind {
            TokenKind::Literal(value) => value.clone(),
            TokenKind::Quote { single: true } => "'".to_string(),
            TokenKind::Quote { single: false } => "\"".to_string(),
            TokenKind::Bracket { context, open } => {
                let ch = match (context, open) {
                    (BracketContext::Group, true) => '(',
                    (BracketContext::Group, false) => ')',
                    (BracketContext::Attribute, true) => '[',
                    (BracketContext::Attribute, false) => ']',
                    (BracketContext::Expression, true) => '{',
                    (BracketContext::Expression, false) => '}',
                };
                ch.to_string()
            }
            TokenKind::Operator(op) => op.as_char().to_string(),
            TokenKind::WhiteSpace(value) => value.clone(),
            TokenKind::Repeater(repeat) => {
                if repeat.implicit {
                    "*".to_string()
                } else {
                    format!("*{}", repeat.count)
                }
            }
            TokenKind::Field { index, name } => match index {
                Some(index) if name.is_empty() => format!("${{{index}}}"),
                Some(index) => format!("${{{index}:{name}}}"),
                None => self.variable(name),
            },
            TokenKind::RepeaterPlaceholder => {
                let repeat = RepeaterContext::closest_implicit(ctx);
                self.inserted = true;
                self.text_at(repeat.map(|r| r.value))
            }
            TokenKind::RepeaterNumber(number) => repeater_number(number, ctx),
        }
    }

    fn variable(&self, name: &str) -> String {
        self.options
            .variables
            .and_then(|vars| vars.get(name))
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Replacement text for iteration `pos`, or all of it.
    fn text_at(&mut self, pos: Option<usize>) -> String {
        self.text_consumed = true;
        match self.options.text {
            Some(ReplacementText::List(items)) => match pos {
                Some(pos) => self
                    .clean_text
                    .get(pos)
                    .copied()
                    .or_else(|| items.get(pos).map(String::as_str))
                    .unwrap_or_default()
                    .to_string(),
                None => items.join("\n"),
            },
            Some(ReplacementText::Single(text)) => text.clone(),
            None => String::new(),
        }
    }
}

fn repeater_number(number: &RepeaterNumber, ctx: Option<&RepeaterContext<'_>>) -> String {
    let value = match ctx {
        Some(link) => {
            let repeat = link.repeat;
            // Bases up to usize::MAX are accepted, so numbers saturate
            let mut value = if number.reverse {
                let offset = repeat.count.saturating_sub(repeat.value + 1);
                number.base.saturating_add(offset)
            } else {
                number.base.saturating_add(repeat.value)
            };
            if number.parent > 0
                && let Some(parent) = link.ancestor(number.parent)
            {
                value = value.saturating_add(repeat.count.saturating_mul(parent.value));
            }
            value
        }
        None => 1,
    };

    format!("{value:0>width$}", width = number.size)
}

fn insert_text(node: &mut Node, text: &str) {
    match node.value.as_mut() {
        Some(values) => match values.last_mut() {
            Some(Value::Text(last)) => last.push_str(text),
            _ => values.push(Value::text(text)),
        },
        None => node.value = Some(vec![Value::text(text)]),
    }
}

fn insert_href(node: &mut Node, text: &str) {
    let href = if URL_RE.is_match(text) {
        if SCHEME_RE.is_match(text) || text.starts_with("//") {
            text.to_string()
        } else {
            format!("http://{text}")
        }
    } else if EMAIL_RE.is_match(text) {
        format!("mailto:{text}")
    } else {
        return;
    };

    match node.find_attribute_mut("href") {
        Some(attr) if !attr.has_value() => attr.value = Some(vec![Value::Text(href)]),
        Some(_) => {}
        None => node.attributes.get_or_insert_with(Vec::new).push(Attribute {
            name: Some("href".to_string()),
            value: Some(vec![Value::Text(href)]),
            value_type: ValueType::DoubleQuote,
            ..Default::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abbreviation::parser::{ParserOptions, parse};
    use crate::abbreviation::tokenizer::tokenize;

    fn convert_str(source: &str, options: ConvertOptions<'_>) -> Abbreviation {
        let tokens = tokenize(source).unwrap();
        convert(&parse(&tokens, ParserOptions::default()).unwrap(), options)
    }

    fn text_of(node: &Node) -> String {
        node.value_text()
    }

    #[test]
    fn test_repeater_unrolls_siblings() {
        let abbr = convert_str("div*3>span", ConvertOptions::default());
        assert_eq!(abbr.children.len(), 3);
        for (i, div) in abbr.children.iter().enumerate() {
            assert_eq!(div.children.len(), 1);
            assert_eq!(div.repeat.map(|r| r.value), Some(i));
        }
    }

    #[test]
    fn test_numbering() {
        let abbr = convert_str("li*3{$}", ConvertOptions::default());
        let texts: Vec<_> = abbr.children.iter().map(text_of).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);

        let abbr = convert_str("li*3{$$@-}", ConvertOptions::default());
        let texts: Vec<_> = abbr.children.iter().map(text_of).collect();
        assert_eq!(texts, vec!["03", "02", "01"]);

        let abbr = convert_str("li*2{$@3}", ConvertOptions::default());
        let texts: Vec<_> = abbr.children.iter().map(text_of).collect();
        assert_eq!(texts, vec!["3", "4"]);
    }

    #[test]
    fn test_numbering_with_parent_repeater() {
        let abbr = convert_str("tr*2>td*3{$@^}", ConvertOptions::default());
        let texts: Vec<_> = abbr
            .children
            .iter()
            .flat_map(|tr| tr.children.iter().map(text_of))
            .collect();
        assert_eq!(texts, vec!["1", "2", "3", "4", "5", "6"]);
    }

    #[test]
    fn test_numbering_saturates_at_max_base() {
        let source = format!("li*2{{$@{}}}", usize::MAX);
        let abbr = convert_str(&source, ConvertOptions::default());
        let texts: Vec<_> = abbr.children.iter().map(text_of).collect();
        assert_eq!(texts, vec![usize::MAX.to_string(), usize::MAX.to_string()]);

        let source = format!("li*2{{$@-{}}}", usize::MAX);
        let abbr = convert_str(&source, ConvertOptions::default());
        assert_eq!(text_of(&abbr.children[1]), usize::MAX.to_string());

        let source = format!("tr*2>td*2{{$@^{}}}", usize::MAX - 1);
        let abbr = convert_str(&source, ConvertOptions::default());
        let texts: Vec<_> = abbr
            .children
            .iter()
            .flat_map(|tr| tr.children.iter().map(text_of))
            .collect();
        let max = usize::MAX.to_string();
        assert_eq!(texts, vec![(usize::MAX - 1).to_string(), max.clone(), max.clone(), max]);
    }

    #[test]
    fn test_number_outside_repeater_is_one() {
        let abbr = convert_str("h$", ConvertOptions::default());
        assert_eq!(abbr.children[0].name(), Some("h1"));
    }

    #[test]
    fn test_repeat_guard() {
        let options = ConvertOptions {
            max_repeat: 5,
            ..Default::default()
        };
        let abbr = convert_str("div*1000", options);
        assert_eq!(abbr.children.len(), 5);

        let abbr = convert_str("div*100000000", ConvertOptions::default());
        assert_eq!(abbr.children.len(), DEFAULT_MAX_REPEAT);
    }

    #[test]
    fn test_implicit_repeat_over_text_list() {
        let text = ReplacementText::List(vec!["one".into(), " ".into(), "two".into()]);
        let options = ConvertOptions {
            text: Some(&text),
            ..Default::default()
        };
        let abbr = convert_str("ul>li*>a", options);
        let items = &abbr.children[0].children;
        assert_eq!(items.len(), 2);
        assert_eq!(text_of(&items[0].children[0]), "one");
        assert_eq!(text_of(&items[1].children[0]), "two");
    }

    #[test]
    fn test_placeholder_controls_text_location() {
        let text = ReplacementText::List(vec!["a".into(), "b".into()]);
        let options = ConvertOptions {
            text: Some(&text),
            ..Default::default()
        };
        let abbr = convert_str("li*[title=$#]>span", options);
        assert_eq!(abbr.children.len(), 2);
        assert_eq!(abbr.children[1].attributes()[0].value_text(), "b");
        assert!(abbr.children[1].children[0].value.is_none());
    }

    #[test]
    fn test_unconsumed_text_goes_to_deepest_node() {
        let text = ReplacementText::Single("www.example.com".into());
        let options = ConvertOptions {
            text: Some(&text),
            href: true,
            ..Default::default()
        };
        let abbr = convert_str("p>a", options);
        let link = &abbr.children[0].children[0];
        assert_eq!(text_of(link), "www.example.com");
        assert_eq!(
            link.find_attribute("href").map(Attribute::value_text),
            Some("http://www.example.com".to_string())
        );

        let text = ReplacementText::Single("me@example.com".into());
        let options = ConvertOptions {
            text: Some(&text),
            href: true,
            ..Default::default()
        };
        let abbr = convert_str("a[href]", options);
        assert_eq!(
            abbr.children[0].find_attribute("href").map(Attribute::value_text),
            Some("mailto:me@example.com".to_string())
        );
    }

    #[test]
    fn test_text_only_node_promotes_children() {
        let abbr = convert_str("{hello}>span", ConvertOptions::default());
        assert_eq!(abbr.children.len(), 2);
        assert!(abbr.children[0].children.is_empty());
        assert_eq!(abbr.children[1].name(), Some("span"));
    }

    #[test]
    fn test_attribute_flags_and_quotes() {
        let abbr = convert_str(
            "input[!value disabled. title='x' data={y}]",
            ConvertOptions::default(),
        );
        let attrs = abbr.children[0].attributes();
        assert!(attrs[0].implied);
        assert_eq!(attrs[0].name.as_deref(), Some("value"));
        assert!(attrs[1].boolean);
        assert_eq!(attrs[1].name.as_deref(), Some("disabled"));
        assert_eq!(attrs[2].value_type, ValueType::SingleQuote);
        assert_eq!(attrs[2].value_text(), "x");
        assert_eq!(attrs[3].value_type, ValueType::Expression);
        assert_eq!(attrs[3].value_text(), "y");
    }

    #[test]
    fn test_variables_and_fields() {
        let vars = IndexMap::from([("lang".to_string(), "fr".to_string())]);
        let options = ConvertOptions {
            variables: Some(&vars),
            ..Default::default()
        };
        let abbr = convert_str("html[lang=${lang} dir=${dir}]{${1:title}}", options);
        let node = &abbr.children[0];
        assert_eq!(node.attributes()[0].value_text(), "fr");
        assert_eq!(node.attributes()[1].value_text(), "dir");
        assert!(node.has_field());
    }

    #[test]
    fn test_group_repeat_attached_to_items() {
        let abbr = convert_str("(dt+dd)*2", ConvertOptions::default());
        assert_eq!(abbr.children.len(), 4);
        assert_eq!(abbr.children[3].repeat.map(|r| r.value), Some(1));
    }
}
