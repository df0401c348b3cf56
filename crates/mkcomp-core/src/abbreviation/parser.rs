//! Recursive-descent parser over the abbreviation token list
//!
//! Grammar:
//!
//! ```text
//! Statements := (Element | Group) (ChildOp | SiblingOp | ClimbOp+)? ...
//! Group      := '(' Statements ')' Repeater?
//! Element    := Name? (Repeater | Text | ShortAttr | AttrSet)* ('/' Repeater?)?
//! AttrSet    := '[' (Attribute | WhiteSpace)* ']'
//! Attribute  := Quoted | Literal ('=' (Quoted | Literal))?
//! ShortAttr  := ('.' | '#')+ (Text | Literal)?
//! ```
//!
//! Precedence comes from the left-to-right stack walk in [`Parser::statements`]:
//! `>` descends into the element just parsed, `+` stays at the same level and
//! each `^` climbs one level back up.

use super::error::{AbbreviationError, AbbreviationErrorKind};
use super::token::{BracketContext, OperatorKind, RepeaterToken, Token, TokenKind};

/// Options affecting how tokens are grouped into statements
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Allow `Foo.Bar` component names and `{expr}` after `.`/`#`
    pub jsx: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Group(TokenGroup),
    Element(TokenElement),
}

impl Statement {
    fn elements_mut(&mut self) -> &mut Vec<Statement> {
        match self {
            Statement::Group(group) => &mut group.elements,
            Statement::Element(element) => &mut element.elements,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenGroup {
    pub elements: Vec<Statement>,
    pub repeat: Option<RepeaterToken>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenElement {
    pub name: Option<Vec<Token>>,
    pub attributes: Option<Vec<TokenAttribute>>,
    pub value: Option<Vec<Token>>,
    pub repeat: Option<RepeaterToken>,
    pub self_close: bool,
    pub elements: Vec<Statement>,
}

impl TokenElement {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.value.is_none() && self.attributes.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenAttribute {
    pub name: Option<Vec<Token>>,
    pub value: Option<Vec<Token>>,
    /// Value came from `{...}` after a JSX shorthand
    pub expression: bool,
    /// Shorthand operator was repeated (`..foo`)
    pub multiple: bool,
}

/// Parse a token list into a statement tree.
pub fn parse(tokens: &[Token], options: ParserOptions) -> Result<TokenGroup, AbbreviationError> {
    let mut parser = Parser::new(tokens, options);
    let result = parser.statements()?;
    if parser.readable() {
        return Err(parser.error(
            AbbreviationErrorKind::UnexpectedCharacter,
            "Unexpected character",
        ));
    }
    Ok(result)
}

struct Parser<'a> {
    tokens: &'a [Token],
    options: ParserOptions,
    /// Start of the last consumed span, see [`Parser::slice`]
    start: usize,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], options: ParserOptions) -> Self {
        Self {
            tokens,
            options,
            start: 0,
            pos: 0,
        }
    }

    fn readable(&self) -> bool {
        self.pos < self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn consume(&mut self, test: impl Fn(&Token) -> bool) -> bool {
        match self.peek() {
            Some(token) if test(token) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn slice(&self, from: usize, to: usize) -> Vec<Token> {
        self.tokens[from..to.min(self.tokens.len())].to_vec()
    }

    fn error(&self, kind: AbbreviationErrorKind, message: impl Into<String>) -> AbbreviationError {
        self.error_at(kind, message, self.peek())
    }

    fn error_at(
        &self,
        kind: AbbreviationErrorKind,
        message: impl Into<String>,
        token: Option<&Token>,
    ) -> AbbreviationError {
        AbbreviationError::new(kind, message, token.map(|t| t.start))
    }

    /// Statement list with `>`, `+` and `^` handling.
    ///
    /// The stack holds the root group followed by every element we descended
    /// into; a node is attached to its parent when we climb out of it.
    fn statements(&mut self) -> Result<TokenGroup, AbbreviationError> {
        let mut stack = vec![Statement::Group(TokenGroup::default())];

        while self.readable() {
            let node = match self.element()? {
                Some(element) => Statement::Element(element),
                None => match self.group()? {
                    Some(group) => Statement::Group(group),
                    None => break,
                },
            };

            if self.consume(|t| t.is_operator(OperatorKind::Child)) {
                stack.push(node);
            } else {
                push_child(&mut stack, node);
                if self.consume(|t| t.is_operator(OperatorKind::Sibling)) {
                    continue;
                }
                while self.consume(|t| t.is_operator(OperatorKind::Climb)) {
                    climb(&mut stack);
                }
            }
        }

        while stack.len() > 1 {
            climb(&mut stack);
        }

        match stack.pop() {
            Some(Statement::Group(group)) => Ok(group),
            _ => Err(AbbreviationError::new(
                AbbreviationErrorKind::UnexpectedToken,
                "Invalid statement tree",
                None,
            )),
        }
    }

    fn group(&mut self) -> Result<Option<TokenGroup>, AbbreviationError> {
        let open = self.peek();
        if !self.consume(|t| t.is_bracket(BracketContext::Group, Some(true))) {
            return Ok(None);
        }

        let mut result = self.statements()?;
        match self.next() {
            Some(token) if token.is_bracket(BracketContext::Group, Some(false)) => {
                result.repeat = self.repeater();
                Ok(Some(result))
            }
            Some(token) => Err(self.error_at(
                AbbreviationErrorKind::UnexpectedCharacter,
                "Unexpected character",
                Some(token),
            )),
            None => Err(self.error_at(
                AbbreviationErrorKind::UnclosedGroup,
                "Unclosed group",
                open,
            )),
        }
    }

    fn element(&mut self) -> Result<Option<TokenElement>, AbbreviationError> {
        let mut elem = TokenElement::default();

        if self.element_name() {
            elem.name = Some(self.slice(self.start, self.pos));
        }

        while self.readable() {
            if elem.repeat.is_none()
                && !elem.is_empty()
                && self.peek().is_some_and(Token::is_repeater)
            {
                elem.repeat = self.repeater();
            } else if elem.value.is_none() && self.text()? {
                elem.value = Some(self.text_tokens());
            } else if let Some(attrs) = self.short_attribute(OperatorKind::Id)? {
                push_attributes(&mut elem, vec![attrs]);
            } else if let Some(attrs) = self.short_attribute(OperatorKind::Class)? {
                push_attributes(&mut elem, vec![attrs]);
            } else if let Some(attrs) = self.attribute_set()? {
                push_attributes(&mut elem, attrs);
            } else {
                if !elem.is_empty() && self.consume(|t| t.is_operator(OperatorKind::Close)) {
                    elem.self_close = true;
                    if elem.repeat.is_none() {
                        elem.repeat = self.repeater();
                    }
                }
                break;
            }
        }

        Ok(if elem.is_empty() { None } else { Some(elem) })
    }

    fn attribute_set(&mut self) -> Result<Option<Vec<TokenAttribute>>, AbbreviationError> {
        let open = self.peek();
        if !self.consume(|t| t.is_bracket(BracketContext::Attribute, Some(true))) {
            return Ok(None);
        }

        let mut attributes = Vec::new();
        loop {
            if !self.readable() {
                return Err(self.error_at(
                    AbbreviationErrorKind::UnclosedAttributeSet,
                    "Unclosed attribute set",
                    open,
                ));
            }

            if let Some(attr) = self.attribute()? {
                attributes.push(attr);
            } else if self.consume(|t| t.is_bracket(BracketContext::Attribute, Some(false))) {
                break;
            } else if !self.consume(Token::is_whitespace) {
                let kind = self.peek().map(Token::kind_name).unwrap_or("End");
                return Err(self.error(
                    AbbreviationErrorKind::UnexpectedToken,
                    format!("Unexpected \"{kind}\" token"),
                ));
            }
        }

        Ok(Some(attributes))
    }

    fn short_attribute(
        &mut self,
        kind: OperatorKind,
    ) -> Result<Option<TokenAttribute>, AbbreviationError> {
        if !self.peek().is_some_and(|t| t.is_operator(kind)) {
            return Ok(None);
        }

        let mut count = 0;
        while self.consume(|t| t.is_operator(kind)) {
            count += 1;
        }

        let name = if kind == OperatorKind::Class { "class" } else { "id" };
        let mut attr = TokenAttribute {
            name: Some(vec![Token::literal(name)]),
            multiple: count > 1,
            ..Default::default()
        };

        if self.options.jsx && self.text()? {
            attr.value = Some(self.text_tokens());
            attr.expression = true;
        } else if self.literal(false) {
            attr.value = Some(self.slice(self.start, self.pos));
        }

        Ok(Some(attr))
    }

    fn attribute(&mut self) -> Result<Option<TokenAttribute>, AbbreviationError> {
        if self.quoted()? {
            return Ok(Some(TokenAttribute {
                value: Some(self.slice(self.start, self.pos)),
                ..Default::default()
            }));
        }

        if self.literal(true) {
            let name = self.slice(self.start, self.pos);
            let mut value = None;
            if self.consume(|t| t.is_operator(OperatorKind::Equal))
                && (self.quoted()? || self.literal(true))
            {
                value = Some(self.slice(self.start, self.pos));
            }

            return Ok(Some(TokenAttribute {
                name: Some(name),
                value,
                ..Default::default()
            }));
        }

        Ok(None)
    }

    fn repeater(&mut self) -> Option<RepeaterToken> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Repeater(repeat)) => {
                self.pos += 1;
                Some(*repeat)
            }
            _ => None,
        }
    }

    /// Quoted value including both quote tokens.
    fn quoted(&mut self) -> Result<bool, AbbreviationError> {
        let start = self.pos;
        let quote = match self.peek() {
            Some(token) => match token.kind {
                TokenKind::Quote { single } => (token, single),
                _ => return Ok(false),
            },
            None => return Ok(false),
        };

        self.pos += 1;
        while let Some(token) = self.next() {
            if token.is_quote(Some(quote.1)) {
                self.start = start;
                return Ok(true);
            }
        }

        Err(self.error_at(AbbreviationErrorKind::UnclosedQuote, "Unclosed quote", Some(quote.0)))
    }

    /// Run of value tokens. With `allow_brackets`, balanced brackets are
    /// included and everything inside `{...}` is taken as-is.
    fn literal(&mut self, allow_brackets: bool) -> bool {
        let start = self.pos;
        let mut depth = [0usize; 3];

        while let Some(token) = self.peek() {
            if depth[2] > 0 {
                if let TokenKind::Bracket {
                    context: BracketContext::Expression,
                    open,
                } = token.kind
                {
                    if open {
                        depth[2] += 1;
                    } else {
                        depth[2] -= 1;
                    }
                }
            } else if token.is_quote(None)
                || token.is_any_operator()
                || token.is_whitespace()
                || token.is_repeater()
            {
                break;
            } else if let TokenKind::Bracket { context, open } = token.kind {
                if !allow_brackets {
                    break;
                }
                let slot = &mut depth[bracket_slot(context)];
                if open {
                    *slot += 1;
                } else if *slot == 0 {
                    // Unmatched closer belongs to the parent construct
                    break;
                } else {
                    *slot -= 1;
                }
            }

            self.pos += 1;
        }

        if start != self.pos {
            self.start = start;
            return true;
        }
        false
    }

    fn element_name(&mut self) -> bool {
        let start = self.pos;

        if self.options.jsx && self.consume(Token::is_capitalized_literal) {
            // `Foo.Bar.Baz` namespaced component names
            while self.readable() {
                let pos = self.pos;
                if !self.consume(|t| t.is_operator(OperatorKind::Class))
                    || !self.consume(Token::is_capitalized_literal)
                {
                    self.pos = pos;
                    break;
                }
            }
        }

        while self.consume(Token::is_element_name) {}

        if self.pos != start {
            self.start = start;
            return true;
        }
        false
    }

    /// `{...}` text, balancing nested expression brackets.
    fn text(&mut self) -> Result<bool, AbbreviationError> {
        let start = self.pos;
        let open = self.peek();
        if !self.consume(|t| t.is_bracket(BracketContext::Expression, Some(true))) {
            return Ok(false);
        }

        let mut depth = 0usize;
        loop {
            let Some(token) = self.next() else {
                return Err(self.error_at(
                    AbbreviationErrorKind::UnclosedText,
                    "Unclosed text",
                    open,
                ));
            };
            if let TokenKind::Bracket {
                context: BracketContext::Expression,
                open,
            } = token.kind
            {
                if open {
                    depth += 1;
                } else if depth == 0 {
                    break;
                } else {
                    depth -= 1;
                }
            }
        }

        self.start = start;
        Ok(true)
    }

    /// Tokens of the last [`Parser::text`] without the outer braces.
    fn text_tokens(&self) -> Vec<Token> {
        let mut from = self.start;
        let mut to = self.pos;

        let expression = |index: usize, open: bool| {
            self.tokens
                .get(index)
                .is_some_and(|t| t.is_bracket(BracketContext::Expression, Some(open)))
        };

        if expression(from, true) {
            from += 1;
        }
        if to > from && expression(to - 1, false) {
            to -= 1;
        }

        self.slice(from, to)
    }
}

fn bracket_slot(context: BracketContext) -> usize {
    match context {
        BracketContext::Group => 0,
        BracketContext::Attribute => 1,
        BracketContext::Expression => 2,
    }
}

fn push_attributes(elem: &mut TokenElement, attrs: Vec<TokenAttribute>) {
    elem.attributes.get_or_insert_with(Vec::new).extend(attrs);
}

fn push_child(stack: &mut [Statement], node: Statement) {
    if let Some(parent) = stack.last_mut() {
        parent.elements_mut().push(node);
    }
}

/// Close the innermost open element, attaching it to its parent. The root
/// group is never closed.
fn climb(stack: &mut Vec<Statement>) {
    if stack.len() > 1
        && let Some(node) = stack.pop()
    {
        push_child(stack, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abbreviation::tokenizer::tokenize;

    fn parse_str(source: &str) -> Result<TokenGroup, AbbreviationError> {
        parse(&tokenize(source)?, ParserOptions::default())
    }

    fn name_of(statement: &Statement) -> String {
        match statement {
            Statement::Element(el) => el
                .name
                .as_ref()
                .map(|tokens| {
                    tokens
                        .iter()
                        .filter_map(|t| match &t.kind {
                            TokenKind::Literal(v) => Some(v.as_str()),
                            _ => None,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Statement::Group(_) => "()".to_string(),
        }
    }

    fn children(statement: &Statement) -> &[Statement] {
        match statement {
            Statement::Element(el) => &el.elements,
            Statement::Group(group) => &group.elements,
        }
    }

    #[test]
    fn test_child_and_sibling() {
        let root = parse_str("a>b+c").unwrap();
        assert_eq!(root.elements.len(), 1);
        let a = &root.elements[0];
        let names: Vec<_> = children(a).iter().map(name_of).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_climb_up() {
        let root = parse_str("a>b>c^^d").unwrap();
        let names: Vec<_> = root.elements.iter().map(name_of).collect();
        assert_eq!(names, vec!["a", "d"]);

        // Climbing above the root is a no-op
        let root = parse_str("a^^^b").unwrap();
        assert_eq!(root.elements.len(), 2);
    }

    #[test]
    fn test_group_with_repeater() {
        let root = parse_str("(a+b)*2>c").unwrap();
        let Statement::Group(group) = &root.elements[0] else {
            panic!("expected group");
        };
        assert_eq!(
            group.repeat,
            Some(RepeaterToken {
                count: 2,
                implicit: false
            })
        );
        // `>` after a group descends into the group itself
        let names: Vec<_> = children(&root.elements[0]).iter().map(name_of).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_self_close_with_repeater() {
        let root = parse_str("img/*2").unwrap();
        let Statement::Element(el) = &root.elements[0] else {
            panic!("expected element");
        };
        assert!(el.self_close);
        assert_eq!(el.repeat.map(|r| r.count), Some(2));
    }

    #[test]
    fn test_attribute_set_and_shorthands() {
        let root = parse_str("a#top.b.c[href='x' title]").unwrap();
        let Statement::Element(el) = &root.elements[0] else {
            panic!("expected element");
        };
        let attrs = el.attributes.as_ref().unwrap();
        assert_eq!(attrs.len(), 5);
        assert!(attrs[4].value.is_none());
    }

    #[test]
    fn test_text_keeps_nested_fields() {
        let tokens = tokenize("p{a ${1:b} c}").unwrap();
        let root = parse(&tokens, ParserOptions::default()).unwrap();
        let Statement::Element(el) = &root.elements[0] else {
            panic!("expected element");
        };
        let value = el.value.as_ref().unwrap();
        assert!(value.iter().any(|t| matches!(t.kind, TokenKind::Field { .. })));
        assert!(!value.iter().any(|t| t.is_any_bracket()));
    }

    #[test]
    fn test_adjacent_elements_without_operator() {
        let root = parse_str("invalid{syntax}here").unwrap();
        let names: Vec<_> = root.elements.iter().map(name_of).collect();
        assert_eq!(names, vec!["invalid", "here"]);
    }

    #[test]
    fn test_jsx_dotted_names() {
        let tokens = tokenize("Foo.Bar.baz").unwrap();
        let root = parse(&tokens, ParserOptions { jsx: true }).unwrap();
        let Statement::Element(el) = &root.elements[0] else {
            panic!("expected element");
        };
        assert_eq!(el.name.as_ref().map(Vec::len), Some(3));
        assert_eq!(el.attributes.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_errors_report_offsets() {
        let err = parse_str("div[").unwrap_err();
        assert_eq!(err.kind, AbbreviationErrorKind::UnclosedAttributeSet);
        assert_eq!(err.offset, Some(3));

        let err = parse_str("(div").unwrap_err();
        assert_eq!(err.kind, AbbreviationErrorKind::UnclosedGroup);
        assert_eq!(err.offset, Some(0));

        let err = parse_str("a[title='x]").unwrap_err();
        assert_eq!(err.kind, AbbreviationErrorKind::UnclosedQuote);
        assert_eq!(err.offset, Some(8));

        let err = parse_str("div span").unwrap_err();
        assert_eq!(err.kind, AbbreviationErrorKind::UnexpectedCharacter);
        assert_eq!(err.offset, Some(3));

        let err = parse_str("p{text").unwrap_err();
        assert_eq!(err.kind, AbbreviationErrorKind::UnclosedText);
        assert_eq!(err.offset, Some(1));
    }
}
