//! Abbreviation tokenizer
//!
//! Turns `ul>li.item$*3` into a flat list of tokens. The same characters mean
//! different things inside `[...]`, `{...}` and quotes, so the tokenizer
//! tracks how deep it is in each of those contexts.

use super::error::{AbbreviationError, AbbreviationErrorKind};
use super::scanner::Scanner;
use super::token::{BracketContext, OperatorKind, RepeaterNumber, RepeaterToken, Token, TokenKind};

/// Nesting counters. Counters may go negative on unbalanced closing brackets;
/// any non-zero value counts as "inside".
#[derive(Debug, Default, Clone, Copy)]
struct Context {
    group: i32,
    attribute: i32,
    expression: i32,
    /// Active quote character
    quote: Option<char>,
}

impl Context {
    fn bump(&mut self, context: BracketContext, open: bool) {
        let delta = if open { 1 } else { -1 };
        match context {
            BracketContext::Group => self.group += delta,
            BracketContext::Attribute => self.attribute += delta,
            BracketContext::Expression => self.expression += delta,
        }
    }

    fn in_attribute(&self) -> bool {
        self.attribute != 0
    }

    fn in_expression(&self) -> bool {
        self.expression != 0
    }
}

/// Tokenize an abbreviation string.
pub fn tokenize(source: &str) -> Result<Vec<Token>, AbbreviationError> {
    let mut scanner = Scanner::new(source);
    let mut ctx = Context::default();
    let mut tokens = Vec::new();

    while !scanner.eof() {
        let ch = scanner.peek();
        match next_token(&mut scanner, &mut ctx)? {
            Some(token) => {
                match token.kind {
                    TokenKind::Quote { .. } => {
                        ctx.quote = if ch == ctx.quote { None } else { ch };
                    }
                    TokenKind::Bracket { context, open } => ctx.bump(context, open),
                    _ => {}
                }
                tokens.push(token);
            }
            None => {
                return Err(scanner.error(
                    AbbreviationErrorKind::UnexpectedCharacter,
                    "Unexpected character",
                ));
            }
        }
    }

    Ok(tokens)
}

fn next_token(
    scanner: &mut Scanner,
    ctx: &mut Context,
) -> Result<Option<Token>, AbbreviationError> {
    if let Some(token) = field(scanner, ctx)? {
        return Ok(Some(token));
    }

    Ok(repeater_placeholder(scanner)
        .or_else(|| repeater_number(scanner))
        .or_else(|| repeater(scanner))
        .or_else(|| whitespace(scanner))
        .or_else(|| literal(scanner, ctx))
        .or_else(|| operator(scanner))
        .or_else(|| quote(scanner))
        .or_else(|| bracket(scanner)))
}

/// `${1:placeholder}`, `${1}` or `${variable}`, only inside attributes and
/// expressions.
fn field(scanner: &mut Scanner, ctx: &Context) -> Result<Option<Token>, AbbreviationError> {
    let start = scanner.pos;
    if (ctx.in_expression() || ctx.in_attribute()) && scanner.eat('$') && scanner.eat('{') {
        scanner.start = scanner.pos;

        let mut index = None;
        let mut name = String::new();

        if scanner.eat_while(is_number) {
            index = scanner.current().parse().ok();
            if scanner.eat(':') {
                name = consume_placeholder(scanner)?;
            }
        } else if scanner.peek().is_some_and(is_alpha) {
            name = consume_placeholder(scanner)?;
        }

        if scanner.eat('}') {
            return Ok(Some(Token::new(
                TokenKind::Field { index, name },
                start,
                scanner.pos,
            )));
        }

        return Err(scanner.error(AbbreviationErrorKind::UnclosedField, "Expecting }"));
    }

    scanner.pos = start;
    Ok(None)
}

/// Placeholder text up to the closing `}`, balancing nested braces.
fn consume_placeholder(scanner: &mut Scanner) -> Result<String, AbbreviationError> {
    let mut stack = Vec::new();
    scanner.start = scanner.pos;

    while !scanner.eof() {
        if scanner.eat('{') {
            stack.push(scanner.pos);
        } else if scanner.eat('}') {
            if stack.pop().is_none() {
                scanner.back_up(1);
                break;
            }
        } else {
            scanner.pos += 1;
        }
    }

    if let Some(pos) = stack.pop() {
        scanner.pos = pos;
        return Err(scanner.error(AbbreviationErrorKind::UnclosedField, "Expecting }"));
    }

    Ok(scanner.current())
}

fn repeater_placeholder(scanner: &mut Scanner) -> Option<Token> {
    let start = scanner.pos;
    if scanner.eat('$') && scanner.eat('#') {
        return Some(Token::new(TokenKind::RepeaterPlaceholder, start, scanner.pos));
    }
    scanner.pos = start;
    None
}

fn repeater_number(scanner: &mut Scanner) -> Option<Token> {
    let start = scanner.pos;
    if !scanner.eat_while(|c| c == '$') {
        return None;
    }

    let size = scanner.pos - start;
    let mut reverse = false;
    let mut base = 1;
    let mut parent = 0;

    if scanner.eat('@') {
        while scanner.eat('^') {
            parent += 1;
        }

        reverse = scanner.eat('-');
        scanner.start = scanner.pos;
        if scanner.eat_while(is_number) {
            // Digits only, so parsing fails on overflow alone
            base = scanner.current().parse().unwrap_or(usize::MAX);
        }
    }

    scanner.start = start;
    Some(Token::new(
        TokenKind::RepeaterNumber(RepeaterNumber {
            size,
            reverse,
            base,
            parent,
        }),
        start,
        scanner.pos,
    ))
}

fn repeater(scanner: &mut Scanner) -> Option<Token> {
    let start = scanner.pos;
    if !scanner.eat('*') {
        return None;
    }

    scanner.start = scanner.pos;
    let (count, implicit) = if scanner.eat_while(is_number) {
        (scanner.current().parse().unwrap_or(usize::MAX), false)
    } else {
        (1, true)
    };

    Some(Token::new(
        TokenKind::Repeater(RepeaterToken { count, implicit }),
        start,
        scanner.pos,
    ))
}

fn whitespace(scanner: &mut Scanner) -> Option<Token> {
    let start = scanner.pos;
    if scanner.eat_while(is_space) {
        let value = scanner.substring(start, scanner.pos);
        return Some(Token::new(TokenKind::WhiteSpace(value), start, scanner.pos));
    }
    None
}

fn literal(scanner: &mut Scanner, ctx: &mut Context) -> Option<Token> {
    let start = scanner.pos;
    let expression_start = ctx.expression;
    let mut value = String::new();

    while let Some(ch) = scanner.peek() {
        // Escapes apply in every context
        if ch == '\\' {
            scanner.pos += 1;
            if let Some(escaped) = scanner.next() {
                value.push(escaped);
            }
            continue;
        }

        // `/` between two digits stays in the literal: `col-12/6`
        if ch == '/' && ctx.quote.is_none() && !ctx.in_expression() && !ctx.in_attribute() {
            let prev = scanner.pos.checked_sub(1).and_then(|ix| scanner.char_at(ix));
            let next = scanner.char_at(scanner.pos + 1);
            if prev.is_some_and(is_number) && next.is_some_and(is_number) {
                value.push(ch);
                scanner.pos += 1;
                continue;
            }
        }

        if Some(ch) == ctx.quote || ch == '$' || is_allowed_operator(ch, ctx) {
            break;
        }

        if expression_start != 0 {
            // Nested braces inside text stay part of the literal
            if ch == '{' {
                ctx.expression += 1;
            } else if ch == '}' {
                if ctx.expression > expression_start {
                    ctx.expression -= 1;
                } else {
                    break;
                }
            }
        } else if ctx.quote.is_none() {
            if !ctx.in_attribute() && !is_element_name(ch) {
                break;
            }

            if is_allowed_space(ch, ctx)
                || is_allowed_repeater(ch, ctx)
                || is_quote(ch)
                || BracketContext::from_char(ch).is_some()
            {
                break;
            }
        }

        value.push(ch);
        scanner.pos += 1;
    }

    if start != scanner.pos {
        scanner.start = start;
        return Some(Token::new(TokenKind::Literal(value), start, scanner.pos));
    }

    None
}

fn operator(scanner: &mut Scanner) -> Option<Token> {
    let op = scanner.peek().and_then(OperatorKind::from_char)?;
    let start = scanner.pos;
    scanner.pos += 1;
    Some(Token::new(TokenKind::Operator(op), start, scanner.pos))
}

fn quote(scanner: &mut Scanner) -> Option<Token> {
    let ch = scanner.peek().filter(|&c| is_quote(c))?;
    let start = scanner.pos;
    scanner.pos += 1;
    Some(Token::new(
        TokenKind::Quote { single: ch == '\'' },
        start,
        scanner.pos,
    ))
}

fn bracket(scanner: &mut Scanner) -> Option<Token> {
    let ch = scanner.peek()?;
    let context = BracketContext::from_char(ch)?;
    let start = scanner.pos;
    scanner.pos += 1;
    Some(Token::new(
        TokenKind::Bracket {
            context,
            open: matches!(ch, '(' | '[' | '{'),
        },
        start,
        scanner.pos,
    ))
}

/// No operators inside quotes or expressions; inside attributes only `=`.
fn is_allowed_operator(ch: char, ctx: &Context) -> bool {
    match OperatorKind::from_char(ch) {
        Some(op) if ctx.quote.is_none() && !ctx.in_expression() => {
            !ctx.in_attribute() || op == OperatorKind::Equal
        }
        _ => false,
    }
}

fn is_allowed_space(ch: char, ctx: &Context) -> bool {
    is_space(ch) && !ctx.in_expression()
}

fn is_allowed_repeater(ch: char, ctx: &Context) -> bool {
    ch == '*' && !ctx.in_attribute() && !ctx.in_expression()
}

fn is_number(ch: char) -> bool {
    ch.is_ascii_digit()
}

fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{a0}')
}

fn is_quote(ch: char) -> bool {
    ch == '"' || ch == '\''
}

fn is_element_name(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | ':' | '!')
}
