//! Token types produced by the abbreviation tokenizer

/// Operator characters outside of quoted/expression context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// `>`
    Child,
    /// `+`
    Sibling,
    /// `^`
    Climb,
    /// `.`
    Class,
    /// `#`
    Id,
    /// `=`
    Equal,
    /// `/`
    Close,
}

impl OperatorKind {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '>' => Some(Self::Child),
            '+' => Some(Self::Sibling),
            '^' => Some(Self::Climb),
            '.' => Some(Self::Class),
            '#' => Some(Self::Id),
            '/' => Some(Self::Close),
            '=' => Some(Self::Equal),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Child => '>',
            Self::Sibling => '+',
            Self::Climb => '^',
            Self::Class => '.',
            Self::Id => '#',
            Self::Equal => '=',
            Self::Close => '/',
        }
    }
}

/// Which pair of brackets a [`TokenKind::Bracket`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketContext {
    /// `(` `)`
    Group,
    /// `[` `]`
    Attribute,
    /// `{` `}`
    Expression,
}

impl BracketContext {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '(' | ')' => Some(Self::Group),
            '[' | ']' => Some(Self::Attribute),
            '{' | '}' => Some(Self::Expression),
            _ => None,
        }
    }
}

/// `*N` or bare `*`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeaterToken {
    pub count: usize,
    pub implicit: bool,
}

/// `$$$@-N` numbering run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeaterNumber {
    /// Number of `$` characters, i.e. zero-padding width
    pub size: usize,
    pub reverse: bool,
    pub base: usize,
    /// Number of `^` modifiers: how many repeaters to climb for the outer term
    pub parent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Literal(String),
    Operator(OperatorKind),
    Bracket { context: BracketContext, open: bool },
    Quote { single: bool },
    WhiteSpace(String),
    Repeater(RepeaterToken),
    /// `$#`
    RepeaterPlaceholder,
    RepeaterNumber(RepeaterNumber),
    /// `${1:name}` field or `${name}` variable reference
    Field { index: Option<usize>, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Synthetic literal with no source location
    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(TokenKind::Literal(value.into()), 0, 0)
    }

    pub fn is_operator(&self, kind: OperatorKind) -> bool {
        matches!(self.kind, TokenKind::Operator(op) if op == kind)
    }

    pub fn is_any_operator(&self) -> bool {
        matches!(self.kind, TokenKind::Operator(_))
    }

    pub fn is_bracket(&self, context: BracketContext, open: Option<bool>) -> bool {
        match self.kind {
            TokenKind::Bracket {
                context: ctx,
                open: is_open,
            } => ctx == context && open.is_none_or(|o| o == is_open),
            _ => false,
        }
    }

    pub fn is_any_bracket(&self) -> bool {
        matches!(self.kind, TokenKind::Bracket { .. })
    }

    pub fn is_quote(&self, single: Option<bool>) -> bool {
        match self.kind {
            TokenKind::Quote { single: s } => single.is_none_or(|want| want == s),
            _ => false,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::WhiteSpace(_))
    }

    pub fn is_repeater(&self) -> bool {
        matches!(self.kind, TokenKind::Repeater(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, TokenKind::Literal(_))
    }

    /// Literal starting with an ASCII capital letter (JSX component names)
    pub fn is_capitalized_literal(&self) -> bool {
        match &self.kind {
            TokenKind::Literal(value) => value.starts_with(|c: char| c.is_ascii_uppercase()),
            _ => false,
        }
    }

    /// Tokens allowed inside an element name
    pub fn is_element_name(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Literal(_) | TokenKind::RepeaterNumber(_) | TokenKind::RepeaterPlaceholder
        )
    }

    /// Short kind label used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            TokenKind::Literal(_) => "Literal",
            TokenKind::Operator(_) => "Operator",
            TokenKind::Bracket { .. } => "Bracket",
            TokenKind::Quote { .. } => "Quote",
            TokenKind::WhiteSpace(_) => "WhiteSpace",
            TokenKind::Repeater(_) => "Repeater",
            TokenKind::RepeaterPlaceholder => "RepeaterPlaceholder",
            TokenKind::RepeaterNumber(_) => "RepeaterNumber",
            TokenKind::Field { .. } => "Field",
        }
    }
}
