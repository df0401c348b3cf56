//! Errors raised while tokenizing or parsing an abbreviation

use thiserror::Error;

/// Category of an abbreviation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbbreviationErrorKind {
    /// A character that no token rule accepts
    UnexpectedCharacter,
    /// A token that is valid on its own but not at this position
    UnexpectedToken,
    UnclosedQuote,
    /// `${` without a matching `}`
    UnclosedField,
    UnclosedGroup,
    UnclosedAttributeSet,
    UnclosedText,
}

/// Structured expansion error with an optional character offset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}{}", offset_suffix(.offset))]
pub struct AbbreviationError {
    pub kind: AbbreviationErrorKind,
    pub message: String,
    pub offset: Option<usize>,
}

fn offset_suffix(offset: &Option<usize>) -> String {
    offset.map(|o| format!(" at {o}")).unwrap_or_default()
}

impl AbbreviationError {
    pub fn new(
        kind: AbbreviationErrorKind,
        message: impl Into<String>,
        offset: Option<usize>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            offset,
        }
    }

    /// Render the offending abbreviation with a caret under the error offset.
    ///
    /// ```text
    /// div[title
    ///    ^ Unclosed attribute set
    /// ```
    pub fn annotate(&self, source: &str) -> String {
        match self.offset {
            Some(offset) => {
                let pad = " ".repeat(offset.min(source.chars().count()));
                format!("{source}\n{pad}^ {}", self.message)
            }
            None => format!("{source}\n{}", self.message),
        }
    }
}
