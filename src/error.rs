use std::fmt;

use crate::token::Position;

/// Classifies a syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Block comment reached end of input before `*/`.
    UnclosedComment,
    /// A `/` that starts neither `//` nor `/*`.
    InvalidComment,
    /// End of input inside a property or variable value.
    UnexpectedEofInValue,
    /// `{` inside a value.
    UnexpectedOpenInValue,
    /// Selector not followed by `{`.
    ExpectedOpenAfterSelector { found: Option<String> },
    /// Variable name not followed by `:`.
    ExpectedColonAfterVariable,
    /// Variable value not followed by `;`.
    ExpectedSemicolonAfterVariable,
    /// Property line that does not start with a name.
    ExpectedPropertyName { found: String },
    /// Property name not followed by `:`.
    ExpectedColonAfterProperty,
    /// Property value followed by something other than `;` or `}`.
    ExpectedSemicolonAfterProperty,
    /// Block body reached end of input before `}`.
    UnclosedBlock,
    /// Blocks nested deeper than the parser's limit.
    NestingTooDeep,
    /// Top-level token that cannot start a variable line or a block.
    ExpectedVariableOrSelector { found: String },
    /// Reference to an unbound variable, reported only in strict mode.
    UndefinedVariable { name: String },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedComment => write!(f, "unclosed comment"),
            Self::InvalidComment => write!(f, "invalid comment"),
            Self::UnexpectedEofInValue => {
                write!(f, "unexpected end of input in value")
            }
            Self::UnexpectedOpenInValue => write!(f, "unexpected '{{' in value"),
            Self::ExpectedOpenAfterSelector { found: None } => {
                write!(f, "expected '{{' after selector")
            }
            Self::ExpectedOpenAfterSelector { found: Some(t) } => {
                write!(f, "expected '{{' after selector, got {t}")
            }
            Self::ExpectedColonAfterVariable => {
                write!(f, "expected ':' after variable")
            }
            Self::ExpectedSemicolonAfterVariable => {
                write!(f, "expected ';' after variable value")
            }
            Self::ExpectedPropertyName { found } => {
                write!(f, "expected property name, got {found}")
            }
            Self::ExpectedColonAfterProperty => {
                write!(f, "expected ':' after property name")
            }
            Self::ExpectedSemicolonAfterProperty => {
                write!(f, "expected ';' after property value")
            }
            Self::UnclosedBlock => write!(f, "unclosed block"),
            Self::NestingTooDeep => write!(f, "blocks nested too deeply"),
            Self::ExpectedVariableOrSelector { found } => {
                write!(f, "expected variable or selector, got {found}")
            }
            Self::UndefinedVariable { name } => {
                write!(f, "undefined variable {name}")
            }
        }
    }
}

/// Error produced while lexing or parsing. Line and column are zero-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: Position,
}

impl SyntaxError {
    #[must_use]
    pub const fn new(kind: SyntaxErrorKind, position: Position) -> Self {
        Self { kind, position }
    }

    /// Human-readable message without the location suffix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    #[must_use]
    pub const fn line(&self) -> usize {
        self.position.line
    }

    #[must_use]
    pub const fn column(&self) -> usize {
        self.position.column
    }
}
