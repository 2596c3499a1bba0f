use std::fmt;

/// Zero-based source location of a token or error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// One or more collapsed whitespace characters and comments.
    Whitespace,
    /// Opening brace `{`.
    Open,
    /// Closing brace `}`.
    Close,
    /// Variable reference or definition, `@name`.
    Variable,
    /// Colon `:`.
    Colon,
    /// Semicolon `;`.
    Semicolon,
    /// Unquoted run of characters up to the next delimiter.
    Word,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Whitespace => "whitespace",
            Self::Open => "'{'",
            Self::Close => "'}'",
            Self::Variable => "variable",
            Self::Colon => "':'",
            Self::Semicolon => "';'",
            Self::Word => "word",
        };
        f.write_str(name)
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// Whitespace tokens carry no text.
    #[must_use]
    pub const fn whitespace(position: Position) -> Self {
        Self {
            kind: TokenKind::Whitespace,
            text: String::new(),
            position,
        }
    }

    #[must_use]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
