use crate::cursor::Cursor;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::token::{Position, Token, TokenKind};

/// Tokenize a whole source string.
///
/// Runs of whitespace and comments collapse into a single
/// [`TokenKind::Whitespace`] token, so two whitespace tokens are never
/// adjacent.
///
/// # Errors
///
/// Returns `SyntaxError` on an unclosed block comment or a stray `/`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).collect()
}

/// Pull-based lexer over a [`Cursor`].
#[derive(Debug, Clone)]
pub struct Lexer {
    cursor: Cursor,
    after_whitespace: bool,
}

impl Lexer {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            after_whitespace: false,
        }
    }

    /// Current location in the source, used for end-of-input errors.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor.mark()
    }

    /// Read the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns `SyntaxError` on an unclosed block comment or a `/` that
    /// does not start a comment.
    pub fn read_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        loop {
            let after_whitespace = std::mem::take(&mut self.after_whitespace);
            let start = self.cursor.mark();
            let Some(ch) = self.cursor.next() else {
                return Ok(None);
            };

            if is_whitespace(ch) || ch == '/' {
                if ch == '/' {
                    self.skip_comment(start)?;
                } else {
                    self.skip_whitespace();
                }
                self.after_whitespace = true;
                if after_whitespace {
                    continue;
                }
                return Ok(Some(Token::whitespace(start)));
            }

            let token = match ch {
                '{' => Token::new(TokenKind::Open, "{", start),
                '}' => Token::new(TokenKind::Close, "}", start),
                ':' => Token::new(TokenKind::Colon, ":", start),
                ';' => Token::new(TokenKind::Semicolon, ";", start),
                '@' => {
                    let text = self.read_while(ch, is_name_char);
                    Token::new(TokenKind::Variable, text, start)
                }
                _ => {
                    let text = self.read_while(ch, |c| !is_delimiter(c));
                    Token::new(TokenKind::Word, text, start)
                }
            };
            return Ok(Some(token));
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.cursor.next() {
            if !is_whitespace(ch) {
                self.cursor.back();
                break;
            }
        }
    }

    /// Skip the rest of a comment whose leading `/` is already consumed.
    fn skip_comment(&mut self, start: Position) -> Result<(), SyntaxError> {
        match self.cursor.next() {
            Some('/') => {
                while self.cursor.next().is_some_and(|c| c != '\n') {}
                Ok(())
            }
            Some('*') => {
                let mut star = false;
                loop {
                    match self.cursor.next() {
                        None => {
                            return Err(SyntaxError::new(SyntaxErrorKind::UnclosedComment, start));
                        }
                        Some('*') => star = true,
                        Some('/') if star => return Ok(()),
                        Some(_) => star = false,
                    }
                }
            }
            _ => Err(SyntaxError::new(SyntaxErrorKind::InvalidComment, start)),
        }
    }

    fn read_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::from(first);
        while let Some(ch) = self.cursor.next() {
            if !accept(ch) {
                self.cursor.back();
                break;
            }
            text.push(ch);
        }
        text
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_token().transpose()
    }
}

const fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\n' | '\r' | '\t')
}

const fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-'
}

const fn is_delimiter(ch: char) -> bool {
    matches!(ch, ';' | ':' | '{' | '}' | '>') || is_whitespace(ch)
}
