use tracing::{debug, trace};

use crate::document::Document;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::lexer::Lexer;
use crate::scope::ScopeStack;
use crate::token::{Position, Token, TokenKind};

/// Parse a source string into a flattened [`Document`].
///
/// Undefined variables resolve to an empty string.
///
/// # Errors
///
/// Returns `SyntaxError` on the first lexical or grammatical error.
pub fn parse(source: &str) -> Result<Document, SyntaxError> {
    Parser::new(source).parse()
}

/// Deepest block nesting accepted before parsing fails.
pub const MAX_NESTING: usize = 128;

/// What a block body line turned out to be after scanning ahead.
enum BodyLine {
    Variable(Token),
    Property,
    Block,
    End,
}

/// Recursive-descent parser with a replayable token buffer.
///
/// Tokens are pulled from the lexer on demand and kept, so the read
/// index can be moved back to any checkpoint without lexing again.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    tokens: Vec<Token>,
    index: usize,
    checkpoints: Vec<usize>,
    scopes: ScopeStack,
    document: Document,
    strict_variables: bool,
}

impl Parser {
    #[must_use]
    pub fn new(source: &str) -> Self {
        Self {
            lexer: Lexer::new(source),
            tokens: Vec::new(),
            index: 0,
            checkpoints: Vec::new(),
            scopes: ScopeStack::new(),
            document: Document::new(),
            strict_variables: false,
        }
    }

    /// Fail on references to unbound variables instead of resolving
    /// them to an empty string.
    #[must_use]
    pub const fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Parse the whole input.
    ///
    /// # Errors
    ///
    /// Returns `SyntaxError` on the first lexical or grammatical error.
    pub fn parse(mut self) -> Result<Document, SyntaxError> {
        while self.parse_top_element()? {}
        debug!(blocks = self.document.len(), "parsed document");
        Ok(self.document)
    }

    fn parse_top_element(&mut self) -> Result<bool, SyntaxError> {
        let Some(token) = self.token(true)? else {
            return Ok(false);
        };
        match token.kind {
            TokenKind::Variable => self.parse_variable_line(token)?,
            TokenKind::Word | TokenKind::Colon => {
                self.back();
                self.parse_block("")?;
            }
            _ => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedVariableOrSelector {
                        found: describe(&token),
                    },
                    token.position,
                ));
            }
        }
        Ok(true)
    }

    /// `@name: value;` with the variable token already consumed.
    fn parse_variable_line(&mut self, variable: Token) -> Result<(), SyntaxError> {
        if !self.token(true)?.is_some_and(|t| t.is(TokenKind::Colon)) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::ExpectedColonAfterVariable,
                variable.position,
            ));
        }
        let value = self.parse_value()?;
        match self.token(true)? {
            Some(t) if t.is(TokenKind::Semicolon) => {}
            found => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedSemicolonAfterVariable,
                    self.position_of(found.as_ref()),
                ));
            }
        }
        trace!(
            name = %variable.text,
            value = %value,
            depth = self.scopes.depth(),
            "bind variable"
        );
        self.scopes.set(variable.text, value);
        Ok(())
    }

    /// `selector { body* }`, where `prefix` is the parent path plus a
    /// joining space, or empty at top level.
    fn parse_block(&mut self, prefix: &str) -> Result<(), SyntaxError> {
        self.scopes.push();
        let (selector, open) = self.parse_selector()?;
        // One scope frame per open block plus the top-level frame.
        if self.scopes.depth() > MAX_NESTING + 1 {
            return Err(SyntaxError::new(SyntaxErrorKind::NestingTooDeep, open));
        }
        let path = format!("{prefix}{selector}");
        self.document.block_mut(&path);
        trace!(path = %path, "enter block");

        loop {
            match self.classify_body_line()? {
                BodyLine::Variable(variable) => self.parse_variable_line(variable)?,
                BodyLine::Property => self.parse_property_line(&path)?,
                BodyLine::Block => self.parse_block(&format!("{path} "))?,
                BodyLine::End => break,
            }
        }

        if !self.token(true)?.is_some_and(|t| t.is(TokenKind::Close)) {
            return Err(SyntaxError::new(SyntaxErrorKind::UnclosedBlock, open));
        }
        self.scopes.pop();
        Ok(())
    }

    /// Decide what the next body line is by scanning to the first `{`,
    /// `}` or `;`, then rewind so it can be parsed for real.
    fn classify_body_line(&mut self) -> Result<BodyLine, SyntaxError> {
        self.mark();
        let Some(first) = self.token(true)? else {
            self.discard();
            return Ok(BodyLine::End);
        };
        if first.is(TokenKind::Variable) {
            self.discard();
            return Ok(BodyLine::Variable(first));
        }
        self.back();

        let terminator = loop {
            match self.token(true)? {
                // Unterminated body; the enclosing block reports it.
                None => {
                    self.discard();
                    return Ok(BodyLine::End);
                }
                Some(t) if matches!(
                    t.kind,
                    TokenKind::Open | TokenKind::Close | TokenKind::Semicolon
                ) =>
                {
                    break t.kind;
                }
                Some(_) => {}
            }
        };
        self.reset();

        Ok(if first.is(TokenKind::Close) {
            BodyLine::End
        } else if terminator == TokenKind::Open {
            BodyLine::Block
        } else {
            BodyLine::Property
        })
    }

    /// `name: value` followed by `;`, or by a `}` that is left unread.
    fn parse_property_line(&mut self, path: &str) -> Result<(), SyntaxError> {
        let name = match self.token(true)? {
            Some(t) if t.is(TokenKind::Word) => t,
            found => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedPropertyName {
                        found: found
                            .as_ref()
                            .map_or_else(|| "end of input".to_string(), describe),
                    },
                    self.position_of(found.as_ref()),
                ));
            }
        };
        match self.token(true)? {
            Some(t) if t.is(TokenKind::Colon) => {}
            found => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedColonAfterProperty,
                    self.position_of(found.as_ref()),
                ));
            }
        }

        let value = self.parse_value()?;
        trace!(path = %path, name = %name.text, value = %value, "set property");
        self.document.set(path, name.text, value);

        match self.token(true)? {
            Some(t) if t.is(TokenKind::Close) => self.back(),
            Some(t) if t.is(TokenKind::Semicolon) => {}
            found => {
                return Err(SyntaxError::new(
                    SyntaxErrorKind::ExpectedSemicolonAfterProperty,
                    self.position_of(found.as_ref()),
                ));
            }
        }
        Ok(())
    }

    /// Selector text up to `{`, with whitespace collapsed to one space.
    /// Returns the trimmed text and the position of the `{`.
    fn parse_selector(&mut self) -> Result<(String, Position), SyntaxError> {
        let start = self.peek_position()?;
        let mut selector = String::new();
        loop {
            match self.token(false)? {
                Some(t) if t.is(TokenKind::Open) => {
                    return Ok((selector.trim().to_string(), t.position));
                }
                Some(t) if t.is(TokenKind::Semicolon) || t.is(TokenKind::Close) => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::ExpectedOpenAfterSelector {
                            found: Some(describe(&t)),
                        },
                        start,
                    ));
                }
                Some(t) if t.is(TokenKind::Whitespace) => selector.push(' '),
                Some(t) => selector.push_str(&t.text),
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::ExpectedOpenAfterSelector { found: None },
                        start,
                    ));
                }
            }
        }
    }

    /// Value text up to, but not including, the next `;` or `}`.
    ///
    /// The first significant token is always taken as part of the value.
    /// Variables are resolved against the current scopes.
    fn parse_value(&mut self) -> Result<String, SyntaxError> {
        let start = self.peek_position()?;
        let eof = move || SyntaxError::new(SyntaxErrorKind::UnexpectedEofInValue, start);

        let mut token = self.token(true)?.ok_or_else(eof)?;
        let mut value = String::new();
        loop {
            match token.kind {
                TokenKind::Open => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnexpectedOpenInValue,
                        token.position,
                    ));
                }
                TokenKind::Whitespace => value.push(' '),
                TokenKind::Variable => value.push_str(&self.resolve(&token)?),
                _ => value.push_str(&token.text),
            }
            token = self.token(false)?.ok_or_else(eof)?;
            if token.is(TokenKind::Semicolon) || token.is(TokenKind::Close) {
                break;
            }
        }
        self.back();
        Ok(value.trim().to_string())
    }

    fn resolve(&self, variable: &Token) -> Result<String, SyntaxError> {
        match self.scopes.get(&variable.text) {
            Some(value) => Ok(value.to_string()),
            None if self.strict_variables => Err(SyntaxError::new(
                SyntaxErrorKind::UndefinedVariable {
                    name: variable.text.clone(),
                },
                variable.position,
            )),
            None => Ok(String::new()),
        }
    }

    /// Next token, pulling from the lexer once the buffer is exhausted.
    fn token(&mut self, skip_whitespace: bool) -> Result<Option<Token>, SyntaxError> {
        loop {
            if self.index == self.tokens.len() {
                match self.lexer.read_token()? {
                    Some(token) => self.tokens.push(token),
                    None => return Ok(None),
                }
            }
            let token = self.tokens[self.index].clone();
            self.index += 1;
            if !(skip_whitespace && token.is(TokenKind::Whitespace)) {
                return Ok(Some(token));
            }
        }
    }

    const fn back(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    fn mark(&mut self) {
        self.checkpoints.push(self.index);
    }

    fn reset(&mut self) {
        if let Some(index) = self.checkpoints.pop() {
            self.index = index;
        }
    }

    fn discard(&mut self) {
        self.checkpoints.pop();
    }

    /// Position of the next raw token, or of the end of input.
    fn peek_position(&mut self) -> Result<Position, SyntaxError> {
        let position = self.token(false)?.map(|token| token.position);
        if position.is_some() {
            self.back();
        }
        Ok(position.unwrap_or_else(|| self.lexer.position()))
    }

    fn position_of(&self, token: Option<&Token>) -> Position {
        token.map_or_else(|| self.lexer.position(), |t| t.position)
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Word | TokenKind::Variable => format!("'{}'", token.text),
        kind => kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(input: &str) -> SyntaxError {
        parse(input).expect_err("should fail")
    }

    #[test]
    fn simple_block() {
        let doc = parse("a { color: red; }").expect("parse failed");
        assert_eq!(doc.property("a", "color"), Some("red"));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn nested_paths_are_space_joined() {
        let doc = parse("a { b { c { x: 1; } } }").expect("parse failed");
        let paths: Vec<_> = doc.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a", "a b", "a b c"]);
        assert_eq!(doc.property("a b c", "x"), Some("1"));
    }

    #[test]
    fn pseudo_class_selector_keeps_colon() {
        let doc = parse("a:hover { x: 1; } p { q:first { y: 2; } }").expect("parse failed");
        assert_eq!(doc.property("a:hover", "x"), Some("1"));
        assert_eq!(doc.property("p q:first", "y"), Some("2"));
    }

    #[test]
    fn child_combinator_selector() {
        let doc = parse("ul > li { x: 1; } ol>li { y: 2; }").expect("parse failed");
        assert_eq!(doc.property("ul > li", "x"), Some("1"));
        assert_eq!(doc.property("ol>li", "y"), Some("2"));
    }

    #[test]
    fn value_whitespace_collapses() {
        let doc = parse("a { border:   1px\n\t solid  /* c */ red  ; }").expect("parse failed");
        assert_eq!(doc.property("a", "border"), Some("1px solid red"));
    }

    #[test]
    fn value_keeps_colons() {
        let doc = parse("a { font: bold 12px:x; }").expect("parse failed");
        assert_eq!(doc.property("a", "font"), Some("bold 12px:x"));
    }

    #[test]
    fn variables_resolve_in_values() {
        let doc = parse("@w: 1px; @c: red; a { border: @w solid @c; }").expect("parse failed");
        assert_eq!(doc.property("a", "border"), Some("1px solid red"));
    }

    #[test]
    fn variable_value_can_reference_variable() {
        let doc = parse("@a: 2px; @b: @a @a; x { m: @b; }").expect("parse failed");
        assert_eq!(doc.property("x", "m"), Some("2px 2px"));
    }

    #[test]
    fn block_scoped_variables() {
        let doc = parse("@c: red; a { @c: blue; b { x: @c; } y: @c; } c { x: @c; }")
            .expect("parse failed");
        assert_eq!(doc.property("a b", "x"), Some("blue"));
        assert_eq!(doc.property("a", "y"), Some("blue"));
        assert_eq!(doc.property("c", "x"), Some("red"));
    }

    #[test]
    fn undefined_variable_is_empty() {
        let doc = parse("a { x: 1 @nope 2; }").expect("parse failed");
        assert_eq!(doc.property("a", "x"), Some("1  2"));
    }

    #[test]
    fn selector_variables_are_literal() {
        let doc = parse("@s: q; a @s { x: 1; }").expect("parse failed");
        assert_eq!(doc.property("a @s", "x"), Some("1"));
    }

    #[test]
    fn last_property_may_omit_semicolon() {
        let doc = parse("a { x: 1; y: 2 }").expect("parse failed");
        assert_eq!(doc.property("a", "y"), Some("2"));
    }

    #[test]
    fn parent_path_precedes_child() {
        let doc = parse("a { b { x: 1; } y: 2; }").expect("parse failed");
        let paths: Vec<_> = doc.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, vec!["a", "a b"]);
    }

    #[test]
    fn strict_mode_rejects_undefined_variable() {
        let err = Parser::new("a { x: @nope; }")
            .strict_variables(true)
            .parse()
            .expect_err("should fail");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::UndefinedVariable {
                name: "@nope".to_string()
            }
        );
        assert_eq!(err.position, Position::new(0, 7));
    }

    #[test]
    fn strict_mode_accepts_defined_variable() {
        let doc = Parser::new("@c: red; a { x: @c; }")
            .strict_variables(true)
            .parse()
            .expect("parse failed");
        assert_eq!(doc.property("a", "x"), Some("red"));
    }

    #[test]
    fn unclosed_block_points_at_open_brace() {
        let err = parse_err("a { x: 1");
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedBlock);
        assert_eq!(err.position, Position::new(0, 2));
    }

    #[test]
    fn unclosed_nested_block() {
        let err = parse_err("a {\n  b {\n    x: 1;\n  }\n");
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedBlock);
        assert_eq!(err.position, Position::new(0, 2));
    }

    #[test]
    fn nesting_limit_is_accepted() {
        let input = format!("{}x:1;{}", "a{".repeat(MAX_NESTING), "}".repeat(MAX_NESTING));
        let doc = parse(&input).expect("parse failed");
        assert_eq!(doc.len(), MAX_NESTING);
    }

    #[test]
    fn nesting_too_deep() {
        let err = parse_err(&"a{".repeat(100_000));
        assert_eq!(err.kind, SyntaxErrorKind::NestingTooDeep);
        // The `{` of block MAX_NESTING + 1.
        assert_eq!(err.position, Position::new(0, 2 * MAX_NESTING + 1));
    }

    #[test]
    fn missing_colon_after_property() {
        let err = parse_err("a { x 1; }");
        assert_eq!(err.kind, SyntaxErrorKind::ExpectedColonAfterProperty);
        assert_eq!(err.position, Position::new(0, 6));
    }

    #[test]
    fn property_must_start_with_name() {
        let err = parse_err("a { : x; }");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::ExpectedPropertyName {
                found: "':'".to_string()
            }
        );
        assert_eq!(err.position, Position::new(0, 4));
    }

    #[test]
    fn open_brace_in_variable_value() {
        let err = parse_err("@v: a { b }");
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedOpenInValue);
        assert_eq!(err.position, Position::new(0, 6));
    }

    #[test]
    fn missing_colon_after_variable() {
        let err = parse_err("@v red;");
        assert_eq!(err.kind, SyntaxErrorKind::ExpectedColonAfterVariable);
        assert_eq!(err.position, Position::new(0, 0));
    }

    #[test]
    fn variable_line_needs_semicolon() {
        let err = parse_err("@v: red }");
        assert_eq!(err.kind, SyntaxErrorKind::ExpectedSemicolonAfterVariable);
        assert_eq!(err.position, Position::new(0, 8));
    }

    #[test]
    fn eof_in_value() {
        let err = parse_err("@v: red");
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedEofInValue);
        assert_eq!(err.position, Position::new(0, 3));

        let err = parse_err("@v:");
        assert_eq!(err.kind, SyntaxErrorKind::UnexpectedEofInValue);
        assert_eq!(err.position, Position::new(0, 3));
    }

    #[test]
    fn selector_without_open_brace() {
        let err = parse_err("a ;");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::ExpectedOpenAfterSelector {
                found: Some("';'".to_string())
            }
        );
        assert_eq!(err.position, Position::new(0, 0));

        let err = parse_err("a b");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::ExpectedOpenAfterSelector { found: None }
        );
    }

    #[test]
    fn stray_top_level_token() {
        let err = parse_err("a { x: 1; }\n}");
        assert_eq!(
            err.kind,
            SyntaxErrorKind::ExpectedVariableOrSelector {
                found: "'}'".to_string()
            }
        );
        assert_eq!(err.position, Position::new(1, 0));
    }

    #[test]
    fn lexer_errors_propagate() {
        let err = parse_err("a { x: 1; /* open");
        assert_eq!(err.kind, SyntaxErrorKind::UnclosedComment);
        assert_eq!(err.position, Position::new(0, 10));
    }
}
