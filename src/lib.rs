//! Compiler for a small nested stylesheet language.
//!
//! Source text has CSS-like selector blocks that may nest, `@name`
//! variables scoped to the block that defines them, and `//` and
//! `/* */` comments. Compiling flattens nested selectors into
//! space-joined paths, resolves variables, and renders the result as
//! minified or pretty-printed CSS.
//!
//! # Quick start
//!
//! ```
//! let source = "@c: red;\nnav {\n  a { color: @c; }\n}\n";
//!
//! assert_eq!(sss_rs::compile(source, false).unwrap(), "nav a{color:red}");
//! assert_eq!(
//!     sss_rs::compile(source, true).unwrap(),
//!     "nav a {\n  color: red;\n}\n\n"
//! );
//! ```
//!
//! ## Inspect the compiled document
//!
//! ```
//! use sss_rs::parse_str;
//!
//! let doc = parse_str("a { x: 1; } a { y: 2; x: 3; }").unwrap();
//! let names: Vec<_> = doc.get("a").unwrap().keys().collect();
//! assert_eq!(names, ["x", "y"]);
//! assert_eq!(doc.property("a", "x"), Some("3"));
//! ```
//!
//! Error positions are zero-based lines and columns.

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod builder;
pub mod cursor;
pub mod document;
pub mod error;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod render;
pub mod scope;
pub mod token;

pub use cursor::Cursor;
pub use document::{Document, PropertyMap};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Lexer, tokenize};
pub use options::Options;
pub use parser::{Parser, parse};
pub use render::{Style, render};
pub use scope::ScopeStack;
pub use token::{Position, Token, TokenKind};

/// Compile `source` to minified or, with `pretty`, indented CSS.
pub fn compile(source: &str, pretty: bool) -> Result<String, SyntaxError> {
    compile_with(source, &Options::new().pretty(pretty))
}

/// Compile `source` with explicit [`Options`].
pub fn compile_with(source: &str, options: &Options) -> Result<String, SyntaxError> {
    let document = Parser::new(source)
        .strict_variables(options.strict_variables)
        .parse()?;
    Ok(render(&document, options.style))
}

/// Parse `source` into a [`Document`] without rendering it.
pub fn parse_str(source: &str) -> Result<Document, SyntaxError> {
    parse(source)
}
