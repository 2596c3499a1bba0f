//! Serializes a compiled [`Document`] back into stylesheet text.
//!
//! Both styles walk paths in first-seen order and skip paths that
//! ended up with no properties.

use std::fmt::Write as _;

use tracing::debug;

use crate::document::{Document, PropertyMap};

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Style {
    /// `path{name:value;name:value}` with no separating whitespace.
    #[default]
    Minified,
    /// One property per line, two-space indent, blank line after
    /// each block.
    Pretty,
}

impl Style {
    #[must_use]
    pub const fn from_pretty(pretty: bool) -> Self {
        if pretty { Self::Pretty } else { Self::Minified }
    }
}

/// Render `document` in the given style.
#[must_use]
pub fn render(document: &Document, style: Style) -> String {
    debug!(?style, blocks = document.len(), "rendering document");
    let mut out = String::new();
    for (path, block) in document.blocks() {
        match style {
            Style::Minified => render_minified_block(&mut out, path, block),
            Style::Pretty => render_pretty_block(&mut out, path, block),
        }
    }
    out
}

fn render_minified_block(out: &mut String, path: &str, block: &PropertyMap) {
    out.push_str(path);
    out.push('{');
    for (i, (name, value)) in block.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(name);
        out.push(':');
        out.push_str(value);
    }
    out.push('}');
}

fn render_pretty_block(out: &mut String, path: &str, block: &PropertyMap) {
    let _ = writeln!(out, "{path} {{");
    for (name, value) in block {
        let _ = writeln!(out, "  {name}: {value};");
    }
    out.push_str("}\n\n");
}
