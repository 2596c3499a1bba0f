#![allow(dead_code)]

use sss_rs::{Document, Style, compile, parse_str, render};

/// Install a test-friendly subscriber so `RUST_LOG`-style tracing shows
/// up under `cargo test -- --nocapture`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Compile with both styles and assert each matches.
pub fn assert_compiles(input: &str, minified: &str, pretty: &str) {
    let got = compile(input, false).expect("minified compile failed");
    assert_eq!(
        got, minified,
        "minified mismatch:\n--- input ---\n{input}\n--- got ---\n{got}"
    );
    let got = compile(input, true).expect("pretty compile failed");
    assert_eq!(
        got, pretty,
        "pretty mismatch:\n--- input ---\n{input}\n--- got ---\n{got}"
    );
}

/// Non-empty blocks of a document as owned pairs, in order.
pub fn non_empty(document: &Document) -> Vec<(String, Vec<(String, String)>)> {
    document
        .blocks()
        .map(|(path, block)| {
            let props = block
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect();
            (path.to_string(), props)
        })
        .collect()
}

/// Render in `style`, parse the output back, and assert both describe
/// the same non-empty blocks.
pub fn assert_semantic_roundtrip(document: &Document, style: Style) {
    let rendered = render(document, style);
    let reparsed = parse_str(&rendered).unwrap_or_else(|e| {
        panic!("failed to re-parse rendered output: {e}\n--- rendered ---\n{rendered}")
    });
    assert_eq!(
        non_empty(document),
        non_empty(&reparsed),
        "round-trip mismatch\n--- rendered ---\n{rendered}"
    );
}
