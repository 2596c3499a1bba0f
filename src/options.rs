use crate::render::Style;

/// Per-call compile settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub style: Style,
    /// Fail on undefined variables instead of resolving them to `""`.
    pub strict_variables: bool,
}

impl Options {
    /// Minified output, lenient variables.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: Style::Minified,
            strict_variables: false,
        }
    }

    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub const fn pretty(self, pretty: bool) -> Self {
        self.style(Style::from_pretty(pretty))
    }

    #[must_use]
    pub const fn strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }
}
