//! Lexical variable scopes.

use std::collections::HashMap;

/// Stack of variable bindings, one frame per open block plus the
/// top-level frame, which is never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, String>>,
}

impl ScopeStack {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Number of frames, including the top-level one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Bind `name` in the innermost frame, shadowing outer bindings.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value.into());
        }
    }

    /// Look `name` up from the innermost frame outwards.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .map(String::as_str)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
