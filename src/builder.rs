use crate::document::{Document, PropertyMap};

impl Document {
    /// Create a new empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one property to `path`.
    #[must_use]
    pub fn with_property(mut self, path: &str, name: &str, value: &str) -> Self {
        self.set(path, name, value);
        self
    }

    /// Add every `(name, value)` pair to `path`, in order.
    #[must_use]
    pub fn with_block<'a>(
        mut self,
        path: &str,
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let block = self.block_mut(path);
        for (name, value) in properties {
            block.insert(name.to_string(), value.to_string());
        }
        self
    }
}

/// Collect `(path, properties)` pairs; repeated paths merge.
impl FromIterator<(String, PropertyMap)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, PropertyMap)>>(iter: I) -> Self {
        let mut document = Self::new();
        for (path, properties) in iter {
            document.block_mut(&path).extend(properties);
        }
        document
    }
}
