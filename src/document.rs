use indexmap::IndexMap;
use indexmap::map::Iter;

/// Property name to resolved value, in first-seen order.
pub type PropertyMap = IndexMap<String, String>;

/// Compiled stylesheet: flattened selector path to its properties.
///
/// Paths keep the order in which they were first opened. A path that
/// appears more than once shares one property map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    blocks: IndexMap<String, PropertyMap>,
}

impl Document {
    /// Property map for `path`, created empty on first use.
    pub fn block_mut(&mut self, path: &str) -> &mut PropertyMap {
        if !self.blocks.contains_key(path) {
            self.blocks.insert(path.to_string(), PropertyMap::new());
        }
        &mut self.blocks[path]
    }

    /// Assign a property. An existing name keeps its position and takes
    /// the new value.
    pub fn set(&mut self, path: &str, name: impl Into<String>, value: impl Into<String>) {
        self.block_mut(path).insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&PropertyMap> {
        self.blocks.get(path)
    }

    #[must_use]
    pub fn property(&self, path: &str, name: &str) -> Option<&str> {
        self.blocks
            .get(path)
            .and_then(|block| block.get(name))
            .map(String::as_str)
    }

    /// All entries, including empty ones.
    pub fn iter(&self) -> Iter<'_, String, PropertyMap> {
        self.blocks.iter()
    }

    /// Entries that have at least one property.
    pub fn blocks(&self) -> impl Iterator<Item = (&String, &PropertyMap)> {
        self.iter().filter(|(_, block)| !block.is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a PropertyMap);
    type IntoIter = Iter<'a, String, PropertyMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
