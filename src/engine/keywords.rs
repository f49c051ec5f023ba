use crate::model::{Keyword, Platform};

/// Insertion-ordered keyword list, unique per (platform, value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    items: Vec<Keyword>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns false (and leaves the set untouched) when the keyword is
    /// already present for its platform.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        if self.contains(keyword.platform, &keyword.value) {
            return false;
        }
        self.items.push(keyword);
        true
    }

    pub fn remove(&mut self, platform: Platform, value: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|k| !(k.platform == platform && k.value == value));
        self.items.len() != before
    }

    pub fn contains(&self, platform: Platform, value: &str) -> bool {
        self.items
            .iter()
            .any(|k| k.platform == platform && k.value == value)
    }

    pub fn for_platform(&self, platform: Platform) -> impl Iterator<Item = &Keyword> {
        self.items.iter().filter(move |k| k.platform == platform)
    }

    /// Distinct platforms that have at least one keyword, in `Platform` order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.items.iter().any(|k| k.platform == *p))
            .collect()
    }

    pub fn get(&self, index: usize) -> Option<&Keyword> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Keyword> {
        self.items.clone()
    }
}
