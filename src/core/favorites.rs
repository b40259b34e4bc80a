use std::collections::BTreeSet;

/// Dogs the user has marked, independent of the page on screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesSet {
    ids: BTreeSet<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present; returns whether it is now a favorite
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Every favorite, for submission to the matcher
    pub fn all(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
