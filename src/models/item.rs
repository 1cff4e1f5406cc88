use serde::{Deserialize, Serialize};

/// A recommendable movie, identified by its TMDB id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    /// Stable external identifier (TMDB movie id)
    #[serde(alias = "movie_id")]
    pub id: i64,
    /// Display title, used to resolve user selections
    pub title: String,
}

impl Item {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

/// The fixed, ordered collection of items known to the system
///
/// Positions in the catalog index rows and columns of the similarity matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Item> {
        self.items.get(position)
    }

    /// Resolves a title to its catalog position by exact match
    ///
    /// When a title appears more than once, the first occurrence wins.
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.items.iter().position(|item| item.title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.title.as_str())
    }
}

impl From<Vec<Item>> for Catalog {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}
