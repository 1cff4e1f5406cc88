use std::path::Path;

use anyhow::Context;

use crate::models::{Catalog, Item, SimilarityMatrix};

/// Where the catalog and similarity data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Loaded from the precomputed files
    Precomputed,
    /// Built-in demonstration data substituted after a load failure
    Demo,
}

/// Read-only catalog and similarity data shared by all sessions
#[derive(Debug, Clone)]
pub struct DataContext {
    pub catalog: Catalog,
    pub similarity: SimilarityMatrix,
    pub origin: DataOrigin,
}

impl DataContext {
    /// Pairs a catalog with its similarity matrix, checking that their shapes agree
    pub fn new(catalog: Catalog, similarity: SimilarityMatrix) -> anyhow::Result<Self> {
        if catalog.is_empty() {
            anyhow::bail!("catalog is empty");
        }
        if !similarity.is_square_of(catalog.len()) {
            anyhow::bail!(
                "similarity matrix is not {0}x{0} (has {1} rows)",
                catalog.len(),
                similarity.len()
            );
        }

        Ok(Self {
            catalog,
            similarity,
            origin: DataOrigin::Precomputed,
        })
    }

    /// Loads the catalog and similarity matrix from JSON files
    pub fn load(movies_path: impl AsRef<Path>, similarity_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let movies_path = movies_path.as_ref();
        let similarity_path = similarity_path.as_ref();

        let raw = std::fs::read_to_string(movies_path)
            .with_context(|| format!("reading catalog from {}", movies_path.display()))?;
        let items: Vec<Item> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing catalog from {}", movies_path.display()))?;

        let raw = std::fs::read_to_string(similarity_path)
            .with_context(|| format!("reading similarity from {}", similarity_path.display()))?;
        let similarity: SimilarityMatrix = serde_json::from_str(&raw)
            .with_context(|| format!("parsing similarity from {}", similarity_path.display()))?;

        Self::new(Catalog::new(items), similarity)
    }

    /// Loads the precomputed data, substituting demonstration data on any failure
    pub fn load_or_demo(movies_path: impl AsRef<Path>, similarity_path: impl AsRef<Path>) -> Self {
        match Self::load(movies_path, similarity_path) {
            Ok(context) => {
                tracing::info!(
                    items = context.catalog.len(),
                    "Loaded precomputed catalog and similarity matrix"
                );
                context
            }
            Err(e) => {
                tracing::warn!(
                    error = %format!("{:#}", e),
                    "Precomputed data unavailable, using demonstration data"
                );
                Self::demo()
            }
        }
    }

    /// Built-in catalog with a random similarity matrix
    pub fn demo() -> Self {
        let catalog = demo_catalog();
        let similarity = SimilarityMatrix::synthetic(catalog.len(), &mut rand::thread_rng());

        Self {
            catalog,
            similarity,
            origin: DataOrigin::Demo,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.origin == DataOrigin::Demo
    }
}

pub fn demo_catalog() -> Catalog {
    Catalog::new(vec![
        Item::new(19995, "Avatar"),
        Item::new(597, "Titanic"),
        Item::new(24428, "The Avengers"),
        Item::new(27205, "Inception"),
        Item::new(157336, "Interstellar"),
        Item::new(155, "The Dark Knight"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_precomputed_files() {
        let movies = write_json(
            r#"[{"movie_id": 19995, "title": "Avatar"}, {"movie_id": 597, "title": "Titanic"}]"#,
        );
        let similarity = write_json("[[1.0, 0.4], [0.4, 1.0]]");

        let context = DataContext::load(movies.path(), similarity.path()).unwrap();

        assert_eq!(context.origin, DataOrigin::Precomputed);
        assert_eq!(context.catalog.len(), 2);
        assert_eq!(context.catalog.get(1), Some(&Item::new(597, "Titanic")));
        assert_eq!(context.similarity.row(0), Some(&[1.0, 0.4][..]));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let movies = write_json(r#"[{"movie_id": 1, "title": "A"}, {"movie_id": 2, "title": "B"}]"#);
        let similarity = write_json("[[1.0, 0.4, 0.1], [0.4, 1.0, 0.2], [0.1, 0.2, 1.0]]");

        assert!(DataContext::load(movies.path(), similarity.path()).is_err());
    }

    #[test]
    fn test_missing_files_fall_back_to_demo() {
        let context = DataContext::load_or_demo("/nonexistent/movies.json", "/nonexistent/sim.json");

        assert!(context.is_demo());
        assert_eq!(context.catalog.len(), 6);
        assert_eq!(context.catalog.position_of("Inception"), Some(3));
        assert!(context.similarity.is_square_of(6));
        for i in 0..6 {
            assert_eq!(context.similarity.row(i).unwrap()[i], 1.0);
        }
    }

    #[test]
    fn test_malformed_json_falls_back_to_demo() {
        let movies = write_json("not json");
        let similarity = write_json("[[1.0]]");

        let context = DataContext::load_or_demo(movies.path(), similarity.path());
        assert!(context.is_demo());
    }
}
