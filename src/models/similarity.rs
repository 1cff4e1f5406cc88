use rand::Rng;
use serde::Deserialize;

/// Precomputed pairwise similarity scores indexed by catalog position
///
/// `row(i)[j]` is the closeness of item `j` to item `i`; higher is more similar.
/// Symmetry is expected but not enforced.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// Builds a random matrix with self-similarity forced to the maximum
    pub fn synthetic<R: Rng>(size: usize, rng: &mut R) -> Self {
        let rows = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| if i == j { 1.0 } else { rng.gen_range(0.0..1.0) })
                    .collect()
            })
            .collect();

        Self { rows }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> Option<&[f64]> {
        self.rows.get(position).map(Vec::as_slice)
    }

    /// True when every row has exactly `size` columns and there are `size` rows
    pub fn is_square_of(&self, size: usize) -> bool {
        self.rows.len() == size && self.rows.iter().all(|row| row.len() == size)
    }
}
