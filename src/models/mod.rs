pub mod item;
pub mod metadata;
pub mod recommendation;
pub mod similarity;

pub use item::{Catalog, Item};
pub use metadata::{MetadataRecord, Rating, TmdbMovieDetails};
pub use recommendation::{match_score, EnrichedResult, Recommendation};
pub use similarity::SimilarityMatrix;
