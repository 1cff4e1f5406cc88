use serde::Serialize;

use super::{Item, MetadataRecord};

/// A ranked suggestion produced for a query title
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub id: i64,
    /// Similarity rescaled to a percentage, always within [0, 100]
    pub match_score: u8,
}

impl Recommendation {
    pub fn new(item: &Item, similarity: f64) -> Self {
        Self {
            title: item.title.clone(),
            id: item.id,
            match_score: match_score(similarity),
        }
    }
}

/// Converts a raw similarity into a display percentage
///
/// Inputs outside [0, 1] are clamped; NaN maps to 0.
pub fn match_score(similarity: f64) -> u8 {
    if similarity.is_nan() {
        return 0;
    }
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

/// A recommendation combined with its fetched metadata
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnrichedResult {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    #[serde(flatten)]
    pub metadata: MetadataRecord,
}

impl EnrichedResult {
    pub fn new(recommendation: Recommendation, metadata: MetadataRecord) -> Self {
        Self {
            recommendation,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    #[test]
    fn test_match_score_rounds() {
        assert_eq!(match_score(0.9), 90);
        assert_eq!(match_score(0.3), 30);
        assert_eq!(match_score(0.856), 86);
    }

    #[test]
    fn test_match_score_clamps_out_of_range() {
        assert_eq!(match_score(1.3), 100);
        assert_eq!(match_score(-0.2), 0);
        assert_eq!(match_score(f64::INFINITY), 100);
        assert_eq!(match_score(f64::NEG_INFINITY), 0);
        assert_eq!(match_score(f64::NAN), 0);
    }

    #[test]
    fn test_enriched_result_serializes_flat() {
        let result = EnrichedResult::new(
            Recommendation::new(&Item::new(597, "Titanic"), 0.9),
            MetadataRecord {
                poster_url: "https://example.test/p.jpg".to_string(),
                overview: "A ship.".to_string(),
                rating: Rating::Score(7.9),
                release_year: "1997".to_string(),
            },
        );

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["title"], "Titanic");
        assert_eq!(value["id"], 597);
        assert_eq!(value["match_score"], 90);
        assert_eq!(value["poster_url"], "https://example.test/p.jpg");
        assert_eq!(value["rating"], 7.9);
        assert_eq!(value["release_year"], "1997");
    }
}
