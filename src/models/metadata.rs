use std::fmt::Display;

use serde::{Deserialize, Serialize, Serializer};

/// Sentinel shown in place of fields that could not be retrieved
pub const UNAVAILABLE: &str = "N/A";
/// Release year shown when a successful response carries no release date
pub const UNKNOWN_RELEASE_YEAR: &str = "Unknown";
/// Overview shown when a successful response carries no overview
pub const NO_OVERVIEW: &str = "No overview available.";
/// Overview shown when the lookup failed entirely
pub const DETAILS_UNAVAILABLE: &str = "Details unavailable.";

/// Average audience rating, or a marker that it could not be fetched
///
/// Serializes as a number, or as the string `"N/A"` when unavailable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    Unavailable,
}

impl Rating {
    /// Rounds a raw vote average to one decimal place
    pub fn from_vote_average(value: f64) -> Self {
        Rating::Score((value * 10.0).round() / 10.0)
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{:.1}", score),
            Rating::Unavailable => write!(f, "{}", UNAVAILABLE),
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Rating::Score(score) => serializer.serialize_f64(*score),
            Rating::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// Descriptive fields fetched for a single movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetadataRecord {
    pub poster_url: String,
    pub overview: String,
    pub rating: Rating,
    pub release_year: String,
}

impl MetadataRecord {
    /// The record returned when a lookup fails entirely
    pub fn unavailable(fallback_poster_url: impl Into<String>) -> Self {
        Self {
            poster_url: fallback_poster_url.into(),
            overview: DETAILS_UNAVAILABLE.to_string(),
            rating: Rating::Unavailable,
            release_year: UNAVAILABLE.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.rating == Rating::Unavailable
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Subset of the TMDB `/movie/{id}` response that we consume
///
/// Every field is optional: a missing field degrades only that field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbMovieDetails {
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl TmdbMovieDetails {
    /// Maps a successful response to a record, applying per-field defaults
    pub fn into_record(self, image_base_url: &str, fallback_poster_url: &str) -> MetadataRecord {
        let poster_url = match self.poster_path.filter(|path| !path.is_empty()) {
            Some(path) => format!("{}{}", image_base_url, path),
            None => fallback_poster_url.to_string(),
        };

        let release_year = self
            .release_date
            .filter(|date| !date.is_empty())
            .map(|date| date.chars().take(4).collect())
            .unwrap_or_else(|| UNKNOWN_RELEASE_YEAR.to_string());

        MetadataRecord {
            poster_url,
            overview: self.overview.unwrap_or_else(|| NO_OVERVIEW.to_string()),
            rating: Rating::from_vote_average(self.vote_average.unwrap_or(0.0)),
            release_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
    const FALLBACK: &str = "https://via.placeholder.com/500x750?text=No+Image";

    #[test]
    fn test_rating_serialization() {
        assert_eq!(serde_json::to_string(&Rating::Score(7.5)).unwrap(), "7.5");
        assert_eq!(serde_json::to_string(&Rating::Unavailable).unwrap(), "\"N/A\"");
    }

    #[test]
    fn test_rating_rounds_to_one_decimal() {
        assert_eq!(Rating::from_vote_average(7.263), Rating::Score(7.3));
        assert_eq!(Rating::from_vote_average(8.0), Rating::Score(8.0));
        assert_eq!(Rating::Score(6.0).to_string(), "6.0");
    }

    #[test]
    fn test_full_response_mapping() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "poster_path": "/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg",
            "overview": "Cobb, a skilled thief...",
            "vote_average": 8.369,
            "release_date": "2010-07-15"
        }"#;

        let details: TmdbMovieDetails = serde_json::from_str(json).unwrap();
        let record = details.into_record(IMAGE_BASE, FALLBACK);

        assert_eq!(
            record.poster_url,
            "https://image.tmdb.org/t/p/w500/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
        );
        assert_eq!(record.overview, "Cobb, a skilled thief...");
        assert_eq!(record.rating, Rating::Score(8.4));
        assert_eq!(record.release_year, "2010");
        assert!(!record.is_unavailable());
    }

    #[test]
    fn test_missing_fields_use_typed_defaults() {
        let details: TmdbMovieDetails = serde_json::from_str(r#"{"poster_path": null}"#).unwrap();
        let record = details.into_record(IMAGE_BASE, FALLBACK);

        assert_eq!(record.poster_url, FALLBACK);
        assert_eq!(record.overview, NO_OVERVIEW);
        assert_eq!(record.rating, Rating::Score(0.0));
        assert_eq!(record.release_year, UNKNOWN_RELEASE_YEAR);
        assert!(!record.is_unavailable());
    }

    #[test]
    fn test_unavailable_record() {
        let record = MetadataRecord::unavailable(FALLBACK);

        assert_eq!(record.poster_url, FALLBACK);
        assert_eq!(record.overview, "Details unavailable.");
        assert_eq!(record.rating, Rating::Unavailable);
        assert_eq!(record.release_year, "N/A");
        assert!(record.is_unavailable());
    }
}
