use serde::{Deserialize, Serialize};

use super::Movie;

/// Placeholder shown when a movie has no overview
pub const MISSING_OVERVIEW: &str = "Sem descrição.";

/// A ranked movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub genres: Vec<String>,
    pub keywords: Vec<String>,
    /// Blended score rounded to 4 decimal places
    pub similarity: f64,
    pub poster: Option<String>,
    pub popularity: f64,
    pub rating: f64,
}

impl Recommendation {
    pub fn from_movie(movie: &Movie, similarity: f32, poster_base_url: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            overview: movie
                .overview
                .clone()
                .unwrap_or_else(|| MISSING_OVERVIEW.to_string()),
            genres: split_and_trim(movie.genres.as_deref()),
            keywords: split_and_trim(movie.keywords.as_deref()),
            similarity: round_similarity(similarity),
            poster: movie
                .poster
                .as_ref()
                .map(|path| format!("{}{}", poster_base_url, path)),
            popularity: movie.popularity,
            rating: movie.rating,
        }
    }
}

/// Splits a comma-separated list, dropping blank entries
pub fn split_and_trim(raw: Option<&str>) -> Vec<String> {
    raw.map(|text| {
        text.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

pub fn round_similarity(score: f32) -> f64 {
    (f64::from(score) * 10_000.0).round() / 10_000.0
}
