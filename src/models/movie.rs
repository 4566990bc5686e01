use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalog entry as persisted in the model artifact.
///
/// The offline export is loose about types: `genres` and `keywords` are
/// comma-separated strings, text fields may be null or empty, and numeric
/// fields may be missing. Anything unusable is normalised here so the rest
/// of the crate only sees `Option<String>` and `f64`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "non_empty_text")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "non_empty_text")]
    pub genres: Option<String>,
    #[serde(default, deserialize_with = "non_empty_text")]
    pub keywords: Option<String>,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub popularity: f64,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub rating: f64,
    #[serde(default, deserialize_with = "non_empty_text")]
    pub poster: Option<String>,
}

fn non_empty_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text),
        _ => None,
    })
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty_text(deserializer)?.unwrap_or_default())
}

fn number_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserialization_full_record() {
        let json = r#"{
            "id": 603,
            "title": "Matrix",
            "overview": "Um hacker descobre a verdade sobre a realidade.",
            "genres": "Ação, Ficção científica",
            "keywords": "simulação, hacker",
            "popularity": 83.2,
            "rating": 8.2,
            "poster": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg"
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.title, "Matrix");
        assert_eq!(movie.genres.as_deref(), Some("Ação, Ficção científica"));
        assert_eq!(movie.popularity, 83.2);
        assert_eq!(
            movie.poster.as_deref(),
            Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg")
        );
    }

    #[test]
    fn test_movie_deserialization_tolerates_loose_export() {
        let json = r#"{
            "id": 42,
            "title": "Sem Nome",
            "overview": "",
            "genres": 17,
            "keywords": ["not", "a", "string"],
            "popularity": "",
            "poster": null
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.overview, None);
        assert_eq!(movie.genres, None);
        assert_eq!(movie.keywords, None);
        assert_eq!(movie.popularity, 0.0);
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.poster, None);
    }

    #[test]
    fn test_movie_requires_id() {
        let result: Result<Movie, _> = serde_json::from_str(r#"{ "title": "Orphan" }"#);
        assert!(result.is_err());
    }
}
