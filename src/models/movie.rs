use serde::{Deserialize, Deserializer, Serialize};

use super::RatingEntry;

/// A movie as the backend serializes it in list endpoints
///
/// This is the display record behind every card in a row. Fields the backend
/// adds beyond these (embeddings, feature maps) are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: u64,
    pub title: String,
    pub release_year: i32,
    pub average_rating: f64,
    pub rating_number: u32,
    pub genres: Vec<String>,
}

/// Relative URL of a movie's poster image
pub fn poster_path(movie_id: u64) -> String {
    format!("posters/{}.jpg", movie_id)
}

/// Full movie record returned by `getmovie`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default, deserialize_with = "string_or_number")]
    pub imdb_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub tmdb_id: Option<String>,
    #[serde(default)]
    pub top_ratings: Vec<RatingEntry>,
}

/// External ids arrive as strings from some backend builds and as numbers from
/// others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_from_backend_json() {
        let value = json!({
            "movieId": 1,
            "title": "Toy Story (1995)",
            "releaseYear": 1995,
            "averageRating": 3.92,
            "ratingNumber": 215,
            "genres": ["Adventure", "Animation"],
            "emb": null
        });

        let movie: Movie = serde_json::from_value(value).unwrap();
        assert_eq!(movie.movie_id, 1);
        assert_eq!(movie.release_year, 1995);
        assert_eq!(movie.genres, vec!["Adventure", "Animation"]);
        assert_eq!(poster_path(movie.movie_id), "posters/1.jpg");
    }

    #[test]
    fn test_movie_missing_genres_is_rejected() {
        let value = json!({
            "movieId": 2,
            "title": "Jumanji (1995)",
            "releaseYear": 1995,
            "averageRating": 3.2,
            "ratingNumber": 110
        });

        assert!(serde_json::from_value::<Movie>(value).is_err());
    }

    #[test]
    fn test_movie_detail_optional_fields() {
        let value = json!({
            "movieId": 3,
            "title": "Grumpier Old Men (1995)",
            "releaseYear": 1995,
            "averageRating": 3.0,
            "ratingNumber": 52,
            "genres": ["Comedy", "Romance"],
            "imdbId": "0113228",
            "tmdbId": 15602,
            "topRatings": [
                { "rating": { "movieId": 3, "userId": 12, "score": 5.0, "timestamp": 0 } }
            ]
        });

        let detail: MovieDetail = serde_json::from_value(value).unwrap();
        assert_eq!(detail.movie.title, "Grumpier Old Men (1995)");
        assert_eq!(detail.imdb_id.as_deref(), Some("0113228"));
        assert_eq!(detail.tmdb_id.as_deref(), Some("15602"));
        assert_eq!(detail.top_ratings.len(), 1);
        assert_eq!(detail.top_ratings[0].rating.user_id, 12);
    }
}
