use std::fmt::Display;

/// Endpoints exposed by the recommendation backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    GetRecommendation,
    GetSimilarMovie,
    GetUser,
    GetMovie,
    GetRecForYou,
    GetModel,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::GetRecommendation => "getrecommendation",
            Endpoint::GetSimilarMovie => "getsimilarmovie",
            Endpoint::GetUser => "getuser",
            Endpoint::GetMovie => "getmovie",
            Endpoint::GetRecForYou => "getrecforyou",
            Endpoint::GetModel => "getmodel",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// A fully determined backend request: endpoint plus ordered parameters
///
/// Built once and never mutated after it is handed to a backend. Parameter
/// values are raw; encoding happens when the request goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRequest {
    pub endpoint: Endpoint,
    pub params: Vec<(String, String)>,
}

impl BackendRequest {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `getrecommendation?genre=<code>&size=<n>&sortby=rating`
    pub fn genre_recommendations(genre: &str, size: u32) -> Self {
        Self::new(Endpoint::GetRecommendation)
            .param("genre", genre)
            .param("size", size)
            .param("sortby", "rating")
    }

    /// `getsimilarmovie?movieId=<id>&size=<n>&model=<name>`
    pub fn similar_movies(movie_id: u64, size: u32, model: &str) -> Self {
        Self::new(Endpoint::GetSimilarMovie)
            .param("movieId", movie_id)
            .param("size", size)
            .param("model", model)
    }

    pub fn user(user_id: u64) -> Self {
        Self::new(Endpoint::GetUser).param("id", user_id)
    }

    pub fn movie(movie_id: u64) -> Self {
        Self::new(Endpoint::GetMovie).param("id", movie_id)
    }

    /// `getrecforyou?id=<id>&size=<n>&model=<name>`
    pub fn rec_for_you(user_id: u64, size: u32, model: &str) -> Self {
        Self::new(Endpoint::GetRecForYou)
            .param("id", user_id)
            .param("size", size)
            .param("model", model)
    }

    pub fn model_list() -> Self {
        Self::new(Endpoint::GetModel).param("action", "list")
    }

    /// Form body for the model switch POST
    pub fn model_switch(version: &str) -> Self {
        Self::new(Endpoint::GetModel)
            .param("action", "switch")
            .param("version", version)
    }
}

impl Display for BackendRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.endpoint)?;
        for (i, (key, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, key, urlencoding::encode(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_request_display() {
        let req = BackendRequest::genre_recommendations("Sci-Fi", 8);
        assert_eq!(
            req.to_string(),
            "getrecommendation?genre=Sci-Fi&size=8&sortby=rating"
        );
        assert_eq!(req.get_param("size"), Some("8"));
    }

    #[test]
    fn test_values_are_encoded_on_display() {
        let req = BackendRequest::genre_recommendations("Film Noir & more", 4);
        assert_eq!(
            req.to_string(),
            "getrecommendation?genre=Film%20Noir%20%26%20more&size=4&sortby=rating"
        );
        // raw value is kept untranslated and unencoded
        assert_eq!(req.get_param("genre"), Some("Film Noir & more"));
    }

    #[test]
    fn test_rec_for_you_request() {
        let req = BackendRequest::rec_for_you(7, 32, "emb");
        assert_eq!(req.to_string(), "getrecforyou?id=7&size=32&model=emb");
    }

    #[test]
    fn test_request_without_params() {
        assert_eq!(BackendRequest::new(Endpoint::GetModel).to_string(), "getmodel");
    }
}
