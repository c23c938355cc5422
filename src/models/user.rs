use serde::{Deserialize, Serialize};

/// A single user rating, wrapped the way the backend nests it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingEntry {
    pub rating: Rating,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub movie_id: u64,
    pub user_id: u64,
    pub score: f64,
    #[serde(default)]
    pub timestamp: i64,
}

/// User record returned by `getuser`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: u64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub highest_rating: f64,
    #[serde(default)]
    pub lowest_rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub favorite_genre: Option<String>,
    #[serde(default)]
    pub ratings: Vec<RatingEntry>,
}

impl User {
    /// Avatar slot in `images/avatar/`, ten images shared round-robin
    pub fn avatar_path(&self) -> String {
        format!("images/avatar/{}.png", self.user_id % 10)
    }
}
