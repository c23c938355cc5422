#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use sparrow_web::{
    backend::{BackendRequest, RecsysBackend},
    error::{AppError, AppResult},
};

/// Canned answer for one request
#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Empty,
    Fail,
}

/// In-process backend keyed by the request's display form
/// (`getmovie?id=3`), with an optional delay per request
#[derive(Default)]
pub struct ScriptedBackend {
    routes: HashMap<String, (Duration, Reply)>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, request: &str, reply: Reply) -> Self {
        self.routes
            .insert(request.to_string(), (Duration::ZERO, reply));
        self
    }

    pub fn on_delayed(mut self, request: &str, delay_ms: u64, reply: Reply) -> Self {
        self.routes.insert(
            request.to_string(),
            (Duration::from_millis(delay_ms), reply),
        );
        self
    }

    /// Requests received so far, in arrival order
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn answer(&self, request: &BackendRequest) -> AppResult<Option<Value>> {
        let key = request.to_string();
        self.seen.lock().unwrap().push(key.clone());

        let Some((delay, reply)) = self.routes.get(&key).cloned() else {
            return Ok(None);
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match reply {
            Reply::Json(value) => Ok(Some(value)),
            Reply::Empty => Ok(None),
            Reply::Fail => Err(AppError::Backend {
                status: 500,
                body: "scripted failure".to_string(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl RecsysBackend for ScriptedBackend {
    async fn get_json(&self, request: &BackendRequest) -> AppResult<Option<Value>> {
        self.answer(request).await
    }

    async fn post_form(&self, request: &BackendRequest) -> AppResult<Option<Value>> {
        self.answer(request).await
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn movie(id: u64, title: &str) -> Value {
    json!({
        "movieId": id,
        "title": title,
        "releaseYear": 2001,
        "averageRating": 4.12,
        "ratingNumber": 87,
        "genres": ["Drama", "Thriller"]
    })
}

pub fn user(id: u64, rated: &[(u64, f64)]) -> Value {
    let ratings: Vec<Value> = rated
        .iter()
        .map(|(movie_id, score)| {
            json!({ "rating": { "movieId": movie_id, "userId": id, "score": score, "timestamp": 0 } })
        })
        .collect();
    json!({
        "userId": id,
        "averageRating": 3.5,
        "highestRating": 5.0,
        "lowestRating": 1.0,
        "ratingCount": rated.len(),
        "favoriteGenre": "Drama",
        "ratings": ratings
    })
}

/// Titles of the cards in `html`, in document order
pub fn card_titles(html: &str) -> Vec<String> {
    const OPEN: &str = r#"<p class="title">"#;
    html.match_indices(OPEN)
        .map(|(start, _)| {
            let rest = &html[start + OPEN.len()..];
            rest[..rest.find("</p>").unwrap()].to_string()
        })
        .collect()
}
