use std::collections::{HashMap, HashSet};

use tokio::task::JoinHandle;

use crate::{
    backend::BackendRequest,
    error::AppResult,
    models::{MovieDetail, User},
    page::{Entry, Page, RowHandle},
    populate::{notices, RowPopulator},
    render::fragments,
};

const RELATED_SIZE: u32 = 16;
const RELATED_MODEL: &str = "emb";
const REC_FOR_YOU_SIZE: u32 = 32;

impl RowPopulator {
    /// Genre row with a header linking to the full collection
    pub async fn add_genre_row(
        &self,
        page: &Page,
        genre: &str,
        row_key: &str,
        size: u32,
    ) -> AppResult<JoinHandle<()>> {
        let header = fragments::linked_row_header(genre, self.links());
        let row = page.insert_row_frame(row_key, header).await?;
        Ok(self.populate(row, BackendRequest::genre_recommendations(genre, size)))
    }

    pub async fn add_related_movies(
        &self,
        page: &Page,
        row_key: &str,
        movie_id: u64,
    ) -> AppResult<JoinHandle<()>> {
        let row = page
            .insert_row_frame(row_key, fragments::plain_row_header("相关电影"))
            .await?;
        Ok(self.populate(
            row,
            BackendRequest::similar_movies(movie_id, RELATED_SIZE, RELATED_MODEL),
        ))
    }

    pub async fn add_rec_for_you(
        &self,
        page: &Page,
        row_key: &str,
        user_id: u64,
        model: &str,
    ) -> AppResult<JoinHandle<()>> {
        let row = page
            .insert_row_frame(row_key, fragments::plain_row_header("为你推荐"))
            .await?;
        Ok(self.populate_with_notice(
            row,
            BackendRequest::rec_for_you(user_id, REC_FOR_YOU_SIZE, model),
            notices::REC_FOR_YOU_FAILED,
        ))
    }

    /// Row of movies the user rated, each card showing the user's score
    ///
    /// One fetch for the user, then one fetch per distinct rated movie, all in
    /// flight together. Cards are emitted only after every movie fetch has
    /// settled, in the order of the user's rating list, so completion order
    /// never shows on the page.
    pub async fn add_user_history(
        &self,
        page: &Page,
        row_key: &str,
        user_id: u64,
    ) -> AppResult<JoinHandle<()>> {
        let row = page
            .insert_row_frame(row_key, fragments::plain_row_header("用户观看历史"))
            .await?;

        let populator = self.clone();
        Ok(tokio::spawn(async move {
            populator.fill_user_history(row, user_id).await;
        }))
    }

    async fn fill_user_history(&self, row: RowHandle, user_id: u64) {
        let request = BackendRequest::user(user_id);
        let user = match self.backend.get_json(&request).await {
            Ok(Some(value)) => match serde_json::from_value::<User>(value) {
                Ok(user) => user,
                Err(e) => {
                    tracing::warn!(row = %row.key(), error = %e, "Malformed user payload");
                    self.fail_row(&row, notices::USER_HISTORY_FAILED).await;
                    return;
                }
            },
            Ok(None) => {
                tracing::debug!(row = %row.key(), user_id, "No user record");
                return;
            }
            Err(e) => {
                tracing::warn!(row = %row.key(), request = %request, error = %e, "User fetch failed");
                self.fail_row(&row, notices::USER_HISTORY_FAILED).await;
                return;
            }
        };

        // Spawn one fetch per distinct movie
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();
        for entry in &user.ratings {
            let movie_id = entry.rating.movie_id;
            if !seen.insert(movie_id) {
                continue;
            }
            let backend = self.backend.clone();
            let task = tokio::spawn(async move {
                backend.get_json(&BackendRequest::movie(movie_id)).await
            });
            tasks.push((movie_id, task));
        }

        // Barrier: collect every result before rendering anything
        let mut movies: HashMap<u64, MovieDetail> = HashMap::new();
        let mut failures = 0;
        for (movie_id, task) in tasks {
            match task.await {
                Ok(Ok(Some(value))) => match serde_json::from_value::<MovieDetail>(value) {
                    Ok(detail) => {
                        movies.insert(movie_id, detail);
                    }
                    Err(e) => {
                        tracing::warn!(movie_id, error = %e, "Skipping malformed movie");
                        failures += 1;
                    }
                },
                Ok(Ok(None)) => {
                    tracing::debug!(movie_id, "Rated movie not found");
                    failures += 1;
                }
                Ok(Err(e)) => {
                    tracing::warn!(movie_id, error = %e, "Rated movie fetch failed");
                    failures += 1;
                }
                Err(e) => {
                    tracing::error!(movie_id, error = %e, "Task join error");
                    failures += 1;
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                row = %row.key(),
                success_count = movies.len(),
                error_count = failures,
                "Partial user history fetch failure"
            );
        }

        let mut appended = 0;
        for entry in &user.ratings {
            if let Some(detail) = movies.get(&entry.rating.movie_id) {
                let card = fragments::movie_card(
                    &detail.movie,
                    &entry.rating.score.to_string(),
                    self.links(),
                );
                row.append(Entry::Data(card)).await;
                appended += 1;
            }
        }

        tracing::info!(row = %row.key(), user_id, appended, "User history populated");
    }

    async fn fail_row(&self, row: &RowHandle, notice: &str) {
        row.append(Entry::Error(fragments::row_error_notice(notice)))
            .await;
    }
}
