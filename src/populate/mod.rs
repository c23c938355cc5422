//! Row population
//!
//! Every row on the site is filled the same way: the frame goes onto the page
//! first, then one fetch is issued, then results are appended in the order
//! the backend returned them. A failed fetch leaves a single inline notice in
//! the row. Nothing here retries, deduplicates or re-sorts.
//!
//! Callers own the exactly-once obligation: populating the same row twice
//! appends twice.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
    backend::{BackendRequest, RecsysBackend},
    models::Movie,
    page::{Entry, RowHandle},
    render::{fragments, Links},
};

pub mod details;
pub mod rows;

/// Inline failure texts, per call site
pub mod notices {
    pub const ROW_FAILED: &str = "加载失败，请稍后重试";
    pub const USER_HISTORY_FAILED: &str = "无法加载用户信息";
    pub const REC_FOR_YOU_FAILED: &str = "无法加载推荐结果";
    pub const MOVIE_DETAILS_FAILED: &str = "加载电影详情失败";
    pub const MOVIE_DATA_MISSING: &str = "电影数据加载失败";
    pub const USER_DETAILS_FAILED: &str = "加载用户信息失败";
    pub const USER_DATA_MISSING: &str = "用户数据加载失败";
}

/// Fills rows and panels on a page from the recommendation backend
#[derive(Clone)]
pub struct RowPopulator {
    backend: Arc<dyn RecsysBackend>,
    links: Links,
}

impl RowPopulator {
    pub fn new(backend: Arc<dyn RecsysBackend>, links: Links) -> Self {
        Self { backend, links }
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    /// Issues `request` and appends one card per result item to `row`
    ///
    /// The row frame must already be on the page. The returned handle
    /// resolves once the row has reached its terminal state.
    pub fn populate(&self, row: RowHandle, request: BackendRequest) -> JoinHandle<()> {
        self.populate_with_notice(row, request, notices::ROW_FAILED)
    }

    /// Same as [`populate`](Self::populate) with a call-site specific failure text
    pub fn populate_with_notice(
        &self,
        row: RowHandle,
        request: BackendRequest,
        failure_notice: &'static str,
    ) -> JoinHandle<()> {
        let backend = self.backend.clone();
        let links = self.links.clone();

        tokio::spawn(async move {
            match backend.get_json(&request).await {
                Ok(payload) => {
                    let appended = append_movies(&row, payload, &links).await;
                    tracing::info!(
                        row = %row.key(),
                        request = %request,
                        appended,
                        "Row populated"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        row = %row.key(),
                        request = %request,
                        backend = backend.name(),
                        error = %e,
                        "Row fetch failed"
                    );
                    row.append(Entry::Error(fragments::row_error_notice(failure_notice)))
                        .await;
                }
            }
        })
    }
}

/// Result entries of a list payload; anything but an array counts as empty
pub(crate) fn result_items(payload: Option<Value>) -> Vec<Value> {
    match payload {
        Some(Value::Array(items)) => items,
        Some(other) => {
            tracing::debug!(kind = json_kind(&other), "Non-array list payload treated as empty");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Appends a card per well-formed item, in payload order
///
/// Items that do not have the movie shape are skipped and logged; their
/// neighbours still render.
async fn append_movies(row: &RowHandle, payload: Option<Value>, links: &Links) -> usize {
    let mut appended = 0;
    for (index, value) in result_items(payload).into_iter().enumerate() {
        match serde_json::from_value::<Movie>(value) {
            Ok(movie) => {
                row.append(Entry::Data(fragments::recommendation_card(&movie, links)))
                    .await;
                appended += 1;
            }
            Err(e) => {
                tracing::warn!(row = %row.key(), index, error = %e, "Skipping malformed item");
            }
        }
    }
    appended
}
