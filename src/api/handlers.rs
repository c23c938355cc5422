use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html as HtmlResponse,
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    model_selector::ModelSelector,
    page::Page,
    render::genre_label,
};

use super::AppState;

const SITE_NAME: &str = "Sparrow RecSys";

/// Genres on the home page, top to bottom
pub const HOME_GENRES: &[&str] = &["Adventure", "Drama", "Comedy", "Thriller", "Romance", "Action"];

const DEFAULT_REC_MODEL: &str = "emb";

// Request types

#[derive(Debug, Deserialize)]
pub struct CollectionQuery {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct MovieQuery {
    #[serde(rename = "movieId")]
    pub movie_id: u64,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub id: u64,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SwitchForm {
    #[serde(default)]
    pub version: String,
}

/// Waits until every populator for a page has reached its terminal state
async fn settle(tasks: Vec<JoinHandle<()>>) {
    for task in tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Populate task join error");
        }
    }
}

fn page_title(section: &str) -> String {
    format!("{} - {}", section, SITE_NAME)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Home page: one row per featured genre
pub async fn home(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<HtmlResponse<String>> {
    let page = Page::new(SITE_NAME);

    let mut tasks = Vec::with_capacity(HOME_GENRES.len());
    for genre in HOME_GENRES {
        let row_key = format!("{}-collection", genre.to_lowercase());
        tasks.push(
            state
                .populator
                .add_genre_row(&page, genre, &row_key, state.config.home_row_size)
                .await?,
        );
    }
    settle(tasks).await;

    tracing::info!(request_id = %request_id, rows = HOME_GENRES.len(), "Home page rendered");
    Ok(HtmlResponse(page.render_html().await))
}

/// Full collection for one genre
pub async fn collection(
    State(state): State<AppState>,
    Query(params): Query<CollectionQuery>,
) -> AppResult<HtmlResponse<String>> {
    if let Some(kind) = params.kind.as_deref() {
        if kind != "genre" {
            return Err(AppError::InvalidInput(format!(
                "Unsupported collection type: {}",
                kind
            )));
        }
    }
    if params.value.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Collection value cannot be empty".to_string(),
        ));
    }

    let page = Page::new(&page_title(genre_label(&params.value)));
    let task = state
        .populator
        .add_genre_row(
            &page,
            &params.value,
            "collection",
            state.config.collection_row_size,
        )
        .await?;
    settle(vec![task]).await;

    Ok(HtmlResponse(page.render_html().await))
}

/// Movie page: detail panel plus similar movies
pub async fn movie(
    State(state): State<AppState>,
    Query(params): Query<MovieQuery>,
) -> AppResult<HtmlResponse<String>> {
    let page = Page::new(&page_title("电影详情"));

    let panel = page.insert_panel("movie-details-container").await?;
    let tasks = vec![
        state.populator.add_movie_details(panel, params.movie_id),
        state
            .populator
            .add_related_movies(&page, "related-movies", params.movie_id)
            .await?,
    ];
    settle(tasks).await;

    Ok(HtmlResponse(page.render_html().await))
}

/// User page: detail panel, personalized recommendations, rating history
pub async fn user(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> AppResult<HtmlResponse<String>> {
    let page = Page::new(&page_title("用户详情"));
    let model = params.model.as_deref().unwrap_or(DEFAULT_REC_MODEL);

    let panel = page.insert_panel("user-details-container").await?;
    let tasks = vec![
        state.populator.add_user_details(panel, params.id),
        state
            .populator
            .add_rec_for_you(&page, "rec-for-you", params.id, model)
            .await?,
        state
            .populator
            .add_user_history(&page, "user-history", params.id)
            .await?,
    ];
    settle(tasks).await;

    Ok(HtmlResponse(page.render_html().await))
}

async fn model_page(state: &AppState) -> AppResult<(Page, ModelSelector)> {
    let page = Page::new(&page_title("模型管理"));
    let widget = page.insert_model_widget("model-selector").await?;
    let selector =
        ModelSelector::with_generation(state.backend.clone(), widget, state.switch_generation.clone());
    selector.load_list().await;
    Ok((page, selector))
}

/// Model selector with the backend's current model list
pub async fn models(State(state): State<AppState>) -> AppResult<HtmlResponse<String>> {
    let (page, _) = model_page(&state).await?;
    Ok(HtmlResponse(page.render_html().await))
}

/// Switches the backend model and shows the outcome in the status line
pub async fn switch_model(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Form(form): Form<SwitchForm>,
) -> AppResult<HtmlResponse<String>> {
    let (page, selector) = model_page(&state).await?;

    tracing::info!(request_id = %request_id, version = %form.version, "Processing model switch");
    selector.switch(&form.version).await;

    Ok(HtmlResponse(page.render_html().await))
}
