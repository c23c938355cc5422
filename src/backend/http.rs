use crate::{
    backend::{BackendRequest, RecsysBackend},
    error::{AppError, AppResult},
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed implementation of the recommendation backend
///
/// Every endpoint is resolved relative to the configured base URL, so the
/// same client works whether the backend is mounted at the host root or under
/// a prefix.
#[derive(Clone)]
pub struct HttpBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: normalize_base(base_url),
        })
    }

    fn url_for(&self, request: &BackendRequest) -> String {
        format!("{}{}", self.base_url, request.endpoint.path())
    }

    /// Checks the status and returns the response body
    async fn read_body(request: &BackendRequest, response: reqwest::Response) -> AppResult<String> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                request = %request,
                status = %status,
                "Backend request failed"
            );
            return Err(AppError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

fn normalize_base(base_url: &str) -> String {
    if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{}/", base_url)
    }
}

/// Empty bodies and JSON `null` are both "no payload"
fn parse_payload(body: &str) -> AppResult<Option<Value>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    parse_json(body)
}

/// JSON `null` is "no payload"; an empty body is malformed
fn parse_json(body: &str) -> AppResult<Option<Value>> {
    match serde_json::from_str::<Value>(body)? {
        Value::Null => Ok(None),
        value => Ok(Some(value)),
    }
}

#[async_trait::async_trait]
impl RecsysBackend for HttpBackend {
    async fn get_json(&self, request: &BackendRequest) -> AppResult<Option<Value>> {
        tracing::debug!(request = %request, "Fetching from backend");

        let response = self
            .http_client
            .get(self.url_for(request))
            .query(&request.params)
            .send()
            .await?;

        parse_payload(&Self::read_body(request, response).await?)
    }

    async fn post_form(&self, request: &BackendRequest) -> AppResult<Option<Value>> {
        tracing::debug!(request = %request, "Posting form to backend");

        let response = self
            .http_client
            .post(self.url_for(request))
            .form(&request.params)
            .send()
            .await?;

        // Switch acknowledgements must carry a JSON body
        parse_json(&Self::read_body(request, response).await?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        routing::get,
        Form, Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    /// Serves `router` on an ephemeral port and returns its base URL
    async fn spawn_backend(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_parse_payload_empty_and_null() {
        assert!(parse_payload("").unwrap().is_none());
        assert!(parse_payload("  \n").unwrap().is_none());
        assert!(parse_payload("null").unwrap().is_none());
        assert_eq!(parse_payload("[]").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_parse_json_requires_a_body() {
        assert!(matches!(parse_json(""), Err(AppError::Malformed(_))));
        assert!(parse_json("null").unwrap().is_none());
    }

    #[test]
    fn test_parse_payload_rejects_garbage() {
        let err = parse_payload("<html>oops</html>").unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base("http://a:1"), "http://a:1/");
        assert_eq!(normalize_base("http://a:1/api/"), "http://a:1/api/");
    }

    #[tokio::test]
    async fn test_get_json_sends_query_params() {
        let router = Router::new().route(
            "/getrecommendation",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!([{ "genre": params.get("genre"), "size": params.get("size") }]))
            }),
        );
        let base = spawn_backend(router).await;
        let backend = HttpBackend::new(&base, None).unwrap();

        let payload = backend
            .get_json(&BackendRequest::genre_recommendations("Sci-Fi", 8))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload[0]["genre"], "Sci-Fi");
        assert_eq!(payload[0]["size"], "8");
    }

    #[tokio::test]
    async fn test_get_json_non_success_is_error() {
        let router = Router::new().route(
            "/getmovie",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_backend(router).await;
        let backend = HttpBackend::new(&base, None).unwrap();

        let err = backend
            .get_json(&BackendRequest::movie(1))
            .await
            .unwrap_err();

        match err {
            AppError::Backend { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_get_json_null_body_is_none() {
        let router = Router::new().route("/getmovie", get(|| async { "null" }));
        let base = spawn_backend(router).await;
        let backend = HttpBackend::new(&base, None).unwrap();

        let payload = backend.get_json(&BackendRequest::movie(999)).await.unwrap();
        assert!(payload.is_none());
    }

    #[tokio::test]
    async fn test_post_form_sends_body() {
        let router = Router::new().route(
            "/getmodel",
            axum::routing::post(|Form(form): Form<HashMap<String, String>>| async move {
                Json(json!({
                    "success": form.get("action").map(String::as_str) == Some("switch"),
                    "currentModel": form.get("version"),
                }))
            }),
        );
        let base = spawn_backend(router).await;
        let backend = HttpBackend::new(&base, None).unwrap();

        let payload = backend
            .post_form(&BackendRequest::model_switch("NCF"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(payload["success"], true);
        assert_eq!(payload["currentModel"], "NCF");
    }

    #[tokio::test]
    async fn test_post_form_empty_body_is_error() {
        let router = Router::new()
            .route("/getmodel", axum::routing::post(|| async { StatusCode::OK }));
        let base = spawn_backend(router).await;
        let backend = HttpBackend::new(&base, None).unwrap();

        let err = backend
            .post_form(&BackendRequest::model_switch("NCF"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{}", addr), None).unwrap();
        let err = backend.get_json(&BackendRequest::user(1)).await.unwrap_err();
        assert!(matches!(err, AppError::HttpClient(_)));
    }
}
