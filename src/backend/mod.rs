//! Recommendation backend abstraction
//!
//! Everything the rendering layer knows about the backend goes through this
//! trait: one JSON GET per request descriptor, plus the form POST used by the
//! model switch. Implementations never retry.

use serde_json::Value;

use crate::error::AppResult;

pub mod http;
pub mod request;

pub use http::HttpBackend;
pub use request::{BackendRequest, Endpoint};

/// Fetch capability consumed by the populators
///
/// `Ok(None)` means the backend answered successfully with an empty body or a
/// JSON `null`. Transport failures, non-2xx statuses and bodies that are not
/// JSON all come back as `Err`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecsysBackend: Send + Sync {
    /// Issue a GET for the request descriptor
    async fn get_json(&self, request: &BackendRequest) -> AppResult<Option<Value>>;

    /// Issue a form-encoded POST to the request's endpoint, with its params as the body
    ///
    /// Unlike `get_json`, an empty response body is an `Err`; only a JSON
    /// `null` yields `Ok(None)`.
    async fn post_form(&self, request: &BackendRequest) -> AppResult<Option<Value>>;

    /// Backend name for logging and debugging
    fn name(&self) -> &'static str;
}
