//! Rendering layer for the Sparrow movie recommendation site
//!
//! Fetches JSON from the recommendation backend, turns it into HTML
//! fragments and fills the rows and panels of a page with them. The `api`
//! module serves the resulting pages.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod middleware;
pub mod model_selector;
pub mod models;
pub mod page;
pub mod populate;
pub mod render;
