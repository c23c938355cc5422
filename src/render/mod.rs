//! HTML fragment rendering
//!
//! Pure functions from backend records to markup. All backend-provided text
//! is escaped here, at the point fragments are built.

pub mod escape;
pub mod format;
pub mod fragments;
pub mod labels;
pub mod widget;

pub use escape::{escape_html, Html};
pub use fragments::Links;
pub use labels::genre_label;
