//! Render requests, the orchestrating pipeline and still previews.

/// Orchestrates acquisition, text, composition and encoding for one request.
pub mod pipeline;
/// Still preview images.
pub mod preview;
/// Request and result types.
pub mod request;
