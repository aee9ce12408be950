//! Run-level error type.
//!
//! Only errors that abort the run appear here. Model failures never do —
//! they degrade in place (Other category, fallback texts) inside the
//! components that hit them.

use crate::ghost::PublishError;
use crate::news::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to build HTTP client: {0}")]
    Http(String),
    #[error("headline fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("publishing failed: {0}")]
    Publish(#[from] PublishError),
}
